//! The `node` endpoint: property lookups over the knowledge graph and the
//! ancestry operations built on them

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};

use datacommons_models::{DcResult, Dcid, Node, StringList};

use crate::ancestry::builder::build_ancestry_map;
use crate::ancestry::fetcher::{CachedParentFetcher, CONTAINED_IN_PLACE};
use crate::ancestry::postprocess::{flatten, to_tree};
use crate::ancestry::types::{AncestorEntry, Ancestry, AncestryMap, Parent};
use crate::endpoints::payloads::{normalize_properties_to_string, NodeRequestPayload};
use crate::endpoints::response::NodeResponse;
use crate::endpoints::Endpoint;
use crate::traits::{ApiTransport, Pagination};

const ENGLISH: &str = "en";

/// Which way a property is followed from the queried nodes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Properties of the node (`->`)
    #[default]
    Out,
    /// Properties pointing at the node (`<-`)
    In,
}

impl Direction {
    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Out => "->",
            Direction::In => "<-",
        }
    }
}

/// Node lookups for one client instance.
///
/// Clones share the parent cache, so ancestry fetched through one clone is
/// reused by every other.
#[derive(Clone)]
pub struct NodeEndpoint {
    endpoint: Endpoint,
    parents: Arc<CachedParentFetcher>,
    max_concurrency: usize,
}

impl NodeEndpoint {
    /// Creates the endpoint; every parent lookup holds a permit of `limiter`
    pub fn new(
        transport: Arc<dyn ApiTransport>,
        limiter: Arc<Semaphore>,
        max_concurrency: usize,
    ) -> Self {
        let endpoint = Endpoint::new("node", transport);
        let parents = Arc::new(CachedParentFetcher::new(endpoint.clone(), limiter));
        Self {
            endpoint,
            parents,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// The memoizing parent fetcher behind the ancestry operations
    pub fn parent_fetcher(&self) -> &CachedParentFetcher {
        &self.parents
    }

    /// Evaluates a relation expression on `dcids`
    #[instrument(skip(self, dcids, expression), fields(expression = %expression))]
    pub async fn fetch(
        &self,
        dcids: impl Into<StringList>,
        expression: &str,
        pagination: Pagination,
    ) -> DcResult<NodeResponse> {
        let payload = NodeRequestPayload::new(dcids.into(), expression)?.to_value()?;
        let raw = self.endpoint.post(payload, pagination).await?;
        NodeResponse::from_json(raw)
    }

    /// Labels of the properties of `dcids` in `direction`
    pub async fn fetch_property_labels(
        &self,
        dcids: impl Into<StringList>,
        direction: Direction,
        pagination: Pagination,
    ) -> DcResult<NodeResponse> {
        self.fetch(dcids, direction.arrow(), pagination).await
    }

    /// Values of `properties` of `dcids` in `direction`.
    ///
    /// `constraints` filter the values, e.g. `typeOf:City`.
    pub async fn fetch_property_values(
        &self,
        dcids: impl Into<StringList>,
        properties: impl Into<StringList>,
        constraints: Option<&str>,
        direction: Direction,
        pagination: Pagination,
    ) -> DcResult<NodeResponse> {
        let properties = normalize_properties_to_string(&properties.into())?;
        let mut expression = format!("{}{}", direction.arrow(), properties);
        if let Some(constraints) = constraints.filter(|c| !c.is_empty()) {
            expression.push_str(&format!("{{{}}}", constraints));
        }
        self.fetch(dcids, &expression, pagination).await
    }

    /// Every class in the knowledge graph
    pub async fn fetch_all_classes(&self, pagination: Pagination) -> DcResult<NodeResponse> {
        self.fetch_property_values("Class", "typeOf", None, Direction::In, pagination)
            .await
    }

    /// Display names of `dcids` in `language`.
    ///
    /// English names come from `name`; other languages from the
    /// `text@lang` values of `nameWithLanguage`, where an English value is
    /// used only with `fallback_to_en`. Entities without a usable name are
    /// left out.
    #[instrument(skip(self, dcids))]
    pub async fn fetch_entity_names(
        &self,
        dcids: impl Into<StringList>,
        language: &str,
        fallback_to_en: bool,
    ) -> DcResult<BTreeMap<Dcid, String>> {
        let english = language == ENGLISH;
        let property = if english { "name" } else { "nameWithLanguage" };

        let response = self
            .fetch_property_values(dcids, property, None, Direction::Out, Pagination::all())
            .await?;

        let names = response
            .get_properties()
            .into_iter()
            .filter_map(|(dcid, nodes)| {
                let name = if english {
                    nodes.into_iter().find_map(|node| node.value)
                } else {
                    name_in_language(&nodes, language, fallback_to_en)
                };
                name.map(|name| (dcid, name))
            })
            .collect();

        Ok(names)
    }

    /// Direct `containedInPlace` parents of `dcids`, in one request.
    ///
    /// Entities without parents are left out.
    #[instrument(skip(self, dcids))]
    pub async fn fetch_entity_parents(
        &self,
        dcids: impl Into<StringList>,
    ) -> DcResult<BTreeMap<Dcid, Vec<AncestorEntry>>> {
        let response = self
            .fetch_property_values(dcids, CONTAINED_IN_PLACE, None, Direction::Out, Pagination::all())
            .await?;

        let mut parents = BTreeMap::new();
        for (dcid, nodes) in response.get_properties() {
            if nodes.is_empty() {
                continue;
            }
            let entries = nodes
                .iter()
                .map(|node| Parent::from_node(node).map(|parent| parent.to_entry()))
                .collect::<DcResult<Vec<_>>>()?;
            parents.insert(dcid, entries);
        }
        Ok(parents)
    }

    /// Every ancestor of each of `dcids`, flat or as a tree.
    ///
    /// Duplicate inputs are looked up once. Each entity is traversed
    /// concurrently with the others, and parent lookups are shared through
    /// the instance cache. If any traversal fails, the error of the earliest
    /// failing input is returned after all traversals have finished.
    #[instrument(skip(self, dcids))]
    pub async fn fetch_entity_ancestry(
        &self,
        dcids: impl Into<StringList>,
        as_tree: bool,
    ) -> DcResult<HashMap<Dcid, Ancestry>> {
        let dcids = dcids.into().dedup_stable();
        if dcids.is_empty() {
            return Ok(HashMap::new());
        }
        debug!(entities = dcids.len(), "Resolving ancestry");

        let fetcher = self.parents.as_ref();
        let max_concurrency = self.max_concurrency;

        let mut settled: Vec<(usize, DcResult<(Dcid, AncestryMap)>)> =
            stream::iter(dcids.into_iter().enumerate())
                .map(move |(index, dcid)| async move {
                    (index, build_ancestry_map(&dcid, fetcher, max_concurrency).await)
                })
                .buffer_unordered(max_concurrency)
                .collect()
                .await;
        settled.sort_by_key(|(index, _)| *index);

        let mut ancestry = HashMap::with_capacity(settled.len());
        for (_, result) in settled {
            let (start, map) = result.map_err(|error| {
                warn!(error = %error, "Ancestry resolution failed");
                error
            })?;

            let shaped = if as_tree {
                Ancestry::Tree(to_tree(&start, &map))
            } else {
                Ancestry::Flat(flatten(&start, &map).iter().map(Parent::to_entry).collect())
            };
            ancestry.insert(start, shaped);
        }

        Ok(ancestry)
    }
}

impl fmt::Debug for NodeEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeEndpoint")
            .field("endpoint", &self.endpoint)
            .field("cached_parents", &self.parents.cache_len())
            .field("max_concurrency", &self.max_concurrency)
            .finish()
    }
}

/// Picks the `text@lang` value in `language`, or the English one when
/// falling back is allowed
fn name_in_language(nodes: &[Node], language: &str, fallback_to_en: bool) -> Option<String> {
    let mut fallback = None;

    for value in nodes.iter().filter_map(|node| node.value.as_deref()) {
        let Some((name, lang)) = value.rsplit_once('@') else {
            continue;
        };
        if lang == language {
            return Some(name.to_string());
        }
        if lang == ENGLISH && fallback.is_none() {
            fallback = Some(name.to_string());
        }
    }

    fallback.filter(|_| fallback_to_en)
}
