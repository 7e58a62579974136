//! Parent lookups, memoized per client instance

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Semaphore;
use tracing::{debug, instrument};

use datacommons_models::{DataCommonsError, DcResult, Dcid};

use crate::ancestry::types::Parent;
use crate::endpoints::payloads::NodeRequestPayload;
use crate::endpoints::response::NodeResponse;
use crate::endpoints::Endpoint;
use crate::traits::Pagination;

/// The relation followed from a child to its parents
pub const CONTAINED_IN_PLACE: &str = "containedInPlace";

/// Source of the direct parents of a node
#[async_trait]
pub trait ParentFetcher: Send + Sync {
    /// Direct parents of `dcid`, in service order; empty for a root
    async fn fetch_parents(&self, dcid: &str) -> DcResult<Vec<Parent>>;
}

/// Parent fetcher backed by `node` requests, with an unbounded per-instance cache.
///
/// Every network request holds a permit of `limiter` while in flight. Cache
/// hits take no permit. Failed lookups leave the cache untouched.
pub struct CachedParentFetcher {
    endpoint: Endpoint,
    cache: DashMap<Dcid, Arc<[Parent]>>,
    limiter: Arc<Semaphore>,
}

impl CachedParentFetcher {
    pub fn new(endpoint: Endpoint, limiter: Arc<Semaphore>) -> Self {
        Self {
            endpoint,
            cache: DashMap::new(),
            limiter,
        }
    }

    pub fn cached(&self, dcid: &str) -> Option<Arc<[Parent]>> {
        self.cache.get(dcid).map(|entry| Arc::clone(entry.value()))
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    async fn fetch_remote(&self, dcid: &str) -> DcResult<Vec<Parent>> {
        let payload = NodeRequestPayload::new(dcid.into(), format!("->{}", CONTAINED_IN_PLACE))?
            .to_value()?;

        let raw = {
            let _permit = self.limiter.acquire().await.map_err(|_| {
                DataCommonsError::CommunicationError("Request limiter closed".to_string())
            })?;
            self.endpoint.post(payload, Pagination::all()).await?
        };

        let response = NodeResponse::from_json(raw)?;
        parents_from_response(dcid, &response)
    }
}

#[async_trait]
impl ParentFetcher for CachedParentFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch_parents(&self, dcid: &str) -> DcResult<Vec<Parent>> {
        if let Some(parents) = self.cached(dcid) {
            debug!("Parent cache hit");
            return Ok(parents.to_vec());
        }

        let parents = self.fetch_remote(dcid).await?;
        // Concurrent lookups of the same dcid both land here; the first write wins
        self.cache
            .entry(dcid.to_string())
            .or_insert_with(|| Arc::from(parents.clone()));
        Ok(parents)
    }
}

fn parents_from_response(dcid: &str, response: &NodeResponse) -> DcResult<Vec<Parent>> {
    let Some(data) = response.data.get(dcid) else {
        return Ok(Vec::new());
    };
    data.all_nodes().iter().map(Parent::from_node).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeTransport;
    use crate::traits::MockApiTransport;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fetcher_over(transport: Arc<FakeTransport>) -> CachedParentFetcher {
        CachedParentFetcher::new(Endpoint::new("node", transport), Arc::new(Semaphore::new(4)))
    }

    #[tokio::test]
    async fn test_second_lookup_is_served_from_cache() {
        let transport = Arc::new(FakeTransport::new());
        transport.add_parents(
            "geoId/06",
            vec![Parent::new("country/USA", Some("United States"), &["Country"])],
        );
        let fetcher = fetcher_over(Arc::clone(&transport));

        let first = fetcher.fetch_parents("geoId/06").await.unwrap();
        let second = fetcher.fetch_parents("geoId/06").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first, vec![Parent::new("country/USA", Some("United States"), &["Country"])]);
        assert_eq!(transport.calls_for("geoId/06"), 1);
    }

    #[tokio::test]
    async fn test_root_is_cached_as_empty() {
        let transport = Arc::new(FakeTransport::new());
        transport.add_parents("Earth", vec![]);
        let fetcher = fetcher_over(Arc::clone(&transport));

        assert!(fetcher.fetch_parents("Earth").await.unwrap().is_empty());
        assert!(fetcher.fetch_parents("Earth").await.unwrap().is_empty());
        assert_eq!(transport.calls_for("Earth"), 1);
        assert_eq!(fetcher.cached("Earth").map(|p| p.len()), Some(0));
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let transport = Arc::new(FakeTransport::new());
        transport.fail_for(
            "geoId/06",
            DataCommonsError::HttpStatus {
                status: 503,
                body: "unavailable".into(),
            },
        );
        let fetcher = fetcher_over(Arc::clone(&transport));

        let error = fetcher.fetch_parents("geoId/06").await.unwrap_err();
        assert!(matches!(error, DataCommonsError::HttpStatus { status: 503, .. }));
        assert_eq!(fetcher.cache_len(), 0);

        // The service recovers; the next lookup goes back to the network
        transport.add_parents(
            "geoId/06",
            vec![Parent::new("country/USA", Some("United States"), &["Country"])],
        );
        let parents = fetcher.fetch_parents("geoId/06").await.unwrap();
        assert_eq!(parents.len(), 1);
        assert_eq!(transport.calls_for("geoId/06"), 2);
    }

    #[tokio::test]
    async fn test_requests_contained_in_place_of_one_node() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_post()
            .withf(|endpoint, payload, pagination| {
                endpoint == "node"
                    && *payload == json!({"nodes": ["geoId/06085"], "property": "->containedInPlace"})
                    && pagination.all_pages
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(json!({"data": {"geoId/06085": {"arcs": {"containedInPlace": {"nodes": [
                    {"dcid": "geoId/06", "name": "California", "types": ["State"]}
                ]}}}}}))
            });

        let fetcher = CachedParentFetcher::new(
            Endpoint::new("node", Arc::new(transport)),
            Arc::new(Semaphore::new(1)),
        );

        let parents = fetcher.fetch_parents("geoId/06085").await.unwrap();
        assert_eq!(parents, vec![Parent::new("geoId/06", Some("California"), &["State"])]);
    }

    #[tokio::test]
    async fn test_node_without_dcid_is_a_decoding_failure() {
        let mut transport = MockApiTransport::new();
        transport.expect_post().times(1).returning(|_, _, _| {
            Ok(json!({"data": {"geoId/06": {"arcs": {"containedInPlace": {"nodes": [{"name": "?"}]}}}}}))
        });

        let fetcher = CachedParentFetcher::new(
            Endpoint::new("node", Arc::new(transport)),
            Arc::new(Semaphore::new(1)),
        );

        let error = fetcher.fetch_parents("geoId/06").await.unwrap_err();
        assert!(matches!(error, DataCommonsError::SerializationError(_)));
        assert_eq!(fetcher.cache_len(), 0);
    }
}
