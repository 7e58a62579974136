//! Breadth-first discovery of every ancestor of one node

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use datacommons_models::{DataCommonsError, DcResult, Dcid};

use crate::ancestry::fetcher::ParentFetcher;
use crate::ancestry::types::{AncestryMap, Parent};

/// Expands `start` level by level until no unvisited parents remain.
///
/// Within a level at most `max_concurrency` lookups are polled at once;
/// level N+1 starts only after every lookup of level N has settled. A node
/// is looked up at most once per traversal, which also cuts cycles. If any
/// lookup of a level fails, the first failure is returned once the level
/// has settled and no partial map escapes.
pub async fn build_ancestry_map<F>(
    start: &str,
    fetcher: &F,
    max_concurrency: usize,
) -> DcResult<(Dcid, AncestryMap)>
where
    F: ParentFetcher + ?Sized,
{
    let mut ancestry = AncestryMap::new();
    let mut visited: HashSet<Dcid> = HashSet::new();
    let mut frontier: Vec<Dcid> = vec![start.to_string()];
    let mut depth = 0usize;

    while !frontier.is_empty() {
        let pending: Vec<Dcid> = frontier
            .into_iter()
            .filter(|dcid| visited.insert(dcid.clone()))
            .collect();

        debug!(start, depth, pending = pending.len(), "Expanding ancestry level");

        let settled: Vec<(Dcid, DcResult<Vec<Parent>>)> = stream::iter(pending)
            .map(move |dcid| async move {
                let result = fetcher.fetch_parents(&dcid).await;
                (dcid, result)
            })
            .buffer_unordered(max_concurrency.max(1))
            .collect()
            .await;

        let mut next: Vec<Dcid> = Vec::new();
        let mut queued: HashSet<Dcid> = HashSet::new();
        let mut first_error: Option<DataCommonsError> = None;

        for (dcid, result) in settled {
            match result {
                Ok(parents) => {
                    for parent in &parents {
                        if !visited.contains(&parent.dcid) && queued.insert(parent.dcid.clone()) {
                            next.push(parent.dcid.clone());
                        }
                    }
                    ancestry.insert(dcid, parents);
                }
                Err(error) => {
                    warn!(start, dcid = %dcid, error = %error, "Parent lookup failed");
                    first_error.get_or_insert(error);
                }
            }
        }

        if let Some(error) = first_error {
            return Err(error);
        }

        frontier = next;
        depth += 1;
    }

    debug!(start, levels = depth, nodes = ancestry.len(), "Ancestry map complete");
    Ok((start.to_string(), ancestry))
}
