use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::debug;

use datacommons_models::DcResult;

use crate::adapters::create_http_transport;
use crate::config::ClientConfig;
use crate::endpoints::{NodeEndpoint, ObservationEndpoint, ResolveEndpoint};
use crate::traits::ApiTransport;

/// Entry point to the Data Commons API.
///
/// Each instance owns its parent cache and its request limiter; clones
/// share both.
#[derive(Debug, Clone)]
pub struct DataCommonsClient {
    pub node: NodeEndpoint,
    pub observation: ObservationEndpoint,
    pub resolve: ResolveEndpoint,
}

impl DataCommonsClient {
    /// Creates a client talking HTTP to `config.base_url`
    pub fn new(config: ClientConfig) -> DcResult<Self> {
        let transport = create_http_transport(config.clone())?;
        Ok(Self::with_transport(transport, &config))
    }

    /// Creates a client over any transport, taking only the limits from `config`
    pub fn with_transport(transport: Arc<dyn ApiTransport>, config: &ClientConfig) -> Self {
        let max_concurrency = config.max_concurrency.max(1);
        debug!(max_concurrency, "Creating Data Commons client");

        let limiter = Arc::new(Semaphore::new(max_concurrency));
        Self {
            node: NodeEndpoint::new(Arc::clone(&transport), limiter, max_concurrency),
            observation: ObservationEndpoint::new(Arc::clone(&transport)),
            resolve: ResolveEndpoint::new(transport),
        }
    }
}
