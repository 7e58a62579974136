//! Endpoints of the Data Commons REST API

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use datacommons_models::DcResult;

use crate::traits::{ApiTransport, Pagination};

pub mod node;
pub mod observation;
pub mod payloads;
pub mod resolve;
pub mod response;

pub use node::{Direction, NodeEndpoint};
pub use observation::{ObservationEndpoint, ObservationRequest};
pub use resolve::ResolveEndpoint;
pub use response::{NodeResponse, ObservationRecord, ObservationResponse, ResolveResponse};

/// A named endpoint bound to a transport
#[derive(Clone)]
pub struct Endpoint {
    name: &'static str,
    transport: Arc<dyn ApiTransport>,
}

impl Endpoint {
    pub fn new(name: &'static str, transport: Arc<dyn ApiTransport>) -> Self {
        Self { name, transport }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Posts `payload` to this endpoint
    pub async fn post(&self, payload: Value, pagination: Pagination) -> DcResult<Value> {
        self.transport.post(self.name, payload, pagination).await
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint").field("name", &self.name).finish()
    }
}
