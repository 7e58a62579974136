//! Async client for the Data Commons knowledge graph.
//!
//! Besides the plain `node`, `observation` and `resolve` endpoints, the
//! client resolves the full `containedInPlace` ancestry of entities,
//! fetching each parent at most once per client and keeping the number of
//! outstanding requests bounded.

pub mod adapters;
pub mod ancestry;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod traits;

// Testing utilities
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export key types for convenient usage
pub use adapters::{create_http_transport, HttpTransport};
pub use ancestry::{
    AncestorEntry, Ancestry, AncestryMap, AncestryTree, CachedParentFetcher, Parent,
    ParentFetcher, ParentType,
};
pub use client::DataCommonsClient;
pub use config::{ClientConfig, DEFAULT_MAX_CONCURRENCY};
pub use endpoints::{
    Direction, NodeEndpoint, NodeResponse, ObservationEndpoint, ObservationRecord,
    ObservationRequest, ObservationResponse, ResolveEndpoint, ResolveResponse,
};
pub use traits::{ApiTransport, Pagination};

pub use datacommons_models::{
    DataCommonsError, DcResult, Dcid, ObservationDate, ObservationSelect, ObservationSelectList,
    OneOrMany, StringList,
};

/// Initialize tracing for the library
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}
