//! Traits (interfaces) at the seams of the Data Commons client

pub mod transport;

pub use transport::{ApiTransport, Pagination};

#[cfg(any(test, feature = "mocks"))]
pub use transport::MockApiTransport;
