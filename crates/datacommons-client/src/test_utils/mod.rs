//! Fakes for exercising endpoints and the ancestry engine without a network

pub mod fake_transport;

pub use fake_transport::{FakeTransport, RecordedRequest};
