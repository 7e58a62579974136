//! ApiTransport trait definition for talking to the remote service

use async_trait::async_trait;
use datacommons_models::DcResult;
use serde_json::Value;

/// How many pages of a paginated response to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// Follow `nextToken` until the service stops returning one
    pub all_pages: bool,
    /// Token to start from, taken from an earlier single-page response
    pub next_token: Option<String>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            all_pages: true,
            next_token: None,
        }
    }
}

impl Pagination {
    /// Fetch every page
    pub fn all() -> Self {
        Self::default()
    }

    /// Fetch only the first page, leaving `nextToken` in the response
    pub fn first_page() -> Self {
        Self {
            all_pages: false,
            next_token: None,
        }
    }

    /// Start from `token` instead of the first page
    pub fn with_next_token(mut self, token: impl Into<String>) -> Self {
        self.next_token = Some(token.into());
        self
    }
}

/// Represents the interface for issuing requests against the remote API.
/// This abstracts the HTTP layer so endpoints and the ancestry engine can be
/// exercised against fakes.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Posts `payload` to `endpoint` (e.g. `node`, `observation`).
    ///
    /// Contract: issues the request, follows pagination as requested by
    /// `pagination`, deep-merges the pages and returns the parsed JSON body.
    /// Network failures, non-success statuses and malformed bodies are
    /// returned as errors; nothing is retried.
    async fn post(&self, endpoint: &str, payload: Value, pagination: Pagination) -> DcResult<Value>;
}
