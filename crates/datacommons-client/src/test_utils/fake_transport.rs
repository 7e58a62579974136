use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use datacommons_models::{DataCommonsError, DcResult};

use crate::ancestry::fetcher::CONTAINED_IN_PLACE;
use crate::ancestry::types::Parent;
use crate::traits::{ApiTransport, Pagination};

/// (endpoint, first requested node or variable, property expression)
type ResponseKey = (String, String, Option<String>);

/// A request the fake has seen
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub endpoint: String,
    pub payload: Value,
    pub pagination: Pagination,
}

/// In-memory transport with canned responses.
///
/// Responses are looked up by endpoint and the first node of the request,
/// first with the exact property expression and then for any expression.
/// Unknown requests answer with an empty `data` map.
pub struct FakeTransport {
    responses: Mutex<HashMap<ResponseKey, DcResult<Value>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    latency: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakeTransport {
    /// Creates a new instance of FakeTransport
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            latency: None,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Delays every response, so concurrent requests overlap
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Answers `->containedInPlace` lookups of `dcid` with `parents`
    pub fn add_parents(&self, dcid: &str, parents: Vec<Parent>) {
        let nodes: Vec<Value> = parents
            .iter()
            .map(|p| json!({"dcid": p.dcid, "name": p.name, "types": p.types}))
            .collect();
        let arcs = if nodes.is_empty() {
            json!({})
        } else {
            json!({ CONTAINED_IN_PLACE: {"nodes": nodes} })
        };

        self.responses.lock().insert(
            parents_key(dcid),
            Ok(json!({"data": {dcid: {"arcs": arcs}}})),
        );
    }

    /// Makes `->containedInPlace` lookups of `dcid` fail with `error`
    pub fn fail_for(&self, dcid: &str, error: DataCommonsError) {
        self.responses.lock().insert(parents_key(dcid), Err(error));
    }

    /// Answers any request to `endpoint` whose first node (or first
    /// variable, for observations) is `key`
    pub fn add_response(&self, endpoint: &str, key: &str, response: Value) {
        self.responses
            .lock()
            .insert((endpoint.to_string(), key.to_string(), None), Ok(response));
    }

    /// Answers requests to `endpoint` for `key` with exactly `property`
    pub fn add_response_for_property(&self, endpoint: &str, key: &str, property: &str, response: Value) {
        self.responses.lock().insert(
            (endpoint.to_string(), key.to_string(), Some(property.to_string())),
            Ok(response),
        );
    }

    /// Number of requests that named `dcid` among their nodes
    pub fn calls_for(&self, dcid: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|request| {
                request.payload["nodes"]
                    .as_array()
                    .map_or(false, |nodes| nodes.iter().any(|n| n == dcid))
            })
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.requests.lock().len()
    }

    /// Every request seen so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Highest number of requests that were in flight at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn lookup(&self, endpoint: &str, payload: &Value) -> DcResult<Value> {
        let key = request_key(payload);
        let property = payload["property"].as_str().map(str::to_string);
        let responses = self.responses.lock();

        let exact = (endpoint.to_string(), key.clone(), property);
        let any = (endpoint.to_string(), key, None);
        match responses.get(&exact).or_else(|| responses.get(&any)) {
            Some(response) => response.clone(),
            None => Ok(json!({"data": {}})),
        }
    }
}

impl Default for FakeTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FakeTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeTransport")
            .field("calls", &self.total_calls())
            .finish()
    }
}

#[async_trait]
impl ApiTransport for FakeTransport {
    async fn post(&self, endpoint: &str, payload: Value, pagination: Pagination) -> DcResult<Value> {
        self.requests.lock().push(RecordedRequest {
            endpoint: endpoint.to_string(),
            payload: payload.clone(),
            pagination,
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.lookup(endpoint, &payload)
    }
}

fn parents_key(dcid: &str) -> ResponseKey {
    (
        "node".to_string(),
        dcid.to_string(),
        Some(format!("->{}", CONTAINED_IN_PLACE)),
    )
}

fn request_key(payload: &Value) -> String {
    payload["nodes"][0]
        .as_str()
        .or_else(|| payload["variable"]["dcids"][0].as_str())
        .unwrap_or_default()
        .to_string()
}
