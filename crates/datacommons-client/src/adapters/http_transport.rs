use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use datacommons_models::{DataCommonsError, DcResult};

use crate::config::ClientConfig;
use crate::traits::{ApiTransport, Pagination};

const NEXT_TOKEN: &str = "nextToken";

/// Transport for the Data Commons REST API over HTTP
#[derive(Debug, Clone)]
pub struct HttpTransport {
    config: ClientConfig,
    client: Client,
}

impl HttpTransport {
    /// Creates a new HttpTransport with the provided configuration
    pub fn new(config: ClientConfig) -> DcResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DataCommonsError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Creates a new HttpTransport with the provided base URL and timeout
    pub fn with_url_and_timeout(base_url: impl Into<String>, timeout_secs: u64) -> DcResult<Self> {
        Self::new(ClientConfig {
            base_url: base_url.into(),
            timeout_secs,
            ..ClientConfig::default()
        })
    }

    /// Maps an HTTP error to a DataCommonsError
    fn map_http_error(&self, error: reqwest::Error) -> DataCommonsError {
        if error.is_timeout() {
            DataCommonsError::CommunicationError(format!("Request timeout: {}", error))
        } else if error.is_connect() {
            DataCommonsError::CommunicationError(format!("Connection error: {}", error))
        } else {
            DataCommonsError::CommunicationError(format!("HTTP error: {}", error))
        }
    }

    async fn post_page(&self, url: &str, payload: &Value) -> DcResult<Value> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.map_http_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| format!("HTTP error: {}", status));
            return Err(DataCommonsError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| self.map_http_error(e))?;
        serde_json::from_str(&body)
            .map_err(|e| DataCommonsError::SerializationError(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    #[instrument(skip(self, payload), fields(endpoint = %endpoint, all_pages = pagination.all_pages))]
    async fn post(&self, endpoint: &str, payload: Value, pagination: Pagination) -> DcResult<Value> {
        let url = self.config.endpoint_url(endpoint);
        let mut payload = payload;

        if let Some(token) = pagination.next_token {
            set_next_token(&mut payload, token)?;
        }

        let mut merged = self.post_page(&url, &payload).await?;
        if !pagination.all_pages {
            return Ok(merged);
        }

        let mut pages = 1usize;
        while let Some(token) = take_next_token(&mut merged) {
            debug!("Following nextToken to page {}", pages + 1);
            set_next_token(&mut payload, token)?;
            let page = self.post_page(&url, &payload).await?;
            merge_json(&mut merged, page);
            pages += 1;
        }

        debug!("Fetched {} page(s) from {}", pages, url);
        Ok(merged)
    }
}

fn set_next_token(payload: &mut Value, token: String) -> DcResult<()> {
    match payload {
        Value::Object(map) => {
            map.insert(NEXT_TOKEN.to_string(), Value::String(token));
            Ok(())
        }
        _ => Err(DataCommonsError::InvalidParameter(
            "Paginated requests need a JSON object payload".to_string(),
        )),
    }
}

fn take_next_token(response: &mut Value) -> Option<String> {
    match response.as_object_mut()?.remove(NEXT_TOKEN)? {
        Value::String(token) if !token.is_empty() => Some(token),
        _ => None,
    }
}

/// Deep-merges one response page into the pages accumulated so far.
///
/// Objects merge key by key, arrays concatenate, anything else is replaced
/// by the newer page.
pub(crate) fn merge_json(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(target), Value::Array(source)) => target.extend(source),
        (target, source) => *target = source,
    }
}

/// Creates an ApiTransport implementation from a configuration
pub fn create_http_transport(config: ClientConfig) -> DcResult<Arc<dyn ApiTransport>> {
    let transport = HttpTransport::new(config)?;
    Ok(Arc::new(transport))
}
