//! The `resolve` endpoint: maps names, external ids and coordinates to dcids

use std::sync::Arc;

use tracing::instrument;

use datacommons_models::{DcResult, StringList};

use crate::endpoints::payloads::ResolveRequestPayload;
use crate::endpoints::response::ResolveResponse;
use crate::endpoints::Endpoint;
use crate::traits::{ApiTransport, Pagination};

/// `<-{property}{typeOf:T}->dcid`, the type constraint only when given
fn resolve_expression(property: &str, entity_type: Option<&str>) -> String {
    match entity_type {
        Some(entity_type) => format!("<-{}{{typeOf:{}}}->dcid", property, entity_type),
        None => format!("<-{}->dcid", property),
    }
}

/// Identifier resolution
#[derive(Debug, Clone)]
pub struct ResolveEndpoint {
    endpoint: Endpoint,
}

impl ResolveEndpoint {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            endpoint: Endpoint::new("resolve", transport),
        }
    }

    /// Resolves `nodes` through a relation expression
    #[instrument(skip(self, nodes, expression), fields(expression = %expression))]
    pub async fn fetch(&self, nodes: impl Into<StringList>, expression: &str) -> DcResult<ResolveResponse> {
        let payload = ResolveRequestPayload::new(nodes.into(), expression)?.to_value()?;
        let raw = self.endpoint.post(payload, Pagination::all()).await?;
        ResolveResponse::from_json(raw)
    }

    /// Dcids of entities described by `names`, optionally of one type
    pub async fn fetch_dcids_by_name(
        &self,
        names: impl Into<StringList>,
        entity_type: Option<&str>,
    ) -> DcResult<ResolveResponse> {
        self.fetch(names, &resolve_expression("description", entity_type))
            .await
    }

    /// Dcids of entities with the given Wikidata ids
    pub async fn fetch_dcids_by_wikidata_id(
        &self,
        wikidata_ids: impl Into<StringList>,
    ) -> DcResult<ResolveResponse> {
        self.fetch(wikidata_ids, &resolve_expression("wikidataId", None))
            .await
    }

    /// Dcids of places containing a coordinate, optionally of one type
    pub async fn fetch_dcid_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
        entity_type: Option<&str>,
    ) -> DcResult<ResolveResponse> {
        let node = format!("{}#{}", latitude, longitude);
        self.fetch(node, &resolve_expression("geoCoordinate", entity_type))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeTransport;
    use datacommons_models::OneOrMany;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_resolve_expression_with_and_without_type() {
        assert_eq!(resolve_expression("description", None), "<-description->dcid");
        assert_eq!(
            resolve_expression("description", Some("State")),
            "<-description{typeOf:State}->dcid"
        );
    }

    #[tokio::test]
    async fn test_dcids_by_name() {
        let transport = Arc::new(FakeTransport::new());
        transport.add_response(
            "resolve",
            "Georgia",
            json!({"entities": [{"node": "Georgia", "candidates": [
                {"dcid": "geoId/13", "dominantType": "State"},
                {"dcid": "country/GEO", "dominantType": "Country"}
            ]}]}),
        );
        let resolve = ResolveEndpoint::new(transport.clone());

        let response = resolve.fetch_dcids_by_name("Georgia", None).await.unwrap();

        assert_eq!(
            response.to_flat_mapping()["Georgia"],
            OneOrMany::Many(vec!["geoId/13".to_string(), "country/GEO".to_string()])
        );
        assert_eq!(
            transport.requests()[0].payload,
            json!({"nodes": ["Georgia"], "property": "<-description->dcid"})
        );
    }

    #[tokio::test]
    async fn test_dcid_by_coordinates_node_format() {
        let transport = Arc::new(FakeTransport::new());
        let resolve = ResolveEndpoint::new(transport.clone());

        resolve
            .fetch_dcid_by_coordinates(37.42, -122.08, Some("City"))
            .await
            .unwrap();

        assert_eq!(
            transport.requests()[0].payload,
            json!({"nodes": ["37.42#-122.08"], "property": "<-geoCoordinate{typeOf:City}->dcid"})
        );
    }

    #[tokio::test]
    async fn test_wikidata_ids() {
        let transport = Arc::new(FakeTransport::new());
        transport.add_response(
            "resolve",
            "Q30",
            json!({"entities": [{"node": "Q30", "candidates": [{"dcid": "country/USA"}]}]}),
        );
        let resolve = ResolveEndpoint::new(transport.clone());

        let response = resolve.fetch_dcids_by_wikidata_id(vec!["Q30"]).await.unwrap();

        assert_eq!(response.to_flat_mapping()["Q30"], OneOrMany::One("country/USA".to_string()));
        assert_eq!(transport.requests()[0].payload["property"], "<-wikidataId->dcid");
    }
}
