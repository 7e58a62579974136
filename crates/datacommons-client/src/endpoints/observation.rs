//! The `observation` endpoint: statistical series for variables and entities

use std::sync::Arc;

use tracing::instrument;

use datacommons_models::{DcResult, ObservationDate, ObservationSelectList, StringList};

use crate::ancestry::fetcher::CONTAINED_IN_PLACE;
use crate::endpoints::payloads::{EntitySelector, ObservationRequestPayload};
use crate::endpoints::response::ObservationResponse;
use crate::endpoints::Endpoint;
use crate::traits::{ApiTransport, Pagination};

/// What to ask the observation endpoint for
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRequest {
    pub date: ObservationDate,
    pub variables: StringList,
    pub entity: EntitySelector,
    pub select: ObservationSelectList,
    /// Restrict the series to these facets
    pub facet_ids: Option<StringList>,
}

impl ObservationRequest {
    /// Latest observations of `variables` for the listed entities
    pub fn for_entities(variables: impl Into<StringList>, entities: impl Into<StringList>) -> Self {
        Self {
            date: ObservationDate::Latest,
            variables: variables.into(),
            entity: EntitySelector::Dcids {
                dcids: entities.into().into_vec(),
            },
            select: ObservationSelectList::default(),
            facet_ids: None,
        }
    }

    /// Latest observations of `variables` for the entities matching a
    /// relation expression
    pub fn for_expression(variables: impl Into<StringList>, expression: impl Into<String>) -> Self {
        Self {
            date: ObservationDate::Latest,
            variables: variables.into(),
            entity: EntitySelector::Expression {
                expression: expression.into(),
            },
            select: ObservationSelectList::default(),
            facet_ids: None,
        }
    }

    pub fn with_date(mut self, date: ObservationDate) -> Self {
        self.date = date;
        self
    }

    pub fn with_select(mut self, select: ObservationSelectList) -> Self {
        self.select = select;
        self
    }

    pub fn with_facets(mut self, facet_ids: impl Into<StringList>) -> Self {
        self.facet_ids = Some(facet_ids.into());
        self
    }

    fn into_payload(self) -> DcResult<ObservationRequestPayload> {
        ObservationRequestPayload::new(
            self.date,
            self.variables,
            self.entity,
            self.select,
            self.facet_ids,
        )
    }
}

/// Observation lookups
#[derive(Debug, Clone)]
pub struct ObservationEndpoint {
    endpoint: Endpoint,
}

impl ObservationEndpoint {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            endpoint: Endpoint::new("observation", transport),
        }
    }

    /// Runs an observation request
    #[instrument(skip(self, request), fields(date = %request.date.as_str(), variables = request.variables.len()))]
    pub async fn fetch(&self, request: ObservationRequest) -> DcResult<ObservationResponse> {
        let payload = request.into_payload()?.to_value()?;
        let raw = self.endpoint.post(payload, Pagination::all()).await?;
        ObservationResponse::from_json(raw)
    }

    /// Most recent value of each variable for each entity
    pub async fn fetch_latest_observations(
        &self,
        variables: impl Into<StringList>,
        entities: impl Into<StringList>,
    ) -> DcResult<ObservationResponse> {
        self.fetch(ObservationRequest::for_entities(variables, entities))
            .await
    }

    /// Observations of every `entity_type` place contained in `parent_entity`,
    /// e.g. all counties of a state
    pub async fn fetch_observations_by_entity_type(
        &self,
        date: ObservationDate,
        parent_entity: &str,
        entity_type: &str,
        variables: impl Into<StringList>,
    ) -> DcResult<ObservationResponse> {
        let expression = format!(
            "{}<-{}+{{typeOf:{}}}",
            parent_entity, CONTAINED_IN_PLACE, entity_type
        );
        self.fetch(ObservationRequest::for_expression(variables, expression).with_date(date))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeTransport;
    use datacommons_models::{DataCommonsError, ObservationSelect};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_latest_observations_payload() {
        let transport = Arc::new(FakeTransport::new());
        let observation = ObservationEndpoint::new(transport.clone());

        observation
            .fetch_latest_observations("Count_Person", vec!["geoId/06", "geoId/48"])
            .await
            .unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.endpoint, "observation");
        assert_eq!(
            request.payload,
            json!({
                "date": "LATEST",
                "variable": {"dcids": ["Count_Person"]},
                "entity": {"dcids": ["geoId/06", "geoId/48"]},
                "select": ["date", "variable", "entity", "value"]
            })
        );
    }

    #[tokio::test]
    async fn test_by_entity_type_uses_contained_in_place_expression() {
        let transport = Arc::new(FakeTransport::new());
        transport.add_response(
            "observation",
            "Count_Person",
            json!({
                "byVariable": {"Count_Person": {"byEntity": {
                    "geoId/06001": {"orderedFacets": [{
                        "facetId": "f1",
                        "observations": [{"date": "2020", "value": 1682353.0}]
                    }]}
                }}},
                "facets": {"f1": {"importName": "USCensusPEP"}}
            }),
        );
        let observation = ObservationEndpoint::new(transport.clone());

        let response = observation
            .fetch_observations_by_entity_type(
                ObservationDate::All,
                "geoId/06",
                "County",
                "Count_Person",
            )
            .await
            .unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.payload["date"], "");
        assert_eq!(
            request.payload["entity"],
            json!({"expression": "geoId/06<-containedInPlace+{typeOf:County}"})
        );

        let records = response.to_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].entity, "geoId/06001");
        assert_eq!(records[0].value, Some(1682353.0));
    }

    #[tokio::test]
    async fn test_facet_filter_and_select() {
        let transport = Arc::new(FakeTransport::new());
        let observation = ObservationEndpoint::new(transport.clone());

        let select = ObservationSelectList::new(Some(vec![
            ObservationSelect::Variable,
            ObservationSelect::Entity,
            ObservationSelect::Facet,
        ]))
        .unwrap();
        let request = ObservationRequest::for_entities("Count_Person", "geoId/06")
            .with_date("2020".parse().unwrap())
            .with_select(select)
            .with_facets("2176550201");

        observation.fetch(request).await.unwrap();

        let payload = &transport.requests()[0].payload;
        assert_eq!(payload["date"], "2020");
        assert_eq!(payload["select"], json!(["variable", "entity", "facet"]));
        assert_eq!(payload["filter"], json!({"facet_ids": ["2176550201"]}));
    }

    #[tokio::test]
    async fn test_missing_variables_are_rejected_locally() {
        let transport = Arc::new(FakeTransport::new());
        let observation = ObservationEndpoint::new(transport.clone());

        let error = observation
            .fetch_latest_observations(Vec::<String>::new(), "geoId/06")
            .await
            .unwrap_err();

        assert!(matches!(error, DataCommonsError::InvalidParameter(_)));
        assert_eq!(transport.total_calls(), 0);
    }
}
