//! Typed responses of the REST API

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use datacommons_models::{
    DataCommonsError, DcResult, Facet, FlatCandidateMapping, Node, NodeData, OneOrMany,
    ResolvedEntity, Variable,
};

fn decode<T: serde::de::DeserializeOwned>(kind: &str, value: Value) -> DcResult<T> {
    serde_json::from_value(value).map_err(|e| {
        DataCommonsError::SerializationError(format!("Unexpected {} response shape: {}", kind, e))
    })
}

/// Response of a `node` request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeResponse {
    /// Queried node to what the service returned for it
    #[serde(default)]
    pub data: BTreeMap<String, NodeData>,

    /// Token for the next page, present only on single-page fetches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl NodeResponse {
    /// Decodes a parsed JSON body
    pub fn from_json(value: Value) -> DcResult<Self> {
        decode("node", value)
    }

    /// Each queried node to the nodes on all of its arcs.
    ///
    /// Queried nodes the service knows nothing about map to an empty list.
    pub fn get_properties(&self) -> BTreeMap<String, Vec<Node>> {
        self.data
            .iter()
            .map(|(dcid, data)| (dcid.clone(), data.all_nodes()))
            .collect()
    }

    /// Each queried node to its property labels
    pub fn get_property_labels(&self) -> BTreeMap<String, Vec<String>> {
        self.data
            .iter()
            .map(|(dcid, data)| (dcid.clone(), data.properties.clone().unwrap_or_default()))
            .collect()
    }
}

/// One observation with its series coordinates and provenance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationRecord {
    /// Observation date, absent when not selected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Statistical variable
    pub variable: String,
    /// Observed entity
    pub entity: String,
    /// Observed value, absent when not selected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Facet the value comes from
    pub facet_id: String,
    /// Facet metadata, when the response carried it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet: Option<Facet>,
}

/// Response of an `observation` request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationResponse {
    /// Variable dcid to its observations
    #[serde(default)]
    pub by_variable: BTreeMap<String, Variable>,

    /// Facet id to facet metadata
    #[serde(default)]
    pub facets: BTreeMap<String, Facet>,
}

impl ObservationResponse {
    /// Decodes a parsed JSON body
    pub fn from_json(value: Value) -> DcResult<Self> {
        decode("observation", value)
    }

    /// Flattens the nested response into one record per observation
    pub fn to_records(&self) -> Vec<ObservationRecord> {
        let mut records = Vec::new();
        for (variable, data) in &self.by_variable {
            for (entity, series) in &data.by_entity {
                for facet in &series.ordered_facets {
                    for observation in &facet.observations {
                        records.push(ObservationRecord {
                            date: observation.date.clone(),
                            variable: variable.clone(),
                            entity: entity.clone(),
                            value: observation.value,
                            facet_id: facet.facet_id.clone(),
                            facet: self.facets.get(&facet.facet_id).cloned(),
                        });
                    }
                }
            }
        }
        records
    }
}

/// Response of a `resolve` request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolveResponse {
    /// Resolved queries
    #[serde(default)]
    pub entities: Vec<ResolvedEntity>,
}

impl ResolveResponse {
    /// Decodes a parsed JSON body
    pub fn from_json(value: Value) -> DcResult<Self> {
        decode("resolve", value)
    }

    /// Query to a single dcid when exactly one candidate matched, else a list
    pub fn to_flat_mapping(&self) -> FlatCandidateMapping {
        self.entities
            .iter()
            .map(|entity| {
                let dcids = entity.candidates.iter().map(|c| c.dcid.clone()).collect();
                (entity.node.clone(), OneOrMany::from_vec(dcids))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_node_response_get_properties() {
        let response = NodeResponse::from_json(json!({
            "data": {
                "geoId/06": {"arcs": {"name": {"nodes": [{"value": "California"}]}}},
                "geoId/99": {}
            }
        }))
        .unwrap();

        let properties = response.get_properties();
        assert_eq!(properties["geoId/06"][0].value.as_deref(), Some("California"));
        assert!(properties["geoId/99"].is_empty());
    }

    #[test]
    fn test_node_response_wrong_shape_is_a_serialization_error() {
        let error = NodeResponse::from_json(json!({"data": ["not", "a", "map"]})).unwrap_err();
        assert!(matches!(error, DataCommonsError::SerializationError(_)));
    }

    #[test]
    fn test_observation_records_carry_facet_metadata() {
        let response = ObservationResponse::from_json(json!({
            "byVariable": {
                "Count_Person": {
                    "byEntity": {
                        "geoId/06": {"orderedFacets": [{
                            "facetId": "f1",
                            "observations": [{"date": "2023", "value": 38965193.0}]
                        }]}
                    }
                }
            },
            "facets": {"f1": {"importName": "CensusPEP", "unit": "Person"}}
        }))
        .unwrap();

        let records = response.to_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].entity, "geoId/06");
        assert_eq!(records[0].variable, "Count_Person");
        assert_eq!(
            records[0].facet.as_ref().and_then(|f| f.import_name.as_deref()),
            Some("CensusPEP")
        );
    }

    #[test]
    fn test_observation_records_without_values() {
        // select: variable, entity, date
        let response = ObservationResponse::from_json(json!({
            "byVariable": {
                "Count_Person": {
                    "byEntity": {
                        "geoId/06": {"orderedFacets": [{
                            "facetId": "f1",
                            "observations": [{"date": "2022"}, {"date": "2023"}]
                        }]}
                    }
                }
            }
        }))
        .unwrap();

        let records = response.to_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].date.as_deref(), Some("2023"));
        assert_eq!(records[1].value, None);
        assert_eq!(records[1].facet, None);
    }

    #[test]
    fn test_resolve_flat_mapping() {
        let response = ResolveResponse::from_json(json!({
            "entities": [
                {"node": "California", "candidates": [{"dcid": "geoId/06", "dominantType": "State"}]},
                {"node": "Georgia", "candidates": [{"dcid": "geoId/13"}, {"dcid": "country/GEO"}]},
                {"node": "Atlantis"}
            ]
        }))
        .unwrap();

        let mapping = response.to_flat_mapping();
        assert_eq!(mapping["California"], OneOrMany::One("geoId/06".to_string()));
        assert_eq!(
            mapping["Georgia"],
            OneOrMany::Many(vec!["geoId/13".to_string(), "country/GEO".to_string()])
        );
        assert_eq!(mapping["Atlantis"], OneOrMany::Many(vec![]));
    }
}
