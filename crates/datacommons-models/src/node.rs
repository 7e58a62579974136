//! Knowledge graph node models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::common::OneOrMany;

/// A single node in the knowledge graph, as returned on an arc
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier of the node, absent for literal values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dcid: Option<String>,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Provenance identifier(s) of the triple
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance_id: Option<OneOrMany<String>>,

    /// Types of the node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,

    /// Literal value, for property values that are not nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A name attached to an entity, with the language it is written in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    /// The name text
    pub value: String,
    /// Language code of the name
    pub language: String,
    /// The property the name was read from
    pub property: String,
}

/// The nodes found on one arc
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeGroup {
    /// Nodes on the arc, in service order
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// Everything the service returned for one queried node.
///
/// Property-value queries fill `arcs`; property-label queries fill
/// `properties`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// Arc label to the nodes on that arc
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub arcs: BTreeMap<String, NodeGroup>,

    /// Property labels of the node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<String>>,
}

impl NodeData {
    /// All nodes across every arc, arcs visited in label order
    pub fn all_nodes(&self) -> Vec<Node> {
        self.arcs
            .values()
            .flat_map(|group| group.nodes.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_node_data_with_arcs() {
        let data: NodeData = serde_json::from_value(json!({
            "arcs": {
                "containedInPlace": {
                    "nodes": [
                        {"dcid": "country/USA", "name": "United States", "types": ["Country"], "provenanceId": "dc/base/WikidataOtherIdGeos"},
                        {"dcid": "usc/PacificDivision", "name": "Pacific Division", "types": ["CensusDivision"]}
                    ]
                }
            }
        }))
        .unwrap();

        let nodes = data.all_nodes();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].dcid.as_deref(), Some("country/USA"));
        assert_eq!(
            nodes[0].provenance_id,
            Some(OneOrMany::One("dc/base/WikidataOtherIdGeos".to_string()))
        );
        assert_eq!(nodes[1].types, Some(vec!["CensusDivision".to_string()]));
        assert!(data.properties.is_none());
    }

    #[test]
    fn test_node_data_with_properties() {
        let data: NodeData = serde_json::from_value(json!({
            "properties": ["containedInPlace", "name", "typeOf"]
        }))
        .unwrap();

        assert!(data.arcs.is_empty());
        assert_eq!(data.properties.unwrap().len(), 3);
    }

    #[test]
    fn test_literal_node_has_value_only() {
        let node: Node = serde_json::from_value(json!({"value": "California", "provenanceId": ["a", "b"]})).unwrap();
        assert_eq!(node.value.as_deref(), Some("California"));
        assert!(node.dcid.is_none());
        assert_eq!(serde_json::to_value(&node).unwrap(), json!({"value": "California", "provenanceId": ["a", "b"]}));
    }
}
