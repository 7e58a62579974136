//! Records produced by the ancestry engine

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use datacommons_models::{DataCommonsError, DcResult, Dcid, Node, OneOrMany};

/// Type of an ancestor: a single type name, or all of them when there are
/// zero or several
pub type ParentType = OneOrMany<String>;

/// Each expanded node to its direct parents, for one traversal
pub type AncestryMap = HashMap<Dcid, Vec<Parent>>;

/// One direct ancestor of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parent {
    pub dcid: Dcid,
    pub name: Option<String>,
    pub types: Vec<String>,
}

impl Parent {
    pub fn new(dcid: impl Into<Dcid>, name: Option<&str>, types: &[&str]) -> Self {
        Self {
            dcid: dcid.into(),
            name: name.map(str::to_string),
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Reads a parent off a `containedInPlace` arc node; the node must carry a dcid
    pub fn from_node(node: &Node) -> DcResult<Self> {
        let dcid = node.dcid.clone().ok_or_else(|| {
            DataCommonsError::SerializationError(
                "containedInPlace node without a dcid".to_string(),
            )
        })?;
        Ok(Self {
            dcid,
            name: node.name.clone(),
            types: node.types.clone().unwrap_or_default(),
        })
    }

    pub fn type_field(&self) -> ParentType {
        OneOrMany::from_vec(self.types.clone())
    }

    pub fn to_entry(&self) -> AncestorEntry {
        AncestorEntry {
            dcid: self.dcid.clone(),
            name: self.name.clone(),
            entity_type: self.type_field(),
        }
    }
}

/// Flat ancestor entry, `{dcid, name, type}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestorEntry {
    pub dcid: Dcid,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub entity_type: ParentType,
}

/// Nested ancestry, one branch per path to a root.
///
/// The starting node has no name or type of its own; those only exist on
/// parent records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestryTree {
    pub dcid: Dcid,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub entity_type: Option<ParentType>,
    pub parents: Vec<AncestryTree>,
}

impl AncestryTree {
    /// Number of nodes in the tree, the root included
    pub fn size(&self) -> usize {
        1 + self.parents.iter().map(AncestryTree::size).sum::<usize>()
    }
}

/// Ancestry of one entity in the shape the caller asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ancestry {
    Flat(Vec<AncestorEntry>),
    Tree(AncestryTree),
}

impl Ancestry {
    pub fn as_flat(&self) -> Option<&[AncestorEntry]> {
        match self {
            Ancestry::Flat(entries) => Some(entries),
            Ancestry::Tree(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&AncestryTree> {
        match self {
            Ancestry::Tree(tree) => Some(tree),
            Ancestry::Flat(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_entry_type_is_string_for_single_type() {
        let entry = Parent::new("country/USA", Some("United States"), &["Country"]).to_entry();
        assert_eq!(
            serde_json::to_value(entry).unwrap(),
            json!({"dcid": "country/USA", "name": "United States", "type": "Country"})
        );
    }

    #[test]
    fn test_entry_type_is_list_for_several_types() {
        let entry = Parent::new("geoId/06", None, &["State", "AdministrativeArea1"]).to_entry();
        assert_eq!(
            serde_json::to_value(entry).unwrap(),
            json!({"dcid": "geoId/06", "name": null, "type": ["State", "AdministrativeArea1"]})
        );
    }

    #[test]
    fn test_parent_from_node_requires_dcid() {
        let node = Node {
            name: Some("Nowhere".into()),
            ..Node::default()
        };
        assert!(matches!(
            Parent::from_node(&node),
            Err(DataCommonsError::SerializationError(_))
        ));
    }
}
