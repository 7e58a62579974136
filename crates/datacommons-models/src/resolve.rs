//! Entity resolution models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::common::OneOrMany;

/// One candidate node for a resolved query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Dcid of the candidate
    #[serde(default)]
    pub dcid: String,

    /// Primary type of the candidate, when the service reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominant_type: Option<String>,
}

/// A query string together with the nodes it resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEntity {
    /// The query (name, wikidata id, coordinates...) being resolved
    pub node: String,

    /// Matching candidates, best first
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// Query string to a single dcid, or to a list when several candidates match
pub type FlatCandidateMapping = BTreeMap<String, OneOrMany<String>>;
