//! Statistical variable metadata models

use serde::{Deserialize, Serialize};

/// Provenance of a statistical variable's data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Source {
    /// Dcid of the source node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dcid: Option<String>,

    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Home page of the source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// License the data is published under
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

/// A topic a variable belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Topic {
    /// Dcid of the topic
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dcid: Option<String>,

    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// An entity a variable has observations for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Dcid of the entity
    pub dcid: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// First and last observation dates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateRange {
    /// Earliest date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    /// Latest date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// Topics of a variable
pub type Topics = Vec<Topic>;
/// Sources of a variable
pub type Sources = Vec<Source>;
/// Entities observed for a variable
pub type Entities = Vec<Entity>;
/// Units a variable is measured in
pub type Units = Vec<String>;
/// Measurement methods used for a variable
pub type MeasurementMethods = Vec<String>;
/// Observation periods of a variable, e.g. `P1Y`
pub type ObservationPeriods = Vec<String>;

/// Everything known about one statistical variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatVarMetadata {
    /// Dcid of the variable
    pub dcid: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Topics the variable is filed under
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topic: Topics,

    /// Where the data comes from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source: Sources,

    /// Entities with observations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entity: Entities,

    /// Span of the available observations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,

    /// Units of measure
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unit: Units,

    /// Observation periods
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub observation_period: ObservationPeriods,

    /// Measurement methods
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub measurement_method: MeasurementMethods,
}

impl StatVarMetadata {
    /// Metadata with only the variable's dcid set
    pub fn new(dcid: impl Into<String>) -> Self {
        Self {
            dcid: dcid.into(),
            name: None,
            description: None,
            topic: Vec::new(),
            source: Vec::new(),
            entity: Vec::new(),
            date_range: None,
            unit: Vec::new(),
            observation_period: Vec::new(),
            measurement_method: Vec::new(),
        }
    }
}
