//! Statistical observation models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{DataCommonsError, DcResult};

/// Which observation dates to request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ObservationDate {
    /// Only the most recent observation of each series
    #[default]
    Latest,
    /// Every observation of each series
    All,
    /// Observations on one specific date, e.g. `2020` or `2021-06`
    On(String),
}

impl ObservationDate {
    /// The wire representation of this date selector
    pub fn as_str(&self) -> &str {
        match self {
            ObservationDate::Latest => "LATEST",
            ObservationDate::All => "",
            ObservationDate::On(date) => date,
        }
    }
}

impl FromStr for ObservationDate {
    type Err = DataCommonsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("latest") {
            return Ok(ObservationDate::Latest);
        }
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(ObservationDate::All);
        }
        let looks_like_date = trimmed.starts_with(|c: char| c.is_ascii_digit())
            && trimmed.chars().all(|c| c.is_ascii_digit() || c == '-');
        if looks_like_date {
            return Ok(ObservationDate::On(trimmed.to_string()));
        }
        Err(DataCommonsError::InvalidParameter(format!(
            "Invalid date value: '{}'. Only 'LATEST', '' (empty string) or a date are allowed.",
            value
        )))
    }
}

impl Serialize for ObservationDate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A field that can be requested in an observation query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationSelect {
    /// Observation date
    Date,
    /// Statistical variable
    Variable,
    /// Observed entity
    Entity,
    /// Observed value
    Value,
    /// Facet (provenance) of the series
    Facet,
}

impl ObservationSelect {
    /// All valid wire values, sorted
    pub fn valid_values() -> [&'static str; 5] {
        ["date", "entity", "facet", "value", "variable"]
    }

    /// The wire value of this field
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationSelect::Date => "date",
            ObservationSelect::Variable => "variable",
            ObservationSelect::Entity => "entity",
            ObservationSelect::Value => "value",
            ObservationSelect::Facet => "facet",
        }
    }
}

impl fmt::Display for ObservationSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObservationSelect {
    type Err = DataCommonsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "date" => Ok(ObservationSelect::Date),
            "variable" => Ok(ObservationSelect::Variable),
            "entity" => Ok(ObservationSelect::Entity),
            "value" => Ok(ObservationSelect::Value),
            "facet" => Ok(ObservationSelect::Facet),
            other => Err(DataCommonsError::InvalidObservationSelect(format!(
                "Invalid `select` field: '{}'. Only {} are allowed.",
                other,
                Self::valid_values().join(", ")
            ))),
        }
    }
}

/// A validated list of `select` fields.
///
/// The list always contains `variable` and `entity`; without them the
/// service cannot key the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ObservationSelectList(Vec<ObservationSelect>);

impl ObservationSelectList {
    /// Validates `select`, using `date, variable, entity, value` when absent
    pub fn new(select: Option<Vec<ObservationSelect>>) -> DcResult<Self> {
        let select = select.unwrap_or_else(|| {
            vec![
                ObservationSelect::Date,
                ObservationSelect::Variable,
                ObservationSelect::Entity,
                ObservationSelect::Value,
            ]
        });

        let missing: Vec<&str> = [ObservationSelect::Variable, ObservationSelect::Entity]
            .iter()
            .filter(|required| !select.contains(required))
            .map(|required| required.as_str())
            .collect();

        if !missing.is_empty() {
            return Err(DataCommonsError::InvalidObservationSelect(format!(
                "The 'select' field must include at least the following: variable, entity (missing: {})",
                missing.join(", ")
            )));
        }

        Ok(Self(select))
    }

    /// Parses and validates raw `select` strings
    pub fn parse<S: AsRef<str>>(select: &[S]) -> DcResult<Self> {
        let parsed = select
            .iter()
            .map(|s| s.as_ref().parse::<ObservationSelect>())
            .collect::<DcResult<Vec<_>>>()?;
        Self::new(Some(parsed))
    }

    /// The selected fields
    pub fn fields(&self) -> &[ObservationSelect] {
        &self.0
    }
}

impl Default for ObservationSelectList {
    fn default() -> Self {
        Self(vec![
            ObservationSelect::Date,
            ObservationSelect::Variable,
            ObservationSelect::Entity,
            ObservationSelect::Value,
        ])
    }
}

/// A single data point.
///
/// Either field may be missing when the request's `select` left it out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Observation {
    /// Observation date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Observed value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// The observations of one series from one facet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderedFacets {
    /// Earliest date in the series
    pub earliest_date: String,
    /// Facet the series comes from
    pub facet_id: String,
    /// Latest date in the series
    pub latest_date: String,
    /// Number of observations in the series
    pub obs_count: u64,
    /// The observations themselves
    pub observations: Vec<Observation>,
}

/// Facet-ordered series for one entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityFacets {
    /// Series, best facet first
    pub ordered_facets: Vec<OrderedFacets>,
}

/// Observations of one variable grouped by entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Variable {
    /// Entity dcid to its series
    pub by_entity: BTreeMap<String, EntityFacets>,
}

/// Provenance metadata of a series
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Facet {
    /// Name of the data import
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_name: Option<String>,
    /// Measurement method
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement_method: Option<String>,
    /// Observation period, e.g. `P1Y`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation_period: Option<String>,
    /// Provenance URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance_url: Option<String>,
    /// Unit of the values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}
