//! Request payloads for the REST API

use serde::Serialize;
use serde_json::Value;

use datacommons_models::{
    DataCommonsError, DcResult, ObservationDate, ObservationSelectList, StringList,
};

/// Characters that belong to the expression syntax and never to a property name
const EXPRESSION_CHARS: &[char] = &['<', '>', '{', '}', '[', ']', ','];

/// Rejects empty lists and blank identifiers before any request is made
pub fn validate_dcids(kind: &str, dcids: &StringList) -> DcResult<()> {
    if dcids.is_empty() {
        return Err(DataCommonsError::InvalidParameter(format!(
            "At least one {} is required",
            kind
        )));
    }
    if dcids.iter().any(|dcid| dcid.trim().is_empty()) {
        return Err(DataCommonsError::InvalidParameter(format!(
            "Blank {} in request",
            kind
        )));
    }
    Ok(())
}

/// Renders one property as-is and several as `[a, b]`
pub fn normalize_properties_to_string(properties: &StringList) -> DcResult<String> {
    validate_dcids("property", properties)?;

    if let Some(bad) = properties
        .iter()
        .find(|p| p.chars().any(|c| c.is_whitespace() || EXPRESSION_CHARS.contains(&c)))
    {
        return Err(DataCommonsError::InvalidParameter(format!(
            "Malformed property name: '{}'",
            bad
        )));
    }

    match properties.as_slice() {
        [single] => Ok(single.clone()),
        many => Ok(format!("[{}]", many.join(", "))),
    }
}

/// Payload of `node` and `resolve` requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRequestPayload {
    /// Nodes the expression is evaluated on
    pub nodes: Vec<String>,
    /// Property or relation expression
    pub property: String,
}

/// `resolve` requests share the node payload shape
pub type ResolveRequestPayload = NodeRequestPayload;

impl NodeRequestPayload {
    /// Validates and builds a payload
    pub fn new(nodes: StringList, expression: impl Into<String>) -> DcResult<Self> {
        validate_dcids("node dcid", &nodes)?;

        let property = expression.into();
        if property.trim().is_empty() {
            return Err(DataCommonsError::InvalidParameter(
                "Expression must not be empty".to_string(),
            ));
        }

        Ok(Self {
            nodes: nodes.into_vec(),
            property,
        })
    }

    /// JSON body of the request
    pub fn to_value(&self) -> DcResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Variables of an observation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableSelector {
    /// Statistical variable dcids
    pub dcids: Vec<String>,
}

/// Entities of an observation request, listed or described by an expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EntitySelector {
    /// Explicit entity dcids
    Dcids {
        /// Entity dcids
        dcids: Vec<String>,
    },
    /// Relation expression, e.g. `geoId/06<-containedInPlace+{typeOf:County}`
    Expression {
        /// The expression
        expression: String,
    },
}

/// Facet filter of an observation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetFilter {
    /// Facets to keep
    pub facet_ids: Vec<String>,
}

/// Payload of `observation` requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObservationRequestPayload {
    /// Dates to return
    pub date: ObservationDate,
    /// Variables to return
    pub variable: VariableSelector,
    /// Entities to return
    pub entity: EntitySelector,
    /// Fields to return
    pub select: ObservationSelectList,
    /// Optional facet filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FacetFilter>,
}

impl ObservationRequestPayload {
    /// Validates and builds a payload
    pub fn new(
        date: ObservationDate,
        variables: StringList,
        entity: EntitySelector,
        select: ObservationSelectList,
        facet_ids: Option<StringList>,
    ) -> DcResult<Self> {
        validate_dcids("variable dcid", &variables)?;

        match &entity {
            EntitySelector::Dcids { dcids } => {
                validate_dcids("entity dcid", &StringList::from(dcids.clone()))?
            }
            EntitySelector::Expression { expression } if expression.trim().is_empty() => {
                return Err(DataCommonsError::InvalidParameter(
                    "Entity expression must not be empty".to_string(),
                ))
            }
            EntitySelector::Expression { .. } => {}
        }

        let filter = match facet_ids {
            Some(ids) => {
                validate_dcids("facet id", &ids)?;
                Some(FacetFilter {
                    facet_ids: ids.into_vec(),
                })
            }
            None => None,
        };

        Ok(Self {
            date,
            variable: VariableSelector {
                dcids: variables.into_vec(),
            },
            entity,
            select,
            filter,
        })
    }

    /// JSON body of the request
    pub fn to_value(&self) -> DcResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
