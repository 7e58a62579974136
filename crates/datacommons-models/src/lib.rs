//! Data Commons Models
//!
//! This crate provides the plain data types shared by the Data Commons
//! client: knowledge graph nodes, statistical observations, variable
//! metadata, entity resolution candidates and the error taxonomy used across the workspace.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Error types
pub mod error;

/// Shared value types (identifiers, one-or-many lists)
pub mod common;

/// Knowledge graph node models
pub mod node;

/// Statistical observation models
pub mod observation;

/// Entity resolution models
pub mod resolve;

/// Statistical variable metadata models
pub mod metadata;

/// Re-export key types for convenient usage
pub use error::{DataCommonsError, DcResult};
pub use common::{Dcid, OneOrMany, StringList};
pub use node::{Name, Node, NodeData, NodeGroup};
pub use observation::{
    EntityFacets, Facet, Observation, ObservationDate, ObservationSelect, ObservationSelectList,
    OrderedFacets, Variable,
};
pub use resolve::{Candidate, FlatCandidateMapping, ResolvedEntity};
pub use metadata::{
    DateRange, Entities, Entity, MeasurementMethods, ObservationPeriods, Source, Sources,
    StatVarMetadata, Topic, Topics, Units,
};
