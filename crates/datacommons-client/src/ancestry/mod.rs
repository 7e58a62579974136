//! Ancestry resolution over the `containedInPlace` relation.
//!
//! A lookup of one entity runs in three steps:
//!
//! 1. [`builder::build_ancestry_map`] walks parents breadth-first through a
//!    [`fetcher::ParentFetcher`], producing every expanded node with its
//!    direct parents.
//! 2. [`postprocess::flatten`] or [`postprocess::to_tree`] shapes that map.
//! 3. [`crate::endpoints::node::NodeEndpoint::fetch_entity_ancestry`] runs
//!    the first two steps for many entities at once.

pub mod builder;
pub mod fetcher;
pub mod postprocess;
pub mod types;

pub use builder::build_ancestry_map;
pub use fetcher::{CachedParentFetcher, ParentFetcher, CONTAINED_IN_PLACE};
pub use postprocess::{flatten, to_tree};
pub use types::{AncestorEntry, Ancestry, AncestryMap, AncestryTree, Parent, ParentType};
