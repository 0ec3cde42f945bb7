//! Lazily materialised hierarchy
//!
//! - **Arena storage**: nodes live in a petgraph `StableDiGraph` addressed by `NodeId`
//! - **Immutable snapshots**: `SchemaTree` is Arc-wrapped, cheap to clone and share
//! - **Copy-on-write updates**: `SchemaTreeBuilder` splices fetched children into a copy

pub mod builder;
pub mod graph;
pub mod node;

pub use builder::SchemaTreeBuilder;
pub use graph::SchemaTree;
pub use node::{ChildEdge, SpliceOutcome, TreeNode};
