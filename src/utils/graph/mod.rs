//! Generic directed graph infrastructure.
//!
//! The control-flow graph is built on top of this module, but nothing here knows about
//! blocks or statements: nodes and edges carry arbitrary payloads and the algorithms only
//! see them through the [`GraphBase`], [`Successors`], [`Predecessors`] and
//! [`RootedGraph`] traits.
//!
//! # Key Components
//!
//! - [`NodeId`] / [`EdgeId`] - Strongly-typed identifiers
//! - [`DirectedGraph`] - Adjacency-list graph with edge removal
//! - [`algorithms`] - Traversals, dominators, dominance frontiers

pub mod algorithms;
mod directed;
mod edge;
mod node;
mod traits;

pub use directed::DirectedGraph;
pub use edge::EdgeId;
pub use node::NodeId;
pub use traits::{GraphBase, Predecessors, RootedGraph, Successors};
