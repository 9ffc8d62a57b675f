//! Graph abstraction traits.
//!
//! The algorithms in [`algorithms`](super::algorithms) are written against these traits
//! rather than a concrete graph type, so they run unchanged over a raw
//! [`DirectedGraph`](super::DirectedGraph) in tests and over the
//! [`ControlFlowGraph`](crate::analysis::ControlFlowGraph) in the pipeline.
//!
//! Iterator-returning methods keep simple traversals allocation free.

use crate::utils::graph::NodeId;

/// Basic graph properties shared by every graph type.
pub trait GraphBase {
    /// Returns the number of nodes in the graph.
    fn node_count(&self) -> usize;

    /// Returns an iterator over all node identifiers, in ascending order.
    fn node_ids(&self) -> impl Iterator<Item = NodeId>;
}

/// Forward navigation.
pub trait Successors: GraphBase {
    /// Returns the direct successors of `node`, in edge insertion order.
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// Backward navigation.
pub trait Predecessors: GraphBase {
    /// Returns the direct predecessors of `node`, in edge insertion order.
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// A graph with a designated entry node from which analysis starts.
///
/// Dominance is only meaningful relative to an entry, so the dominator and frontier
/// algorithms require this trait.
pub trait RootedGraph: Successors + Predecessors {
    /// Returns the entry node.
    fn entry(&self) -> NodeId;
}
