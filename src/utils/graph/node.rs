//! Node identifiers for the directed graph substrate.
//!
//! [`NodeId`] is the strongly typed index of a node inside a
//! [`DirectedGraph`](crate::utils::graph::DirectedGraph). The control-flow graph uses it
//! directly as its block identifier (see [`BlockId`](crate::analysis::BlockId)), which is
//! why it displays as `B<n>`.

use std::fmt;

/// A strongly-typed identifier for nodes within a directed graph.
///
/// `NodeId` wraps a `usize` index and is handed out sequentially, starting from 0, by
/// [`DirectedGraph::add_node`](crate::utils::graph::DirectedGraph::add_node). Ordering
/// follows creation order, which the analyses rely on to visit siblings deterministically.
///
/// # Examples
///
/// ```rust
/// use ssalyze::utils::graph::NodeId;
///
/// let block = NodeId::new(3);
/// assert_eq!(block.index(), 3);
/// assert_eq!(block.to_string(), "B3");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Creates a new `NodeId` from a raw index value.
    ///
    /// Normal usage obtains ids from the graph; this exists for tests and for
    /// per-node tables indexed by position.
    ///
    /// # Arguments
    ///
    /// * `index` - The raw node index (0-based)
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Returns the raw index value of this node identifier.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.0)
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(index: usize) -> Self {
        NodeId(index)
    }
}

impl From<NodeId> for usize {
    #[inline]
    fn from(node: NodeId) -> Self {
        node.0
    }
}
