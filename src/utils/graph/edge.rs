//! Edge identifiers for the directed graph substrate.

use std::fmt;

/// A strongly-typed identifier for edges within a directed graph.
///
/// Edge ids are assigned sequentially by
/// [`DirectedGraph::add_edge`](crate::utils::graph::DirectedGraph::add_edge). Ids of
/// removed edges are never reused, so an `EdgeId` held across a removal simply stops
/// resolving.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    /// Creates a new `EdgeId` from a raw index value.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        EdgeId(index)
    }

    /// Returns the raw index value of this edge identifier.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_id_formatting() {
        let edge = EdgeId::new(9);
        assert_eq!(edge.index(), 9);
        assert_eq!(format!("{edge:?}"), "EdgeId(9)");
        assert_eq!(format!("{edge}"), "e9");
    }
}
