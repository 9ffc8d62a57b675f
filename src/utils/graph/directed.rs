//! Core directed graph implementation.
//!
//! [`DirectedGraph`] stores node payloads in a vector indexed by [`NodeId`] and keeps
//! per-node adjacency lists of [`EdgeId`]s in both directions, so successor and
//! predecessor queries are O(degree). Edges can be detached from a node, which the
//! control-flow graph needs when a block's terminator is replaced.

use crate::{
    utils::graph::{
        traits::{GraphBase, Predecessors, Successors},
        EdgeId, NodeId,
    },
    Error, Result,
};

#[derive(Debug, Clone)]
struct EdgeData<E> {
    source: NodeId,
    target: NodeId,
    data: E,
}

/// A directed multigraph with typed node and edge payloads.
///
/// Nodes are never removed, which keeps every handed-out [`NodeId`] valid. Edges can be
/// removed per source node with [`remove_outgoing_edges`](Self::remove_outgoing_edges);
/// removed slots stay vacant so existing [`EdgeId`]s are never reassigned.
///
/// # Examples
///
/// ```rust
/// use ssalyze::utils::graph::DirectedGraph;
///
/// let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// graph.add_edge(a, b, ())?;
///
/// assert_eq!(graph.successors(a).collect::<Vec<_>>(), vec![b]);
/// assert_eq!(graph.predecessors(b).collect::<Vec<_>>(), vec![a]);
/// # Ok::<(), ssalyze::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DirectedGraph<N, E> {
    /// Node payloads, indexed by `NodeId`
    nodes: Vec<N>,
    /// Edge slots, `None` once removed
    edges: Vec<Option<EdgeData<E>>>,
    /// Outgoing live edges per node
    outgoing: Vec<Vec<EdgeId>>,
    /// Incoming live edges per node
    incoming: Vec<Vec<EdgeId>>,
}

impl<N, E> Default for DirectedGraph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> DirectedGraph<N, E> {
    /// Creates a new empty directed graph.
    #[must_use]
    pub fn new() -> Self {
        DirectedGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    /// Creates a new directed graph with pre-allocated capacity.
    ///
    /// # Arguments
    ///
    /// * `node_capacity` - Expected number of nodes
    /// * `edge_capacity` - Expected number of edges
    #[must_use]
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        DirectedGraph {
            nodes: Vec::with_capacity(node_capacity),
            edges: Vec::with_capacity(edge_capacity),
            outgoing: Vec::with_capacity(node_capacity),
            incoming: Vec::with_capacity(node_capacity),
        }
    }

    /// Adds a node and returns its id. Ids are sequential, starting at 0.
    pub fn add_node(&mut self, data: N) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(data);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    /// Returns the payload of `node`, if it exists.
    #[must_use]
    pub fn node(&self, node: NodeId) -> Option<&N> {
        self.nodes.get(node.index())
    }

    /// Returns the payload of `node` mutably, if it exists.
    pub fn node_mut(&mut self, node: NodeId) -> Option<&mut N> {
        self.nodes.get_mut(node.index())
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if `node` belongs to this graph.
    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.nodes.len()
    }

    /// Iterates over all node ids in ascending order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// Iterates over `(id, payload)` pairs in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, data)| (NodeId::new(index), data))
    }

    /// Adds an edge from `source` to `target`.
    ///
    /// Parallel edges are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if either endpoint does not exist in the graph.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, data: E) -> Result<EdgeId> {
        if !self.contains_node(source) {
            return Err(Error::GraphError(format!(
                "source node {} does not exist in graph with {} nodes",
                source,
                self.nodes.len()
            )));
        }
        if !self.contains_node(target) {
            return Err(Error::GraphError(format!(
                "target node {} does not exist in graph with {} nodes",
                target,
                self.nodes.len()
            )));
        }

        let id = EdgeId::new(self.edges.len());
        self.edges.push(Some(EdgeData {
            source,
            target,
            data,
        }));
        self.outgoing[source.index()].push(id);
        self.incoming[target.index()].push(id);

        Ok(id)
    }

    /// Detaches and returns the payloads of every outgoing edge of `node`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if `node` does not exist in the graph.
    pub fn remove_outgoing_edges(&mut self, node: NodeId) -> Result<Vec<E>> {
        if !self.contains_node(node) {
            return Err(Error::GraphError(format!(
                "node {} does not exist in graph with {} nodes",
                node,
                self.nodes.len()
            )));
        }

        let outgoing = std::mem::take(&mut self.outgoing[node.index()]);
        let mut removed = Vec::with_capacity(outgoing.len());
        for edge_id in outgoing {
            let Some(edge) = self.edges.get_mut(edge_id.index()).and_then(Option::take) else {
                continue;
            };
            self.incoming[edge.target.index()].retain(|id| *id != edge_id);
            removed.push(edge.data);
        }

        Ok(removed)
    }

    /// Returns the number of live edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_some()).count()
    }

    /// Iterates over the successors of `node` in edge insertion order.
    ///
    /// Unknown nodes have no successors.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing
            .get(node.index())
            .into_iter()
            .flatten()
            .filter_map(|&edge_id| self.edge_data(edge_id).map(|e| e.target))
    }

    /// Iterates over the predecessors of `node` in edge insertion order.
    ///
    /// Unknown nodes have no predecessors.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.incoming
            .get(node.index())
            .into_iter()
            .flatten()
            .filter_map(|&edge_id| self.edge_data(edge_id).map(|e| e.source))
    }

    /// Iterates over `(target, payload)` for every outgoing edge of `node`.
    pub fn outgoing_edges(&self, node: NodeId) -> impl Iterator<Item = (NodeId, &E)> + '_ {
        self.outgoing
            .get(node.index())
            .into_iter()
            .flatten()
            .filter_map(|&edge_id| self.edge_data(edge_id).map(|e| (e.target, &e.data)))
    }

    fn edge_data(&self, edge: EdgeId) -> Option<&EdgeData<E>> {
        self.edges.get(edge.index()).and_then(Option::as_ref)
    }
}

impl<N, E> GraphBase for DirectedGraph<N, E> {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::new)
    }
}

impl<N, E> Successors for DirectedGraph<N, E> {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        DirectedGraph::successors(self, node)
    }
}

impl<N, E> Predecessors for DirectedGraph<N, E> {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        DirectedGraph::predecessors(self, node)
    }
}
