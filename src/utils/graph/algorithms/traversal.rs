//! Depth-first traversal orders.
//!
//! All traversals are iterative, so deep graphs produced by long straight-line programs
//! cannot exhaust the call stack.
//!
//! # Algorithms
//!
//! - [`reachable`] - Reachability marks from a start node
//! - [`postorder`] - Depth-first post-order
//! - [`reverse_postorder`] - Reverse post-order, the iteration order for forward problems
//! - [`back_edges`] - Retreating edges of the depth-first spanning tree

use crate::utils::graph::{NodeId, Successors};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

struct Frame {
    node: NodeId,
    successors: Vec<NodeId>,
    cursor: usize,
}

impl Frame {
    fn new<G: Successors>(graph: &G, node: NodeId) -> Self {
        Frame {
            node,
            successors: graph.successors(node).collect(),
            cursor: 0,
        }
    }
}

/// Post-order and retreating edges from one depth-first walk.
struct DepthFirstWalk {
    postorder: Vec<NodeId>,
    back_edges: Vec<(NodeId, NodeId)>,
}

impl DepthFirstWalk {
    fn run<G: Successors>(graph: &G, start: NodeId) -> Self {
        let node_count = graph.node_count();
        let mut walk = DepthFirstWalk {
            postorder: Vec::with_capacity(node_count),
            back_edges: Vec::new(),
        };
        if start.index() >= node_count {
            return walk;
        }

        let mut marks = vec![Mark::Unvisited; node_count];
        marks[start.index()] = Mark::OnStack;
        let mut stack = vec![Frame::new(graph, start)];

        while let Some(top) = stack.len().checked_sub(1) {
            let frame = &mut stack[top];
            let node = frame.node;
            let next = frame.successors.get(frame.cursor).copied();
            frame.cursor += 1;

            match next {
                Some(succ) => match marks.get(succ.index()) {
                    Some(Mark::Unvisited) => {
                        marks[succ.index()] = Mark::OnStack;
                        stack.push(Frame::new(graph, succ));
                    }
                    Some(Mark::OnStack) => walk.back_edges.push((node, succ)),
                    Some(Mark::Done) | None => {}
                },
                None => {
                    stack.pop();
                    marks[node.index()] = Mark::Done;
                    walk.postorder.push(node);
                }
            }
        }

        walk
    }
}

/// Marks every node reachable from `start`.
///
/// The returned vector is indexed by [`NodeId::index`]. An out-of-range `start` reaches
/// nothing.
pub fn reachable<G: Successors>(graph: &G, start: NodeId) -> Vec<bool> {
    let mut seen = vec![false; graph.node_count()];
    if start.index() >= seen.len() {
        return seen;
    }

    seen[start.index()] = true;
    let mut stack = vec![start];
    while let Some(node) = stack.pop() {
        for succ in graph.successors(node) {
            if let Some(flag) = seen.get_mut(succ.index()) {
                if !*flag {
                    *flag = true;
                    stack.push(succ);
                }
            }
        }
    }
    seen
}

/// Returns the depth-first post-order of all nodes reachable from `start`.
///
/// Successors are explored in edge order, so the result is deterministic for a given
/// graph.
///
/// # Complexity
///
/// - Time: O(V + E)
/// - Space: O(V)
pub fn postorder<G: Successors>(graph: &G, start: NodeId) -> Vec<NodeId> {
    DepthFirstWalk::run(graph, start).postorder
}

/// Returns the reverse post-order of all nodes reachable from `start`.
///
/// In reverse post-order every node appears before its successors, back edges aside,
/// which is the order the iterative dominator computation converges fastest in.
pub fn reverse_postorder<G: Successors>(graph: &G, start: NodeId) -> Vec<NodeId> {
    let mut order = postorder(graph, start);
    order.reverse();
    order
}

/// Returns every retreating edge `(from, to)` of a depth-first walk from `start`.
///
/// A retreating edge targets a node still on the walk's stack. Every loop of a reducible
/// graph closes with exactly such an edge into its header, and a graph is reducible iff
/// each retreating edge's target dominates its source.
pub fn back_edges<G: Successors>(graph: &G, start: NodeId) -> Vec<(NodeId, NodeId)> {
    DepthFirstWalk::run(graph, start).back_edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::graph::DirectedGraph;

    fn graph_from(nodes: usize, edges: &[(usize, usize)]) -> DirectedGraph<(), ()> {
        let mut graph = DirectedGraph::new();
        for _ in 0..nodes {
            graph.add_node(());
        }
        for &(from, to) in edges {
            graph
                .add_edge(NodeId::new(from), NodeId::new(to), ())
                .unwrap();
        }
        graph
    }

    fn ids(raw: &[usize]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId::new).collect()
    }

    #[test]
    fn test_postorder_diamond() {
        let graph = graph_from(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        assert_eq!(postorder(&graph, NodeId::new(0)), ids(&[3, 1, 2, 0]));
        assert_eq!(reverse_postorder(&graph, NodeId::new(0)), ids(&[0, 2, 1, 3]));
    }

    #[test]
    fn test_unreachable_nodes_are_skipped() {
        let graph = graph_from(4, &[(0, 1), (2, 3)]);
        assert_eq!(reverse_postorder(&graph, NodeId::new(0)), ids(&[0, 1]));
        assert_eq!(reachable(&graph, NodeId::new(0)), vec![true, true, false, false]);
    }

    #[test]
    fn test_back_edges_of_nested_loops() {
        // 0 -> 1 -> 2 -> 3 -> 2, 3 -> 1, 1 -> 4
        let graph = graph_from(5, &[(0, 1), (1, 2), (2, 3), (3, 2), (3, 1), (1, 4)]);
        let mut edges = back_edges(&graph, NodeId::new(0));
        edges.sort();
        assert_eq!(
            edges,
            vec![
                (NodeId::new(3), NodeId::new(1)),
                (NodeId::new(3), NodeId::new(2))
            ]
        );
    }

    #[test]
    fn test_cross_edges_are_not_back_edges() {
        let graph = graph_from(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        assert!(back_edges(&graph, NodeId::new(0)).is_empty());
    }

    #[test]
    fn test_invalid_start() {
        let graph = graph_from(2, &[(0, 1)]);
        assert!(postorder(&graph, NodeId::new(9)).is_empty());
        assert!(back_edges(&graph, NodeId::new(9)).is_empty());
        assert_eq!(reachable(&graph, NodeId::new(9)), vec![false, false]);
    }
}
