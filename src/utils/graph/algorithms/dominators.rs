//! Dominator tree and dominance frontier computation.
//!
//! A node `d` **dominates** a node `n` if every path from the entry node to `n` passes
//! through `d`. The **immediate dominator** of `n` is the unique strict dominator of `n`
//! that every other strict dominator of `n` dominates. Linking every node to its
//! immediate dominator yields the dominator tree, rooted at the entry.
//!
//! # Algorithm
//!
//! [`compute_dominators`] is the iterative data-flow formulation by Cooper, Harvey and
//! Kennedy ("A Simple, Fast Dominance Algorithm"). Nodes are numbered in reverse
//! post-order; every reachable non-entry node repeatedly takes as its immediate dominator
//! the nearest common ancestor of its already-processed predecessors, until nothing
//! changes. On reducible graphs this converges in two or three passes.
//!
//! [`compute_dominance_frontiers`] implements the runner walk from the same paper: for
//! each join node `n`, walk from every predecessor up the tree until reaching `idom(n)`,
//! adding `n` to the frontier of every node visited.

use std::collections::{BTreeMap, BTreeSet};

use crate::utils::graph::{
    algorithms::traversal::{back_edges, reverse_postorder},
    NodeId, Predecessors, Successors,
};

/// Result of dominator tree computation.
///
/// Nodes unreachable from the entry are not part of the tree: they have no immediate
/// dominator, dominate nothing, and are dominated by nothing.
///
/// # Examples
///
/// ```rust
/// use ssalyze::utils::graph::{DirectedGraph, algorithms::compute_dominators};
///
/// // entry -> a -> b, entry -> b
/// let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
/// let entry = graph.add_node("entry");
/// let a = graph.add_node("a");
/// let b = graph.add_node("b");
/// graph.add_edge(entry, a, ())?;
/// graph.add_edge(a, b, ())?;
/// graph.add_edge(entry, b, ())?;
///
/// let tree = compute_dominators(&graph, entry);
/// assert_eq!(tree.immediate_dominator(b), Some(entry));
/// assert!(!tree.dominates(a, b));
/// # Ok::<(), ssalyze::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DominatorTree {
    /// The entry (root) node of the dominator tree
    entry: NodeId,
    /// Immediate dominator per node; the entry maps to itself, unreachable nodes to `None`
    idom: Vec<Option<NodeId>>,
    /// Dominator tree children per node, ascending
    children: Vec<Vec<NodeId>>,
}

impl DominatorTree {
    fn from_idoms(entry: NodeId, idom: Vec<Option<NodeId>>) -> Self {
        let mut children = vec![Vec::new(); idom.len()];
        for (index, parent) in idom.iter().enumerate() {
            if let Some(parent) = parent {
                if parent.index() != index {
                    children[parent.index()].push(NodeId::new(index));
                }
            }
        }
        DominatorTree {
            entry,
            idom,
            children,
        }
    }

    /// Returns the entry (root) node of the dominator tree.
    #[inline]
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    /// Returns the immediate dominator of `node`.
    ///
    /// `None` for the entry node and for nodes unreachable from it.
    pub fn immediate_dominator(&self, node: NodeId) -> Option<NodeId> {
        if node == self.entry {
            return None;
        }
        self.idom.get(node.index()).copied().flatten()
    }

    /// Returns `true` if `node` is reachable from the entry and thus part of the tree.
    pub fn is_reachable(&self, node: NodeId) -> bool {
        matches!(self.idom.get(node.index()), Some(Some(_)))
    }

    /// Returns `true` if `a` dominates `b`. Every reachable node dominates itself.
    pub fn dominates(&self, a: NodeId, b: NodeId) -> bool {
        if !self.is_reachable(a) || !self.is_reachable(b) {
            return false;
        }
        self.dominators(b).any(|d| d == a)
    }

    /// Returns `true` if `a` dominates `b` and `a != b`.
    pub fn strictly_dominates(&self, a: NodeId, b: NodeId) -> bool {
        a != b && self.dominates(a, b)
    }

    /// Iterates over the dominators of `node`, from `node` itself up to the entry.
    ///
    /// Empty for unreachable nodes.
    pub fn dominators(&self, node: NodeId) -> DominatorIterator<'_> {
        DominatorIterator {
            tree: self,
            current: self.is_reachable(node).then_some(node),
        }
    }

    /// Returns the depth of `node` in the tree (entry = 0). Unreachable nodes report 0.
    pub fn depth(&self, node: NodeId) -> usize {
        self.dominators(node).count().saturating_sub(1)
    }

    /// Returns the children of `node` in the dominator tree, in ascending id order.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.children.get(node.index()).map_or(&[], Vec::as_slice)
    }

    /// Returns the number of nodes the tree was computed over, reachable or not.
    pub fn node_count(&self) -> usize {
        self.idom.len()
    }

    /// Returns the immediate-dominator relation of every reachable node, with the entry
    /// mapped to itself.
    pub fn idom_map(&self) -> BTreeMap<NodeId, NodeId> {
        self.idom
            .iter()
            .enumerate()
            .filter_map(|(index, parent)| parent.map(|p| (NodeId::new(index), p)))
            .collect()
    }
}

/// Iterator over a node's dominator chain, see [`DominatorTree::dominators`].
pub struct DominatorIterator<'a> {
    tree: &'a DominatorTree,
    current: Option<NodeId>,
}

impl Iterator for DominatorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current?;
        self.current = self.tree.immediate_dominator(node);
        Some(node)
    }
}

/// Computes the dominator tree of `graph` rooted at `entry`.
///
/// # Arguments
///
/// * `graph` - The graph to analyze
/// * `entry` - The node all paths start from
///
/// # Complexity
///
/// O(V + E) per pass. The number of passes is bounded by the loop nesting depth plus
/// two on reducible graphs.
pub fn compute_dominators<G>(graph: &G, entry: NodeId) -> DominatorTree
where
    G: Successors + Predecessors,
{
    let node_count = graph.node_count();
    let mut idom: Vec<Option<NodeId>> = vec![None; node_count];
    if entry.index() >= node_count {
        return DominatorTree::from_idoms(entry, idom);
    }

    let rpo = reverse_postorder(graph, entry);
    let mut rpo_number = vec![usize::MAX; node_count];
    for (number, node) in rpo.iter().enumerate() {
        rpo_number[node.index()] = number;
    }

    idom[entry.index()] = Some(entry);

    let mut changed = true;
    while changed {
        changed = false;
        for &node in rpo.iter().skip(1) {
            let mut candidate: Option<NodeId> = None;
            for pred in graph.predecessors(node) {
                if !matches!(idom.get(pred.index()), Some(Some(_))) {
                    continue;
                }
                candidate = Some(match candidate {
                    None => pred,
                    Some(current) => intersect(&idom, &rpo_number, entry, pred, current),
                });
            }

            if candidate.is_some() && idom[node.index()] != candidate {
                idom[node.index()] = candidate;
                changed = true;
            }
        }
    }

    DominatorTree::from_idoms(entry, idom)
}

/// Nearest common ancestor of `a` and `b` in the partially built tree.
fn intersect(
    idom: &[Option<NodeId>],
    rpo_number: &[usize],
    entry: NodeId,
    mut a: NodeId,
    mut b: NodeId,
) -> NodeId {
    while a != b {
        while rpo_number[a.index()] > rpo_number[b.index()] {
            a = idom[a.index()].unwrap_or(entry);
        }
        while rpo_number[b.index()] > rpo_number[a.index()] {
            b = idom[b.index()].unwrap_or(entry);
        }
    }
    a
}

/// Computes the dominance frontier of every node.
///
/// `b` is in `DF(n)` if `n` dominates a predecessor of `b` but does not strictly dominate
/// `b`. Predecessors unreachable from the entry are ignored, as are unreachable join
/// nodes. The result is indexed by [`NodeId::index`].
pub fn compute_dominance_frontiers<G>(graph: &G, tree: &DominatorTree) -> Vec<BTreeSet<NodeId>>
where
    G: Predecessors,
{
    let mut frontiers = vec![BTreeSet::new(); graph.node_count()];

    for node in graph.node_ids() {
        if !tree.is_reachable(node) {
            continue;
        }

        let stop = tree.immediate_dominator(node);
        for pred in graph.predecessors(node) {
            if !tree.is_reachable(pred) {
                continue;
            }

            let mut runner = pred;
            while Some(runner) != stop {
                if let Some(frontier) = frontiers.get_mut(runner.index()) {
                    frontier.insert(node);
                }
                match tree.immediate_dominator(runner) {
                    Some(parent) => runner = parent,
                    None => break,
                }
            }
        }
    }

    frontiers
}

/// Returns the first retreating edge whose target does not dominate its source.
///
/// `None` means the graph is reducible from the tree's entry.
pub fn find_irreducible_edge<G>(graph: &G, tree: &DominatorTree) -> Option<(NodeId, NodeId)>
where
    G: Successors,
{
    back_edges(graph, tree.entry())
        .into_iter()
        .find(|&(from, to)| !tree.dominates(to, from))
}
