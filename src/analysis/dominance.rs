//! Dominator trees and dominance frontiers of control-flow graphs.
//!
//! Thin layer over the generic algorithms in [`crate::utils::graph::algorithms`] that
//! adds the reducibility check SSA construction depends on.

use std::collections::BTreeSet;

use crate::{
    analysis::{BlockId, ControlFlowGraph},
    utils::graph::algorithms::{
        compute_dominance_frontiers, compute_dominators, find_irreducible_edge, DominatorTree,
    },
    Error, Result,
};

/// Computes the dominator tree of `cfg` and checks that the graph is reducible.
///
/// Unreachable blocks get no immediate dominator and do not take part in the check.
/// [`ControlFlowGraph::dominators`] caches the result of this function.
///
/// # Errors
///
/// Returns [`Error::Irreducible`] for the first retreating edge whose target does not
/// dominate its source.
pub fn dominator_tree(cfg: &ControlFlowGraph) -> Result<DominatorTree> {
    let tree = compute_dominators(cfg, cfg.entry());
    if let Some((from, to)) = find_irreducible_edge(cfg, &tree) {
        log::warn!("rejecting irreducible graph, retreating edge {from} -> {to}");
        return Err(Error::Irreducible { from, to });
    }
    Ok(tree)
}

/// Computes the dominance frontier of every block.
#[must_use]
pub fn dominance_frontier(cfg: &ControlFlowGraph, tree: &DominatorTree) -> DominanceFrontier {
    DominanceFrontier {
        frontiers: compute_dominance_frontiers(cfg, tree),
    }
}

/// Dominance frontiers, indexed by block.
///
/// `Y` is in the frontier of `X` when `X` dominates a predecessor of `Y` but does not
/// strictly dominate `Y`: the first blocks where `X`'s dominance ends. Sets are ordered
/// so that phi placement is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DominanceFrontier {
    frontiers: Vec<BTreeSet<BlockId>>,
}

impl DominanceFrontier {
    /// Blocks in the frontier of `block`, ascending. Empty for unknown blocks.
    pub fn frontier(&self, block: BlockId) -> impl Iterator<Item = BlockId> + '_ {
        self.frontiers
            .get(block.index())
            .into_iter()
            .flatten()
            .copied()
    }

    /// Returns `true` if `member` is in the frontier of `block`.
    #[must_use]
    pub fn contains(&self, block: BlockId, member: BlockId) -> bool {
        self.frontiers
            .get(block.index())
            .is_some_and(|set| set.contains(&member))
    }

    /// The iterated frontier `DF+` of a set of blocks.
    ///
    /// This is exactly the set of blocks that need a phi for a variable defined in
    /// `blocks`.
    #[must_use]
    pub fn iterated<I>(&self, blocks: I) -> BTreeSet<BlockId>
    where
        I: IntoIterator<Item = BlockId>,
    {
        let mut result = BTreeSet::new();
        let mut worklist: Vec<BlockId> = blocks.into_iter().collect();

        while let Some(block) = worklist.pop() {
            for member in self.frontier(block) {
                if result.insert(member) {
                    worklist.push(member);
                }
            }
        }

        result
    }

    /// Number of blocks covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frontiers.len()
    }

    /// Returns `true` for a frontier of an empty graph.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frontiers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analysis::Terminator, ast::Ast, ast::AstId};

    fn b(index: usize) -> BlockId {
        BlockId::new(index)
    }

    /// B0 -> B1 | B2, both -> B3, B3 -> B1 (loop over the diamond's left arm).
    fn looped_diamond() -> ControlFlowGraph {
        let mut cfg = ControlFlowGraph::new(Ast::new());
        for _ in 0..3 {
            cfg.add_block(0);
        }
        let condition = AstId::new(0);
        cfg.set_terminator(
            b(0),
            Terminator::Branch {
                condition,
                true_target: b(1),
                false_target: b(2),
            },
        )
        .unwrap();
        cfg.set_terminator(b(1), Terminator::Jump { target: b(3) })
            .unwrap();
        cfg.set_terminator(b(2), Terminator::Jump { target: b(3) })
            .unwrap();
        cfg.set_terminator(
            b(3),
            Terminator::Branch {
                condition,
                true_target: b(1),
                false_target: b(0),
            },
        )
        .unwrap();
        cfg
    }

    #[test]
    fn test_irreducible_graph_is_rejected() {
        // B3 -> B1 enters the B1/B3 cycle beside B0 -> B1, and B1 does not dominate B3.
        let cfg = looped_diamond();
        let error = dominator_tree(&cfg).unwrap_err();
        assert!(matches!(error, Error::Irreducible { .. }));
        assert!(cfg.dominators().is_err());
    }

    #[test]
    fn test_diamond_frontiers() {
        let mut cfg = ControlFlowGraph::new(Ast::new());
        for _ in 0..3 {
            cfg.add_block(0);
        }
        cfg.set_terminator(
            b(0),
            Terminator::Branch {
                condition: AstId::new(0),
                true_target: b(1),
                false_target: b(2),
            },
        )
        .unwrap();
        cfg.set_terminator(b(1), Terminator::Jump { target: b(3) })
            .unwrap();
        cfg.set_terminator(b(2), Terminator::Jump { target: b(3) })
            .unwrap();
        cfg.set_terminator(b(3), Terminator::Return { value: None })
            .unwrap();

        let frontier = cfg.dominance_frontiers().unwrap();
        assert_eq!(frontier.frontier(b(1)).collect::<Vec<_>>(), vec![b(3)]);
        assert!(frontier.contains(b(2), b(3)));
        assert_eq!(frontier.frontier(b(0)).count(), 0);
        assert_eq!(frontier.iterated([b(1)]), BTreeSet::from([b(3)]));
        assert_eq!(frontier.len(), 4);
    }
}
