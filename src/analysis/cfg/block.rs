//! Basic blocks and their terminators.

use std::fmt;

use crate::{
    analysis::{cfg::edge::CfgEdgeKind, ssa::PhiNode, BlockId},
    ast::AstId,
};

/// How control leaves a basic block.
///
/// Every variant names its successor blocks explicitly; the control-flow graph keeps its
/// outgoing edges in sync with them (see
/// [`ControlFlowGraph::set_terminator`](crate::analysis::ControlFlowGraph::set_terminator)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminator {
    /// Two-way branch on a condition expression.
    Branch {
        /// The condition, evaluated at the end of the block
        condition: AstId,
        /// Successor when the condition holds
        true_target: BlockId,
        /// Successor otherwise
        false_target: BlockId,
    },

    /// Unconditional jump.
    Jump {
        /// The only successor
        target: BlockId,
    },

    /// Header test of a `for` loop.
    ///
    /// Behaves like a `Branch` on `check`, but marks the block as the header of a
    /// collection loop so that downstream code generation can rebuild a `for` instead of
    /// an equivalent `while`.
    IterateBranch {
        /// `._counter_n <= length(._iterable_n)`
        check: AstId,
        /// First block of the loop body
        body: BlockId,
        /// Block after the loop
        exit: BlockId,
        /// The `For` node this loop was lowered from
        origin: AstId,
    },

    /// Leaves the function.
    Return {
        /// Returned expression, if any
        value: Option<AstId>,
    },

    /// `break` out of the innermost loop.
    Break {
        /// The loop's exit block
        target: BlockId,
    },

    /// `next` iteration of the innermost loop.
    Next {
        /// The loop's header block
        target: BlockId,
    },
}

impl Terminator {
    /// Returns the successor blocks with the kind of edge leading to each.
    #[must_use]
    pub fn targets(&self) -> Vec<(BlockId, CfgEdgeKind)> {
        match self {
            Terminator::Branch {
                true_target,
                false_target,
                ..
            } => vec![
                (*true_target, CfgEdgeKind::ConditionalTrue),
                (*false_target, CfgEdgeKind::ConditionalFalse),
            ],
            Terminator::Jump { target } => vec![(*target, CfgEdgeKind::Unconditional)],
            Terminator::IterateBranch { body, exit, .. } => vec![
                (*body, CfgEdgeKind::LoopBody),
                (*exit, CfgEdgeKind::LoopExit),
            ],
            Terminator::Return { .. } => Vec::new(),
            Terminator::Break { target } => vec![(*target, CfgEdgeKind::Break)],
            Terminator::Next { target } => vec![(*target, CfgEdgeKind::Next)],
        }
    }

    /// Returns the successor blocks in edge order.
    #[must_use]
    pub fn successors(&self) -> Vec<BlockId> {
        self.targets().into_iter().map(|(target, _)| target).collect()
    }

    /// Returns the expression evaluated by the terminator, if any.
    #[must_use]
    pub const fn expression(&self) -> Option<AstId> {
        match self {
            Terminator::Branch { condition, .. } => Some(*condition),
            Terminator::IterateBranch { check, .. } => Some(*check),
            Terminator::Return { value } => *value,
            Terminator::Jump { .. } | Terminator::Break { .. } | Terminator::Next { .. } => None,
        }
    }

    /// Returns `true` if control leaves the function.
    #[must_use]
    pub const fn is_return(&self) -> bool {
        matches!(self, Terminator::Return { .. })
    }
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminator::Branch {
                condition,
                true_target,
                false_target,
            } => write!(f, "branch {condition} ? {true_target} : {false_target}"),
            Terminator::Jump { target } => write!(f, "jump {target}"),
            Terminator::IterateBranch {
                check, body, exit, ..
            } => write!(f, "iterate {check} ? {body} : {exit}"),
            Terminator::Return { value: Some(value) } => write!(f, "return {value}"),
            Terminator::Return { value: None } => write!(f, "return"),
            Terminator::Break { target } => write!(f, "break {target}"),
            Terminator::Next { target } => write!(f, "next {target}"),
        }
    }
}

/// A maximal straight-line sequence of statements.
///
/// Statements are ids into the owning graph's [`Ast`](crate::ast::Ast). None of them
/// alters control flow; that is the terminator's job. `phis` is empty until SSA
/// conversion places phi nodes at the block's entry.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicBlock {
    pub(crate) id: BlockId,
    pub(crate) body: Vec<AstId>,
    pub(crate) phis: Vec<PhiNode>,
    pub(crate) terminator: Option<Terminator>,
    pub(crate) depth: usize,
}

impl BasicBlock {
    pub(crate) fn new(id: BlockId, depth: usize) -> Self {
        BasicBlock {
            id,
            body: Vec::new(),
            phis: Vec::new(),
            terminator: None,
            depth,
        }
    }

    /// The block's identifier.
    #[must_use]
    pub const fn id(&self) -> BlockId {
        self.id
    }

    /// Statements in execution order.
    #[must_use]
    pub fn body(&self) -> &[AstId] {
        &self.body
    }

    /// Appends a statement.
    pub fn push_statement(&mut self, statement: AstId) {
        self.body.push(statement);
    }

    /// Phi nodes at the block's entry.
    #[must_use]
    pub fn phis(&self) -> &[PhiNode] {
        &self.phis
    }

    /// Phi nodes at the block's entry, mutably.
    pub fn phis_mut(&mut self) -> &mut Vec<PhiNode> {
        &mut self.phis
    }

    /// Returns the phi for `base`, if the block has one.
    #[must_use]
    pub fn phi_for(&self, base: &str) -> Option<&PhiNode> {
        self.phis.iter().find(|phi| phi.base() == base)
    }

    /// The terminator. Only `None` while the builder is still filling the block.
    #[must_use]
    pub const fn terminator(&self) -> Option<&Terminator> {
        self.terminator.as_ref()
    }

    /// Structural nesting level: the number of enclosing `if` and loop bodies.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }
}
