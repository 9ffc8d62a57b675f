//! Control flow edge types for the CFG.
//!
//! Edges carry the reason control moves between two blocks. The analyses only need the
//! edge endpoints; the kinds exist for consumers that regenerate structured code or
//! render the graph.

/// The kind of control flow represented by an edge.
///
/// # Examples
///
/// ```rust
/// use ssalyze::{analysis::{CfgBuilder, CfgEdgeKind}, ast::Ast};
///
/// // if (TRUE) x = 1
/// let mut ast = Ast::new();
/// let condition = ast.literal(true);
/// let one = ast.literal(1.0);
/// let assign = ast.assign("x", one);
/// let root = ast.if_else(condition, assign, None);
///
/// let cfg = CfgBuilder::build(&ast, root)?;
/// let kinds: Vec<CfgEdgeKind> = cfg.outgoing_edges(cfg.entry()).map(|(_, kind)| kind).collect();
/// assert_eq!(kinds, vec![CfgEdgeKind::ConditionalTrue, CfgEdgeKind::ConditionalFalse]);
/// # Ok::<(), ssalyze::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CfgEdgeKind {
    /// Plain jump: fall-through into a merge block, a loop header, or back to a header
    /// at the end of a loop body.
    Unconditional,

    /// The edge taken when a `Branch` condition holds.
    ConditionalTrue,

    /// The edge taken when a `Branch` condition does not hold.
    ConditionalFalse,

    /// From a `for` loop header into the body, when another element remains.
    LoopBody,

    /// From a `for` loop header to the block after the loop, once exhausted.
    LoopExit,

    /// A `break` to the exit block of the innermost loop.
    Break,

    /// A `next` back to the header of the innermost loop.
    Next,
}

/// An edge of the control-flow graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfgEdge {
    kind: CfgEdgeKind,
}

impl CfgEdge {
    /// Creates a new edge of the given kind.
    #[must_use]
    pub const fn new(kind: CfgEdgeKind) -> Self {
        CfgEdge { kind }
    }

    /// The kind of this edge.
    #[must_use]
    pub const fn kind(&self) -> CfgEdgeKind {
        self.kind
    }
}
