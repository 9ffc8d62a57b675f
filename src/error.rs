use thiserror::Error;

use crate::{analysis::BlockId, ast::AstId};

macro_rules! structural_error {
    // Single string version
    ($node:expr, $msg:expr) => {
        crate::Error::Structural {
            node: $node,
            message: $msg.to_string(),
        }
    };

    // Format string with arguments version
    ($node:expr, $fmt:expr, $($arg:tt)*) => {
        crate::Error::Structural {
            node: $node,
            message: format!($fmt, $($arg)*),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can
/// potentially return.
///
/// Every variant is fatal for the single analysis call that produced it. Analyses that
/// work on a copy of their input never leave a half-converted graph behind; in-place
/// conversions should be treated as poisoned after an error.
///
/// # Error Categories
///
/// ## Input Errors
/// - [`Error::Structural`] - A control node lacks a required child slot or points at a
///   node that does not exist
/// - [`Error::Unsupported`] - A well-formed construct outside what the CFG builder lowers
///
/// ## Analysis Errors
/// - [`Error::UnresolvedName`] - A variable is read with no definition reaching it
/// - [`Error::Irreducible`] - The control-flow graph has a loop with more than one entry
/// - [`Error::SsaError`] - An SSA invariant was violated or SSA form was misused
/// - [`Error::IterationLimit`] - A fixpoint iteration exceeded its configured bound
///
/// ## Infrastructure Errors
/// - [`Error::GraphError`] - Invalid node or edge reference in the graph substrate
///
/// # Examples
///
/// ```rust
/// use ssalyze::{ast::Ast, analysis::CfgBuilder, Error};
///
/// let mut ast = Ast::new();
/// let read = ast.symbol("undefined");
/// let body = ast.assign("y", read);
///
/// let cfg = CfgBuilder::build(&ast, body)?;
/// match ssalyze::analysis::to_ssa(&cfg) {
///     Err(Error::UnresolvedName { name, block }) => {
///         assert_eq!(name, "undefined");
///         assert_eq!(block, cfg.entry());
///     }
///     other => panic!("unexpected result: {other:?}"),
/// }
/// # Ok::<(), ssalyze::Error>(())
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The AST is structurally malformed.
    ///
    /// Raised by the CFG builder when a control node (`if`, loops, `return`) lacks a
    /// required child slot, when a slot references a node outside the arena, or when
    /// `break`/`next` appear outside any loop. Type errors are not detected.
    ///
    /// # Fields
    ///
    /// * `node` - The offending node
    /// * `message` - What was wrong with it
    #[error("Malformed AST at node {node}: {message}")]
    Structural {
        /// The node at which the problem was detected
        node: AstId,
        /// The message to be printed for the Structural error
        message: String,
    },

    /// The AST is well-formed but uses a construct the CFG builder does not lower.
    ///
    /// Examples are control flow nested inside an expression and assignments to
    /// something other than a plain symbol.
    #[error("Unsupported construct at node {node}: {message}")]
    Unsupported {
        /// The node at which the construct was found
        node: AstId,
        /// Description of the construct
        message: String,
    },

    /// A variable is read but no definition of it is visible.
    ///
    /// During SSA renaming this means the name stack for `name` was empty at a read in
    /// `block`, or that a live phi for `name` has no reaching definition along the edge
    /// from `block`. Either the analyzed program reads an undefined variable, or free
    /// variables were not enabled in [`SsaConfig`](crate::config::SsaConfig).
    #[error("No definition of '{name}' reaches its use in block {block}")]
    UnresolvedName {
        /// The base name of the variable
        name: String,
        /// The block containing the read, or the predecessor lacking a definition
        block: BlockId,
    },

    /// The control-flow graph is not reducible.
    ///
    /// A retreating edge `from -> to` was found whose target does not dominate its
    /// source. Dominance-frontier based phi placement is only defined for reducible
    /// graphs, so the analysis refuses to continue.
    #[error("Irreducible control flow: back edge {from} -> {to} targets a non-dominator")]
    Irreducible {
        /// Source of the offending edge
        from: BlockId,
        /// Target of the offending edge
        to: BlockId,
    },

    /// Graph substrate error.
    ///
    /// Raised when a node or edge id does not belong to the graph it is used with.
    #[error("{0}")]
    GraphError(String),

    /// SSA construction or verification failed.
    ///
    /// Covers converting a graph that is already in SSA form, running an SSA-only
    /// analysis on a non-SSA graph, and verifier findings such as a name with two
    /// definitions or a phi whose incoming edges do not match its block's predecessors.
    #[error("{0}")]
    SsaError(String),

    /// A fixpoint iteration exceeded its configured step bound.
    ///
    /// The associated value is the bound that was reached.
    #[error("Reached the maximum number of iterations allowed - {0}")]
    IterationLimit(usize),
}
