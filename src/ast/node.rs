//! AST node types.

use std::fmt;

use crate::ast::value::Value;

/// A strongly-typed index into an [`Ast`](crate::ast::Ast) arena.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AstId(pub(crate) usize);

impl AstId {
    /// Creates a new `AstId` from a raw index value.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        AstId(index)
    }

    /// Returns the raw index value.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for AstId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AstId({})", self.0)
    }
}

impl fmt::Display for AstId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// A variable reference, optionally carrying an SSA sequence number.
///
/// Before SSA conversion every symbol is bare. Renaming assigns each definition a fresh
/// number per base name and rewrites every read to the number of the definition that
/// reaches it.
///
/// # Examples
///
/// ```rust
/// use ssalyze::ast::Symbol;
///
/// let bare = Symbol::new("x");
/// assert_eq!(bare.name(), "x");
///
/// let renamed = Symbol::versioned("x", 2);
/// assert_eq!(renamed.name(), "x#2");
/// assert_eq!(renamed.base(), "x");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    base: String,
    ssa_number: Option<u32>,
}

impl Symbol {
    /// Creates a bare symbol.
    pub fn new(base: impl Into<String>) -> Self {
        Symbol {
            base: base.into(),
            ssa_number: None,
        }
    }

    /// Creates a symbol with an SSA sequence number.
    pub fn versioned(base: impl Into<String>, ssa_number: u32) -> Self {
        Symbol {
            base: base.into(),
            ssa_number: Some(ssa_number),
        }
    }

    /// The variable name as written in the source.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The SSA sequence number, if assigned.
    #[must_use]
    pub const fn ssa_number(&self) -> Option<u32> {
        self.ssa_number
    }

    /// Returns `true` once renaming has assigned a sequence number.
    #[must_use]
    pub const fn is_versioned(&self) -> bool {
        self.ssa_number.is_some()
    }

    /// Sets or clears the SSA sequence number.
    pub fn set_ssa_number(&mut self, ssa_number: Option<u32>) {
        self.ssa_number = ssa_number;
    }

    /// The display name: `base` when bare, `base#n` otherwise.
    #[must_use]
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ssa_number {
            Some(n) => write!(f, "{}#{}", self.base, n),
            None => write!(f, "{}", self.base),
        }
    }
}

/// The closed set of node kinds.
///
/// Child slots that a well-formed node must fill are still `Option`s so that malformed
/// trees can be represented and rejected by the CFG builder with a precise error.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A literal constant.
    Literal(Value),

    /// A variable reference.
    Symbol(Symbol),

    /// `write <- read`. `write` must be a `Symbol` node to be lowered.
    Assign {
        /// Assignment target
        write: AstId,
        /// Assigned expression
        read: AstId,
    },

    /// Function application, including operators (`x + 1` calls `+`).
    Call {
        /// The called expression, usually a `Symbol` naming the function
        callee: AstId,
        /// Arguments in order
        args: Vec<AstId>,
    },

    /// `{ ... }`, a statement sequence.
    Brace {
        /// Statements in order
        body: Vec<AstId>,
    },

    /// `if (condition) true_branch else false_branch`.
    If {
        /// Branch condition
        condition: Option<AstId>,
        /// Taken when the condition holds
        true_branch: Option<AstId>,
        /// Optional `else` branch
        false_branch: Option<AstId>,
    },

    /// `for (variable in iterable) body`.
    For {
        /// Loop variable, a `Symbol` node
        variable: Option<AstId>,
        /// Collection iterated over, evaluated once
        iterable: Option<AstId>,
        /// Loop body
        body: Option<AstId>,
    },

    /// `while (condition) body`.
    While {
        /// Condition re-evaluated before each iteration
        condition: Option<AstId>,
        /// Loop body
        body: Option<AstId>,
    },

    /// `repeat body`, left only through `break` or `return`.
    Repeat {
        /// Loop body
        body: Option<AstId>,
    },

    /// `break`.
    Break,

    /// `next`.
    Next,

    /// `return(value)`.
    Return {
        /// Returned expression, `None` for a bare `return()`
        value: Option<AstId>,
    },

    /// `function(params) body`. Opaque to the enclosing function's analyses.
    Function {
        /// Parameter symbols
        params: Vec<AstId>,
        /// Function body
        body: Option<AstId>,
    },
}

impl NodeKind {
    /// Returns the ids of all child slots that are filled, in evaluation order.
    #[must_use]
    pub fn children(&self) -> Vec<AstId> {
        match self {
            NodeKind::Literal(_) | NodeKind::Symbol(_) | NodeKind::Break | NodeKind::Next => {
                Vec::new()
            }
            NodeKind::Assign { write, read } => vec![*read, *write],
            NodeKind::Call { callee, args } => {
                let mut children = Vec::with_capacity(args.len() + 1);
                children.push(*callee);
                children.extend(args.iter().copied());
                children
            }
            NodeKind::Brace { body } => body.clone(),
            NodeKind::If {
                condition,
                true_branch,
                false_branch,
            } => [*condition, *true_branch, *false_branch]
                .into_iter()
                .flatten()
                .collect(),
            NodeKind::For {
                variable,
                iterable,
                body,
            } => [*variable, *iterable, *body].into_iter().flatten().collect(),
            NodeKind::While { condition, body } => {
                [*condition, *body].into_iter().flatten().collect()
            }
            NodeKind::Repeat { body } => body.iter().copied().collect(),
            NodeKind::Return { value } => value.iter().copied().collect(),
            NodeKind::Function { params, body } => {
                params.iter().copied().chain(body.iter().copied()).collect()
            }
        }
    }

    /// Returns `true` for nodes that alter control flow and must be lowered by the CFG
    /// builder rather than stored as a statement.
    #[must_use]
    pub const fn is_control(&self) -> bool {
        matches!(
            self,
            NodeKind::Brace { .. }
                | NodeKind::If { .. }
                | NodeKind::For { .. }
                | NodeKind::While { .. }
                | NodeKind::Repeat { .. }
                | NodeKind::Break
                | NodeKind::Next
                | NodeKind::Return { .. }
        )
    }

    /// A short name of the node kind for diagnostics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            NodeKind::Literal(_) => "literal",
            NodeKind::Symbol(_) => "symbol",
            NodeKind::Assign { .. } => "assignment",
            NodeKind::Call { .. } => "call",
            NodeKind::Brace { .. } => "brace",
            NodeKind::If { .. } => "if",
            NodeKind::For { .. } => "for",
            NodeKind::While { .. } => "while",
            NodeKind::Repeat { .. } => "repeat",
            NodeKind::Break => "break",
            NodeKind::Next => "next",
            NodeKind::Return { .. } => "return",
            NodeKind::Function { .. } => "function",
        }
    }
}

/// An arena entry: a node kind plus its non-owning parent link.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<AstId>,
}

impl Node {
    /// The node's kind and children.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The node this one was last attached under, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<AstId> {
        self.parent
    }
}
