//! Arena-backed abstract syntax tree.
//!
//! The analyses never parse source text; they consume trees built through [`Ast`]. Nodes
//! live in a single vector and refer to each other by [`AstId`], so the tree can be
//! cloned wholesale and mutated by index (SSA renaming only ever touches
//! [`Symbol`] sequence numbers).
//!
//! # Key Components
//!
//! - [`Ast`] - The arena, with constructors and read queries
//! - [`NodeKind`] - The closed set of node variants
//! - [`Symbol`] - Variable references with optional SSA numbers
//! - [`Value`] / [`Operator`] - Literals and the foldable operators
//!
//! # Examples
//!
//! ```rust
//! use ssalyze::ast::Ast;
//!
//! // x = 1; y = x + 3
//! let mut ast = Ast::new();
//! let one = ast.literal(1.0);
//! let first = ast.assign("x", one);
//! let x = ast.symbol("x");
//! let three = ast.literal(3.0);
//! let sum = ast.call("+", vec![x, three]);
//! let second = ast.assign("y", sum);
//! let body = ast.brace(vec![first, second]);
//!
//! assert_eq!(ast.reads(sum), vec![x]);
//! assert_eq!(ast.parent(second), Some(body));
//! ```

mod node;
mod ops;
mod value;

pub use node::{AstId, Node, NodeKind, Symbol};
pub use ops::Operator;
pub use value::Value;

/// Arena owning every node of one or more trees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Ast { nodes: Vec::new() }
    }

    /// Returns the number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a node and attaches its filled child slots to it.
    ///
    /// A child that already has a parent keeps it, so nodes the CFG builder reuses
    /// in synthesized statements still lead back to the source construct.
    /// Child ids that do not exist yet are stored as given; the CFG builder reports
    /// them as structural errors.
    pub fn add(&mut self, kind: NodeKind) -> AstId {
        let id = AstId::new(self.nodes.len());
        for child in kind.children() {
            if let Some(node) = self.nodes.get_mut(child.index()) {
                if node.parent.is_none() {
                    node.parent = Some(id);
                }
            }
        }
        self.nodes.push(Node { kind, parent: None });
        id
    }

    /// Returns the node stored at `id`.
    #[must_use]
    pub fn node(&self, id: AstId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Returns the kind of the node stored at `id`.
    #[must_use]
    pub fn kind(&self, id: AstId) -> Option<&NodeKind> {
        self.node(id).map(Node::kind)
    }

    /// Returns the parent of `id`.
    #[must_use]
    pub fn parent(&self, id: AstId) -> Option<AstId> {
        self.node(id).and_then(Node::parent)
    }

    /// Iterates over the ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: AstId) -> impl Iterator<Item = AstId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// Returns the symbol stored at `id`, if that node is a symbol.
    #[must_use]
    pub fn as_symbol(&self, id: AstId) -> Option<&Symbol> {
        match self.kind(id)? {
            NodeKind::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// Returns the symbol stored at `id` mutably, if that node is a symbol.
    pub fn symbol_mut(&mut self, id: AstId) -> Option<&mut Symbol> {
        match self.nodes.get_mut(id.index()).map(|node| &mut node.kind) {
            Some(NodeKind::Symbol(symbol)) => Some(symbol),
            _ => None,
        }
    }

    /// Returns the name of the function called at `id`, when the node is a call
    /// through a plain symbol.
    #[must_use]
    pub fn callee_name(&self, id: AstId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Call { callee, .. } => self.as_symbol(*callee).map(Symbol::base),
            _ => None,
        }
    }

    /// Returns the symbol nodes read when evaluating `expr`, in evaluation order.
    ///
    /// Callee symbols are function lookups, not variable reads, and are skipped. Nested
    /// function definitions are opaque values and are not entered. For an assignment,
    /// only its right-hand side is read.
    #[must_use]
    pub fn reads(&self, expr: AstId) -> Vec<AstId> {
        let mut reads = Vec::new();
        let mut stack = vec![expr];

        while let Some(id) = stack.pop() {
            let Some(kind) = self.kind(id) else {
                continue;
            };
            match kind {
                NodeKind::Symbol(_) => reads.push(id),
                NodeKind::Function { .. } => {}
                NodeKind::Assign { read, .. } => stack.push(*read),
                NodeKind::Call { callee, args } => {
                    stack.extend(args.iter().rev().copied());
                    if self.as_symbol(*callee).is_none() {
                        stack.push(*callee);
                    }
                }
                other => stack.extend(other.children().into_iter().rev()),
            }
        }

        reads
    }

    /// Adds a literal.
    pub fn literal(&mut self, value: impl Into<Value>) -> AstId {
        self.add(NodeKind::Literal(value.into()))
    }

    /// Adds a bare symbol.
    pub fn symbol(&mut self, name: &str) -> AstId {
        self.add(NodeKind::Symbol(Symbol::new(name)))
    }

    /// Adds `target <- value`, creating the target symbol.
    pub fn assign(&mut self, target: &str, value: AstId) -> AstId {
        let write = self.symbol(target);
        self.assign_to(write, value)
    }

    /// Adds `write <- read` for an existing target node.
    pub fn assign_to(&mut self, write: AstId, read: AstId) -> AstId {
        self.add(NodeKind::Assign { write, read })
    }

    /// Adds a call to the function named `callee`.
    pub fn call(&mut self, callee: &str, args: Vec<AstId>) -> AstId {
        let callee = self.symbol(callee);
        self.add(NodeKind::Call { callee, args })
    }

    /// Adds `{ body }`.
    pub fn brace(&mut self, body: Vec<AstId>) -> AstId {
        self.add(NodeKind::Brace { body })
    }

    /// Adds `if (condition) true_branch else false_branch`.
    pub fn if_else(
        &mut self,
        condition: AstId,
        true_branch: AstId,
        false_branch: Option<AstId>,
    ) -> AstId {
        self.add(NodeKind::If {
            condition: Some(condition),
            true_branch: Some(true_branch),
            false_branch,
        })
    }

    /// Adds `for (variable in iterable) body`, creating the loop variable symbol.
    pub fn for_loop(&mut self, variable: &str, iterable: AstId, body: AstId) -> AstId {
        let variable = self.symbol(variable);
        self.add(NodeKind::For {
            variable: Some(variable),
            iterable: Some(iterable),
            body: Some(body),
        })
    }

    /// Adds `while (condition) body`.
    pub fn while_loop(&mut self, condition: AstId, body: AstId) -> AstId {
        self.add(NodeKind::While {
            condition: Some(condition),
            body: Some(body),
        })
    }

    /// Adds `repeat body`.
    pub fn repeat(&mut self, body: AstId) -> AstId {
        self.add(NodeKind::Repeat { body: Some(body) })
    }

    /// Adds `break`.
    pub fn break_loop(&mut self) -> AstId {
        self.add(NodeKind::Break)
    }

    /// Adds `next`.
    pub fn next_iteration(&mut self) -> AstId {
        self.add(NodeKind::Next)
    }

    /// Adds `return(value)`.
    pub fn return_value(&mut self, value: Option<AstId>) -> AstId {
        self.add(NodeKind::Return { value })
    }

    /// Adds `function(params) body`, creating the parameter symbols.
    pub fn function(&mut self, params: &[&str], body: AstId) -> AstId {
        let params: Vec<AstId> = params.iter().map(|name| self.symbol(name)).collect();
        self.add(NodeKind::Function {
            params,
            body: Some(body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_links() {
        let mut ast = Ast::new();
        let one = ast.literal(1);
        let assign = ast.assign("x", one);
        let body = ast.brace(vec![assign]);

        assert_eq!(ast.parent(one), Some(assign));
        assert_eq!(ast.ancestors(one).collect::<Vec<_>>(), vec![assign, body]);
        assert_eq!(ast.parent(body), None);
    }

    #[test]
    fn test_reads_skip_callees_and_functions() {
        let mut ast = Ast::new();
        let a = ast.symbol("a");
        let b = ast.symbol("b");
        let inner_read = ast.symbol("hidden");
        let closure = ast.function(&["p"], inner_read);
        let call = ast.call("f", vec![a, closure, b]);

        assert_eq!(ast.reads(call), vec![a, b]);
        assert_eq!(ast.callee_name(call), Some("f"));
    }

    #[test]
    fn test_reads_through_computed_callee() {
        let mut ast = Ast::new();
        let getter = ast.symbol("fns");
        let index = ast.literal(1);
        let lookup = ast.call("[[", vec![getter, index]);
        let arg = ast.symbol("x");
        let call = ast.add(NodeKind::Call {
            callee: lookup,
            args: vec![arg],
        });

        assert_eq!(ast.reads(call), vec![getter, arg]);
        assert_eq!(ast.callee_name(call), None);
    }

    #[test]
    fn test_symbol_mut_renames_in_place() {
        let mut ast = Ast::new();
        let x = ast.symbol("x");
        let one = ast.literal(1.0);

        ast.symbol_mut(x).unwrap().set_ssa_number(Some(1));
        assert_eq!(ast.as_symbol(x).map(Symbol::name).as_deref(), Some("x#1"));
        assert!(ast.symbol_mut(one).is_none());
    }
}
