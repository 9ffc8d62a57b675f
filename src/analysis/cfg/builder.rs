//! Lowering of structured AST control flow into a [`ControlFlowGraph`].
//!
//! The builder walks statements in source order, appending plain statements to the
//! current block and splitting blocks at every control construct:
//!
//! - `if` ends the current block with a `Branch`. A merge block is created when control
//!   can fall out of both arms (or up front when there is no `else`, where the merge
//!   block doubles as the false target).
//! - `while` jumps into a fresh header whose `Branch` leads to the body or the exit.
//! - `repeat` jumps into a header that unconditionally enters the body. Its exit block
//!   only exists if some `break` targets it.
//! - `for` is rewritten into an explicit counter loop over two hidden variables,
//!   `._iterable_n` and `._counter_n`, and its header ends in an `IterateBranch`.
//! - `break`, `next` and `return` terminate the current block. Statements following
//!   them in the same sequence are unreachable and are not emitted.
//!
//! Once control leaves a block there is no current block; the walk keeps going only to
//! close the enclosing constructs.

use crate::{
    analysis::{
        cfg::{block::Terminator, graph::ControlFlowGraph},
        BlockId,
    },
    ast::{Ast, AstId, NodeKind},
    Error, Result,
};

/// An enclosing loop, innermost last.
#[derive(Debug, Clone, Copy)]
struct LoopFrame {
    /// Target of `next`
    header: BlockId,
    /// Target of `break`; created on demand for `repeat`
    exit: Option<BlockId>,
    /// Depth of the loop statement itself
    depth: usize,
}

/// Builds a [`ControlFlowGraph`] from an AST.
///
/// # Examples
///
/// ```rust
/// use ssalyze::{analysis::{CfgBuilder, Terminator}, ast::Ast};
///
/// // x = 1; while (x < 10) x = x + 1
/// let mut ast = Ast::new();
/// let one = ast.literal(1.0);
/// let init = ast.assign("x", one);
/// let x = ast.symbol("x");
/// let ten = ast.literal(10.0);
/// let condition = ast.call("<", vec![x, ten]);
/// let x_read = ast.symbol("x");
/// let one_more = ast.literal(1.0);
/// let sum = ast.call("+", vec![x_read, one_more]);
/// let step = ast.assign("x", sum);
/// let lp = ast.while_loop(condition, step);
/// let root = ast.brace(vec![init, lp]);
///
/// let cfg = CfgBuilder::build(&ast, root)?;
/// let header = cfg.successors(cfg.entry()).next().unwrap();
/// assert!(matches!(
///     cfg.block(header).unwrap().terminator(),
///     Some(Terminator::Branch { .. })
/// ));
/// # Ok::<(), ssalyze::Error>(())
/// ```
pub struct CfgBuilder {
    cfg: ControlFlowGraph,
    current: Option<BlockId>,
    loops: Vec<LoopFrame>,
    depth: usize,
    for_loops: usize,
}

impl CfgBuilder {
    /// Lowers the tree rooted at `root` into a control-flow graph.
    ///
    /// The graph receives its own copy of `ast`. When `root` is a `Function` node, its
    /// parameters become the graph's parameters and its body is lowered; otherwise `root`
    /// itself is the body.
    ///
    /// # Errors
    ///
    /// - [`Error::Structural`] for a missing required child, a child id with no node
    ///   behind it, or `break`/`next` outside of a loop.
    /// - [`Error::Unsupported`] for an assignment to anything but a symbol, or for
    ///   control flow or assignments nested inside an expression.
    pub fn build(ast: &Ast, root: AstId) -> Result<ControlFlowGraph> {
        let mut builder = CfgBuilder {
            cfg: ControlFlowGraph::new(ast.clone()),
            current: None,
            loops: Vec::new(),
            depth: 0,
            for_loops: 0,
        };
        builder.current = Some(builder.cfg.entry());

        let body = match ast.kind(root) {
            None => return Err(structural_error!(root, "root node does not exist")),
            Some(NodeKind::Function { params, body }) => {
                for &param in params {
                    if ast.as_symbol(param).is_none() {
                        return Err(Error::Unsupported {
                            node: param,
                            message: "function parameter must be a symbol".to_string(),
                        });
                    }
                }
                builder.cfg.set_parameters(params.clone());
                builder.existing(root, *body, "function body")?
            }
            Some(_) => root,
        };

        builder.lower(body)?;
        if let Some(last) = builder.current.take() {
            builder.cfg.set_terminator(last, Terminator::Return { value: None })?;
        }

        log::debug!(
            "lowered {} into {} blocks with {} edges",
            root,
            builder.cfg.block_count(),
            builder.cfg.edge_count()
        );
        Ok(builder.cfg)
    }

    fn lower(&mut self, statement: AstId) -> Result<()> {
        let Some(block) = self.current else {
            log::trace!("skipping unreachable statement {statement}");
            return Ok(());
        };

        let kind = self
            .cfg
            .ast()
            .kind(statement)
            .cloned()
            .ok_or_else(|| structural_error!(statement, "statement does not exist"))?;

        match kind {
            NodeKind::Brace { body } => {
                for child in body {
                    if self.current.is_none() {
                        break;
                    }
                    self.lower(child)?;
                }
                Ok(())
            }
            NodeKind::If {
                condition,
                true_branch,
                false_branch,
            } => self.lower_if(block, statement, condition, true_branch, false_branch),
            NodeKind::While { condition, body } => {
                self.lower_while(block, statement, condition, body)
            }
            NodeKind::Repeat { body } => self.lower_repeat(block, statement, body),
            NodeKind::For {
                variable,
                iterable,
                body,
            } => self.lower_for(block, statement, variable, iterable, body),
            NodeKind::Break => {
                let target = self.break_target(statement)?;
                self.close(block, Terminator::Break { target })
            }
            NodeKind::Next => {
                let target = self
                    .loops
                    .last()
                    .map(|frame| frame.header)
                    .ok_or_else(|| structural_error!(statement, "next outside of a loop"))?;
                self.close(block, Terminator::Next { target })
            }
            NodeKind::Return { value } => {
                if let Some(value) = value {
                    self.existing(statement, Some(value), "return value")?;
                    self.check_expression(value)?;
                }
                self.close(block, Terminator::Return { value })
            }
            NodeKind::Assign { write, read } => {
                if self.cfg.ast().as_symbol(write).is_none() {
                    self.existing(statement, Some(write), "assignment target")?;
                    return Err(Error::Unsupported {
                        node: write,
                        message: "assignment target must be a symbol".to_string(),
                    });
                }
                self.existing(statement, Some(read), "assigned value")?;
                self.check_expression(read)?;
                self.append(block, statement)
            }
            NodeKind::Literal(_)
            | NodeKind::Symbol(_)
            | NodeKind::Call { .. }
            | NodeKind::Function { .. } => {
                self.check_expression(statement)?;
                self.append(block, statement)
            }
        }
    }

    fn lower_if(
        &mut self,
        head: BlockId,
        node: AstId,
        condition: Option<AstId>,
        true_branch: Option<AstId>,
        false_branch: Option<AstId>,
    ) -> Result<()> {
        let condition = self.existing(node, condition, "condition")?;
        self.check_expression(condition)?;
        let true_branch = self.existing(node, true_branch, "true branch")?;
        let false_branch = match false_branch {
            Some(branch) => Some(self.existing(node, Some(branch), "false branch")?),
            None => None,
        };

        let depth = self.depth;
        let then_block = self.cfg.add_block(depth + 1);

        let Some(false_branch) = false_branch else {
            let merge = self.cfg.add_block(depth);
            self.cfg.set_terminator(
                head,
                Terminator::Branch {
                    condition,
                    true_target: then_block,
                    false_target: merge,
                },
            )?;
            if let Some(end) = self.lower_nested(then_block, true_branch)? {
                self.cfg
                    .set_terminator(end, Terminator::Jump { target: merge })?;
            }
            self.current = Some(merge);
            return Ok(());
        };

        let else_block = self.cfg.add_block(depth + 1);
        self.cfg.set_terminator(
            head,
            Terminator::Branch {
                condition,
                true_target: then_block,
                false_target: else_block,
            },
        )?;
        let then_end = self.lower_nested(then_block, true_branch)?;
        let else_end = self.lower_nested(else_block, false_branch)?;

        self.current = match (then_end, else_end) {
            (Some(then_end), Some(else_end)) => {
                let merge = self.cfg.add_block(depth);
                self.cfg
                    .set_terminator(then_end, Terminator::Jump { target: merge })?;
                self.cfg
                    .set_terminator(else_end, Terminator::Jump { target: merge })?;
                Some(merge)
            }
            (Some(end), None) | (None, Some(end)) => Some(end),
            (None, None) => None,
        };
        Ok(())
    }

    fn lower_while(
        &mut self,
        block: BlockId,
        node: AstId,
        condition: Option<AstId>,
        body: Option<AstId>,
    ) -> Result<()> {
        let condition = self.existing(node, condition, "condition")?;
        self.check_expression(condition)?;
        let body = self.existing(node, body, "loop body")?;

        let depth = self.depth;
        let header = self.cfg.add_block(depth);
        self.cfg
            .set_terminator(block, Terminator::Jump { target: header })?;

        let body_block = self.cfg.add_block(depth + 1);
        let exit = self.cfg.add_block(depth);
        self.cfg.set_terminator(
            header,
            Terminator::Branch {
                condition,
                true_target: body_block,
                false_target: exit,
            },
        )?;

        self.lower_loop_body(header, Some(exit), body_block, body)?;
        self.current = Some(exit);
        Ok(())
    }

    fn lower_repeat(&mut self, block: BlockId, node: AstId, body: Option<AstId>) -> Result<()> {
        let body = self.existing(node, body, "loop body")?;

        let depth = self.depth;
        let header = self.cfg.add_block(depth);
        self.cfg
            .set_terminator(block, Terminator::Jump { target: header })?;
        let body_block = self.cfg.add_block(depth + 1);
        self.cfg
            .set_terminator(header, Terminator::Jump { target: body_block })?;

        // Without a break the loop never falls through and there is no exit block.
        self.current = self.lower_loop_body(header, None, body_block, body)?;
        Ok(())
    }

    fn lower_for(
        &mut self,
        block: BlockId,
        node: AstId,
        variable: Option<AstId>,
        iterable: Option<AstId>,
        body: Option<AstId>,
    ) -> Result<()> {
        let variable = self.existing(node, variable, "loop variable")?;
        if self.cfg.ast().as_symbol(variable).is_none() {
            return Err(Error::Unsupported {
                node: variable,
                message: "loop variable must be a symbol".to_string(),
            });
        }
        let iterable = self.existing(node, iterable, "iterable")?;
        self.check_expression(iterable)?;
        let body = self.existing(node, body, "loop body")?;

        self.for_loops += 1;
        let iterable_name = format!("._iterable_{}", self.for_loops);
        let counter_name = format!("._counter_{}", self.for_loops);

        // ._iterable_n <- iterable; ._counter_n <- 0L
        let ast = self.cfg.ast_mut();
        let save_iterable = ast.assign(&iterable_name, iterable);
        let zero = ast.literal(0);
        let reset_counter = ast.assign(&counter_name, zero);
        self.append(block, save_iterable)?;
        self.append(block, reset_counter)?;

        // ._counter_n <- ._counter_n + 1L, then test against length(._iterable_n)
        let ast = self.cfg.ast_mut();
        let counter = ast.symbol(&counter_name);
        let one = ast.literal(1);
        let incremented = ast.call("+", vec![counter, one]);
        let step = ast.assign(&counter_name, incremented);
        let counter = ast.symbol(&counter_name);
        let collection = ast.symbol(&iterable_name);
        let length = ast.call("length", vec![collection]);
        let check = ast.call("<=", vec![counter, length]);

        // variable <- ._iterable_n[[._counter_n]]
        let collection = ast.symbol(&iterable_name);
        let counter = ast.symbol(&counter_name);
        let element = ast.call("[[", vec![collection, counter]);
        let fetch = ast.assign_to(variable, element);

        let depth = self.depth;
        let header = self.cfg.add_block(depth);
        self.cfg
            .set_terminator(block, Terminator::Jump { target: header })?;
        self.append(header, step)?;

        let body_block = self.cfg.add_block(depth + 1);
        let exit = self.cfg.add_block(depth);
        self.cfg.set_terminator(
            header,
            Terminator::IterateBranch {
                check,
                body: body_block,
                exit,
                origin: node,
            },
        )?;
        self.append(body_block, fetch)?;

        self.lower_loop_body(header, Some(exit), body_block, body)?;
        self.current = Some(exit);
        Ok(())
    }

    /// Lowers a loop body starting in `body_block` and closes it with a back edge.
    ///
    /// Returns the loop's exit block, which may have been created by a `break`.
    fn lower_loop_body(
        &mut self,
        header: BlockId,
        exit: Option<BlockId>,
        body_block: BlockId,
        body: AstId,
    ) -> Result<Option<BlockId>> {
        self.loops.push(LoopFrame {
            header,
            exit,
            depth: self.depth,
        });
        let end = self.lower_nested(body_block, body);
        let frame = self.loops.pop();

        if let Some(end) = end? {
            self.cfg
                .set_terminator(end, Terminator::Jump { target: header })?;
        }
        Ok(frame.and_then(|frame| frame.exit))
    }

    /// Lowers `node` into `start` one level deeper and returns the block control falls
    /// out of, if any.
    fn lower_nested(&mut self, start: BlockId, node: AstId) -> Result<Option<BlockId>> {
        self.current = Some(start);
        self.depth += 1;
        let result = self.lower(node);
        self.depth -= 1;
        result?;
        Ok(self.current)
    }

    fn break_target(&mut self, node: AstId) -> Result<BlockId> {
        let Some(frame) = self.loops.last().copied() else {
            return Err(structural_error!(node, "break outside of a loop"));
        };
        if let Some(exit) = frame.exit {
            return Ok(exit);
        }

        let exit = self.cfg.add_block(frame.depth);
        if let Some(frame) = self.loops.last_mut() {
            frame.exit = Some(exit);
        }
        Ok(exit)
    }

    fn close(&mut self, block: BlockId, terminator: Terminator) -> Result<()> {
        self.cfg.set_terminator(block, terminator)?;
        self.current = None;
        Ok(())
    }

    fn append(&mut self, block: BlockId, statement: AstId) -> Result<()> {
        self.cfg
            .block_mut(block)
            .ok_or_else(|| Error::GraphError(format!("block {block} does not exist")))?
            .push_statement(statement);
        Ok(())
    }

    /// Checks that a required child slot of `owner` is filled and points at a node.
    fn existing(&self, owner: AstId, slot: Option<AstId>, what: &str) -> Result<AstId> {
        match slot {
            None => Err(structural_error!(owner, "{} {} is missing", self.label(owner), what)),
            Some(child) if self.cfg.ast().node(child).is_none() => Err(structural_error!(
                owner,
                "{} {} refers to missing node {}",
                self.label(owner),
                what,
                child
            )),
            Some(child) => Ok(child),
        }
    }

    fn label(&self, node: AstId) -> &'static str {
        self.cfg.ast().kind(node).map_or("node", NodeKind::label)
    }

    /// Validates an expression stored as a statement or terminator operand.
    ///
    /// Expressions must be free of control flow and of nested assignments. Nested
    /// function definitions are opaque and are not inspected.
    fn check_expression(&self, expr: AstId) -> Result<()> {
        let ast = self.cfg.ast();
        let mut stack = vec![expr];

        while let Some(id) = stack.pop() {
            let Some(kind) = ast.kind(id) else {
                return Err(structural_error!(id, "expression does not exist"));
            };
            if kind.is_control() || matches!(kind, NodeKind::Assign { .. }) {
                return Err(Error::Unsupported {
                    node: id,
                    message: format!("{} inside an expression", kind.label()),
                });
            }
            if matches!(kind, NodeKind::Function { .. }) {
                continue;
            }
            for child in kind.children() {
                if ast.node(child).is_none() {
                    return Err(structural_error!(id, "refers to missing node {}", child));
                }
                stack.push(child);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::CfgEdgeKind;

    fn b(index: usize) -> BlockId {
        BlockId::new(index)
    }

    fn successors(cfg: &ControlFlowGraph, block: BlockId) -> Vec<BlockId> {
        cfg.successors(block).collect()
    }

    #[test]
    fn test_straight_line_code_is_one_block() {
        let mut ast = Ast::new();
        let one = ast.literal(1.0);
        let first = ast.assign("x", one);
        let x = ast.symbol("x");
        let print = ast.call("print", vec![x]);
        let root = ast.brace(vec![first, print]);

        let cfg = CfgBuilder::build(&ast, root).unwrap();
        assert_eq!(cfg.block_count(), 1);
        let entry = cfg.block(cfg.entry()).unwrap();
        assert_eq!(entry.body(), &[first, print]);
        assert_eq!(entry.terminator(), Some(&Terminator::Return { value: None }));
        assert_eq!(cfg.exits(), vec![cfg.entry()]);
    }

    #[test]
    fn test_if_without_else_uses_merge_as_false_target() {
        let mut ast = Ast::new();
        let condition = ast.symbol("flag");
        let one = ast.literal(1.0);
        let then_branch = ast.assign("x", one);
        let root = ast.if_else(condition, then_branch, None);

        let cfg = CfgBuilder::build(&ast, root).unwrap();
        assert_eq!(cfg.block_count(), 3);
        assert_eq!(successors(&cfg, b(0)), vec![b(1), b(2)]);
        assert_eq!(successors(&cfg, b(1)), vec![b(2)]);
        assert_eq!(cfg.block(b(1)).unwrap().depth(), 1);
        assert_eq!(cfg.block(b(2)).unwrap().depth(), 0);
    }

    #[test]
    fn test_if_else_creates_diamond() {
        let mut ast = Ast::new();
        let condition = ast.symbol("flag");
        let one = ast.literal(1.0);
        let then_branch = ast.assign("x", one);
        let two = ast.literal(2.0);
        let else_branch = ast.assign("x", two);
        let root = ast.if_else(condition, then_branch, Some(else_branch));

        let cfg = CfgBuilder::build(&ast, root).unwrap();
        assert_eq!(cfg.block_count(), 4);
        assert_eq!(successors(&cfg, b(0)), vec![b(1), b(2)]);
        assert_eq!(successors(&cfg, b(1)), vec![b(3)]);
        assert_eq!(successors(&cfg, b(2)), vec![b(3)]);
        assert_eq!(
            cfg.predecessors(b(3)).collect::<Vec<_>>(),
            vec![b(1), b(2)]
        );
    }

    #[test]
    fn test_if_with_one_returning_arm_continues_from_other() {
        let mut ast = Ast::new();
        let condition = ast.symbol("flag");
        let early = ast.return_value(None);
        let two = ast.literal(2.0);
        let else_branch = ast.assign("x", two);
        let branch = ast.if_else(condition, early, Some(else_branch));
        let x = ast.symbol("x");
        let after = ast.call("print", vec![x]);
        let root = ast.brace(vec![branch, after]);

        let cfg = CfgBuilder::build(&ast, root).unwrap();
        assert_eq!(cfg.block_count(), 3);
        assert_eq!(cfg.block(b(2)).unwrap().body(), &[else_branch, after]);
        assert_eq!(cfg.exits(), vec![b(1), b(2)]);
    }

    #[test]
    fn test_while_loop_shape() {
        let mut ast = Ast::new();
        let condition = ast.symbol("go");
        let x = ast.symbol("x");
        let body = ast.call("print", vec![x]);
        let root = ast.while_loop(condition, body);

        let cfg = CfgBuilder::build(&ast, root).unwrap();
        // B0 -> B1 (header) -> B2 (body) | B3 (exit)
        assert_eq!(successors(&cfg, b(0)), vec![b(1)]);
        assert_eq!(successors(&cfg, b(1)), vec![b(2), b(3)]);
        assert_eq!(successors(&cfg, b(2)), vec![b(1)]);
        assert_eq!(cfg.block(b(2)).unwrap().depth(), 1);
        assert_eq!(cfg.exits(), vec![b(3)]);
    }

    #[test]
    fn test_repeat_without_break_never_exits() {
        let mut ast = Ast::new();
        let x = ast.symbol("x");
        let body = ast.call("print", vec![x]);
        let lp = ast.repeat(body);
        let unreachable = ast.symbol("never");
        let root = ast.brace(vec![lp, unreachable]);

        let cfg = CfgBuilder::build(&ast, root).unwrap();
        assert_eq!(cfg.block_count(), 3);
        assert!(cfg.exits().is_empty());
        assert!(cfg
            .blocks()
            .all(|(_, block)| !block.body().contains(&unreachable)));
    }

    #[test]
    fn test_repeat_with_break_creates_exit() {
        let mut ast = Ast::new();
        let brk = ast.break_loop();
        let dead = ast.symbol("dead");
        let body = ast.brace(vec![brk, dead]);
        let lp = ast.repeat(body);
        let done = ast.symbol("done");
        let root = ast.brace(vec![lp, done]);

        let cfg = CfgBuilder::build(&ast, root).unwrap();
        let exit = b(3);
        assert_eq!(
            cfg.outgoing_edges(b(2)).collect::<Vec<_>>(),
            vec![(exit, CfgEdgeKind::Break)]
        );
        assert_eq!(cfg.block(exit).unwrap().body(), &[done]);
        assert_eq!(cfg.block(exit).unwrap().depth(), 0);
        assert!(cfg.block(b(2)).unwrap().body().is_empty());
    }

    #[test]
    fn test_next_jumps_to_header() {
        let mut ast = Ast::new();
        let condition = ast.symbol("go");
        let next = ast.next_iteration();
        let root = ast.while_loop(condition, next);

        let cfg = CfgBuilder::build(&ast, root).unwrap();
        assert_eq!(
            cfg.outgoing_edges(b(2)).collect::<Vec<_>>(),
            vec![(b(1), CfgEdgeKind::Next)]
        );
    }

    #[test]
    fn test_for_loop_is_rewritten_to_counter_loop() {
        let mut ast = Ast::new();
        let items = ast.symbol("items");
        let i = ast.symbol("i");
        let body = ast.call("print", vec![i]);
        let root = ast.for_loop("i", items, body);

        let cfg = CfgBuilder::build(&ast, root).unwrap();
        let tree = cfg.ast();

        let entry = cfg.block(b(0)).unwrap();
        assert_eq!(entry.body().len(), 2);
        let names: Vec<String> = entry
            .body()
            .iter()
            .filter_map(|&s| match tree.kind(s) {
                Some(NodeKind::Assign { write, .. }) => tree.as_symbol(*write).map(|s| s.name()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["._iterable_1", "._counter_1"]);

        let header = cfg.block(b(1)).unwrap();
        assert_eq!(header.body().len(), 1);
        let Some(Terminator::IterateBranch {
            check, body, exit, origin,
        }) = header.terminator()
        else {
            panic!("expected an iterate branch");
        };
        assert_eq!((*body, *exit, *origin), (b(2), b(3), root));
        assert_eq!(tree.callee_name(*check), Some("<="));

        let body_block = cfg.block(b(2)).unwrap();
        assert_eq!(body_block.body().len(), 2);
        let Some(NodeKind::Assign { write, read }) = tree.kind(body_block.body()[0]) else {
            panic!("expected the element fetch");
        };
        assert_eq!(tree.as_symbol(*write).unwrap().name(), "i");
        assert_eq!(tree.callee_name(*read), Some("[["));
        assert_eq!(successors(&cfg, b(2)), vec![b(1)]);
    }

    #[test]
    fn test_for_loop_lowering_keeps_source_parents() {
        // for (i in items) print(i)
        let mut ast = Ast::new();
        let items = ast.symbol("items");
        let i = ast.symbol("i");
        let body = ast.call("print", vec![i]);
        let root = ast.for_loop("i", items, body);
        let Some(NodeKind::For {
            variable: Some(variable),
            ..
        }) = ast.kind(root).cloned()
        else {
            panic!("expected a for loop");
        };

        let cfg = CfgBuilder::build(&ast, root).unwrap();
        let tree = cfg.ast();

        // The synthesized `._iterable_1 = items` and `i = ._iterable_1[[._counter_1]]`
        // reuse the source nodes without taking them over.
        assert_eq!(tree.parent(items), Some(root));
        assert_eq!(tree.parent(variable), Some(root));
        assert!(tree.ancestors(items).any(|ancestor| ancestor == root));

        let fetch = cfg.block(b(2)).unwrap().body()[0];
        assert!(matches!(
            tree.kind(fetch),
            Some(NodeKind::Assign { write, .. }) if *write == variable
        ));
    }

    #[test]
    fn test_function_root_records_parameters() {
        let mut ast = Ast::new();
        let a = ast.symbol("a");
        let ret = ast.return_value(Some(a));
        let root = ast.function(&["a"], ret);

        let cfg = CfgBuilder::build(&ast, root).unwrap();
        assert_eq!(cfg.parameters().len(), 1);
        assert_eq!(
            cfg.block(b(0)).unwrap().terminator(),
            Some(&Terminator::Return { value: Some(a) })
        );
    }

    #[test]
    fn test_break_outside_loop_is_structural() {
        let mut ast = Ast::new();
        let brk = ast.break_loop();
        let root = ast.brace(vec![brk]);

        let result = CfgBuilder::build(&ast, root);
        assert!(matches!(result, Err(Error::Structural { node, .. }) if node == brk));
    }

    #[test]
    fn test_missing_condition_is_structural() {
        let mut ast = Ast::new();
        let body = ast.symbol("x");
        let root = ast.add(NodeKind::While {
            condition: None,
            body: Some(body),
        });

        let result = CfgBuilder::build(&ast, root);
        assert!(matches!(result, Err(Error::Structural { node, .. }) if node == root));
    }

    #[test]
    fn test_dangling_child_is_structural() {
        let mut ast = Ast::new();
        let root = ast.brace(vec![AstId::new(40)]);

        assert!(matches!(
            CfgBuilder::build(&ast, root),
            Err(Error::Structural { .. })
        ));
    }

    #[test]
    fn test_nested_control_flow_in_expression_is_unsupported() {
        let mut ast = Ast::new();
        let condition = ast.symbol("flag");
        let one = ast.literal(1.0);
        let two = ast.literal(2.0);
        let inline_if = ast.if_else(condition, one, Some(two));
        let root = ast.assign("x", inline_if);

        let result = CfgBuilder::build(&ast, root);
        assert!(matches!(result, Err(Error::Unsupported { node, .. }) if node == inline_if));
    }

    #[test]
    fn test_non_symbol_assignment_target_is_unsupported() {
        let mut ast = Ast::new();
        let target = ast.call("names", vec![]);
        let value = ast.literal("a");
        let root = ast.assign_to(target, value);

        assert!(matches!(
            CfgBuilder::build(&ast, root),
            Err(Error::Unsupported { .. })
        ));
    }

    #[test]
    fn test_nested_function_is_opaque() {
        let mut ast = Ast::new();
        let brk = ast.break_loop();
        let closure = ast.function(&[], brk);
        let root = ast.assign("f", closure);

        let cfg = CfgBuilder::build(&ast, root).unwrap();
        assert_eq!(cfg.block_count(), 1);
    }
}
