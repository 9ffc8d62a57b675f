//! Conversion of a control-flow graph into SSA form.
//!
//! Conversion runs in four phases:
//!
//! 1. **Globals** - find names read across block boundaries and the blocks defining
//!    each name ([`collect_definition_sites`]).
//! 2. **Phi placement** - give every global name a phi in each block of the iterated
//!    dominance frontier of its definition sites.
//! 3. **Renaming** - walk the dominator tree with a [`NameStack`], numbering every
//!    definition and rewriting every read to the definition in scope. Phi operands are
//!    filled in from each predecessor as it is renamed.
//! 4. **Use check** - a phi is live when its value is read, directly or through other
//!    live phis. A live phi with an operand that no definition reaches is an error.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::{
    analysis::{
        ssa::{
            globals::collect_definition_sites, stack::NameStack, verify::verify_ssa, PhiNode,
        },
        BlockId, ControlFlowGraph,
    },
    ast::{AstId, NodeKind, Symbol},
    config::SsaConfig,
    utils::graph::algorithms::DominatorTree,
    Error, Result,
};

/// One entry of the explicit dominator tree walk.
enum Visit {
    /// Rename the block, then visit its dominator tree children
    Enter(BlockId),
    /// Pop the names the block pushed
    Leave(Vec<String>),
}

/// Converts control-flow graphs into SSA form.
///
/// # Examples
///
/// ```rust
/// use ssalyze::{analysis::{CfgBuilder, ssa::SsaConverter}, ast::Ast, config::SsaConfig};
///
/// // y = x + 1, where x is defined elsewhere
/// let mut ast = Ast::new();
/// let x = ast.symbol("x");
/// let one = ast.literal(1.0);
/// let sum = ast.call("+", vec![x, one]);
/// let root = ast.assign("y", sum);
/// let cfg = CfgBuilder::build(&ast, root)?;
///
/// assert!(SsaConverter::new(SsaConfig::strict()).convert(&cfg).is_err());
///
/// let ssa = SsaConverter::new(SsaConfig::lenient()).convert(&cfg)?;
/// assert!(ssa.is_ssa());
/// assert_eq!(ssa.ast().as_symbol(x).unwrap().name(), "x");
/// # Ok::<(), ssalyze::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SsaConverter {
    config: SsaConfig,
}

impl SsaConverter {
    /// Creates a converter with the given configuration.
    #[must_use]
    pub const fn new(config: SsaConfig) -> Self {
        SsaConverter { config }
    }

    /// Converts a deep copy of `cfg`, leaving the input untouched.
    ///
    /// # Errors
    ///
    /// See [`convert_in_place`](Self::convert_in_place).
    pub fn convert(&self, cfg: &ControlFlowGraph) -> Result<ControlFlowGraph> {
        let mut copy = cfg.clone();
        self.convert_in_place(&mut copy)?;
        Ok(copy)
    }

    /// Converts `cfg` itself.
    ///
    /// On error the graph may be partially renamed and should be discarded.
    ///
    /// # Errors
    ///
    /// - [`Error::SsaError`] if `cfg` is already in SSA form, or if verification is
    ///   enabled and fails.
    /// - [`Error::Irreducible`] if `cfg` is not reducible.
    /// - [`Error::UnresolvedName`] for a read, or a live phi operand, with no reaching
    ///   definition, unless free variables are allowed.
    pub fn convert_in_place(&self, cfg: &mut ControlFlowGraph) -> Result<()> {
        if cfg.is_ssa() {
            return Err(Error::SsaError(
                "control-flow graph is already in SSA form".to_string(),
            ));
        }

        let tree = cfg.dominators()?.clone();
        let frontier = cfg.dominance_frontiers()?.clone();

        let sites = collect_definition_sites(cfg);
        let mut placed = 0;
        for base in &sites.globals {
            for block in frontier.iterated(sites.sites_of(base)) {
                if let Some(data) = cfg.block_mut(block) {
                    if data.phi_for(base).is_none() {
                        data.phis_mut().push(PhiNode::new(base.as_str()));
                        placed += 1;
                        log::trace!("placed phi for '{base}' in {block}");
                    }
                }
            }
        }
        log::debug!(
            "placed {placed} phis for {} global names",
            sites.globals.len()
        );

        let definitions = self.rename(cfg, &tree)?;
        log::debug!("renamed {definitions} definitions");

        if !self.config.allow_free_variables {
            check_live_phis(cfg)?;
        }

        cfg.mark_ssa();
        if self.config.verify {
            verify_ssa(cfg)?;
        }
        Ok(())
    }

    /// Renames every reachable block and returns the number of definitions numbered.
    fn rename(&self, cfg: &mut ControlFlowGraph, tree: &DominatorTree) -> Result<usize> {
        let mut names = NameStack::new();
        let mut definitions = 0;

        for param in cfg.parameters().to_vec() {
            if let Some(symbol) = cfg.ast_mut().symbol_mut(param) {
                let number = names.define(symbol.base());
                symbol.set_ssa_number(Some(number));
                definitions += 1;
            }
        }

        let mut work = vec![Visit::Enter(tree.entry())];
        while let Some(visit) = work.pop() {
            match visit {
                Visit::Enter(block) => {
                    let pushed = self.rename_block(cfg, block, &mut names)?;
                    definitions += pushed.len();
                    work.push(Visit::Leave(pushed));
                    for &child in tree.children(block).iter().rev() {
                        work.push(Visit::Enter(child));
                    }
                }
                Visit::Leave(pushed) => {
                    for base in pushed.iter().rev() {
                        names.pop(base);
                    }
                }
            }
        }

        Ok(definitions)
    }

    /// Renames one block and fills in its successors' phi operands.
    ///
    /// Returns the base names of the definitions pushed, in push order.
    fn rename_block(
        &self,
        cfg: &mut ControlFlowGraph,
        block: BlockId,
        names: &mut NameStack,
    ) -> Result<Vec<String>> {
        let mut pushed = Vec::new();

        let Some(data) = cfg.block_mut(block) else {
            return Err(Error::GraphError(format!("block {block} does not exist")));
        };
        for phi in data.phis_mut() {
            let base = phi.base().to_string();
            phi.set_write_number(names.define(&base));
            pushed.push(base);
        }

        let body = data.body().to_vec();
        let expression = data.terminator().and_then(|t| t.expression());

        for statement in body {
            let assignment = match cfg.ast().kind(statement) {
                Some(NodeKind::Assign { write, read }) => Some((*write, *read)),
                _ => None,
            };
            match assignment {
                Some((write, read)) => {
                    self.rename_reads(cfg, read, block, names)?;
                    if let Some(symbol) = cfg.ast_mut().symbol_mut(write) {
                        let base = symbol.base().to_string();
                        symbol.set_ssa_number(Some(names.define(&base)));
                        pushed.push(base);
                    }
                }
                None => self.rename_reads(cfg, statement, block, names)?,
            }
        }

        if let Some(expression) = expression {
            self.rename_reads(cfg, expression, block, names)?;
        }

        let successors: BTreeSet<BlockId> = cfg.successors(block).collect();
        for successor in successors {
            let Some(data) = cfg.block_mut(successor) else {
                continue;
            };
            for phi in data.phis_mut() {
                let definition = match names.current(phi.base()) {
                    Some(number) => Some(Symbol::versioned(phi.base(), number)),
                    None if self.config.allow_free_variables => Some(Symbol::new(phi.base())),
                    None => None,
                };
                phi.set_incoming(block, definition);
            }
        }

        Ok(pushed)
    }

    fn rename_reads(
        &self,
        cfg: &mut ControlFlowGraph,
        expr: AstId,
        block: BlockId,
        names: &NameStack,
    ) -> Result<()> {
        for read in cfg.ast().reads(expr) {
            let Some(symbol) = cfg.ast_mut().symbol_mut(read) else {
                continue;
            };
            match names.current(symbol.base()) {
                Some(number) => symbol.set_ssa_number(Some(number)),
                None if self.config.allow_free_variables => {
                    log::trace!("'{}' is free in {block}", symbol.base());
                }
                None => {
                    return Err(Error::UnresolvedName {
                        name: symbol.base().to_string(),
                        block,
                    })
                }
            }
        }
        Ok(())
    }
}

/// Fails if a phi whose value is used has an operand no definition reaches.
fn check_live_phis(cfg: &ControlFlowGraph) -> Result<()> {
    let ast = cfg.ast();
    let reachable = cfg.reverse_postorder();

    let mut phis: BTreeMap<Symbol, &PhiNode> = BTreeMap::new();
    let mut worklist: Vec<Symbol> = Vec::new();

    for &block in &reachable {
        let Some(data) = cfg.block(block) else {
            continue;
        };
        for phi in data.phis() {
            phis.insert(phi.write_symbol(), phi);
        }

        let expressions = data.body().iter().copied().map(|statement| match ast.kind(statement) {
            Some(NodeKind::Assign { read, .. }) => *read,
            _ => statement,
        });
        for expr in expressions.chain(data.terminator().and_then(|t| t.expression())) {
            worklist.extend(
                ast.reads(expr)
                    .into_iter()
                    .filter_map(|read| ast.as_symbol(read).cloned()),
            );
        }
    }

    let mut live: HashSet<Symbol> = HashSet::new();
    while let Some(symbol) = worklist.pop() {
        let Some(phi) = phis.get(&symbol) else {
            continue;
        };
        if !live.insert(symbol) {
            continue;
        }
        worklist.extend(phi.incoming().values().flatten().cloned());
    }

    for (symbol, phi) in &phis {
        if !live.contains(symbol) {
            continue;
        }
        if let Some((&block, _)) = phi.incoming().iter().find(|(_, def)| def.is_none()) {
            return Err(Error::UnresolvedName {
                name: phi.base().to_string(),
                block,
            });
        }
    }

    Ok(())
}

/// Converts a deep copy of `cfg` into SSA form with the strict default configuration.
///
/// # Errors
///
/// See [`SsaConverter::convert_in_place`].
pub fn to_ssa(cfg: &ControlFlowGraph) -> Result<ControlFlowGraph> {
    SsaConverter::default().convert(cfg)
}

/// Converts `cfg` into SSA form in place with the strict default configuration.
///
/// # Errors
///
/// See [`SsaConverter::convert_in_place`].
pub fn to_ssa_in_place(cfg: &mut ControlFlowGraph) -> Result<()> {
    SsaConverter::default().convert_in_place(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analysis::CfgBuilder, ast::Ast};

    fn name_of(cfg: &ControlFlowGraph, id: AstId) -> String {
        cfg.ast().as_symbol(id).unwrap().name()
    }

    #[test]
    fn test_linear_code_has_no_phis() {
        // x = 1; y = x
        let mut ast = Ast::new();
        let one = ast.literal(1.0);
        let first = ast.assign("x", one);
        let x = ast.symbol("x");
        let second = ast.assign("y", x);
        let root = ast.brace(vec![first, second]);

        let cfg = CfgBuilder::build(&ast, root).unwrap();
        let ssa = to_ssa(&cfg).unwrap();

        assert!(ssa.blocks().all(|(_, block)| block.phis().is_empty()));
        assert_eq!(name_of(&ssa, x), "x#1");
        assert_eq!(name_of(&cfg, x), "x");
        assert!(!cfg.is_ssa());
    }

    #[test]
    fn test_diamond_places_one_phi() {
        // if (c) x = 1 else x = 2; y = x
        let mut ast = Ast::new();
        let c = ast.literal(true);
        let one = ast.literal(1.0);
        let left = ast.assign("x", one);
        let two = ast.literal(2.0);
        let right = ast.assign("x", two);
        let branch = ast.if_else(c, left, Some(right));
        let x = ast.symbol("x");
        let after = ast.assign("y", x);
        let root = ast.brace(vec![branch, after]);

        let cfg = CfgBuilder::build(&ast, root).unwrap();
        let ssa = to_ssa(&cfg).unwrap();

        let merge = ssa.block(BlockId::new(3)).unwrap();
        assert_eq!(merge.phis().len(), 1);
        let phi = &merge.phis()[0];
        assert_eq!(phi.name(), "x#3");
        assert_eq!(
            phi.operand(BlockId::new(1)),
            Some(&Symbol::versioned("x", 1))
        );
        assert_eq!(
            phi.operand(BlockId::new(2)),
            Some(&Symbol::versioned("x", 2))
        );
        assert_eq!(name_of(&ssa, x), "x#3");
    }

    #[test]
    fn test_undefined_read_is_reported() {
        let mut ast = Ast::new();
        let ghost = ast.symbol("ghost");
        let root = ast.call("print", vec![ghost]);

        let cfg = CfgBuilder::build(&ast, root).unwrap();
        let error = to_ssa(&cfg).unwrap_err();
        assert!(matches!(
            error,
            Error::UnresolvedName { ref name, block } if name == "ghost" && block == cfg.entry()
        ));
    }

    #[test]
    fn test_live_phi_with_missing_definition_is_reported() {
        // if (c) x = 1; print(x)
        let mut ast = Ast::new();
        let c = ast.literal(true);
        let one = ast.literal(1.0);
        let then_branch = ast.assign("x", one);
        let branch = ast.if_else(c, then_branch, None);
        let x = ast.symbol("x");
        let print = ast.call("print", vec![x]);
        let root = ast.brace(vec![branch, print]);

        let cfg = CfgBuilder::build(&ast, root).unwrap();
        let error = to_ssa(&cfg).unwrap_err();
        assert!(matches!(
            error,
            Error::UnresolvedName { ref name, block } if name == "x" && block == cfg.entry()
        ));

        let lenient = SsaConverter::new(SsaConfig::lenient()).convert(&cfg).unwrap();
        let phi = lenient.block(BlockId::new(2)).unwrap().phi_for("x").unwrap();
        assert_eq!(phi.operand(cfg.entry()), Some(&Symbol::new("x")));
    }

    #[test]
    fn test_dead_phi_with_missing_definition_is_kept() {
        // if (c) { x = 1; repeat { print(x); break } }
        let mut ast = Ast::new();
        let c = ast.literal(true);
        let one = ast.literal(1.0);
        let define = ast.assign("x", one);
        let x = ast.symbol("x");
        let print = ast.call("print", vec![x]);
        let brk = ast.break_loop();
        let body = ast.brace(vec![print, brk]);
        let lp = ast.repeat(body);
        let then_branch = ast.brace(vec![define, lp]);
        let root = ast.if_else(c, then_branch, None);

        let cfg = CfgBuilder::build(&ast, root).unwrap();
        let ssa = to_ssa(&cfg).unwrap();

        // The merge block is B2; nothing reads the merged x.
        let phi = ssa.block(BlockId::new(2)).unwrap().phi_for("x").unwrap();
        assert!(phi.has_undefined_operand());
        assert_eq!(phi.operand(BlockId::new(5)), Some(&Symbol::versioned("x", 1)));
    }

    #[test]
    fn test_parameters_are_numbered_first() {
        let mut ast = Ast::new();
        let a = ast.symbol("a");
        let one = ast.literal(1.0);
        let sum = ast.call("+", vec![a, one]);
        let update = ast.assign("a", sum);
        let a_again = ast.symbol("a");
        let ret = ast.return_value(Some(a_again));
        let body = ast.brace(vec![update, ret]);
        let root = ast.function(&["a"], body);

        let cfg = CfgBuilder::build(&ast, root).unwrap();
        let ssa = to_ssa(&cfg).unwrap();
        assert_eq!(name_of(&ssa, ssa.parameters()[0]), "a#1");
        assert_eq!(name_of(&ssa, a), "a#1");
        assert_eq!(name_of(&ssa, a_again), "a#2");
    }

    #[test]
    fn test_converting_twice_fails() {
        let mut ast = Ast::new();
        let one = ast.literal(1.0);
        let root = ast.assign("x", one);

        let mut cfg = CfgBuilder::build(&ast, root).unwrap();
        to_ssa_in_place(&mut cfg).unwrap();
        assert!(cfg.is_ssa());
        assert!(matches!(to_ssa(&cfg), Err(Error::SsaError(_))));
    }
}
