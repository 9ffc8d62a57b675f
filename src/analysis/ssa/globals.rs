//! Discovery of global names and their definition sites.
//!
//! A name is *global* when some block reads it before (re)defining it. Only global
//! names can need phi nodes: a name that is always written before being read in every
//! block that uses it never carries a value across a block boundary.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::{
    analysis::{BlockId, ControlFlowGraph},
    ast::{Ast, AstId, NodeKind, Symbol},
};

/// Global names and the blocks defining each name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionSites {
    /// Names read in some block before any definition in that block
    pub globals: BTreeSet<String>,
    /// Blocks assigning each name; parameters count as defined in the entry block
    pub sites: BTreeMap<String, BTreeSet<BlockId>>,
}

impl DefinitionSites {
    /// Blocks defining `base`.
    pub fn sites_of(&self, base: &str) -> impl Iterator<Item = BlockId> + '_ {
        self.sites.get(base).into_iter().flatten().copied()
    }
}

/// Scans the reachable blocks of `cfg` for global names and definition sites.
///
/// Each block is walked in order with a kill set of the names it has defined so far.
/// A read of a name outside the kill set makes the name global; reads in the
/// terminator's expression are checked against the kill set at the end of the block.
#[must_use]
pub fn collect_definition_sites(cfg: &ControlFlowGraph) -> DefinitionSites {
    let ast = cfg.ast();
    let mut result = DefinitionSites::default();

    for &param in cfg.parameters() {
        if let Some(symbol) = ast.as_symbol(param) {
            result
                .sites
                .entry(symbol.base().to_string())
                .or_default()
                .insert(cfg.entry());
        }
    }

    for block_id in cfg.reverse_postorder() {
        let Some(block) = cfg.block(block_id) else {
            continue;
        };
        let mut killed: HashSet<&str> = HashSet::new();

        for &statement in block.body() {
            match ast.kind(statement) {
                Some(NodeKind::Assign { write, read }) => {
                    note_reads(ast, *read, &killed, &mut result.globals);
                    if let Some(target) = ast.as_symbol(*write).map(Symbol::base) {
                        killed.insert(target);
                        result
                            .sites
                            .entry(target.to_string())
                            .or_default()
                            .insert(block_id);
                    }
                }
                Some(_) => note_reads(ast, statement, &killed, &mut result.globals),
                None => {}
            }
        }

        if let Some(expr) = block.terminator().and_then(|t| t.expression()) {
            note_reads(ast, expr, &killed, &mut result.globals);
        }
    }

    log::debug!(
        "found {} global names over {} defined names",
        result.globals.len(),
        result.sites.len()
    );
    result
}

fn note_reads(ast: &Ast, expr: AstId, killed: &HashSet<&str>, globals: &mut BTreeSet<String>) {
    for read in ast.reads(expr) {
        if let Some(symbol) = ast.as_symbol(read) {
            if !killed.contains(symbol.base()) {
                globals.insert(symbol.base().to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::CfgBuilder;

    #[test]
    fn test_local_reads_are_not_global() {
        // x = 1; y = x
        let mut ast = Ast::new();
        let one = ast.literal(1.0);
        let first = ast.assign("x", one);
        let x = ast.symbol("x");
        let second = ast.assign("y", x);
        let root = ast.brace(vec![first, second]);

        let cfg = CfgBuilder::build(&ast, root).unwrap();
        let sites = collect_definition_sites(&cfg);
        assert!(sites.globals.is_empty());
        assert_eq!(sites.sites_of("x").collect::<Vec<_>>(), vec![cfg.entry()]);
        assert_eq!(sites.sites_of("y").count(), 1);
    }

    #[test]
    fn test_read_before_local_definition_is_global() {
        // x = 1; while (x < 3) x = x + 1
        let mut ast = Ast::new();
        let one = ast.literal(1.0);
        let init = ast.assign("x", one);
        let x = ast.symbol("x");
        let three = ast.literal(3.0);
        let condition = ast.call("<", vec![x, three]);
        let x_read = ast.symbol("x");
        let one_more = ast.literal(1.0);
        let sum = ast.call("+", vec![x_read, one_more]);
        let step = ast.assign("x", sum);
        let lp = ast.while_loop(condition, step);
        let root = ast.brace(vec![init, lp]);

        let cfg = CfgBuilder::build(&ast, root).unwrap();
        let sites = collect_definition_sites(&cfg);
        assert_eq!(sites.globals, BTreeSet::from(["x".to_string()]));
        assert_eq!(sites.sites_of("x").count(), 2);
    }

    #[test]
    fn test_parameters_are_defined_on_entry() {
        let mut ast = Ast::new();
        let a = ast.symbol("a");
        let ret = ast.return_value(Some(a));
        let root = ast.function(&["a"], ret);

        let cfg = CfgBuilder::build(&ast, root).unwrap();
        let sites = collect_definition_sites(&cfg);
        assert!(sites.globals.contains("a"));
        assert_eq!(sites.sites_of("a").collect::<Vec<_>>(), vec![cfg.entry()]);
    }
}
