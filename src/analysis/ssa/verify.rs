//! Structural verification of SSA form.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    analysis::{BlockId, ControlFlowGraph},
    ast::{NodeKind, Symbol},
    Error, Result,
};

/// Checks the SSA invariants of `cfg` over its reachable blocks.
///
/// - Every definition (parameter, phi, assignment target) is numbered, and no name is
///   defined twice.
/// - Every numbered read refers to a defined name.
/// - Every phi has exactly one incoming entry per reachable predecessor of its block.
///
/// Bare reads are free variables and are accepted.
///
/// # Errors
///
/// Returns [`Error::SsaError`] describing the first violation found.
pub fn verify_ssa(cfg: &ControlFlowGraph) -> Result<()> {
    if !cfg.is_ssa() {
        return Err(Error::SsaError(
            "control-flow graph is not in SSA form".to_string(),
        ));
    }

    let ast = cfg.ast();
    let reachable = cfg.reverse_postorder();
    let reachable_set: BTreeSet<BlockId> = reachable.iter().copied().collect();
    let mut defined: BTreeMap<Symbol, BlockId> = BTreeMap::new();

    let mut define = |symbol: Symbol, block: BlockId| -> Result<()> {
        if !symbol.is_versioned() {
            return Err(Error::SsaError(format!(
                "definition of '{symbol}' in {block} has no sequence number"
            )));
        }
        if let Some(previous) = defined.insert(symbol.clone(), block) {
            return Err(Error::SsaError(format!(
                "'{symbol}' is defined in both {previous} and {block}"
            )));
        }
        Ok(())
    };

    for &param in cfg.parameters() {
        if let Some(symbol) = ast.as_symbol(param) {
            define(symbol.clone(), cfg.entry())?;
        }
    }

    let mut reads = Vec::new();
    for &block in &reachable {
        let Some(data) = cfg.block(block) else {
            continue;
        };

        let predecessors: BTreeSet<BlockId> = cfg
            .predecessors(block)
            .filter(|pred| reachable_set.contains(pred))
            .collect();
        for phi in data.phis() {
            define(phi.write_symbol(), block)?;
            let incoming: BTreeSet<BlockId> = phi.incoming().keys().copied().collect();
            if incoming != predecessors {
                return Err(Error::SsaError(format!(
                    "phi for '{}' in {block} has incoming edges from {:?}, expected {:?}",
                    phi.base(),
                    incoming,
                    predecessors
                )));
            }
            reads.extend(phi.incoming().values().flatten().cloned());
        }

        for &statement in data.body() {
            let expr = match ast.kind(statement) {
                Some(NodeKind::Assign { write, read }) => {
                    if let Some(symbol) = ast.as_symbol(*write) {
                        define(symbol.clone(), block)?;
                    }
                    *read
                }
                _ => statement,
            };
            reads.extend(
                ast.reads(expr)
                    .into_iter()
                    .filter_map(|id| ast.as_symbol(id).cloned()),
            );
        }
        if let Some(expr) = data.terminator().and_then(|t| t.expression()) {
            reads.extend(
                ast.reads(expr)
                    .into_iter()
                    .filter_map(|id| ast.as_symbol(id).cloned()),
            );
        }
    }

    if let Some(undefined) = reads
        .iter()
        .find(|symbol| symbol.is_versioned() && !defined.contains_key(*symbol))
    {
        return Err(Error::SsaError(format!(
            "'{undefined}' is read but never defined"
        )));
    }

    Ok(())
}
