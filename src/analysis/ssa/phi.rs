//! Phi node representation for SSA form.
//!
//! Phi nodes merge the reaching definitions of one variable at a control flow join. A
//! phi node `x#3 = phi(B1: x#1, B2: x#2)` means:
//! - If control came from block B1, `x#3` holds the value of `x#1`
//! - If control came from block B2, `x#3` holds the value of `x#2`
//!
//! Phi nodes are not statements of the block body; they are evaluated together at the
//! block's entry, before any statement executes.

use std::{collections::BTreeMap, fmt};

use crate::{analysis::BlockId, ast::Symbol};

/// A phi node for one variable at the entry of a block.
///
/// The write side is numbered during renaming. Each incoming entry maps a predecessor
/// block to the definition of the variable live at the end of that predecessor, or to
/// `None` when no definition reaches along that edge.
///
/// # Examples
///
/// ```rust
/// use ssalyze::{analysis::{ssa::PhiNode, BlockId}, ast::Symbol};
///
/// let mut phi = PhiNode::new("x");
/// phi.set_incoming(BlockId::new(1), Some(Symbol::versioned("x", 1)));
/// phi.set_incoming(BlockId::new(2), None);
///
/// assert_eq!(phi.base(), "x");
/// assert!(phi.has_undefined_operand());
/// assert_eq!(phi.to_string(), "x = phi(B1: x#1, B2: <undef>)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhiNode {
    /// Base name of the merged variable
    base: String,
    /// Sequence number of the value defined by the phi, once renamed
    write: Option<u32>,
    /// Definition reaching along each incoming edge
    incoming: BTreeMap<BlockId, Option<Symbol>>,
}

impl PhiNode {
    /// Creates an unnumbered phi node with no incoming entries.
    pub fn new(base: impl Into<String>) -> Self {
        PhiNode {
            base: base.into(),
            write: None,
            incoming: BTreeMap::new(),
        }
    }

    /// The base name of the merged variable.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    pub(crate) fn set_write_number(&mut self, number: u32) {
        self.write = Some(number);
    }

    /// The symbol defined by this phi.
    #[must_use]
    pub fn write_symbol(&self) -> Symbol {
        match self.write {
            Some(number) => Symbol::versioned(self.base.as_str(), number),
            None => Symbol::new(self.base.as_str()),
        }
    }

    /// The display name of the defined value, e.g. `x#3`.
    #[must_use]
    pub fn name(&self) -> String {
        self.write_symbol().name()
    }

    /// Incoming definitions keyed by predecessor block.
    #[must_use]
    pub fn incoming(&self) -> &BTreeMap<BlockId, Option<Symbol>> {
        &self.incoming
    }

    /// Records the definition reaching along the edge from `predecessor`.
    pub fn set_incoming(&mut self, predecessor: BlockId, definition: Option<Symbol>) {
        self.incoming.insert(predecessor, definition);
    }

    /// The definition reaching along the edge from `predecessor`.
    #[must_use]
    pub fn operand(&self, predecessor: BlockId) -> Option<&Symbol> {
        self.incoming.get(&predecessor).and_then(Option::as_ref)
    }

    /// Returns `true` if some incoming edge carries no definition.
    #[must_use]
    pub fn has_undefined_operand(&self) -> bool {
        self.incoming.values().any(Option::is_none)
    }
}

impl fmt::Display for PhiNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = phi(", self.write_symbol())?;
        for (i, (block, definition)) in self.incoming.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match definition {
                Some(symbol) => write!(f, "{block}: {symbol}")?,
                None => write!(f, "{block}: <undef>")?,
            }
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phi_numbering() {
        let mut phi = PhiNode::new("i");
        assert_eq!(phi.name(), "i");

        phi.set_write_number(4);
        phi.set_incoming(BlockId::new(2), Some(Symbol::versioned("i", 3)));
        phi.set_incoming(BlockId::new(0), Some(Symbol::versioned("i", 1)));

        assert_eq!(phi.name(), "i#4");
        assert_eq!(
            phi.operand(BlockId::new(2)),
            Some(&Symbol::versioned("i", 3))
        );
        assert!(!phi.has_undefined_operand());
        // Incoming entries are ordered by block id
        assert_eq!(phi.to_string(), "i#4 = phi(B0: i#1, B2: i#3)");
    }
}
