//! Static Single Assignment (SSA) form.
//!
//! SSA conversion rewrites a [`ControlFlowGraph`](crate::analysis::ControlFlowGraph) so
//! that every variable name has exactly one static definition. Definitions get a
//! per-name sequence number (`x` becomes `x#1`, `x#2`, ...), reads are rewritten to the
//! number of the definition reaching them, and [`PhiNode`]s merge definitions where
//! control flow joins.
//!
//! # Architecture
//!
//! - [`globals`](collect_definition_sites) - Global names and definition sites
//! - [`PhiNode`] - Phi nodes stored at the entry of basic blocks
//! - [`NameStack`] - Scoped name stacks for the renaming walk
//! - [`SsaConverter`] - The conversion itself ([`to_ssa`], [`to_ssa_in_place`])
//! - [`verify_ssa`] - Invariant checks on a converted graph
//!
//! # Usage
//!
//! ```rust
//! use ssalyze::{analysis::{CfgBuilder, ssa}, ast::Ast};
//!
//! // if (TRUE) x = 1 else x = 2; y = x
//! let mut ast = Ast::new();
//! let condition = ast.literal(true);
//! let one = ast.literal(1.0);
//! let left = ast.assign("x", one);
//! let two = ast.literal(2.0);
//! let right = ast.assign("x", two);
//! let branch = ast.if_else(condition, left, Some(right));
//! let x = ast.symbol("x");
//! let after = ast.assign("y", x);
//! let root = ast.brace(vec![branch, after]);
//!
//! let cfg = CfgBuilder::build(&ast, root)?;
//! let converted = ssa::to_ssa(&cfg)?;
//!
//! let phis: Vec<String> = converted
//!     .blocks()
//!     .flat_map(|(_, block)| block.phis().iter().map(|phi| phi.name()))
//!     .collect();
//! assert_eq!(phis, vec!["x#3"]);
//! # Ok::<(), ssalyze::Error>(())
//! ```

mod converter;
mod globals;
mod phi;
mod stack;
mod verify;

pub use converter::{to_ssa, to_ssa_in_place, SsaConverter};
pub use globals::{collect_definition_sites, DefinitionSites};
pub use phi::PhiNode;
pub use stack::NameStack;
pub use verify::verify_ssa;
