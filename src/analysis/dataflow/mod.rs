//! Data flow analyses over SSA form.
//!
//! # Key Components
//!
//! - [`MeetSemiLattice`] - The lattice interface analyses combine values with
//! - [`LatticeValue`] - The three-level constant lattice
//! - [`ConstantPropagation`] - Sparse constant propagation over def-use edges
//! - [`ConstantMap`] - The per-name result
//!
//! # Usage
//!
//! ```rust
//! use ssalyze::{
//!     analysis::{dataflow::{propagate_constants, LatticeValue}, ssa::to_ssa, CfgBuilder},
//!     ast::Ast,
//! };
//!
//! // x = rnorm(1)
//! let mut ast = Ast::new();
//! let one = ast.literal(1.0);
//! let draw = ast.call("rnorm", vec![one]);
//! let root = ast.assign("x", draw);
//!
//! let ssa = to_ssa(&CfgBuilder::build(&ast, root)?)?;
//! let constants = propagate_constants(&ssa)?;
//! assert_eq!(constants.get("x#1"), Some(&LatticeValue::NotConstant));
//! # Ok::<(), ssalyze::Error>(())
//! ```

mod constprop;
mod lattice;

pub use constprop::{propagate_constants, ConstantMap, ConstantPropagation, Transition};
pub use lattice::{LatticeValue, MeetSemiLattice};
