//! Program analysis infrastructure.
//!
//! This module lowers ASTs into control-flow graphs and runs the classic middle-end
//! analyses on them. It builds upon the generic graph infrastructure in
//! [`crate::utils::graph`].
//!
//! # Architecture
//!
//! - [`cfg`] - Control-flow graph construction
//! - [`dominance`] - Dominator trees, dominance frontiers, reducibility
//! - [`ssa`] - SSA conversion and verification
//! - [`dataflow`] - Constant propagation over SSA form
//! - [`Pipeline`] - All of the above in one call
//!
//! # Usage
//!
//! ```rust
//! use ssalyze::{analysis::{ssa, CfgBuilder}, ast::Ast};
//!
//! // x = 42; for (i in 1:10) { x = i }
//! let mut ast = Ast::new();
//! let answer = ast.literal(42.0);
//! let init = ast.assign("x", answer);
//! let from = ast.literal(1.0);
//! let to = ast.literal(10.0);
//! let range = ast.call(":", vec![from, to]);
//! let i = ast.symbol("i");
//! let body = ast.assign("x", i);
//! let lp = ast.for_loop("i", range, body);
//! let root = ast.brace(vec![init, lp]);
//!
//! let cfg = CfgBuilder::build(&ast, root)?;
//! let dominators = cfg.dominators()?;
//! assert!(cfg.block_ids().all(|block| dominators.dominates(cfg.entry(), block)));
//!
//! let converted = ssa::to_ssa(&cfg)?;
//! assert_eq!(converted.block_count(), cfg.block_count());
//! # Ok::<(), ssalyze::Error>(())
//! ```

pub mod cfg;
pub mod dataflow;
pub mod dominance;
mod pipeline;
pub mod ssa;

use crate::utils::graph::NodeId;

/// Identifier of a basic block within its control-flow graph.
pub type BlockId = NodeId;

pub use cfg::{BasicBlock, CfgBuilder, CfgEdge, CfgEdgeKind, ControlFlowGraph, Terminator};
pub use dataflow::{propagate_constants, ConstantMap, LatticeValue};
pub use dominance::{dominance_frontier, dominator_tree, DominanceFrontier};
pub use pipeline::{Pipeline, PipelineResult};
pub use ssa::{to_ssa, to_ssa_in_place, PhiNode};
