//! # ssalyze Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the ssalyze library. Import it to get quick access to everything needed to build
//! an AST and run the analyses over it.
//!
//! ```rust
//! use ssalyze::prelude::*;
//!
//! let mut ast = Ast::new();
//! let one = ast.literal(1.0);
//! let root = ast.assign("x", one);
//!
//! let cfg = CfgBuilder::build(&ast, root)?;
//! let ssa = to_ssa(&cfg)?;
//! assert!(verify_ssa(&ssa).is_ok());
//! # Ok::<(), Error>(())
//! ```

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all ssalyze operations
pub use crate::Error;

/// The result type used throughout ssalyze
pub use crate::Result;

/// Analysis configuration and its per-stage parts
pub use crate::config::{AnalysisConfig, PropagationConfig, SsaConfig};

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// The whole analysis chain in one call
pub use crate::analysis::{Pipeline, PipelineResult};

// ================================================================================================
// Syntax Tree
// ================================================================================================

/// The AST arena and its nodes
pub use crate::ast::{Ast, AstId, Node, NodeKind, Symbol};

/// Literal values and the operators the folder understands
pub use crate::ast::{Operator, Value};

// ================================================================================================
// Control Flow
// ================================================================================================

/// Control-flow graph construction and its building blocks
pub use crate::analysis::{
    BasicBlock, BlockId, CfgBuilder, CfgEdge, CfgEdgeKind, ControlFlowGraph, Terminator,
};

/// Dominator trees and dominance frontiers
pub use crate::analysis::dominance::{dominance_frontier, dominator_tree, DominanceFrontier};

/// The dominator tree computed by the graph substrate
pub use crate::utils::graph::algorithms::DominatorTree;

// ================================================================================================
// SSA Form
// ================================================================================================

/// SSA conversion and verification
pub use crate::analysis::ssa::{to_ssa, to_ssa_in_place, verify_ssa, PhiNode, SsaConverter};

// ================================================================================================
// Data Flow
// ================================================================================================

/// Constant propagation and its lattice
pub use crate::analysis::dataflow::{
    propagate_constants, ConstantMap, ConstantPropagation, LatticeValue, MeetSemiLattice,
};

// ================================================================================================
// Graph Substrate
// ================================================================================================

/// Graph traits, for running the generic algorithms over a control-flow graph
pub use crate::utils::graph::{GraphBase, NodeId, Predecessors, RootedGraph, Successors};
