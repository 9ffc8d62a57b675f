//! Control Flow Graph (CFG) construction.
//!
//! This module lowers structured control flow into basic blocks connected by typed
//! edges, on top of the generic [`crate::utils::graph::DirectedGraph`].
//!
//! # Key Components
//!
//! - [`CfgBuilder`] - Lowers an AST subtree into a graph
//! - [`ControlFlowGraph`] - Blocks, edges and the owned AST copy
//! - [`BasicBlock`] / [`Terminator`] - Straight-line statements and how control leaves them
//! - [`CfgEdgeKind`] - Why control moves along an edge
//!
//! # Lazy Computation
//!
//! Dominator trees and dominance frontiers are computed on first access and cached
//! with [`std::sync::OnceLock`]. Changing a terminator resets the cache.
//!
//! # Thread Safety
//!
//! A built graph is [`Send`] and [`Sync`]. Concurrent readers may trigger the lazy
//! computations; `OnceLock` guarantees a single stored result.

mod block;
mod builder;
mod edge;
mod graph;

pub use block::{BasicBlock, Terminator};
pub use builder::CfgBuilder;
pub use edge::{CfgEdge, CfgEdgeKind};
pub use graph::ControlFlowGraph;
