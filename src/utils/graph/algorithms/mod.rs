//! Graph algorithms for program analysis.
//!
//! # Available Algorithms
//!
//! ## Traversal
//!
//! - [`reachable`] - Reachability from a start node
//! - [`postorder`] - Depth-first post-order
//! - [`reverse_postorder`] - Reverse post-order (iteration order for forward problems)
//! - [`back_edges`] - Retreating edges of a depth-first walk
//!
//! ## Dominator Analysis
//!
//! - [`compute_dominators`] - Iterative Cooper-Harvey-Kennedy dominator tree
//! - [`compute_dominance_frontiers`] - Dominance frontiers for phi placement
//! - [`find_irreducible_edge`] - Reducibility check against a dominator tree
//! - [`DominatorTree`] - Result of dominator computation
//!
//! | Algorithm | Time Complexity |
//! |-----------|-----------------|
//! | Traversals | O(V + E) |
//! | Dominators | O(V + E) per pass |
//! | Dominance frontiers | O(V + E + Σ\|DF\|) |

mod dominators;
mod traversal;

pub use dominators::{
    compute_dominance_frontiers, compute_dominators, find_irreducible_edge, DominatorIterator,
    DominatorTree,
};
pub use traversal::{back_edges, postorder, reachable, reverse_postorder};
