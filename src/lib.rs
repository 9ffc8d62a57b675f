// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]
#![deny(unsafe_code)]

//! # ssalyze
//!
//! A static-analysis middle-end for a small, dynamically typed, R-like language. It
//! lowers structured ASTs into control-flow graphs, computes dominator trees and
//! dominance frontiers, converts graphs into SSA form and runs sparse constant
//! propagation over the result.
//!
//! ## Features
//!
//! - **Arena AST** - Nodes referenced by index, cheap to clone and to rename in place
//! - **Structured lowering** - `if`, `while`, `repeat`, `for`, `break`, `next` and
//!   `return` lowered into basic blocks with typed edges
//! - **Dominance** - Cooper-Harvey-Kennedy dominators, dominance frontiers and a
//!   reducibility check
//! - **SSA** - Phi placement on iterated dominance frontiers, scoped renaming and an
//!   invariant verifier
//! - **Constant propagation** - Folding with the language's integer and double
//!   semantics
//!
//! ## Quick Start
//!
//! ```rust
//! use ssalyze::prelude::*;
//!
//! // x = 1; y = x + 3; z = (y * 7) / 4
//! let mut ast = Ast::new();
//! let one = ast.literal(1.0);
//! let first = ast.assign("x", one);
//! let x = ast.symbol("x");
//! let three = ast.literal(3.0);
//! let sum = ast.call("+", vec![x, three]);
//! let second = ast.assign("y", sum);
//! let y = ast.symbol("y");
//! let seven = ast.literal(7.0);
//! let product = ast.call("*", vec![y, seven]);
//! let grouped = ast.call("(", vec![product]);
//! let four = ast.literal(4.0);
//! let quotient = ast.call("/", vec![grouped, four]);
//! let third = ast.assign("z", quotient);
//! let root = ast.brace(vec![first, second, third]);
//!
//! let result = Pipeline::new(AnalysisConfig::default()).run(&ast, root)?;
//! assert_eq!(result.constants().constant("z#1"), Some(&Value::Double(7.0)));
//! # Ok::<(), ssalyze::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types
//! - [`ast`] - The AST arena, literal values and foldable operators
//! - [`analysis`] - CFG construction, dominance, SSA and constant propagation
//! - [`config`] - Analysis configuration and presets
//! - [`utils`] - The generic graph substrate the analyses are built on
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade and never installs a logger. Stage
//! summaries are emitted at `debug`, per-block and per-phi detail at `trace`, and
//! integer overflow during folding at `warn`.

#[macro_use]
pub(crate) mod error;

pub mod analysis;
pub mod ast;
pub mod config;
pub mod prelude;
pub mod utils;

/// `ssalyze` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `ssalyze` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust
/// use ssalyze::{analysis::CfgBuilder, ast::Ast, Error};
///
/// let mut ast = Ast::new();
/// let stray = ast.break_loop();
///
/// match CfgBuilder::build(&ast, stray) {
///     Err(Error::Structural { node, message }) => {
///         assert_eq!(node, stray);
///         println!("Malformed: {message}");
///     }
///     other => panic!("unexpected result: {other:?}"),
/// }
/// ```
pub use error::Error;
