//! Shared infrastructure that is independent of the analyzed language.

pub mod graph;
