//! Per-variable name stacks used during SSA renaming.
//!
//! Renaming walks the dominator tree depth first. Every definition pushes a fresh
//! sequence number for its base name; when the walk leaves a block, the numbers that
//! block pushed are popped again, so the top of each stack is always the definition
//! reaching the current point.

use std::collections::HashMap;

/// Name stacks and sequence counters, keyed by base name.
///
/// Counters start at 1 and only ever grow, so every definition of a base name gets a
/// distinct number over the whole renaming pass.
///
/// # Examples
///
/// ```rust
/// use ssalyze::analysis::ssa::NameStack;
///
/// let mut names = NameStack::new();
/// assert_eq!(names.define("x"), 1);
/// assert_eq!(names.define("x"), 2);
/// assert_eq!(names.current("x"), Some(2));
///
/// names.pop("x");
/// assert_eq!(names.current("x"), Some(1));
/// assert_eq!(names.define("x"), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NameStack {
    stacks: HashMap<String, Vec<u32>>,
    counters: HashMap<String, u32>,
}

impl NameStack {
    /// Creates empty stacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next sequence number for `base`, pushes it and returns it.
    pub fn define(&mut self, base: &str) -> u32 {
        let counter = self.counters.entry(base.to_string()).or_insert(0);
        *counter += 1;
        let number = *counter;
        self.stacks
            .entry(base.to_string())
            .or_default()
            .push(number);
        number
    }

    /// The sequence number of the definition currently in scope for `base`.
    #[must_use]
    pub fn current(&self, base: &str) -> Option<u32> {
        self.stacks.get(base).and_then(|stack| stack.last().copied())
    }

    /// Pops the innermost definition of `base`.
    pub fn pop(&mut self, base: &str) -> Option<u32> {
        self.stacks.get_mut(base).and_then(Vec::pop)
    }

    /// The number of definitions allocated for `base` so far.
    #[must_use]
    pub fn definitions(&self, base: &str) -> u32 {
        self.counters.get(base).copied().unwrap_or(0)
    }
}
