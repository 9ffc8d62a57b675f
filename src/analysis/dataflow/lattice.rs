//! Lattice traits and the constant propagation lattice.
//!
//! For data flow analysis, a lattice defines how abstract values combine where
//! information from several sources meets:
//!
//! - **Top (⊤)**: no information yet, the identity for meet
//! - **Bottom (⊥)**: conflicting information, absorbing for meet
//!
//! Analyses only ever move values downwards with `meet`, which together with a finite
//! lattice height guarantees termination.

use std::fmt::{self, Debug};

use crate::ast::Value;

/// A meet semi-lattice with a meet (greatest lower bound) operation.
///
/// The meet operation must satisfy:
///
/// - **Idempotent**: `x.meet(x) = x`
/// - **Commutative**: `x.meet(y) = y.meet(x)`
/// - **Associative**: `x.meet(y.meet(z)) = (x.meet(y)).meet(z)`
pub trait MeetSemiLattice: Clone + Debug + PartialEq {
    /// Computes the meet (greatest lower bound) of two lattice elements.
    #[must_use]
    fn meet(&self, other: &Self) -> Self;

    /// Returns `true` if this is the top element.
    fn is_top(&self) -> bool;

    /// Returns `true` if this is the bottom element.
    ///
    /// Once bottom is reached, further meets cannot change the value.
    fn is_bottom(&self) -> bool;
}

/// The three-level constant lattice: `Unknown ⊑ Constant ⊑ NotConstant`.
///
/// `Unknown` (⊤) means no evaluation has produced a value yet. `NotConstant` (⊥) means
/// the name may hold more than one value at run time. Values only ever move from
/// `Unknown` towards `NotConstant`.
///
/// # Examples
///
/// ```rust
/// use ssalyze::{analysis::dataflow::{LatticeValue, MeetSemiLattice}, ast::Value};
///
/// let one = LatticeValue::Constant(Value::Double(1.0));
/// let two = LatticeValue::Constant(Value::Double(2.0));
///
/// assert_eq!(LatticeValue::Unknown.meet(&one), one);
/// assert_eq!(one.meet(&one), one);
/// assert_eq!(one.meet(&two), LatticeValue::NotConstant);
/// assert!(one.precedes_or_equals(&LatticeValue::NotConstant));
/// ```
#[derive(Debug, Clone)]
pub enum LatticeValue {
    /// Not evaluated yet
    Unknown,
    /// Always holds this value
    Constant(Value),
    /// May hold different values
    NotConstant,
}

impl LatticeValue {
    /// Returns the constant, if the value is one.
    #[must_use]
    pub const fn as_constant(&self) -> Option<&Value> {
        match self {
            LatticeValue::Constant(value) => Some(value),
            _ => None,
        }
    }

    /// Returns `true` for `Constant` values.
    #[must_use]
    pub const fn is_constant(&self) -> bool {
        matches!(self, LatticeValue::Constant(_))
    }

    /// Position in the lattice order, top first.
    const fn height(&self) -> u8 {
        match self {
            LatticeValue::Unknown => 0,
            LatticeValue::Constant(_) => 1,
            LatticeValue::NotConstant => 2,
        }
    }

    /// Returns `true` if `self ⊑ other` in the order `Unknown ⊑ Constant ⊑ NotConstant`.
    ///
    /// Two different constants are unordered.
    #[must_use]
    pub fn precedes_or_equals(&self, other: &LatticeValue) -> bool {
        match (self, other) {
            (LatticeValue::Constant(a), LatticeValue::Constant(b)) => a.identical(b),
            _ => self.height() <= other.height(),
        }
    }
}

impl PartialEq for LatticeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LatticeValue::Constant(a), LatticeValue::Constant(b)) => a.identical(b),
            _ => self.height() == other.height(),
        }
    }
}

impl MeetSemiLattice for LatticeValue {
    fn meet(&self, other: &Self) -> Self {
        match (self, other) {
            (LatticeValue::Unknown, value) | (value, LatticeValue::Unknown) => value.clone(),
            (LatticeValue::Constant(a), LatticeValue::Constant(b)) if a.identical(b) => {
                self.clone()
            }
            _ => LatticeValue::NotConstant,
        }
    }

    fn is_top(&self) -> bool {
        matches!(self, LatticeValue::Unknown)
    }

    fn is_bottom(&self) -> bool {
        matches!(self, LatticeValue::NotConstant)
    }
}

impl fmt::Display for LatticeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LatticeValue::Unknown => write!(f, "unknown"),
            LatticeValue::Constant(value) => write!(f, "{value}"),
            LatticeValue::NotConstant => write!(f, "not constant"),
        }
    }
}
