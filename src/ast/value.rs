//! Literal values of the analyzed language.
//!
//! The language is dynamically typed with a small numeric tower:
//!
//! ```text
//! Logical  <  Integer  <  Double
//! ```
//!
//! Logical values take part in arithmetic as the integers 0 and 1, integer arithmetic
//! stays integral, and any double operand makes the result a double. Plain numeric
//! literals (`1`, `3.5`) are doubles; integer literals carry an `L` suffix (`1L`).
//! The arithmetic itself lives in [`Operator`](crate::ast::Operator).

use std::fmt;

/// A scalar literal value.
///
/// Equality is structural; in particular `Double(NaN) != Double(NaN)`, so a NaN constant
/// never agrees with anything when constants meet.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The empty object, `NULL`.
    Null,

    /// `TRUE` or `FALSE`.
    Logical(bool),

    /// 32-bit integer, written `1L`. `i32::MIN` is reserved for the missing value and
    /// never produced by folding.
    Integer(i32),

    /// 64-bit floating point, written `1` or `1.5`.
    Double(f64),

    /// Character string.
    Character(String),
}

/// The numeric view of a value, after promotion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Numeric {
    Int(i32),
    Dbl(f64),
}

impl Numeric {
    pub(crate) fn to_f64(self) -> f64 {
        match self {
            Numeric::Int(v) => f64::from(v),
            Numeric::Dbl(v) => v,
        }
    }
}

impl Value {
    /// Returns the value as a double, promoting logical and integer values.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.numeric().map(Numeric::to_f64)
    }

    /// Returns the truth value of a logical or numeric value.
    ///
    /// Non-zero numbers are `TRUE`; NaN has no truth value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Logical(b) => Some(*b),
            Value::Integer(v) => Some(*v != 0),
            Value::Double(v) if v.is_nan() => None,
            Value::Double(v) => Some(*v != 0.0),
            _ => None,
        }
    }

    /// Returns `true` if both values have the same type and the same representation.
    ///
    /// Unlike `==`, a NaN is identical to itself and `0.0` is not identical to `-0.0`.
    #[must_use]
    pub fn identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            _ => self == other,
        }
    }

    pub(crate) const fn numeric(&self) -> Option<Numeric> {
        match self {
            Value::Logical(b) => Some(Numeric::Int(*b as i32)),
            Value::Integer(v) => Some(Numeric::Int(*v)),
            Value::Double(v) => Some(Numeric::Dbl(*v)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Logical(true) => write!(f, "TRUE"),
            Value::Logical(false) => write!(f, "FALSE"),
            Value::Integer(v) => write!(f, "{v}L"),
            Value::Double(v) if v.is_nan() => write!(f, "NaN"),
            Value::Double(v) if v.is_infinite() => {
                write!(f, "{}Inf", if *v < 0.0 { "-" } else { "" })
            }
            Value::Double(v) => write!(f, "{v}"),
            Value::Character(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Logical(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Character(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Character(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::Double(7.0).to_string(), "7");
        assert_eq!(Value::Double(0.5).to_string(), "0.5");
        assert_eq!(Value::Double(f64::NEG_INFINITY).to_string(), "-Inf");
        assert_eq!(Value::Integer(4).to_string(), "4L");
        assert_eq!(Value::Logical(true).to_string(), "TRUE");
        assert_eq!(Value::from("a\"b").to_string(), "\"a\\\"b\"");
        assert_eq!(Value::Null.to_string(), "NULL");
    }

    #[test]
    fn test_promotion_views() {
        assert_eq!(Value::Logical(true).as_f64(), Some(1.0));
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Character("x".into()).as_f64(), None);
        assert_eq!(Value::Double(f64::NAN).as_bool(), None);
        assert_eq!(Value::Integer(0).as_bool(), Some(false));
        assert_eq!(Value::Null.as_bool(), None);
    }

    #[test]
    fn test_identical() {
        assert!(Value::Double(f64::NAN).identical(&Value::Double(f64::NAN)));
        assert!(!Value::Double(0.0).identical(&Value::Double(-0.0)));
        assert!(!Value::Integer(1).identical(&Value::Double(1.0)));
        assert!(Value::from("a").identical(&Value::from("a")));
    }
}
