//! Built-in operators and their constant folding.
//!
//! Operators are ordinary calls in the AST: `x + 1` is a call whose callee symbol is
//! named `+`. [`Operator::from_callee`] recognizes the fixed set of callees the constant
//! propagation pass knows how to evaluate; every other call is opaque.
//!
//! Folding follows the language's promotion rules:
//!
//! | Operands | `+ - * %/% %%` | `/ ^` | comparisons |
//! |----------|----------------|-------|-------------|
//! | integer/logical only | integer | double | logical |
//! | any double | double | double | logical |
//!
//! An integer result outside the representable range is the missing value at runtime,
//! which is not a constant; such folds return `None` and log a warning, mirroring the
//! interpreter's "NAs produced by integer overflow" warning.

use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::ast::value::{Numeric, Value};

/// An operator the constant folder can evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr, EnumIter)]
pub enum Operator {
    /// Binary addition or unary plus.
    #[strum(serialize = "+")]
    Plus,
    /// Binary subtraction or unary negation.
    #[strum(serialize = "-")]
    Minus,
    /// Multiplication.
    #[strum(serialize = "*")]
    Multiply,
    /// Division, always producing a double.
    #[strum(serialize = "/")]
    Divide,
    /// Exponentiation, always producing a double.
    #[strum(to_string = "^", serialize = "**")]
    Power,
    /// Floor division.
    #[strum(serialize = "%/%")]
    IntegerDivide,
    /// Modulus with the sign of the divisor.
    #[strum(serialize = "%%")]
    Modulo,
    /// Equality.
    #[strum(serialize = "==")]
    Equal,
    /// Inequality.
    #[strum(serialize = "!=")]
    NotEqual,
    /// Less than.
    #[strum(serialize = "<")]
    Less,
    /// Less than or equal.
    #[strum(serialize = "<=")]
    LessEqual,
    /// Greater than.
    #[strum(serialize = ">")]
    Greater,
    /// Greater than or equal.
    #[strum(serialize = ">=")]
    GreaterEqual,
    /// Logical negation.
    #[strum(serialize = "!")]
    Not,
    /// Element-wise and.
    #[strum(serialize = "&")]
    And,
    /// Element-wise or.
    #[strum(serialize = "|")]
    Or,
    /// Short-circuit and.
    #[strum(serialize = "&&")]
    ScalarAnd,
    /// Short-circuit or.
    #[strum(serialize = "||")]
    ScalarOr,
    /// Parenthesized expression, the identity.
    #[strum(serialize = "(")]
    Paren,
}

impl Operator {
    /// Returns the operator called by a callee named `name`, if it is foldable.
    #[must_use]
    pub fn from_callee(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    /// Returns `true` if the operator can be applied to `count` operands.
    #[must_use]
    pub const fn accepts_arity(self, count: usize) -> bool {
        match self {
            Operator::Plus | Operator::Minus => count == 1 || count == 2,
            Operator::Not | Operator::Paren => count == 1,
            _ => count == 2,
        }
    }

    /// Returns `true` for the arithmetic operators.
    #[must_use]
    pub const fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Operator::Plus
                | Operator::Minus
                | Operator::Multiply
                | Operator::Divide
                | Operator::Power
                | Operator::IntegerDivide
                | Operator::Modulo
        )
    }

    /// Returns `true` for the comparison operators.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Operator::Equal
                | Operator::NotEqual
                | Operator::Less
                | Operator::LessEqual
                | Operator::Greater
                | Operator::GreaterEqual
        )
    }

    /// Returns `true` for the binary logical operators.
    #[must_use]
    pub const fn is_logical(self) -> bool {
        matches!(
            self,
            Operator::And | Operator::Or | Operator::ScalarAnd | Operator::ScalarOr
        )
    }

    /// Evaluates the operator over constant operands.
    ///
    /// Returns `None` when the result is not a foldable constant: wrong arity, operand
    /// types the operator does not accept, integer overflow, integer division by zero,
    /// or comparisons involving NaN.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ssalyze::ast::{Operator, Value};
    ///
    /// let sum = Operator::Plus.fold(&[Value::Integer(2), Value::Integer(3)]);
    /// assert_eq!(sum, Some(Value::Integer(5)));
    ///
    /// let quotient = Operator::Divide.fold(&[Value::Integer(7), Value::Integer(2)]);
    /// assert_eq!(quotient, Some(Value::Double(3.5)));
    /// ```
    #[must_use]
    pub fn fold(self, operands: &[Value]) -> Option<Value> {
        match operands {
            [value] => self.fold_unary(value),
            [lhs, rhs] if self.is_arithmetic() => self.fold_arithmetic(lhs, rhs),
            [lhs, rhs] if self.is_comparison() => self.fold_comparison(lhs, rhs),
            [lhs, rhs] if self.is_logical() => self.fold_logical(lhs, rhs),
            _ => None,
        }
    }

    fn fold_unary(self, value: &Value) -> Option<Value> {
        match self {
            Operator::Paren => Some(value.clone()),
            Operator::Plus => match value.numeric()? {
                Numeric::Int(v) => Some(Value::Integer(v)),
                Numeric::Dbl(v) => Some(Value::Double(v)),
            },
            Operator::Minus => match value.numeric()? {
                Numeric::Int(v) => v.checked_neg().map(Value::Integer),
                Numeric::Dbl(v) => Some(Value::Double(-v)),
            },
            Operator::Not => value.as_bool().map(|b| Value::Logical(!b)),
            _ => None,
        }
    }

    fn fold_arithmetic(self, lhs: &Value, rhs: &Value) -> Option<Value> {
        let (a, b) = (lhs.numeric()?, rhs.numeric()?);

        match (self, a, b) {
            (Operator::Divide, _, _) => Some(Value::Double(a.to_f64() / b.to_f64())),
            (Operator::Power, _, _) => Some(Value::Double(a.to_f64().powf(b.to_f64()))),
            (_, Numeric::Int(x), Numeric::Int(y)) => self.fold_integer(x, y),
            _ => self.fold_double(a.to_f64(), b.to_f64()).map(Value::Double),
        }
    }

    fn fold_integer(self, x: i32, y: i32) -> Option<Value> {
        let result = match self {
            Operator::Plus => x.checked_add(y),
            Operator::Minus => x.checked_sub(y),
            Operator::Multiply => x.checked_mul(y),
            Operator::IntegerDivide => floor_div(x, y),
            Operator::Modulo => floor_mod(x, y),
            _ => return None,
        };

        match result {
            Some(value) if value != i32::MIN => Some(Value::Integer(value)),
            _ => {
                log::warn!("integer result of {}L {} {}L is NA, not folding", x, self, y);
                None
            }
        }
    }

    fn fold_double(self, a: f64, b: f64) -> Option<f64> {
        match self {
            Operator::Plus => Some(a + b),
            Operator::Minus => Some(a - b),
            Operator::Multiply => Some(a * b),
            Operator::IntegerDivide => Some((a / b).floor()),
            Operator::Modulo => Some(a - (a / b).floor() * b),
            _ => None,
        }
    }

    fn fold_comparison(self, lhs: &Value, rhs: &Value) -> Option<Value> {
        use std::cmp::Ordering;

        let ordering = match (lhs, rhs) {
            (Value::Character(a), Value::Character(b)) => a.cmp(b),
            _ => lhs.as_f64()?.partial_cmp(&rhs.as_f64()?)?,
        };

        let result = match self {
            Operator::Equal => ordering == Ordering::Equal,
            Operator::NotEqual => ordering != Ordering::Equal,
            Operator::Less => ordering == Ordering::Less,
            Operator::LessEqual => ordering != Ordering::Greater,
            Operator::Greater => ordering == Ordering::Greater,
            Operator::GreaterEqual => ordering != Ordering::Less,
            _ => return None,
        };
        Some(Value::Logical(result))
    }

    fn fold_logical(self, lhs: &Value, rhs: &Value) -> Option<Value> {
        let (a, b) = (lhs.as_bool()?, rhs.as_bool()?);
        match self {
            Operator::And | Operator::ScalarAnd => Some(Value::Logical(a && b)),
            Operator::Or | Operator::ScalarOr => Some(Value::Logical(a || b)),
            _ => None,
        }
    }
}

fn floor_div(x: i32, y: i32) -> Option<i32> {
    let quotient = x.checked_div(y)?;
    if x % y != 0 && ((x < 0) != (y < 0)) {
        quotient.checked_sub(1)
    } else {
        Some(quotient)
    }
}

fn floor_mod(x: i32, y: i32) -> Option<i32> {
    let remainder = x.checked_rem(y)?;
    if remainder != 0 && ((remainder < 0) != (y < 0)) {
        remainder.checked_add(y)
    } else {
        Some(remainder)
    }
}
