use std::fmt;

use super::ParamKind;

/// Largest magnitude up to which every integer is exactly representable as `f64`.
const MAX_EXACT_REAL: u64 = 1 << f64::MANTISSA_DIGITS;

/// Converts `value` to `f64` if no precision is lost.
#[allow(clippy::cast_precision_loss)]
pub(super) fn exact_real(value: i64) -> Option<f64> {
    (value.unsigned_abs() <= MAX_EXACT_REAL).then_some(value as f64)
}

/// A parameter value tagged with its kind.
///
/// Equality follows the write coercions: values of different kinds compare
/// equal when one would be stored as the other, so `Int(1)` equals
/// `LongInt(1)` and `Real(1.0)`, and `Char('v')` equals `String("v")`.
#[derive(Debug, Clone)]
pub enum ParamValue {
    Bool(bool),
    Int(i32),
    LongInt(i64),
    Real(f64),
    Char(char),
    String(String),
}

impl ParamValue {
    /// Returns the kind of this value.
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Bool(_) => ParamKind::Bool,
            ParamValue::Int(_) => ParamKind::Int,
            ParamValue::LongInt(_) => ParamKind::LongInt,
            ParamValue::Real(_) => ParamKind::Real,
            ParamValue::Char(_) => ParamKind::Char,
            ParamValue::String(_) => ParamKind::String,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_long_int(&self) -> Option<i64> {
        match self {
            ParamValue::LongInt(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_real(&self) -> Option<f64> {
        match self {
            ParamValue::Real(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_char(&self) -> Option<char> {
        match self {
            ParamValue::Char(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(v) => Some(v),
            _ => None,
        }
    }
}

impl ParamValue {
    fn integer(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(i64::from(*v)),
            ParamValue::LongInt(v) => Some(*v),
            _ => None,
        }
    }
}

impl PartialEq for ParamValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ParamValue::Bool(a), ParamValue::Bool(b)) => a == b,
            (ParamValue::Real(a), ParamValue::Real(b)) => a == b,
            (ParamValue::Char(a), ParamValue::Char(b)) => a == b,
            (ParamValue::String(a), ParamValue::String(b)) => a == b,
            (ParamValue::Char(c), ParamValue::String(s))
            | (ParamValue::String(s), ParamValue::Char(c)) => {
                let mut chars = s.chars();
                chars.next() == Some(*c) && chars.next().is_none()
            }
            (ParamValue::Real(r), n) | (n, ParamValue::Real(r)) => {
                n.integer().and_then(exact_real) == Some(*r)
            }
            (a, b) => a.integer().is_some_and(|a| b.integer() == Some(a)),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{}", if *v { "TRUE" } else { "FALSE" }),
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::LongInt(v) => write!(f, "{v}"),
            ParamValue::Real(v) => write!(f, "{v}"),
            ParamValue::Char(v) => write!(f, "{v}"),
            ParamValue::String(v) => write!(f, "\"{v}\""),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::LongInt(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Real(value)
    }
}

impl From<char> for ParamValue {
    fn from(value: char) -> Self {
        ParamValue::Char(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}
