//! Card values.
//!
//! Every card holds exactly one of three kinds of value. The evaluator
//! produces the same type, so values move between the evaluator's tables
//! and the card store without conversion.
//!
//! ## Value Kinds
//!
//! - `Number`: all numeric data, stored as `f64`
//! - `Bool`: `true` / `false`
//! - `Str`: text, written back to decks inside double quotes

use serde::{Deserialize, Serialize};

/// Largest integral magnitude printed without an exponent.
const INTEGRAL_LIMIT: f64 = 9_007_199_254_740_992.0; // 2^53

/// Tag of a [`Value`], used in type mismatch reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Number,
    Bool,
    Str,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueKind::Number => "number",
            ValueKind::Bool => "boolean",
            ValueKind::Str => "string",
        };
        f.write_str(name)
    }
}

/// A concrete card value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Numeric value (integers are stored as whole floats).
    Number(f64),
    /// Boolean flag.
    Bool(bool),
    /// Text value.
    Str(String),
}

impl Value {
    /// The tag of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Bool,
            Value::Str(_) => ValueKind::Str,
        }
    }

    /// Get as number if this is a Number value.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as bool if this is a Bool value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string slice if this is a Str value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    /// Render the value the way it appears in a deck, without quotes.
    ///
    /// Integral numbers print as integers. Other numbers print in scientific
    /// notation, either with `precision` fractional digits or, when `None`,
    /// with the shortest representation that parses back to the same `f64`.
    /// Infinities and NaN are written as `1/0`, `-1/0` and `0/0`.
    ///
    /// ```
    /// use rummy::core::Value;
    ///
    /// assert_eq!(Value::Number(10.0).to_deck_string(None), "10");
    /// assert_eq!(Value::Number(0.5).to_deck_string(None), "5e-1");
    /// assert_eq!(Value::Number(0.5).to_deck_string(Some(2)), "5.00e-1");
    /// assert_eq!(Value::Bool(true).to_deck_string(None), "true");
    /// ```
    #[must_use]
    pub fn to_deck_string(&self, precision: Option<usize>) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n, precision),
        }
    }
}

fn format_number(n: f64, precision: Option<usize>) -> String {
    // written as the divisions that produce them, so a rebuild reads them back
    if n.is_nan() {
        return "0/0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "1/0" } else { "-1/0" }.to_string();
    }
    if n.fract() == 0.0 && n.abs() < INTEGRAL_LIMIT {
        return format!("{}", n as i64);
    }
    match precision {
        Some(p) => format!("{:.*e}", p, n),
        None => format!("{:e}", n),
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_deck_string(None))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Number(f64::from(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(f64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Number(f64::from(v))
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Number(v as f64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Str(v.clone())
    }
}

/// Typed extraction from a [`Value`].
///
/// Numbers convert to any primitive numeric type with an `as` cast, the way
/// a deck value of `3` is readable as `f64`, `i32` or `usize`.
pub trait FromValue: Sized {
    /// The kind of value this type reads from.
    const KIND: ValueKind;

    /// Extract from a value of the matching kind.
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! numeric_from_value {
    ($($t:ty),*) => {
        $(
            impl FromValue for $t {
                const KIND: ValueKind = ValueKind::Number;

                fn from_value(value: &Value) -> Option<Self> {
                    value.as_number().map(|n| n as $t)
                }
            }
        )*
    };
}

numeric_from_value!(f64, f32, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for String {
    const KIND: ValueKind = ValueKind::Str;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(Value::Number(1.0).kind(), ValueKind::Number);
        assert_eq!(Value::Bool(false).kind(), ValueKind::Bool);
        assert_eq!(Value::from("x").kind(), ValueKind::Str);
        assert_eq!(format!("{}", ValueKind::Bool), "boolean");
    }

    #[test]
    fn test_accessors() {
        let val = Value::Number(5.0);
        assert_eq!(val.as_number(), Some(5.0));
        assert_eq!(val.as_bool(), None);
        assert_eq!(val.as_str(), None);

        let val = Value::from("face");
        assert_eq!(val.as_str(), Some("face"));
        assert!(val.is_string());
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(Value::Number(42.0).to_deck_string(None), "42");
        assert_eq!(Value::Number(-3.0).to_deck_string(None), "-3");
        assert_eq!(Value::Number(6e8).to_deck_string(None), "600000000");
        assert_eq!(Value::Number(3.14).to_deck_string(None), "3.14e0");
        assert_eq!(Value::Number(1e300).to_deck_string(None), "1e300");
        assert_eq!(Value::Number(f64::INFINITY).to_deck_string(Some(3)), "1/0");
        assert_eq!(Value::Number(f64::NEG_INFINITY).to_deck_string(None), "-1/0");
        assert_eq!(Value::Number(f64::NAN).to_deck_string(None), "0/0");
    }

    #[test]
    fn test_shortest_format_round_trips() {
        for n in [0.1, 2.718281828459045, 1.0 / 3.0, -7.25e-9] {
            let text = Value::Number(n).to_deck_string(None);
            assert_eq!(text.parse::<f64>().unwrap(), n);
        }
    }

    #[test]
    fn test_from_value() {
        let num = Value::Number(10.0);
        assert_eq!(i32::from_value(&num), Some(10));
        assert_eq!(f64::from_value(&num), Some(10.0));
        assert_eq!(bool::from_value(&num), None);
        assert_eq!(String::from_value(&Value::from("a")), Some("a".to_string()));
        assert_eq!(bool::from_value(&Value::Bool(true)), Some(true));
    }

    #[test]
    fn test_serialization() {
        let val = Value::from("hello");
        let json = serde_json::to_string(&val).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(val, back);
    }
}
