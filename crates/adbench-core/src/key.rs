use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

// 2^127: every finite float below this magnitude truncates into an `i128`.
const I128_FLOAT_LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

/// Exact numeric condition value.
///
/// Integers (including integral floats such as `1.0`) are held as integers,
/// so values beyond 2^53 never collapse into their nearest `f64`. Only
/// non-integral or out-of-range floats stay floating point.
#[derive(Debug, Clone, Copy)]
pub struct ConditionNumber(Repr);

#[derive(Debug, Clone, Copy)]
enum Repr {
    Int(i128),
    Float(f64),
}

impl ConditionNumber {
    /// Converts a decoded JSON number without losing integer precision.
    pub fn from_json(number: &serde_json::Number) -> Option<Self> {
        if let Some(int) = number.as_i64() {
            Some(Self::from(int))
        } else if let Some(int) = number.as_u64() {
            Some(Self::from(int))
        } else {
            number.as_f64().map(Self::from)
        }
    }

    /// Returns the nearest `f64`.
    pub fn as_f64(&self) -> f64 {
        match self.0 {
            Repr::Int(int) => int as f64,
            Repr::Float(float) => float,
        }
    }

    /// Returns the value as a JSON number, `null` for NaN and infinities.
    pub fn to_json(&self) -> Value {
        match self.0 {
            Repr::Int(int) => {
                if let Ok(small) = i64::try_from(int) {
                    Value::from(small)
                } else if let Ok(large) = u64::try_from(int) {
                    Value::from(large)
                } else {
                    float_json(int as f64)
                }
            }
            Repr::Float(float) => float_json(float),
        }
    }
}

fn float_json(float: f64) -> Value {
    serde_json::Number::from_f64(float)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

impl From<i64> for ConditionNumber {
    fn from(int: i64) -> Self {
        Self(Repr::Int(i128::from(int)))
    }
}

impl From<u64> for ConditionNumber {
    fn from(int: u64) -> Self {
        Self(Repr::Int(i128::from(int)))
    }
}

impl From<f64> for ConditionNumber {
    fn from(float: f64) -> Self {
        if float.is_finite() && float.fract() == 0.0 && float.abs() < I128_FLOAT_LIMIT {
            // Also folds -0.0 into 0.
            Self(Repr::Int(float as i128))
        } else if float.is_nan() {
            Self(Repr::Float(f64::NAN))
        } else {
            Self(Repr::Float(float))
        }
    }
}

// Exact comparison of an integer with a float that is never integral in
// `i128` range (see `From<f64>`), so the result is never `Equal`.
fn cmp_int_float(int: i128, float: f64) -> Ordering {
    if float.is_nan() || float >= I128_FLOAT_LIMIT {
        return Ordering::Less;
    }
    if float <= -I128_FLOAT_LIMIT {
        return Ordering::Greater;
    }
    let whole = float.trunc();
    match int.cmp(&(whole as i128)) {
        Ordering::Equal if float > whole => Ordering::Less,
        Ordering::Equal => Ordering::Greater,
        unequal => unequal,
    }
}

impl Ord for ConditionNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0, other.0) {
            (Repr::Int(a), Repr::Int(b)) => a.cmp(&b),
            (Repr::Float(a), Repr::Float(b)) => a.total_cmp(&b),
            (Repr::Int(a), Repr::Float(b)) => cmp_int_float(a, b),
            (Repr::Float(a), Repr::Int(b)) => cmp_int_float(b, a).reverse(),
        }
    }
}

impl PartialOrd for ConditionNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ConditionNumber {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ConditionNumber {}

impl Hash for ConditionNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.0 {
            Repr::Int(int) => {
                0u8.hash(state);
                int.hash(state);
            }
            Repr::Float(float) => {
                1u8.hash(state);
                float.to_bits().hash(state);
            }
        }
    }
}

impl Display for ConditionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Repr::Int(int) => write!(f, "{int}"),
            Repr::Float(float) => write!(f, "{float}"),
        }
    }
}

/// Scalar value of a single condition field.
///
/// Values keep their decoded JSON type: numbers compare numerically, strings
/// compare as strings, and a number never equals a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConditionValue {
    /// JSON boolean.
    Bool(bool),
    /// JSON number.
    Number(ConditionNumber),
    /// JSON string.
    Text(String),
}

impl ConditionValue {
    /// Converts a decoded JSON scalar. Returns `None` for null, arrays and objects.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(flag) => Some(ConditionValue::Bool(*flag)),
            Value::Number(number) => ConditionNumber::from_json(number).map(ConditionValue::Number),
            Value::String(text) => Some(ConditionValue::Text(text.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Returns the value as a JSON scalar.
    pub fn to_json(&self) -> Value {
        match self {
            ConditionValue::Bool(flag) => Value::Bool(*flag),
            ConditionValue::Number(number) => number.to_json(),
            ConditionValue::Text(text) => Value::String(text.clone()),
        }
    }

    /// Returns the contained string, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConditionValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the contained number as the nearest `f64`, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConditionValue::Number(number) => Some(number.as_f64()),
            _ => None,
        }
    }
}

impl Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Bool(flag) => write!(f, "{flag}"),
            ConditionValue::Number(number) => write!(f, "{number}"),
            ConditionValue::Text(text) => write!(f, "{text}"),
        }
    }
}

impl Serialize for ConditionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ConditionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ConditionValue::from_json(&value).ok_or_else(|| {
            serde::de::Error::custom(format!("condition values must be scalars, got {value}"))
        })
    }
}

/// Ordered tuple of condition values identifying one experimental configuration.
///
/// Keys order lexicographically by their values, which is the order every
/// grouped report is emitted in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionKey(Vec<ConditionValue>);

impl ConditionKey {
    /// Wraps values that are already in schema field order.
    pub fn new(values: Vec<ConditionValue>) -> Self {
        Self(values)
    }

    /// Returns the values in field order.
    pub fn values(&self) -> &[ConditionValue] {
        &self.0
    }

    /// Returns the number of fields in the key.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the key carries no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for ConditionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (idx, value) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integral_numbers_render_without_fraction() {
        let value = ConditionValue::from_json(&json!(50)).unwrap();
        assert_eq!(value.to_string(), "50");
        assert_eq!(value.to_json(), json!(50));
    }

    #[test]
    fn negative_zero_matches_zero() {
        assert_eq!(ConditionNumber::from(-0.0), ConditionNumber::from(0i64));
    }

    #[test]
    fn integers_past_f64_precision_stay_distinct() {
        let above = ConditionValue::from_json(&json!(9_007_199_254_740_993u64)).unwrap();
        let at = ConditionValue::from_json(&json!(9_007_199_254_740_992u64)).unwrap();
        assert_ne!(above, at);
        assert!(at < above);
        assert_eq!(above.to_string(), "9007199254740993");
        assert_eq!(above.to_json(), json!(9_007_199_254_740_993u64));
    }

    #[test]
    fn floats_order_between_neighbouring_integers() {
        let half = ConditionNumber::from(1.5);
        assert!(ConditionNumber::from(1i64) < half);
        assert!(half < ConditionNumber::from(2u64));
        assert!(ConditionNumber::from(-2i64) < ConditionNumber::from(-1.5));
        assert!(ConditionNumber::from(f64::INFINITY) > ConditionNumber::from(u64::MAX));
    }

    #[test]
    fn non_scalars_are_rejected() {
        assert!(ConditionValue::from_json(&json!(null)).is_none());
        assert!(ConditionValue::from_json(&json!([1])).is_none());
        assert!(ConditionValue::from_json(&json!({"a": 1})).is_none());
    }
}
