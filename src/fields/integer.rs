//! Integer fields.

use std::num::IntErrorKind;

use crate::error::{FieldError, FieldResult};
use crate::types::{DataType, Value};

use super::Coerce;

/// Parses base-10 integers.
///
/// Text may carry surrounding whitespace and a leading sign; decimal points and exponents are
/// rejected. Floats truncate toward zero and booleans map to `0`/`1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerField;

impl Coerce for IntegerField {
    fn type_name(&self) -> &'static str {
        "IntegerField"
    }

    fn coerce(&self, value: &Value) -> FieldResult<Value> {
        match value {
            Value::Int64(v) => Ok(Value::Int64(*v)),
            Value::Bool(b) => Ok(Value::Int64(i64::from(*b))),
            Value::Float64(v) => truncate(*v).map(Value::Int64),
            Value::Utf8(s) => parse_int(s).map(Value::Int64),
            other => Err(FieldError::UnsupportedInput {
                field: self.type_name(),
                actual: other.data_type(),
            }),
        }
    }
}

fn parse_int(raw: &str) -> FieldResult<i64> {
    raw.trim().parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            FieldError::overflow(format!("'{raw}' does not fit in int64"))
        }
        _ => FieldError::parse(DataType::Int64, raw, e.to_string()),
    })
}

fn truncate(v: f64) -> FieldResult<i64> {
    if v.is_nan() {
        return Err(FieldError::parse(
            DataType::Int64,
            v.to_string(),
            "cannot convert NaN to integer",
        ));
    }
    let t = v.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if t < i64::MIN as f64 || t >= i64::MAX as f64 {
        return Err(FieldError::overflow(format!("{v} does not fit in int64")));
    }
    Ok(t as i64)
}
