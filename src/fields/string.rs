//! Text fields.

use crate::error::FieldResult;
use crate::types::Value;

use super::Coerce;

/// Renders any value as text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringField;

impl Coerce for StringField {
    fn type_name(&self) -> &'static str {
        "StringField"
    }

    fn coerce(&self, value: &Value) -> FieldResult<Value> {
        match value {
            Value::Utf8(s) => Ok(Value::Utf8(s.clone())),
            other => Ok(Value::Utf8(other.to_string())),
        }
    }
}
