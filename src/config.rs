//! Declarative field configuration.
//!
//! A [`FieldConfig`] describes a field in JSON and builds it with [`FieldConfig::build`].
//! Handlers, validators and methods are code, so they cannot be declared; attach them with
//! [`FieldConfig::build_with`].
//!
//! ```rust
//! use fuse_fields::config::FieldConfig;
//! use fuse_fields::types::Value;
//!
//! # fn main() -> Result<(), fuse_fields::FieldError> {
//! let field = FieldConfig::from_json_str(
//!     r#"{
//!         "type": "array",
//!         "name": "prices",
//!         "separators": [";"],
//!         "size": 5,
//!         "child": { "type": "float" }
//!     }"#,
//! )?
//! .build()?;
//!
//! assert_eq!(field.set("1,5;2")?, Value::from(vec![1.5, 2.0]));
//! # Ok(())
//! # }
//! ```

use serde::Deserialize;

use crate::error::FieldResult;
use crate::fields::{
    ArrayOptions, DateOptions, Field, FieldDefault, FieldOptions, FloatOptions, SizeLimit,
    EUROPEAN_DATE_FORMAT,
};
use crate::types::Value;

/// Options shared by every field type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommonConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub verbose_name: Option<String>,
    #[serde(default)]
    pub null: bool,
    /// Plain default value.
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    /// Return the raw input on fallback-eligible errors. Takes precedence over `default`.
    #[serde(default)]
    pub default_from_input: bool,
    #[serde(default)]
    pub skip_values: Vec<serde_json::Value>,
    #[serde(default = "default_true")]
    pub raise_exception: bool,
}

fn default_true() -> bool {
    true
}

fn default_date_format() -> Option<String> {
    Some(EUROPEAN_DATE_FORMAT.to_string())
}

impl From<CommonConfig> for FieldOptions {
    fn from(c: CommonConfig) -> Self {
        let default = if c.default_from_input {
            FieldDefault::FromInput
        } else {
            c.default
                .map_or(FieldDefault::None, |v| FieldDefault::Value(Value::from(v)))
        };
        FieldOptions {
            name: c.name,
            verbose_name: c.verbose_name,
            null: c.null,
            default,
            skip_values: c.skip_values.into_iter().map(Value::from).collect(),
            raise_exception: c.raise_exception,
            ..Default::default()
        }
    }
}

/// Declarative description of a field, tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldConfig {
    String {
        #[serde(flatten)]
        common: CommonConfig,
    },
    Integer {
        #[serde(flatten)]
        common: CommonConfig,
    },
    Float {
        #[serde(flatten)]
        common: CommonConfig,
        #[serde(default)]
        separators: Vec<String>,
    },
    Date {
        #[serde(flatten)]
        common: CommonConfig,
        #[serde(default)]
        as_string: bool,
        #[serde(default = "default_date_format")]
        out_date_format: Option<String>,
        #[serde(default)]
        date_attribute: Option<String>,
    },
    Array {
        #[serde(flatten)]
        common: CommonConfig,
        child: Box<FieldConfig>,
        #[serde(default)]
        separators: Vec<String>,
        /// Exclusive element limit; absent means unbounded.
        #[serde(default)]
        size: Option<usize>,
    },
}

impl FieldConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(input: &str) -> FieldResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Parse a configuration from an already-decoded JSON value.
    pub fn from_json_value(value: serde_json::Value) -> FieldResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Build the described field.
    pub fn build(self) -> FieldResult<Field> {
        self.build_with(|options| options)
    }

    /// Build the described field, letting `extend` adjust the top-level options (for
    /// example to add handlers or validators).
    pub fn build_with<F>(self, extend: F) -> FieldResult<Field>
    where
        F: FnOnce(FieldOptions) -> FieldOptions,
    {
        match self {
            FieldConfig::String { common } => Field::string(extend(common.into())),
            FieldConfig::Integer { common } => Field::integer(extend(common.into())),
            FieldConfig::Float { common, separators } => {
                Field::float(extend(common.into()), FloatOptions { separators })
            }
            FieldConfig::Date {
                common,
                as_string,
                out_date_format,
                date_attribute,
            } => Field::date(
                extend(common.into()),
                DateOptions {
                    as_string,
                    out_date_format,
                    date_attribute,
                },
            ),
            FieldConfig::Array {
                common,
                child,
                separators,
                size,
            } => {
                let child = child.build()?;
                let size = size.map_or(SizeLimit::Unbounded, SizeLimit::Bounded);
                Field::array(
                    extend(common.into()),
                    child,
                    ArrayOptions { separators, size },
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorClass, FieldError};
    use crate::fields::{DateAttribute, FieldKind};

    #[test]
    fn parses_common_options() {
        let cfg = FieldConfig::from_json_str(
            r#"{"type": "integer", "name": "qty", "verbose_name": "Quantity",
                "null": true, "skip_values": ["-", 0], "raise_exception": false}"#,
        )
        .unwrap();
        let field = cfg.build().unwrap();
        assert_eq!(field.name(), Some("qty"));
        assert_eq!(field.verbose_name(), Some("Quantity"));
        assert!(field.null());
        assert_eq!(
            field.options().skip_values,
            vec![Value::from("-"), Value::Int64(0)]
        );
        assert!(!field.options().raise_exception);
    }

    #[test]
    fn raise_exception_defaults_to_true() {
        let field = FieldConfig::from_json_str(r#"{"type": "string"}"#)
            .unwrap()
            .build()
            .unwrap();
        assert!(field.options().raise_exception);
        assert_eq!(field.default(), &FieldDefault::None);
    }

    #[test]
    fn default_from_input_wins_over_value() {
        let field = FieldConfig::from_json_str(
            r#"{"type": "integer", "default": 5, "default_from_input": true}"#,
        )
        .unwrap()
        .build()
        .unwrap();
        assert_eq!(field.default(), &FieldDefault::FromInput);
        assert_eq!(field.set("n/a").unwrap(), Value::from("n/a"));
    }

    #[test]
    fn plain_default_is_exposed() {
        let field = FieldConfig::from_json_str(r#"{"type": "integer", "default": 5}"#)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(field.default(), &FieldDefault::Value(Value::Int64(5)));
    }

    #[test]
    fn builds_date_field_with_attribute() {
        let field = FieldConfig::from_json_value(serde_json::json!({
            "type": "date",
            "date_attribute": "date",
        }))
        .unwrap()
        .build()
        .unwrap();
        match field.kind() {
            FieldKind::Date(date) => assert_eq!(date.date_attribute(), Some(DateAttribute::Date)),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn unknown_date_attribute_fails_to_build() {
        let err = FieldConfig::from_json_str(r#"{"type": "date", "date_attribute": "epoch"}"#)
            .unwrap()
            .build()
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Configuration);
    }

    #[test]
    fn builds_nested_arrays() {
        let field = FieldConfig::from_json_str(
            r#"{"type": "array", "separators": [";"],
                "child": {"type": "array", "separators": [","], "child": {"type": "integer"}}}"#,
        )
        .unwrap()
        .build()
        .unwrap();
        assert_eq!(
            field.set("1,2;3").unwrap(),
            Value::from(vec![Value::from(vec![1, 2]), Value::from(vec![3])])
        );
    }

    #[test]
    fn build_with_attaches_validators() {
        let field = FieldConfig::from_json_str(r#"{"type": "integer", "name": "age"}"#)
            .unwrap()
            .build_with(|o| o.with_validator(|v: &Value| v.as_i64().is_some_and(|n| n >= 0)))
            .unwrap();
        assert_eq!(field.set("30").unwrap(), Value::Int64(30));
        assert!(matches!(
            field.set("-1"),
            Err(FieldError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = FieldConfig::from_json_str(r#"{"type": "bogus"}"#).unwrap_err();
        assert!(matches!(err, FieldError::Config(_)));
    }
}
