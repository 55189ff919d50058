use std::error::Error as StdError;

use thiserror::Error;

use crate::types::DataType;

/// Convenience result type for field operations.
pub type FieldResult<T> = Result<T, FieldError>;

/// Error type returned by field construction and coercion.
///
/// This is a single error enum shared by every field variant. Use [`FieldError::class`] to
/// group errors the way the pipeline does when deciding between fallback and propagation.
#[derive(Debug, Error)]
pub enum FieldError {
    /// The raw value matched one of the field's skip values.
    #[error("value '{value}' is in the skip list")]
    Skipped { value: String },

    /// A value could not be parsed into the required [`DataType`].
    #[error("failed to parse '{raw}' as {target}: {message}")]
    Parse {
        target: DataType,
        raw: String,
        message: String,
    },

    /// A value parsed, but does not fit the target representation.
    #[error("numeric overflow: {message}")]
    Overflow { message: String },

    /// A lookup by key failed (raised by handlers or methods).
    #[error("key not found: {key}")]
    MissingKey { key: String },

    /// A positional lookup failed (raised by handlers or methods).
    #[error("index out of range: {message}")]
    Index { message: String },

    /// An array field produced too many elements.
    #[error("array size ({limit}) exceeded: got {len} elements")]
    ArraySizeLimit { limit: usize, len: usize },

    /// A date attribute cannot be provided by the value at hand.
    #[error("value doesn't have `{attribute}` attribute")]
    MissingAttribute { attribute: String },

    /// A validator rejected the coerced value.
    #[error("validation failed for field '{field}'")]
    ValidationFailed { field: String },

    /// The field was configured inconsistently.
    #[error("invalid field configuration: {message}")]
    Configuration { message: String },

    /// The field cannot coerce values of this kind.
    #[error("{field} cannot coerce a {actual} value")]
    UnsupportedInput {
        field: &'static str,
        actual: DataType,
    },

    /// Declarative configuration could not be deserialized, or a value could not be
    /// serialized to JSON.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Arbitrary failure raised by a handler or custom method.
    #[error("handler error: {0}")]
    Handler(#[source] Box<dyn StdError + Send + Sync>),
}

/// Coarse grouping of [`FieldError`]s used by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The value was intentionally excluded.
    Skip,
    /// Bad literal, overflow, missing key or index.
    Coercion,
    /// Array size limit or missing date attribute.
    Structural,
    /// A validator returned false.
    Validation,
    /// Inconsistent field configuration.
    Configuration,
    /// Anything else; never intercepted.
    Other,
}

impl FieldError {
    /// Build a [`FieldError::Parse`].
    pub fn parse(target: DataType, raw: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            target,
            raw: raw.into(),
            message: message.into(),
        }
    }

    /// Build a [`FieldError::Overflow`].
    pub fn overflow(message: impl Into<String>) -> Self {
        Self::Overflow {
            message: message.into(),
        }
    }

    /// Build a [`FieldError::Configuration`].
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Wrap any error raised by a handler or method.
    pub fn handler<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::Handler(err.into())
    }

    /// Classify this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            FieldError::Skipped { .. } => ErrorClass::Skip,
            FieldError::Parse { .. }
            | FieldError::Overflow { .. }
            | FieldError::MissingKey { .. }
            | FieldError::Index { .. } => ErrorClass::Coercion,
            FieldError::ArraySizeLimit { .. } | FieldError::MissingAttribute { .. } => {
                ErrorClass::Structural
            }
            FieldError::ValidationFailed { .. } => ErrorClass::Validation,
            FieldError::Configuration { .. } | FieldError::Config(_) => ErrorClass::Configuration,
            FieldError::UnsupportedInput { .. } | FieldError::Handler(_) => ErrorClass::Other,
        }
    }

    /// Whether a `FromInput` default may replace this error with the raw input.
    pub fn is_fallback_eligible(&self) -> bool {
        matches!(self.class(), ErrorClass::Skip | ErrorClass::Coercion)
    }
}
