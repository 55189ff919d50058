//! Fields and the coercion pipeline.
//!
//! A [`Field`] couples shared [`FieldOptions`] with a type-specific [`FieldKind`]. Calling
//! [`Field::set`] runs the pipeline:
//!
//! 1. skip check against [`FieldOptions::skip_values`]
//! 2. [`Handler`]s, in order
//! 3. the custom method, if any
//! 4. type-specific coercion ([`Field::handle`])
//! 5. [`Validator`]s ([`Field::validate`])
//!
//! When [`FieldOptions::raise_exception`] is `false`, a failure in step 4 is swallowed and the
//! value from step 3 is kept. When the default is [`FieldDefault::FromInput`], fallback-eligible
//! errors (see [`FieldError::is_fallback_eligible`]) return the raw input instead.
//!
//! ## Example
//!
//! ```rust
//! use fuse_fields::fields::{ArrayOptions, Field, FieldOptions, SizeLimit};
//! use fuse_fields::types::Value;
//!
//! let ids = Field::array(
//!     FieldOptions::named("ids"),
//!     Field::integer(FieldOptions::default()).unwrap(),
//!     ArrayOptions {
//!         size: SizeLimit::Bounded(10),
//!         ..Default::default()
//!     },
//! )
//! .unwrap();
//!
//! let out = ids.set("1,2,3").unwrap();
//! assert_eq!(out, Value::from(vec![1, 2, 3]));
//! ```

pub mod array;
pub mod date;
pub mod float;
pub mod integer;
pub mod string;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{FieldError, FieldResult};
use crate::types::Value;

pub use array::{ArrayField, ArrayOptions, SizeLimit, DEFAULT_ARRAY_SEPARATORS};
pub use date::{DateAttribute, DateField, DateInput, DateOptions, EUROPEAN_DATE_FORMAT};
pub use float::{FloatField, FloatOptions, DEFAULT_FLOAT_SEPARATORS};
pub use integer::IntegerField;
pub use string::StringField;

/// Pre-coercion transform. Handlers know nothing about the target type.
pub trait Handler: Send + Sync {
    /// Transform `value`, or fail.
    fn handle(&self, value: Value) -> FieldResult<Value>;
}

impl<F> Handler for F
where
    F: Fn(Value) -> FieldResult<Value> + Send + Sync,
{
    fn handle(&self, value: Value) -> FieldResult<Value> {
        self(value)
    }
}

/// Post-coercion acceptance predicate.
pub trait Validator: Send + Sync {
    /// Returns `true` if `value` is acceptable.
    fn validate(&self, value: &Value) -> bool;
}

impl<F> Validator for F
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn validate(&self, value: &Value) -> bool {
        self(value)
    }
}

/// Single-argument custom conversion applied after handlers.
pub type Method = Arc<dyn Fn(Value) -> FieldResult<Value> + Send + Sync>;

/// Type-specific coercion step.
///
/// Implement this to add a field type beyond the built-in ones and wrap it with
/// [`Field::custom`].
pub trait Coerce: fmt::Debug + Send + Sync {
    /// Short type name used in diagnostics (e.g. `"IntegerField"`).
    fn type_name(&self) -> &'static str;

    /// Convert `value` into the target type.
    fn coerce(&self, value: &Value) -> FieldResult<Value>;
}

/// What a field does with its default.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldDefault {
    /// No default.
    #[default]
    None,
    /// On fallback-eligible errors, return the raw input unchanged.
    FromInput,
    /// A plain default, exposed for consumers via [`Field::default`].
    Value(Value),
}

impl FieldDefault {
    /// Returns `true` for [`FieldDefault::FromInput`].
    pub fn is_from_input(&self) -> bool {
        matches!(self, FieldDefault::FromInput)
    }
}

/// Configuration shared by every field type.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct FieldOptions {
    /// Field code name.
    pub name: Option<String>,
    /// Human-readable name, e.g. a column header.
    pub verbose_name: Option<String>,
    /// Whether consumers may treat a missing value as acceptable.
    pub null: bool,
    /// Default behavior.
    pub default: FieldDefault,
    /// Raw values rejected with [`FieldError::Skipped`] before anything else runs.
    pub skip_values: Vec<Value>,
    /// Custom conversion; cannot be combined with `handlers`.
    pub method: Option<Method>,
    /// Pre-coercion transforms, applied in order.
    pub handlers: Vec<Arc<dyn Handler>>,
    /// Post-coercion predicates; all must accept.
    pub validators: Vec<Arc<dyn Validator>>,
    /// Propagate coercion failures (`true`) or keep the pre-coercion value (`false`).
    pub raise_exception: bool,
}

impl FieldOptions {
    /// Default options with a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Set the verbose name.
    pub fn with_verbose_name(mut self, verbose_name: impl Into<String>) -> Self {
        self.verbose_name = Some(verbose_name.into());
        self
    }

    /// Set the default.
    pub fn with_default(mut self, default: FieldDefault) -> Self {
        self.default = default;
        self
    }

    /// Add a skip value.
    pub fn with_skip_value(mut self, value: impl Into<Value>) -> Self {
        self.skip_values.push(value.into());
        self
    }

    /// Set the custom method.
    pub fn with_method<F>(mut self, method: F) -> Self
    where
        F: Fn(Value) -> FieldResult<Value> + Send + Sync + 'static,
    {
        self.method = Some(Arc::new(method));
        self
    }

    /// Append a handler.
    pub fn with_handler(mut self, handler: impl Handler + 'static) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Append a validator.
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Set [`FieldOptions::raise_exception`].
    pub fn raise_exception(mut self, raise: bool) -> Self {
        self.raise_exception = raise;
        self
    }
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            name: None,
            verbose_name: None,
            null: false,
            default: FieldDefault::None,
            skip_values: Vec::new(),
            method: None,
            handlers: Vec::new(),
            validators: Vec::new(),
            raise_exception: true,
        }
    }
}

impl fmt::Debug for FieldOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldOptions")
            .field("name", &self.name)
            .field("verbose_name", &self.verbose_name)
            .field("null", &self.null)
            .field("default", &self.default)
            .field("skip_values", &self.skip_values)
            .field("method_set", &self.method.is_some())
            .field("handlers_len", &self.handlers.len())
            .field("validators_len", &self.validators.len())
            .field("raise_exception", &self.raise_exception)
            .finish()
    }
}

/// The type-specific part of a field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Renders any value as text.
    String(StringField),
    /// Base-10 integers.
    Integer(IntegerField),
    /// Floats with alternative decimal marks and fractions.
    Float(FloatField),
    /// Fuzzy dates, timestamps and date attributes.
    Date(DateField),
    /// Separated lists coerced element-wise by a child field.
    Array(ArrayField),
    /// User-supplied coercion.
    Custom(Arc<dyn Coerce>),
}

impl FieldKind {
    fn as_coerce(&self) -> &dyn Coerce {
        match self {
            FieldKind::String(f) => f,
            FieldKind::Integer(f) => f,
            FieldKind::Float(f) => f,
            FieldKind::Date(f) => f,
            FieldKind::Array(f) => f,
            FieldKind::Custom(f) => f.as_ref(),
        }
    }

    /// Short type name (e.g. `"FloatField"`).
    pub fn type_name(&self) -> &'static str {
        self.as_coerce().type_name()
    }
}

/// A configured converter from a raw value to a typed, validated value.
///
/// Fields hold no per-call state and can be shared across threads.
#[derive(Debug, Clone)]
pub struct Field {
    options: FieldOptions,
    kind: FieldKind,
}

impl Field {
    /// Create a field from options and a kind.
    ///
    /// Fails with [`FieldError::Configuration`] if both a method and handlers are set.
    pub fn new(options: FieldOptions, kind: FieldKind) -> FieldResult<Self> {
        if options.method.is_some() && !options.handlers.is_empty() {
            return Err(FieldError::configuration(
                "using `method` and `handlers` together is not allowed",
            ));
        }
        Ok(Self { options, kind })
    }

    /// A string field.
    pub fn string(options: FieldOptions) -> FieldResult<Self> {
        Self::new(options, FieldKind::String(StringField))
    }

    /// An integer field.
    pub fn integer(options: FieldOptions) -> FieldResult<Self> {
        Self::new(options, FieldKind::Integer(IntegerField))
    }

    /// A float field.
    pub fn float(options: FieldOptions, float: FloatOptions) -> FieldResult<Self> {
        Self::new(options, FieldKind::Float(FloatField::new(float)))
    }

    /// A date field. Unknown attribute names are rejected here.
    pub fn date(options: FieldOptions, date: DateOptions) -> FieldResult<Self> {
        Self::new(options, FieldKind::Date(DateField::new(date)?))
    }

    /// An array field whose elements are coerced by `child`.
    pub fn array(options: FieldOptions, child: Field, array: ArrayOptions) -> FieldResult<Self> {
        Self::new(options, FieldKind::Array(ArrayField::new(child, array)))
    }

    /// A field with a user-provided coercion step.
    pub fn custom(options: FieldOptions, coerce: impl Coerce + 'static) -> FieldResult<Self> {
        Self::new(options, FieldKind::Custom(Arc::new(coerce)))
    }

    /// Run the full pipeline over a raw value.
    pub fn set(&self, value: impl Into<Value>) -> FieldResult<Value> {
        let raw = value.into();
        match self.run(&raw) {
            Ok(value) => Ok(value),
            Err(err) if err.is_fallback_eligible() && self.options.default.is_from_input() => {
                debug!(
                    field = %self.label(),
                    kind = self.kind.type_name(),
                    error = %err,
                    "returning raw input"
                );
                Ok(raw)
            }
            Err(err) => Err(err),
        }
    }

    fn run(&self, raw: &Value) -> FieldResult<Value> {
        if self.options.skip_values.contains(raw) {
            trace!(field = %self.label(), value = %raw, "value in skip list");
            return Err(FieldError::Skipped {
                value: raw.to_string(),
            });
        }

        let mut value = raw.clone();
        for handler in &self.options.handlers {
            value = handler.handle(value)?;
        }

        if let Some(method) = &self.options.method {
            value = method(value)?;
        }

        let value = match self.handle(&value) {
            Ok(coerced) => coerced,
            Err(err) if self.options.raise_exception => return Err(err),
            Err(_) => value,
        };

        self.validate(value)
    }

    /// Type-specific coercion only; no skip check, handlers or validators.
    pub fn handle(&self, value: &Value) -> FieldResult<Value> {
        self.kind.as_coerce().coerce(value)
    }

    /// Run every validator over `value`, returning it unchanged if all accept.
    pub fn validate(&self, value: Value) -> FieldResult<Value> {
        if self.options.validators.iter().all(|v| v.validate(&value)) {
            Ok(value)
        } else {
            Err(FieldError::ValidationFailed {
                field: self.label().to_owned(),
            })
        }
    }

    /// Field code name.
    pub fn name(&self) -> Option<&str> {
        self.options.name.as_deref()
    }

    /// Human-readable name.
    pub fn verbose_name(&self) -> Option<&str> {
        self.options.verbose_name.as_deref()
    }

    /// Whether the field is nullable.
    pub fn null(&self) -> bool {
        self.options.null
    }

    /// Configured default.
    pub fn default(&self) -> &FieldDefault {
        &self.options.default
    }

    /// The type-specific part.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// All options.
    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn label(&self) -> &str {
        self.name().unwrap_or("<unnamed>")
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}) <name: {}, verbose_name: {}>",
            self.kind.type_name(),
            self.name().unwrap_or("-"),
            self.verbose_name().unwrap_or("-")
        )
    }
}
