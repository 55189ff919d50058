//! `fuse-fields` is a small library for coercing raw, loosely-typed values into typed
//! [`types::Value`]s through declaratively configured [`fields::Field`]s.
//!
//! The primary entrypoint is [`fields::Field::set`], which runs a value through the field's
//! pipeline: skip check, handlers, custom method, type-specific coercion, validators.
//!
//! ## Field types
//!
//! - **String**: renders any value as text
//! - **Integer**: base-10 integers with optional sign
//! - **Float**: alternative decimal marks (`"1,5"`) and mixed fractions (`"1 1/2"`)
//! - **Date**: fuzzy text (`"meeting on 2023-05-01"`), Unix timestamps, optional attribute
//!   selection and `strftime` formatting
//! - **Array**: separator-based splitting, size limit, and per-element coercion through any
//!   child field (including nested arrays)
//!
//! ## Failure handling
//!
//! Every error is a [`FieldError`]. Two options decide what happens on failure:
//!
//! - `raise_exception = false` swallows failures of the type-specific step and keeps the
//!   value as it was before that step
//! - `default = FieldDefault::FromInput` returns the raw input for skip, parse, overflow,
//!   missing-key and index errors anywhere in the pipeline
//!
//! ## Quick example
//!
//! ```rust
//! use fuse_fields::fields::{Field, FieldDefault, FieldOptions, FloatOptions};
//! use fuse_fields::types::Value;
//!
//! # fn main() -> Result<(), fuse_fields::FieldError> {
//! let price = Field::float(FieldOptions::named("price"), FloatOptions::default())?;
//! assert_eq!(price.set("1,5")?, Value::Float64(1.5));
//! assert_eq!(price.set("1 1/2")?, Value::Float64(1.5));
//!
//! let lenient = Field::integer(FieldOptions::default().with_default(FieldDefault::FromInput))?;
//! assert_eq!(lenient.set("n/a")?, Value::from("n/a"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`fields`]: the pipeline and the field types
//! - [`config`]: JSON-declared field configuration
//! - [`fuzzy`]: fuzzy date/time parsing used by date fields
//! - [`separator`]: separator detection shared by float and array fields
//! - [`types`]: value types
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod fields;
pub mod fuzzy;
pub mod separator;
pub mod types;

pub use error::{ErrorClass, FieldError, FieldResult};
pub use fields::{Field, FieldDefault, FieldOptions};
