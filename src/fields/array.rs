//! Array fields: split text into elements and coerce each one through a child field.

use crate::error::{FieldError, FieldResult};
use crate::separator::detect_separator;
use crate::types::Value;

use super::{Coerce, Field};

/// Element separators recognized when none are configured.
pub const DEFAULT_ARRAY_SEPARATORS: &[&str] = &[",", ";"];

/// Upper bound on the number of array elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeLimit {
    /// Any number of elements.
    #[default]
    Unbounded,
    /// Fewer than `n` elements. An array of exactly `n` elements is rejected.
    Bounded(usize),
}

impl SizeLimit {
    /// Whether an array of `len` elements is within the limit.
    pub fn admits(&self, len: usize) -> bool {
        match self {
            SizeLimit::Unbounded => true,
            SizeLimit::Bounded(limit) => len < *limit,
        }
    }
}

/// Array-specific options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayOptions {
    /// Candidate element separators. With none present in the text, elements are split on
    /// whitespace.
    pub separators: Vec<String>,
    /// Element count limit.
    pub size: SizeLimit,
}

impl Default for ArrayOptions {
    fn default() -> Self {
        Self {
            separators: DEFAULT_ARRAY_SEPARATORS.iter().map(|s| s.to_string()).collect(),
            size: SizeLimit::Unbounded,
        }
    }
}

/// Splits text into elements and runs every element through the child field's pipeline.
#[derive(Debug, Clone)]
pub struct ArrayField {
    child: Box<Field>,
    separators: Vec<String>,
    size: SizeLimit,
}

impl ArrayField {
    /// Create an array field. An empty separator list falls back to the defaults.
    pub fn new(child: Field, options: ArrayOptions) -> Self {
        let separators = if options.separators.is_empty() {
            ArrayOptions::default().separators
        } else {
            options.separators
        };
        Self {
            child: Box::new(child),
            separators,
            size: options.size,
        }
    }

    /// The field applied to each element.
    pub fn child(&self) -> &Field {
        &self.child
    }

    /// Configured size limit.
    pub fn size(&self) -> SizeLimit {
        self.size
    }

    fn split<'a>(&self, raw: &'a str) -> Vec<&'a str> {
        match detect_separator(&self.separators, raw) {
            Some(sep) => raw.split(sep).collect(),
            None => raw.split_whitespace().collect(),
        }
    }
}

impl Coerce for ArrayField {
    fn type_name(&self) -> &'static str {
        "ArrayField"
    }

    fn coerce(&self, value: &Value) -> FieldResult<Value> {
        let elements: Vec<Value> = match value {
            Value::Utf8(s) => self.split(s).into_iter().map(Value::from).collect(),
            Value::Array(items) => items.clone(),
            other => {
                return Err(FieldError::UnsupportedInput {
                    field: self.type_name(),
                    actual: other.data_type(),
                });
            }
        };

        if let SizeLimit::Bounded(limit) = self.size {
            if !self.size.admits(elements.len()) {
                return Err(FieldError::ArraySizeLimit {
                    limit,
                    len: elements.len(),
                });
            }
        }

        elements
            .into_iter()
            .map(|element| self.child.set(element))
            .collect::<FieldResult<Vec<_>>>()
            .map(Value::Array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldOptions;

    fn strings(options: ArrayOptions) -> ArrayField {
        ArrayField::new(Field::string(FieldOptions::default()).unwrap(), options)
    }

    #[test]
    fn splits_on_first_separator_found() {
        let f = strings(ArrayOptions::default());
        assert_eq!(
            f.coerce(&Value::from("a;b;c")).unwrap(),
            Value::from(vec!["a", "b", "c"])
        );
        // `;` is found first, so the commas stay inside elements.
        assert_eq!(
            f.coerce(&Value::from("a;b,c")).unwrap(),
            Value::from(vec!["a", "b,c"])
        );
    }

    #[test]
    fn splits_on_whitespace_without_separator() {
        let f = strings(ArrayOptions::default());
        assert_eq!(
            f.coerce(&Value::from(" a  b ")).unwrap(),
            Value::from(vec!["a", "b"])
        );
        assert_eq!(f.coerce(&Value::from("")).unwrap(), Value::Array(vec![]));
    }

    #[test]
    fn keeps_empty_elements_between_separators() {
        let f = strings(ArrayOptions::default());
        assert_eq!(
            f.coerce(&Value::from("a,,b")).unwrap(),
            Value::from(vec!["a", "", "b"])
        );
    }

    #[test]
    fn size_limit_is_exclusive() {
        let f = strings(ArrayOptions {
            size: SizeLimit::Bounded(3),
            ..Default::default()
        });
        assert!(f.coerce(&Value::from("a,b")).is_ok());
        let err = f.coerce(&Value::from("a,b,c")).unwrap_err();
        assert!(matches!(err, FieldError::ArraySizeLimit { limit: 3, len: 3 }));
    }

    #[test]
    fn already_split_input_is_coerced_element_wise() {
        let f = ArrayField::new(
            Field::integer(FieldOptions::default()).unwrap(),
            ArrayOptions::default(),
        );
        let input = Value::from(vec!["1", "2"]);
        assert_eq!(f.coerce(&input).unwrap(), Value::from(vec![1, 2]));
    }

    #[test]
    fn rejects_scalar_non_text_input() {
        let f = strings(ArrayOptions::default());
        assert!(matches!(
            f.coerce(&Value::Int64(1)),
            Err(FieldError::UnsupportedInput { .. })
        ));
    }
}
