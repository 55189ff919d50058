use fuse_fields::fields::{ArrayOptions, Field, FieldDefault, FieldOptions, SizeLimit};
use fuse_fields::types::Value;
use fuse_fields::{ErrorClass, FieldError};

fn integers(size: SizeLimit) -> Field {
    Field::array(
        FieldOptions::named("ids"),
        Field::integer(FieldOptions::default()).unwrap(),
        ArrayOptions {
            separators: vec![",".to_string()],
            size,
        },
    )
    .unwrap()
}

#[test]
fn splits_and_coerces_every_element() {
    let field = integers(SizeLimit::Unbounded);
    assert_eq!(field.set("1,2,3").unwrap(), Value::from(vec![1, 2, 3]));
}

#[test]
fn string_child_keeps_text() {
    let field = Field::array(
        FieldOptions::default(),
        Field::string(FieldOptions::default()).unwrap(),
        ArrayOptions::default(),
    )
    .unwrap();
    assert_eq!(field.set("a,b,c").unwrap(), Value::from(vec!["a", "b", "c"]));
}

// The limit is exclusive: an array of exactly `limit` elements is rejected.
#[test]
fn size_limit_boundary() {
    let field = integers(SizeLimit::Bounded(3));
    assert_eq!(field.set("1,2").unwrap(), Value::from(vec![1, 2]));

    let err = field.set("1,2,3").unwrap_err();
    assert!(matches!(err, FieldError::ArraySizeLimit { limit: 3, len: 3 }));
    assert_eq!(err.class(), ErrorClass::Structural);
}

#[test]
fn size_limit_is_not_fallback_eligible() {
    let field = Field::array(
        FieldOptions::default().with_default(FieldDefault::FromInput),
        Field::integer(FieldOptions::default()).unwrap(),
        ArrayOptions {
            size: SizeLimit::Bounded(1),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(matches!(
        field.set("1"),
        Err(FieldError::ArraySizeLimit { .. })
    ));
}

#[test]
fn child_errors_propagate() {
    let err = integers(SizeLimit::Unbounded).set("1,x,3").unwrap_err();
    assert!(matches!(err, FieldError::Parse { .. }));
}

#[test]
fn child_fallback_applies_per_element() {
    let child = Field::integer(FieldOptions::default().with_default(FieldDefault::FromInput)).unwrap();
    let field = Field::array(FieldOptions::default(), child, ArrayOptions::default()).unwrap();
    assert_eq!(
        field.set("1,x,3").unwrap(),
        Value::Array(vec![Value::Int64(1), Value::from("x"), Value::Int64(3)])
    );
}

#[test]
fn child_skip_values_fail_the_array() {
    let child = Field::integer(FieldOptions::default().with_skip_value("-")).unwrap();
    let field = Field::array(FieldOptions::default(), child, ArrayOptions::default()).unwrap();
    assert!(matches!(field.set("1,-"), Err(FieldError::Skipped { .. })));
}

#[test]
fn nested_arrays() {
    let inner = Field::array(
        FieldOptions::default(),
        Field::integer(FieldOptions::default()).unwrap(),
        ArrayOptions {
            separators: vec![",".to_string()],
            ..Default::default()
        },
    )
    .unwrap();
    let outer = Field::array(
        FieldOptions::default(),
        inner,
        ArrayOptions {
            separators: vec!["|".to_string()],
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(
        outer.set("1,2|3,4,5").unwrap(),
        Value::from(vec![Value::from(vec![1, 2]), Value::from(vec![3, 4, 5])])
    );
}

#[test]
fn whitespace_split_without_separator() {
    let field = integers(SizeLimit::Unbounded);
    assert_eq!(field.set("4 5  6").unwrap(), Value::from(vec![4, 5, 6]));
}
