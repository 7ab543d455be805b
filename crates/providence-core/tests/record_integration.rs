mod common;

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use providence_core::types::{ConstValue, FieldSpec, MessageSpec, Primitive, TypeSpec};
use providence_core::{FieldAccess, Message, SchemaError, TypeRegistry, ValidationError, Value};

use common::{calculator, operator, point};

#[test]
fn test_point_scenario() {
    let registry = calculator();
    let mut builder = registry.builder_for("calc.Point").unwrap();
    builder.set(1, 3).unwrap().set(2, 4).unwrap();

    let p = builder.build();
    assert!(p.has(1));
    assert!(p.has(2));
    assert!(!p.has(3));
    assert!(builder.is_valid());
    assert!(p.is_compact());
    assert_eq!(p.to_string(), "calc.Point{x:3,y:4}");

    builder.clear(1);
    assert!(!builder.is_valid());
    assert_eq!(
        builder.validate(),
        Err(ValidationError::MissingRequired {
            type_name: "calc.Point".to_string(),
            fields: vec!["x".to_string()],
        })
    );
}

#[test]
fn test_missing_required_reports_every_field() {
    let registry = calculator();
    let builder = registry.builder_for("calc.Point").unwrap();
    let err = builder.validate().unwrap_err();
    assert_eq!(err.to_string(), "Missing required fields x, y in calc.Point");
}

#[test]
fn test_instance_compactness() {
    let registry = calculator();
    let ty = registry.message_type("calc.Triple").unwrap();
    assert!(ty.descriptor().is_compactible());

    let mut only_first = ty.builder();
    only_first.set(1, 1).unwrap();
    assert!(only_first.build().is_compact());

    let mut skipping = ty.builder();
    skipping.set(1, 1).unwrap().set(3, 3).unwrap();
    assert!(!skipping.build().is_compact());
    assert!(!skipping.is_compact());

    assert!(ty.builder().build().is_compact());
}

#[test]
fn test_type_classification() {
    let registry = calculator();
    let point = registry.message_type("calc.Point").unwrap();
    assert!(point.descriptor().is_simple());
    assert!(point.descriptor().is_compactible());

    let operation = registry.message_type("calc.Operation").unwrap();
    assert!(!operation.descriptor().is_simple());
    assert!(!operation.descriptor().is_compactible());

    let tagged = registry.message_type("calc.Tagged").unwrap();
    assert!(!tagged.descriptor().is_simple());
}

#[test]
fn test_get_falls_back_to_defaults() {
    let registry = calculator();
    let tagged = registry.builder_for("calc.Tagged").unwrap().build();

    assert!(!tagged.has(6));
    assert_eq!(tagged.get(6).as_deref(), Some(&Value::I32(7)));
    assert!(!tagged.has(7));
    assert_eq!(tagged.get(7).as_deref(), Some(&operator(&registry, "ADD")));
    assert_eq!(tagged.get(1).as_deref(), Some(&Value::from("")));
    assert_eq!(tagged.get(2), None);
    assert_eq!(tagged.get(5), None);
    assert_eq!(tagged.get(100), None);

    let mut builder = registry.builder_for("calc.Tagged").unwrap();
    builder.set(6, 12).unwrap();
    assert_eq!(builder.get(6).as_deref(), Some(&Value::I32(12)));
    assert!(builder.has(6));
}

#[test]
fn test_exception_message() {
    let registry = calculator();
    let mut builder = registry.builder_for("calc.CalculateException").unwrap();
    builder.set(1, "cannot divide by zero").unwrap();
    let exception = builder.build();

    assert!(exception.descriptor().is_exception());
    assert_eq!(exception.exception_message(), Some("cannot divide by zero"));
}

#[test]
fn test_records_from_separate_registries_compare_equal() {
    let first = calculator();
    let second = calculator();
    assert_eq!(point(&first, 1, 2), point(&second, 1, 2));
    assert_ne!(point(&first, 1, 2), point(&second, 2, 1));
}

#[test]
fn test_records_sort_by_field_id() {
    let registry = calculator();
    let points: BTreeSet<Message> = [(2, 1), (1, 5), (1, 2), (1, 2)]
        .into_iter()
        .map(|(x, y)| point(&registry, x, y))
        .collect();
    let rendered: Vec<_> = points.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![
            "calc.Point{x:1,y:2}",
            "calc.Point{x:1,y:5}",
            "calc.Point{x:2,y:1}",
        ]
    );
}

#[test]
fn test_records_share_across_threads() {
    let registry = calculator();
    let p = point(&registry, 3, 4);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let p = p.clone();
            std::thread::spawn(move || p.get(1).map(|v| v.into_owned()))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(Value::I32(3)));
    }
}

fn hash_of(message: &Message) -> u64 {
    let mut hasher = DefaultHasher::new();
    message.hash(&mut hasher);
    hasher.finish()
}

/// `calc.Point` as a later schema revision declares it: z added, fields
/// listed in a different order
fn evolved_points() -> Arc<TypeRegistry> {
    let mut builder = TypeRegistry::builder();
    builder
        .declare_message(
            MessageSpec::structure("calc.Point")
                .field(FieldSpec::new(2, "y", Primitive::I32).required())
                .field(FieldSpec::new(1, "x", Primitive::I32).required())
                .field(FieldSpec::new(3, "label", Primitive::String).optional())
                .field(FieldSpec::new(4, "z", Primitive::I32)),
        )
        .unwrap();
    builder.build().unwrap()
}

#[test]
fn test_records_across_schema_revisions_compare_consistently() {
    let old = calculator();
    let new = evolved_points();
    let a = point(&old, 1, 2);

    let mut b = new.builder_for("calc.Point").unwrap();
    b.set(1, 1).unwrap().set(2, 2).unwrap().set(4, 7).unwrap();
    let b = b.build();
    assert_ne!(a, b);
    assert_ne!(b, a);
    assert_eq!(a.cmp(&b), std::cmp::Ordering::Less);
    assert_eq!(b.cmp(&a), std::cmp::Ordering::Greater);

    // same values, declared in another order
    let mut c = new.builder_for("calc.Point").unwrap();
    c.set(2, 2).unwrap().set(1, 1).unwrap();
    let c = c.build();
    assert_eq!(a, c);
    assert_eq!(c, a);
    assert_eq!(hash_of(&a), hash_of(&c));
    assert_eq!(a.cmp(&c), std::cmp::Ordering::Equal);
    assert_eq!(c.cmp(&a), std::cmp::Ordering::Equal);
}

#[test]
fn test_recursive_union_nests() {
    let mut builder = TypeRegistry::builder();
    builder
        .declare_message(
            MessageSpec::union("expr.Expr")
                .field(FieldSpec::new(1, "literal", Primitive::I32))
                .field(FieldSpec::new(2, "negate", TypeSpec::named("Expr"))),
        )
        .unwrap();
    let registry = builder.build().unwrap();
    let ty = registry.message_type("expr.Expr").unwrap();

    let mut literal = ty.builder();
    literal.set(1, 3).unwrap();
    let mut expr = literal.build();
    for _ in 0..3 {
        let mut negate = ty.builder();
        negate.set(2, expr).unwrap();
        expr = negate.build();
    }

    assert_eq!(
        expr.to_string(),
        "expr.Expr{negate:{negate:{negate:{literal:3}}}}"
    );
    assert_eq!(expr.union_field().map(|f| f.name()), Some("negate"));
    assert_eq!(expr.mutate().build(), expr);
    assert_eq!(hash_of(&expr.mutate().build()), hash_of(&expr));
}

fn shapes(origin: ConstValue) -> Result<Arc<TypeRegistry>, SchemaError> {
    let mut builder = TypeRegistry::builder();
    builder
        .declare_message(
            MessageSpec::structure("geo.Point")
                .field(FieldSpec::new(1, "x", Primitive::I32))
                .field(FieldSpec::new(2, "y", Primitive::I32)),
        )
        .unwrap();
    builder
        .declare_message(
            MessageSpec::structure("geo.Shape")
                .field(FieldSpec::new(1, "origin", TypeSpec::named("Point")).default_value(origin)),
        )
        .unwrap();
    builder.build()
}

#[test]
fn test_message_default_is_read_but_not_present() {
    let origin = ConstValue::Map(vec![(
        ConstValue::String("x".into()),
        ConstValue::Integer(5),
    )]);
    let registry = shapes(origin).unwrap();
    let shape = registry.builder_for("geo.Shape").unwrap().build();

    assert!(!shape.has(1));
    let origin = shape.get(1).unwrap().into_owned();
    let origin = origin.as_message().unwrap();
    assert_eq!(origin.to_string(), "geo.Point{x:5}");
    assert!(!origin.has(2));

    // the builder reads the same default until the field is set
    let mut builder = registry.builder_for("geo.Shape").unwrap();
    assert_eq!(builder.get(1).as_deref(), Some(&Value::Message(origin.clone())));
    builder.mutator(1).unwrap().set(2, 1).unwrap();
    assert_eq!(builder.build().to_string(), "geo.Shape{origin:{y:1}}");
}

#[test]
fn test_message_default_names_unknown_field() {
    let origin = ConstValue::Map(vec![(
        ConstValue::String("w".into()),
        ConstValue::Integer(5),
    )]);
    assert!(matches!(
        shapes(origin),
        Err(SchemaError::InvalidDefault { field, reason, .. })
            if field == "origin" && reason == "no field w in geo.Point"
    ));
    assert!(matches!(
        shapes(ConstValue::Integer(0)),
        Err(SchemaError::InvalidDefault { .. })
    ));
}
