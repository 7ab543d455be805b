//! Calculator schema shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use providence_core::types::{
    ConstValue, EnumSpec, FieldSpec, MessageSpec, MethodSpec, Primitive, SchemaConfig, ServiceSpec,
    TypeRegistryBuilder, TypeSpec,
};
use providence_core::{Message, SchemaError, TypeRegistry, Value};

/// Declare the calculator types on a builder
pub fn declare_calculator(builder: &mut TypeRegistryBuilder) -> Result<(), SchemaError> {
    builder.declare_enum(
        EnumSpec::new("calc.Operator")
            .value("IDENTITY", 1)
            .value("ADD", 2)
            .value("SUBTRACT", 3)
            .value("MULTIPLY", 4)
            .value("DIVIDE", 5),
    )?;

    builder.declare_message(
        MessageSpec::union("calc.Operand")
            .field(FieldSpec::new(1, "operation", TypeSpec::named("Operation")))
            .field(FieldSpec::new(2, "number", Primitive::Double)),
    )?;

    builder.declare_message(
        MessageSpec::structure("calc.Operation")
            .field(FieldSpec::new(1, "operator", TypeSpec::named("Operator")))
            .field(FieldSpec::new(2, "operands", TypeSpec::list(TypeSpec::named("Operand")))),
    )?;

    builder.declare_message(
        MessageSpec::structure("calc.Point")
            .annotate("compact", "")
            .field(FieldSpec::new(1, "x", Primitive::I32).required())
            .field(FieldSpec::new(2, "y", Primitive::I32).required())
            .field(FieldSpec::new(3, "label", Primitive::String).optional()),
    )?;

    builder.declare_message(
        MessageSpec::structure("calc.Triple")
            .annotate("compact", "")
            .field(FieldSpec::new(1, "a", Primitive::I32).optional())
            .field(FieldSpec::new(2, "b", Primitive::I32).optional())
            .field(FieldSpec::new(3, "c", Primitive::I32).optional()),
    )?;

    builder.declare_message(
        MessageSpec::exception("calc.CalculateException")
            .field(FieldSpec::new(1, "message", Primitive::String).required())
            .field(FieldSpec::new(2, "operation", TypeSpec::named("Operation"))),
    )?;

    builder.declare_message(
        MessageSpec::structure("calc.Tagged")
            .field(FieldSpec::new(1, "name", Primitive::String))
            .field(FieldSpec::new(2, "values", TypeSpec::list(Primitive::I32.into())))
            .field(
                FieldSpec::new(3, "tags", TypeSpec::set(Primitive::String.into()))
                    .annotate("container", "sorted"),
            )
            .field(FieldSpec::new(
                4,
                "attrs",
                TypeSpec::map(Primitive::String.into(), Primitive::I32.into()),
            ))
            .field(FieldSpec::new(5, "origin", TypeSpec::named("Point")))
            .field(
                FieldSpec::new(6, "level", Primitive::I32).default_value(ConstValue::Integer(7)),
            )
            .field(
                FieldSpec::new(7, "op", TypeSpec::named("Operator"))
                    .default_value(ConstValue::Identifier("ADD".to_string())),
            ),
    )?;

    builder.declare_message(
        MessageSpec::structure("calc.CalculateRequest")
            .field(FieldSpec::new(1, "operation", TypeSpec::named("Operation"))),
    )?;
    builder.declare_message(
        MessageSpec::union("calc.CalculateResponse")
            .field(FieldSpec::new(0, "success", Primitive::Double))
            .field(FieldSpec::new(1, "ce", TypeSpec::named("CalculateException"))),
    )?;
    builder.declare_message(MessageSpec::structure("calc.IamAliveRequest"))?;

    builder.declare_service(
        ServiceSpec::new("calc.Calculator")
            .method(MethodSpec::new("calculate", "CalculateRequest", "CalculateResponse"))
            .method(MethodSpec::oneway("iamalive", "IamAliveRequest")),
    )?;
    builder.declare_service(
        ServiceSpec::new("calc.ScientificCalculator")
            .extends("Calculator")
            .method(MethodSpec::new("precise", "CalculateRequest", "CalculateResponse")),
    )?;
    Ok(())
}

/// Linked calculator registry with the given configuration
pub fn calculator_with(config: SchemaConfig) -> Result<Arc<TypeRegistry>, SchemaError> {
    let mut builder = TypeRegistryBuilder::with_config(config);
    declare_calculator(&mut builder)?;
    builder.build()
}

/// Linked calculator registry
pub fn calculator() -> Arc<TypeRegistry> {
    calculator_with(SchemaConfig::default()).expect("calculator schema links")
}

/// Operator enum value by name
pub fn operator(registry: &TypeRegistry, name: &str) -> Value {
    let id = registry.lookup("calc.Operator").expect("operator declared");
    let descriptor = registry.enum_descriptor(id).expect("operator is an enum");
    Value::Enum(descriptor.find_by_name(name).expect("known operator").clone())
}

/// `calc.Point{x, y}`
pub fn point(registry: &Arc<TypeRegistry>, x: i32, y: i32) -> Message {
    let mut builder = registry.builder_for("calc.Point").expect("point declared");
    builder.set(1, x).unwrap().set(2, y).unwrap();
    builder.build()
}
