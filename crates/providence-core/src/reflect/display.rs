//! Compact text rendering of values and records
//!
//! Records print as `calc.Point{x:3,y:4,label:"a"}`, with nested records
//! dropping the type name. Only present fields are shown.

use std::fmt::{self, Display, Write};

use super::{Message, Value};

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => f.write_str("void"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Byte(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v:?}"),
            Value::Binary(v) => write!(f, "hex({})", hex::encode(v)),
            Value::Enum(v) => write!(f, "{v}"),
            Value::Message(v) => write_fields(f, v),
            Value::List(items) => write_items(f, items.iter()),
            Value::Set(items) => write_items(f, items.iter()),
            Value::Map(entries) => {
                f.write_char('{')?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{key}:{value}")?;
                }
                f.write_char('}')
            }
        }
    }
}

fn write_items<'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    f.write_char('[')?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_char(',')?;
        }
        write!(f, "{item}")?;
    }
    f.write_char(']')
}

fn write_fields(f: &mut fmt::Formatter<'_>, message: &Message) -> fmt::Result {
    f.write_char('{')?;
    for (i, (field, value)) in message.present_fields().enumerate() {
        if i > 0 {
            f.write_char(',')?;
        }
        write!(f, "{}:{value}", field.name())?;
    }
    f.write_char('}')
}

impl Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualified_name())?;
        write_fields(f, self)
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{EnumSpec, FieldSpec, MessageSpec, Primitive, TypeRegistry, TypeSpec};
    use crate::reflect::Value;

    #[test]
    fn test_record_display() {
        let mut builder = TypeRegistry::builder();
        builder
            .declare_enum(EnumSpec::new("calc.Color").value("RED", 1))
            .unwrap();
        builder
            .declare_message(
                MessageSpec::structure("calc.Point")
                    .field(FieldSpec::new(1, "x", Primitive::I32))
                    .field(FieldSpec::new(2, "y", Primitive::I32))
                    .field(FieldSpec::new(3, "label", Primitive::String)),
            )
            .unwrap();
        builder
            .declare_message(
                MessageSpec::structure("calc.Shape")
                    .field(FieldSpec::new(1, "points", TypeSpec::list(TypeSpec::named("Point"))))
                    .field(FieldSpec::new(2, "color", TypeSpec::named("Color")))
                    .field(FieldSpec::new(3, "blob", Primitive::Binary))
                    .field(FieldSpec::new(
                        4,
                        "weights",
                        TypeSpec::map(Primitive::String.into(), Primitive::Double.into()),
                    )),
            )
            .unwrap();
        let registry = builder.build().unwrap();

        let mut point = registry.builder_for("calc.Point").unwrap();
        point.set(1, 3).unwrap().set(2, 4).unwrap().set(3, "a").unwrap();
        let point = point.build();
        assert_eq!(point.to_string(), r#"calc.Point{x:3,y:4,label:"a"}"#);
        assert_eq!(format!("{point:?}"), point.to_string());

        let color = registry
            .enum_descriptor(registry.lookup("calc.Color").unwrap())
            .unwrap()
            .find_by_value(1)
            .cloned()
            .unwrap();
        let mut shape = registry.builder_for("calc.Shape").unwrap();
        shape
            .add_to(1, point)
            .unwrap()
            .set(2, color)
            .unwrap()
            .set(3, vec![0xca_u8, 0xfe])
            .unwrap()
            .set(
                4,
                Value::Map([(Value::from("w"), Value::Double(0.5))].into_iter().collect()),
            )
            .unwrap();
        assert_eq!(
            shape.build().to_string(),
            r#"calc.Shape{points:[{x:3,y:4,label:"a"}],color:RED,blob:hex(cafe),weights:{"w":0.5}}"#
        );
    }
}
