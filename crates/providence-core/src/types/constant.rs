//! Literal constants used as field defaults

use super::Primitive;
use crate::reflect::Value;

/// A literal as written in the IDL document
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    /// `true` / `false`
    Bool(bool),
    /// Integer literal
    Integer(i64),
    /// Floating point literal
    Double(f64),
    /// String literal
    String(String),
    /// Enum value reference: `NAME`, `Enum.NAME` or `pkg.Enum.NAME`
    Identifier(String),
    /// `[a, b, c]`
    List(Vec<ConstValue>),
    /// `{k: v, ...}`
    Map(Vec<(ConstValue, ConstValue)>),
}

impl ConstValue {
    /// Short description for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            ConstValue::Bool(_) => "bool literal",
            ConstValue::Integer(_) => "integer literal",
            ConstValue::Double(_) => "double literal",
            ConstValue::String(_) => "string literal",
            ConstValue::Identifier(_) => "identifier",
            ConstValue::List(_) => "list literal",
            ConstValue::Map(_) => "map literal",
        }
    }

    /// Convert to a value of the given primitive type, range-checking integers
    pub fn to_primitive(&self, primitive: Primitive) -> Result<Value, String> {
        let out_of_range = |v: i64| format!("{v} is out of range for {primitive}");
        match (primitive, self) {
            (Primitive::Bool, ConstValue::Bool(b)) => Ok(Value::Bool(*b)),
            (Primitive::Bool, ConstValue::Integer(i)) if *i == 0 || *i == 1 => {
                Ok(Value::Bool(*i == 1))
            }
            (Primitive::Byte, ConstValue::Integer(i)) => {
                i8::try_from(*i).map(Value::Byte).map_err(|_| out_of_range(*i))
            }
            (Primitive::I16, ConstValue::Integer(i)) => {
                i16::try_from(*i).map(Value::I16).map_err(|_| out_of_range(*i))
            }
            (Primitive::I32, ConstValue::Integer(i)) => {
                i32::try_from(*i).map(Value::I32).map_err(|_| out_of_range(*i))
            }
            (Primitive::I64, ConstValue::Integer(i)) => Ok(Value::I64(*i)),
            (Primitive::Double, ConstValue::Double(d)) => Ok(Value::Double(*d)),
            (Primitive::Double, ConstValue::Integer(i)) => Ok(Value::Double(*i as f64)),
            (Primitive::String, ConstValue::String(s)) => Ok(Value::String(s.clone())),
            (Primitive::Binary, ConstValue::String(s)) => Ok(Value::Binary(s.as_bytes().to_vec())),
            (p, c) => Err(format!("{} is not a valid {}", c.kind_name(), p)),
        }
    }
}
