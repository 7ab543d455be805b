//! Primitive IDL types

use std::fmt;

use crate::reflect::Value;

static FALSE: Value = Value::Bool(false);
static ZERO_BYTE: Value = Value::Byte(0);
static ZERO_I16: Value = Value::I16(0);
static ZERO_I32: Value = Value::I32(0);
static ZERO_I64: Value = Value::I64(0);
static ZERO_DOUBLE: Value = Value::Double(0.0);
static EMPTY_STRING: Value = Value::String(String::new());
static EMPTY_BINARY: Value = Value::Binary(Vec::new());

/// Primitive types of the IDL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    /// `void`, only meaningful as a union marker or method result
    Void,
    /// `bool`
    Bool,
    /// `byte` (signed 8 bit)
    Byte,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `double` (IEEE 754 double precision)
    Double,
    /// `string` (UTF-8)
    String,
    /// `binary` (raw bytes)
    Binary,
}

impl Primitive {
    /// Name of the type as written in the IDL
    pub fn type_name(&self) -> &'static str {
        match self {
            Primitive::Void => "void",
            Primitive::Bool => "bool",
            Primitive::Byte => "byte",
            Primitive::I16 => "i16",
            Primitive::I32 => "i32",
            Primitive::I64 => "i64",
            Primitive::Double => "double",
            Primitive::String => "string",
            Primitive::Binary => "binary",
        }
    }

    /// Look up a primitive by its IDL name (`i8` is accepted as `byte`)
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "void" => Some(Primitive::Void),
            "bool" => Some(Primitive::Bool),
            "byte" | "i8" => Some(Primitive::Byte),
            "i16" => Some(Primitive::I16),
            "i32" => Some(Primitive::I32),
            "i64" => Some(Primitive::I64),
            "double" => Some(Primitive::Double),
            "string" => Some(Primitive::String),
            "binary" => Some(Primitive::Binary),
            _ => None,
        }
    }

    /// Intrinsic zero value, the last fallback of a field read.
    ///
    /// `void` has none.
    pub fn default_value(&self) -> Option<&'static Value> {
        match self {
            Primitive::Void => None,
            Primitive::Bool => Some(&FALSE),
            Primitive::Byte => Some(&ZERO_BYTE),
            Primitive::I16 => Some(&ZERO_I16),
            Primitive::I32 => Some(&ZERO_I32),
            Primitive::I64 => Some(&ZERO_I64),
            Primitive::Double => Some(&ZERO_DOUBLE),
            Primitive::String => Some(&EMPTY_STRING),
            Primitive::Binary => Some(&EMPTY_BINARY),
        }
    }

    /// Check whether a value is an instance of this primitive
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Primitive::Void, Value::Void)
                | (Primitive::Bool, Value::Bool(_))
                | (Primitive::Byte, Value::Byte(_))
                | (Primitive::I16, Value::I16(_))
                | (Primitive::I32, Value::I32(_))
                | (Primitive::I64, Value::I64(_))
                | (Primitive::Double, Value::Double(_))
                | (Primitive::String, Value::String(_))
                | (Primitive::Binary, Value::Binary(_))
        )
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
