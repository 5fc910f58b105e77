//! Scalar kinds, values and the text conversion table.
//!
//! # Responsibilities
//! - Name the closed set of types a route may bind or return
//! - Convert raw request text into typed values
//! - Render entry point results as response bodies
//!
//! # Design Decisions
//! - No arbitrary types: anything outside the table is a configuration error
//! - Parsing uses the standard textual forms (`str::parse`)
//! - Booleans accept `true`/`false` in any letter case

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigurationError;

/// Kinds a parameter or result may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Integer,
    Float,
    Boolean,
    /// No meaningful value. Only valid as a result kind.
    Void,
}

impl ScalarKind {
    /// Convert raw request text into a value of this kind.
    ///
    /// Returns `None` when the text is not a valid literal for the kind.
    pub fn parse(self, raw: &str) -> Option<Value> {
        match self {
            ScalarKind::String => Some(Value::String(raw.to_string())),
            ScalarKind::Integer => raw.parse().ok().map(Value::Integer),
            ScalarKind::Float => raw.parse().ok().map(Value::Float),
            ScalarKind::Boolean => {
                if raw.eq_ignore_ascii_case("true") {
                    Some(Value::Boolean(true))
                } else if raw.eq_ignore_ascii_case("false") {
                    Some(Value::Boolean(false))
                } else {
                    None
                }
            }
            ScalarKind::Void => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Integer => "integer",
            ScalarKind::Float => "float",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Void => "void",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScalarKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "string" | "str" => Ok(ScalarKind::String),
            "int" | "integer" | "i64" => Ok(ScalarKind::Integer),
            "float" | "double" | "f64" => Ok(ScalarKind::Float),
            "bool" | "boolean" => Ok(ScalarKind::Boolean),
            "void" | "unit" => Ok(ScalarKind::Void),
            _ => Err(ConfigurationError::UnsupportedType(s.to_string())),
        }
    }
}

/// A typed argument or result.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Unit,
}

impl Value {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Value::String(_) => ScalarKind::String,
            Value::Integer(_) => ScalarKind::Integer,
            Value::Float(_) => ScalarKind::Float,
            Value::Boolean(_) => ScalarKind::Boolean,
            Value::Unit => ScalarKind::Void,
        }
    }

    /// Textual form used as a response body. `Unit` renders empty.
    pub fn render(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Unit => String::new(),
        }
    }
}

/// Rust types that map onto a [`ScalarKind`].
pub trait Scalar: Sized + 'static {
    const KIND: ScalarKind;

    fn from_value(value: Value) -> Option<Self>;

    fn into_value(self) -> Value;
}

macro_rules! impl_scalar {
    ($ty:ty, $kind:ident) => {
        impl Scalar for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$kind(v) => Some(v),
                    _ => None,
                }
            }

            fn into_value(self) -> Value {
                Value::$kind(self)
            }
        }
    };
}

impl_scalar!(String, String);
impl_scalar!(i64, Integer);
impl_scalar!(f64, Float);
impl_scalar!(bool, Boolean);

impl Scalar for () {
    const KIND: ScalarKind = ScalarKind::Void;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Unit => Some(()),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Unit
    }
}
