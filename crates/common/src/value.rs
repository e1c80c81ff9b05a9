//! Runtime value representation for the IPPcode22 interpreter.
//!
//! Values are what live in variable slots and on the data stack during
//! execution.

use std::fmt;

use crate::hexfloat;

/// Runtime value representation.
///
/// A value's payload kind always matches its tag; there is no way to
/// construct a mismatched pair. Values are immutable — instructions
/// build new values instead of mutating in place.
#[derive(Debug, Clone)]
pub enum Value {
    /// Signed 64-bit integer.
    Int(i64),
    /// IEEE 754 64-bit float.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// UTF-8 text. May contain any Unicode scalar, including decoded
    /// escape sequences.
    Str(String),
    /// The nil value. Distinct from an uninitialized variable slot.
    Nil,
    /// A label name. Only appears as a literal operand.
    Label(String),
    /// A type name. Only appears as the literal operand of READ.
    Type(String),
}

// Bitwise equality for Float via to_bits(), so Value is well-behaved in
// Rust (NaN == NaN when the bit patterns match, 0.0 != -0.0). The
// language-level EQ instruction compares floats numerically in the
// engine; this impl exists for tests and assertions.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            (Value::Label(a), Value::Label(b)) => a == b,
            (Value::Type(a), Value::Type(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Value {
    /// Returns the IPPcode tag name for this value, as produced by the
    /// TYPE instruction.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Nil => "nil",
            Value::Label(_) => "label",
            Value::Type(_) => "type",
        }
    }

    /// Rendering used by the WRITE instruction: nil is empty, bools are
    /// `true`/`false`, floats use the lossless hexadecimal form.
    pub fn write_text(&self) -> String {
        match self {
            Value::Nil => String::new(),
            other => other.to_string(),
        }
    }
}

/// Diagnostic rendering, used by DPRINT and frame dumps. Identical to
/// [`Value::write_text`] except that nil renders as `nil`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => f.write_str(&hexfloat::format(*x)),
            Value::Bool(true) => f.write_str("true"),
            Value::Bool(false) => f.write_str("false"),
            Value::Str(s) => f.write_str(s),
            Value::Nil => f.write_str("nil"),
            Value::Label(s) => f.write_str(s),
            Value::Type(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names() {
        assert_eq!(Value::Int(42).type_name(), "int");
        assert_eq!(Value::Float(3.14).type_name(), "float");
        assert_eq!(Value::Bool(true).type_name(), "bool");
        assert_eq!(Value::Str("x".into()).type_name(), "string");
        assert_eq!(Value::Nil.type_name(), "nil");
        assert_eq!(Value::Label("main".into()).type_name(), "label");
        assert_eq!(Value::Type("int".into()).type_name(), "type");
    }

    #[test]
    fn equality_int() {
        assert_eq!(Value::Int(42), Value::Int(42));
        assert_ne!(Value::Int(42), Value::Int(43));
    }

    #[test]
    fn equality_float_bitwise() {
        assert_eq!(Value::Float(3.14), Value::Float(3.14));
        assert_ne!(Value::Float(0.0), Value::Float(-0.0));
        let nan = f64::NAN;
        assert_eq!(Value::Float(nan), Value::Float(nan));
    }

    #[test]
    fn equality_different_tags() {
        assert_ne!(Value::Int(1), Value::Bool(true));
        assert_ne!(Value::Nil, Value::Str(String::new()));
    }

    #[test]
    fn write_text_rendering() {
        assert_eq!(Value::Nil.write_text(), "");
        assert_eq!(Value::Bool(true).write_text(), "true");
        assert_eq!(Value::Bool(false).write_text(), "false");
        assert_eq!(Value::Int(-7).write_text(), "-7");
        assert_eq!(Value::Str("ahoj".into()).write_text(), "ahoj");
        assert_eq!(Value::Float(2.5).write_text(), "0x1.4000000000000p+1");
    }

    #[test]
    fn display_nil_is_spelled_out() {
        assert_eq!(Value::Nil.to_string(), "nil");
    }
}
