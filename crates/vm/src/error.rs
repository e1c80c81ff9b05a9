//! Runtime errors for the IPPcode22 execution engine.
//!
//! Every error names its category and carries the instruction index
//! (`at`) where it was raised. Errors are fatal: the engine stops at
//! the first one and the process exits with the category's code.

use thiserror::Error;

/// Errors that occur during program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// DEFVAR on a name already present in the target frame.
    #[error("semantic error: variable '{name}' is already defined at instruction {at}")]
    Redefinition { at: usize, name: String },

    /// CALL, JUMP, or a conditional jump referenced an undefined label.
    #[error("semantic error: unknown label '{label}' at instruction {at}")]
    UnknownLabel { at: usize, label: String },

    /// Operand tags violate an operation's precondition.
    #[error("wrong operand types at instruction {at}")]
    WrongOperandTypes { at: usize },

    /// The named variable does not exist in an existing frame.
    #[error("variable '{name}' does not exist at instruction {at}")]
    UnknownVariable { at: usize, name: String },

    /// The referenced frame (temporary or local top) does not exist.
    #[error("frame does not exist at instruction {at}")]
    MissingFrame { at: usize },

    /// Read of a declared-but-uninitialized variable, or a pop from an
    /// empty data or call stack.
    #[error("missing value at instruction {at}")]
    MissingValue { at: usize },

    /// Integer division by zero, or an EXIT code outside 0..=49.
    #[error("wrong operand value at instruction {at}")]
    WrongOperandValue { at: usize },

    /// Out-of-range index, empty replacement, or invalid code point.
    #[error("illegal string operation at instruction {at}")]
    StringOperation { at: usize },
}

impl RuntimeError {
    /// The process exit code assigned to this error's category.
    pub fn exit_code(&self) -> i32 {
        match self {
            RuntimeError::Redefinition { .. } | RuntimeError::UnknownLabel { .. } => 52,
            RuntimeError::WrongOperandTypes { .. } => 53,
            RuntimeError::UnknownVariable { .. } => 54,
            RuntimeError::MissingFrame { .. } => 55,
            RuntimeError::MissingValue { .. } => 56,
            RuntimeError::WrongOperandValue { .. } => 57,
            RuntimeError::StringOperation { .. } => 58,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        assert_eq!(
            RuntimeError::Redefinition {
                at: 2,
                name: "x".to_string()
            }
            .to_string(),
            "semantic error: variable 'x' is already defined at instruction 2"
        );
        assert_eq!(
            RuntimeError::MissingValue { at: 7 }.to_string(),
            "missing value at instruction 7"
        );
    }

    #[test]
    fn exit_codes() {
        assert_eq!(
            RuntimeError::UnknownLabel {
                at: 0,
                label: "l".to_string()
            }
            .exit_code(),
            52
        );
        assert_eq!(RuntimeError::WrongOperandTypes { at: 0 }.exit_code(), 53);
        assert_eq!(
            RuntimeError::UnknownVariable {
                at: 0,
                name: "x".to_string()
            }
            .exit_code(),
            54
        );
        assert_eq!(RuntimeError::MissingFrame { at: 0 }.exit_code(), 55);
        assert_eq!(RuntimeError::MissingValue { at: 0 }.exit_code(), 56);
        assert_eq!(RuntimeError::WrongOperandValue { at: 0 }.exit_code(), 57);
        assert_eq!(RuntimeError::StringOperation { at: 0 }.exit_code(), 58);
    }
}
