//! Load-time errors: malformed XML, structural violations, and
//! duplicate labels.

use ippcode_common::ProgramError;
use thiserror::Error;

/// Errors raised while turning XML source into a [`ippcode_common::Program`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input is not well-formed XML.
    #[error("malformed XML: {0}")]
    Malformed(#[from] roxmltree::Error),

    /// The root element is not `<program>`.
    #[error("unexpected root element '{0}'")]
    UnexpectedRoot(String),

    /// The root's `language` attribute is missing or not `IPPcode22`.
    #[error("missing or unsupported language attribute")]
    UnsupportedLanguage,

    /// An element appeared where it does not belong.
    #[error("unexpected element '{0}'")]
    UnexpectedElement(String),

    /// A required attribute is missing.
    #[error("missing attribute '{0}'")]
    MissingAttribute(&'static str),

    /// The `order` attribute is not a positive integer.
    #[error("invalid instruction order '{0}'")]
    InvalidOrder(String),

    /// Two instructions share the same `order`.
    #[error("duplicate instruction order {0}")]
    DuplicateOrder(i64),

    /// The `opcode` attribute names no known instruction.
    #[error("unknown opcode '{0}'")]
    UnknownOpcode(String),

    /// Operand elements do not match the opcode's signature.
    #[error("wrong operands for {0}")]
    WrongOperands(&'static str),

    /// An operand's text is not a valid value of its declared type.
    #[error("invalid {kind} operand '{text}'")]
    InvalidOperand { kind: String, text: String },

    /// The same label is defined by more than one LABEL instruction.
    #[error(transparent)]
    Semantic(#[from] ProgramError),
}

impl LoadError {
    /// The process exit code assigned to this error's category.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::Malformed(_) => 31,
            LoadError::Semantic(_) => 52,
            _ => 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(LoadError::UnsupportedLanguage.exit_code(), 32);
        assert_eq!(LoadError::DuplicateOrder(3).exit_code(), 32);
        assert_eq!(LoadError::WrongOperands("MOVE").exit_code(), 32);
        assert_eq!(
            LoadError::Semantic(ProgramError::DuplicateLabel("l".to_string())).exit_code(),
            52
        );
    }

    #[test]
    fn display_formats() {
        assert_eq!(
            LoadError::UnknownOpcode("FROB".to_string()).to_string(),
            "unknown opcode 'FROB'"
        );
        assert_eq!(
            LoadError::InvalidOperand {
                kind: "int".to_string(),
                text: "abc".to_string()
            }
            .to_string(),
            "invalid int operand 'abc'"
        );
    }
}
