//! Opcode definitions for the IPPcode22 instruction set.
//!
//! Computational opcodes exist in a positional form (named operands, a
//! named destination) and a stack form (`…S` mnemonic suffix, operands
//! popped from and result pushed to the data stack). The sourcing mode
//! is factored out as [`Mode`] so each operation is defined once.

/// Where a computational instruction sources its operands and routes
/// its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Named operands; the result is written to the destination
    /// variable (operand 0).
    Positional,
    /// Operands popped from the data stack; the result is pushed back.
    Stack,
}

/// Static operand kind expected at a given position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// A variable reference (`GF@x`, `LF@x`, `TF@x`).
    Var,
    /// A variable reference or any literal.
    Symb,
    /// A label name.
    Label,
    /// A type name (READ only).
    Type,
}

/// Identifies the operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Frames and assignment
    Move,
    CreateFrame,
    PushFrame,
    PopFrame,
    DefVar,

    // Call / return
    Call,
    Return,

    // Data stack
    Pushs,
    Pops,
    Clears,

    // Arithmetic
    Add(Mode),
    Sub(Mode),
    Mul(Mode),
    /// Integer division; int operands only, zero divisor is an error.
    IDiv(Mode),
    /// Real division; float operands only, IEEE semantics on zero.
    Div(Mode),

    // Relational and equality
    Lt(Mode),
    Gt(Mode),
    Eq(Mode),

    // Logical
    And(Mode),
    Or(Mode),
    Not(Mode),

    // Conversions
    Int2Float(Mode),
    Float2Int(Mode),
    Int2Char(Mode),
    Stri2Int(Mode),

    // I/O
    Read,
    Write,

    // Strings
    Concat,
    Strlen,
    Getchar,
    Setchar,

    /// TYPE: dynamic tag name of an operand, written as a string.
    TypeOf,

    // Control flow
    Label,
    Jump,
    JumpIfEq(Mode),
    JumpIfNeq(Mode),
    Exit,

    // Debugging
    Dprint,
    Break,
}

impl Opcode {
    /// Look up an opcode by its (already upper-cased) mnemonic.
    pub fn from_mnemonic(name: &str) -> Option<Opcode> {
        use Mode::{Positional, Stack};
        Some(match name {
            "MOVE" => Opcode::Move,
            "CREATEFRAME" => Opcode::CreateFrame,
            "PUSHFRAME" => Opcode::PushFrame,
            "POPFRAME" => Opcode::PopFrame,
            "DEFVAR" => Opcode::DefVar,
            "CALL" => Opcode::Call,
            "RETURN" => Opcode::Return,
            "PUSHS" => Opcode::Pushs,
            "POPS" => Opcode::Pops,
            "CLEARS" => Opcode::Clears,
            "ADD" => Opcode::Add(Positional),
            "ADDS" => Opcode::Add(Stack),
            "SUB" => Opcode::Sub(Positional),
            "SUBS" => Opcode::Sub(Stack),
            "MUL" => Opcode::Mul(Positional),
            "MULS" => Opcode::Mul(Stack),
            "IDIV" => Opcode::IDiv(Positional),
            "IDIVS" => Opcode::IDiv(Stack),
            "DIV" => Opcode::Div(Positional),
            "DIVS" => Opcode::Div(Stack),
            "LT" => Opcode::Lt(Positional),
            "LTS" => Opcode::Lt(Stack),
            "GT" => Opcode::Gt(Positional),
            "GTS" => Opcode::Gt(Stack),
            "EQ" => Opcode::Eq(Positional),
            "EQS" => Opcode::Eq(Stack),
            "AND" => Opcode::And(Positional),
            "ANDS" => Opcode::And(Stack),
            "OR" => Opcode::Or(Positional),
            "ORS" => Opcode::Or(Stack),
            "NOT" => Opcode::Not(Positional),
            "NOTS" => Opcode::Not(Stack),
            "INT2FLOAT" => Opcode::Int2Float(Positional),
            "INT2FLOATS" => Opcode::Int2Float(Stack),
            "FLOAT2INT" => Opcode::Float2Int(Positional),
            "FLOAT2INTS" => Opcode::Float2Int(Stack),
            "INT2CHAR" => Opcode::Int2Char(Positional),
            "INT2CHARS" => Opcode::Int2Char(Stack),
            "STRI2INT" => Opcode::Stri2Int(Positional),
            "STRI2INTS" => Opcode::Stri2Int(Stack),
            "READ" => Opcode::Read,
            "WRITE" => Opcode::Write,
            "CONCAT" => Opcode::Concat,
            "STRLEN" => Opcode::Strlen,
            "GETCHAR" => Opcode::Getchar,
            "SETCHAR" => Opcode::Setchar,
            "TYPE" => Opcode::TypeOf,
            "LABEL" => Opcode::Label,
            "JUMP" => Opcode::Jump,
            "JUMPIFEQ" => Opcode::JumpIfEq(Positional),
            "JUMPIFEQS" => Opcode::JumpIfEq(Stack),
            "JUMPIFNEQ" => Opcode::JumpIfNeq(Positional),
            "JUMPIFNEQS" => Opcode::JumpIfNeq(Stack),
            "EXIT" => Opcode::Exit,
            "DPRINT" => Opcode::Dprint,
            "BREAK" => Opcode::Break,
            _ => return None,
        })
    }

    /// The canonical mnemonic, including the `S` suffix for stack
    /// forms.
    pub fn mnemonic(&self) -> &'static str {
        use Mode::{Positional, Stack};
        match self {
            Opcode::Move => "MOVE",
            Opcode::CreateFrame => "CREATEFRAME",
            Opcode::PushFrame => "PUSHFRAME",
            Opcode::PopFrame => "POPFRAME",
            Opcode::DefVar => "DEFVAR",
            Opcode::Call => "CALL",
            Opcode::Return => "RETURN",
            Opcode::Pushs => "PUSHS",
            Opcode::Pops => "POPS",
            Opcode::Clears => "CLEARS",
            Opcode::Add(Positional) => "ADD",
            Opcode::Add(Stack) => "ADDS",
            Opcode::Sub(Positional) => "SUB",
            Opcode::Sub(Stack) => "SUBS",
            Opcode::Mul(Positional) => "MUL",
            Opcode::Mul(Stack) => "MULS",
            Opcode::IDiv(Positional) => "IDIV",
            Opcode::IDiv(Stack) => "IDIVS",
            Opcode::Div(Positional) => "DIV",
            Opcode::Div(Stack) => "DIVS",
            Opcode::Lt(Positional) => "LT",
            Opcode::Lt(Stack) => "LTS",
            Opcode::Gt(Positional) => "GT",
            Opcode::Gt(Stack) => "GTS",
            Opcode::Eq(Positional) => "EQ",
            Opcode::Eq(Stack) => "EQS",
            Opcode::And(Positional) => "AND",
            Opcode::And(Stack) => "ANDS",
            Opcode::Or(Positional) => "OR",
            Opcode::Or(Stack) => "ORS",
            Opcode::Not(Positional) => "NOT",
            Opcode::Not(Stack) => "NOTS",
            Opcode::Int2Float(Positional) => "INT2FLOAT",
            Opcode::Int2Float(Stack) => "INT2FLOATS",
            Opcode::Float2Int(Positional) => "FLOAT2INT",
            Opcode::Float2Int(Stack) => "FLOAT2INTS",
            Opcode::Int2Char(Positional) => "INT2CHAR",
            Opcode::Int2Char(Stack) => "INT2CHARS",
            Opcode::Stri2Int(Positional) => "STRI2INT",
            Opcode::Stri2Int(Stack) => "STRI2INTS",
            Opcode::Read => "READ",
            Opcode::Write => "WRITE",
            Opcode::Concat => "CONCAT",
            Opcode::Strlen => "STRLEN",
            Opcode::Getchar => "GETCHAR",
            Opcode::Setchar => "SETCHAR",
            Opcode::TypeOf => "TYPE",
            Opcode::Label => "LABEL",
            Opcode::Jump => "JUMP",
            Opcode::JumpIfEq(Positional) => "JUMPIFEQ",
            Opcode::JumpIfEq(Stack) => "JUMPIFEQS",
            Opcode::JumpIfNeq(Positional) => "JUMPIFNEQ",
            Opcode::JumpIfNeq(Stack) => "JUMPIFNEQS",
            Opcode::Exit => "EXIT",
            Opcode::Dprint => "DPRINT",
            Opcode::Break => "BREAK",
        }
    }

    /// Expected operand kinds, in order. Stack forms take no positional
    /// operands, except the conditional jumps which keep their label.
    pub fn signature(&self) -> &'static [ArgKind] {
        use ArgKind::{Label, Symb, Type, Var};
        use Mode::{Positional, Stack};
        match self {
            Opcode::CreateFrame
            | Opcode::PushFrame
            | Opcode::PopFrame
            | Opcode::Return
            | Opcode::Clears
            | Opcode::Break => &[],

            Opcode::DefVar | Opcode::Pops => &[Var],
            Opcode::Call | Opcode::Label | Opcode::Jump => &[Label],
            Opcode::Pushs | Opcode::Write | Opcode::Exit | Opcode::Dprint => &[Symb],
            Opcode::Read => &[Var, Type],

            Opcode::Move | Opcode::Strlen | Opcode::TypeOf => &[Var, Symb],

            Opcode::Add(Positional)
            | Opcode::Sub(Positional)
            | Opcode::Mul(Positional)
            | Opcode::IDiv(Positional)
            | Opcode::Div(Positional)
            | Opcode::Lt(Positional)
            | Opcode::Gt(Positional)
            | Opcode::Eq(Positional)
            | Opcode::And(Positional)
            | Opcode::Or(Positional)
            | Opcode::Stri2Int(Positional)
            | Opcode::Concat
            | Opcode::Getchar
            | Opcode::Setchar => &[Var, Symb, Symb],

            Opcode::Not(Positional)
            | Opcode::Int2Float(Positional)
            | Opcode::Float2Int(Positional)
            | Opcode::Int2Char(Positional) => &[Var, Symb],

            Opcode::Add(Stack)
            | Opcode::Sub(Stack)
            | Opcode::Mul(Stack)
            | Opcode::IDiv(Stack)
            | Opcode::Div(Stack)
            | Opcode::Lt(Stack)
            | Opcode::Gt(Stack)
            | Opcode::Eq(Stack)
            | Opcode::And(Stack)
            | Opcode::Or(Stack)
            | Opcode::Not(Stack)
            | Opcode::Int2Float(Stack)
            | Opcode::Float2Int(Stack)
            | Opcode::Int2Char(Stack)
            | Opcode::Stri2Int(Stack) => &[],

            Opcode::JumpIfEq(Positional) | Opcode::JumpIfNeq(Positional) => &[Label, Symb, Symb],
            Opcode::JumpIfEq(Stack) | Opcode::JumpIfNeq(Stack) => &[Label],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonic_roundtrip() {
        for name in [
            "MOVE",
            "CREATEFRAME",
            "DEFVAR",
            "ADDS",
            "IDIV",
            "JUMPIFNEQS",
            "TYPE",
            "BREAK",
        ] {
            let op = Opcode::from_mnemonic(name).unwrap();
            assert_eq!(op.mnemonic(), name);
        }
    }

    #[test]
    fn unknown_mnemonic() {
        assert_eq!(Opcode::from_mnemonic("FROBNICATE"), None);
        // Lookup expects upper case; the loader upper-cases first.
        assert_eq!(Opcode::from_mnemonic("move"), None);
    }

    #[test]
    fn stack_forms_drop_positional_operands() {
        assert_eq!(Opcode::from_mnemonic("ADD").unwrap().signature().len(), 3);
        assert_eq!(Opcode::from_mnemonic("ADDS").unwrap().signature().len(), 0);
        // Conditional stack jumps keep their label operand.
        assert_eq!(
            Opcode::from_mnemonic("JUMPIFEQS").unwrap().signature(),
            &[ArgKind::Label]
        );
    }

    #[test]
    fn read_takes_a_type_operand() {
        assert_eq!(
            Opcode::Read.signature(),
            &[ArgKind::Var, ArgKind::Type]
        );
    }
}
