//! Instructions and their operands.

use std::fmt;

use crate::opcode::Opcode;
use crate::value::Value;

/// The frame a variable reference names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// `GF@` — the single program-lifetime global frame.
    Global,
    /// `TF@` — the temporary frame, which may be absent.
    Temporary,
    /// `LF@` — the top of the local frame stack.
    Local,
}

impl Scope {
    /// Parse the `GF`/`TF`/`LF` spelling.
    pub fn from_prefix(prefix: &str) -> Option<Scope> {
        match prefix {
            "GF" => Some(Scope::Global),
            "TF" => Some(Scope::Temporary),
            "LF" => Some(Scope::Local),
            _ => None,
        }
    }

    /// The `GF`/`TF`/`LF` spelling.
    pub fn prefix(&self) -> &'static str {
        match self {
            Scope::Global => "GF",
            Scope::Temporary => "TF",
            Scope::Local => "LF",
        }
    }
}

/// A reference to a named variable in one of the three frame scopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarRef {
    pub scope: Scope,
    pub name: String,
}

impl VarRef {
    pub fn new(scope: Scope, name: impl Into<String>) -> Self {
        Self {
            scope,
            name: name.into(),
        }
    }
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.scope.prefix(), self.name)
    }
}

/// A positional instruction operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// A variable reference, resolved against the frame store at
    /// execution time.
    Var(VarRef),
    /// A literal value, fully decoded by the loader.
    Literal(Value),
}

/// A single instruction: an opcode plus zero to three operands.
///
/// The loader guarantees the operand count and kinds match the
/// opcode's signature; the engine still checks every runtime condition
/// (frames, types, values) itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: Vec<Operand>,
}

impl Instruction {
    pub fn new(opcode: Opcode, operands: Vec<Operand>) -> Self {
        Self { opcode, operands }
    }

    /// The operand at `index`, if present.
    pub fn operand(&self, index: usize) -> Option<&Operand> {
        self.operands.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_prefix_roundtrip() {
        for prefix in ["GF", "TF", "LF"] {
            assert_eq!(Scope::from_prefix(prefix).unwrap().prefix(), prefix);
        }
        assert_eq!(Scope::from_prefix("XF"), None);
        assert_eq!(Scope::from_prefix("gf"), None);
    }

    #[test]
    fn var_ref_display() {
        let var = VarRef::new(Scope::Global, "counter");
        assert_eq!(var.to_string(), "GF@counter");
    }

    #[test]
    fn operand_access() {
        let instr = Instruction::new(
            Opcode::Move,
            vec![
                Operand::Var(VarRef::new(Scope::Global, "x")),
                Operand::Literal(Value::Int(5)),
            ],
        );
        assert!(matches!(instr.operand(0), Some(Operand::Var(_))));
        assert!(matches!(
            instr.operand(1),
            Some(Operand::Literal(Value::Int(5)))
        ));
        assert_eq!(instr.operand(2), None);
    }
}
