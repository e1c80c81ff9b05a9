//! An executable program: the instruction sequence and its label table.

use std::collections::HashMap;

use thiserror::Error;

use crate::instruction::{Instruction, Operand};
use crate::opcode::Opcode;
use crate::value::Value;

/// Error raised while deriving the label table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// The same label is defined by more than one LABEL instruction.
    #[error("label '{0}' defined more than once")]
    DuplicateLabel(String),
}

/// An immutable, pre-validated program.
///
/// Built once by the loader; the engine only reads it. The label table
/// maps each label name to the index of its LABEL instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
    labels: HashMap<String, usize>,
}

impl Program {
    /// Build a program, deriving the label table from the positions of
    /// LABEL instructions.
    pub fn new(instructions: Vec<Instruction>) -> Result<Self, ProgramError> {
        let mut labels = HashMap::new();
        for (index, instr) in instructions.iter().enumerate() {
            if instr.opcode != Opcode::Label {
                continue;
            }
            if let Some(Operand::Literal(Value::Label(name))) = instr.operand(0) {
                if labels.insert(name.clone(), index).is_some() {
                    return Err(ProgramError::DuplicateLabel(name.clone()));
                }
            }
        }
        Ok(Self {
            instructions,
            labels,
        })
    }

    /// The instruction at `index`, if within the program.
    pub fn fetch(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Resolve a label name to its instruction index.
    pub fn label_target(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
