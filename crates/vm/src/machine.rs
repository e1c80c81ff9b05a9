//! Engine state: instruction pointer, frames, data and call stacks,
//! and the injected I/O streams.

use std::io::{BufRead, Write};

use ippcode_common::{Program, Value};

use crate::error::RuntimeError;
use crate::frames::{FrameError, FrameStore};

/// The IPPcode22 interpreter context.
///
/// Owns all mutable execution state; nothing is global. Streams are
/// injected so tests can capture output and feed input.
pub struct Vm<'a> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    /// Instruction pointer.
    pub(crate) pc: usize,
    /// The three variable frame tiers.
    pub(crate) frames: FrameStore,
    /// Data stack used by PUSHS/POPS and the stack-form instructions.
    pub(crate) data: Vec<Value>,
    /// Return addresses pushed by CALL, popped by RETURN.
    pub(crate) calls: Vec<usize>,
    /// Line-oriented input consumed by READ.
    pub(crate) input: &'a mut dyn BufRead,
    /// Output stream written by WRITE.
    pub(crate) output: &'a mut dyn Write,
    /// Diagnostic stream written by DPRINT and BREAK.
    pub(crate) diag: &'a mut dyn Write,
}

impl<'a> Vm<'a> {
    /// Create an interpreter in its initial state: pc 0, empty global
    /// frame, no temporary frame, empty local and auxiliary stacks.
    pub fn new(
        program: &'a Program,
        input: &'a mut dyn BufRead,
        output: &'a mut dyn Write,
        diag: &'a mut dyn Write,
    ) -> Self {
        Self {
            program,
            pc: 0,
            frames: FrameStore::new(),
            data: Vec::new(),
            calls: Vec::new(),
            input,
            output,
            diag,
        }
    }

    /// Pop the data stack.
    pub(crate) fn pop_data(&mut self) -> Result<Value, RuntimeError> {
        self.data
            .pop()
            .ok_or(RuntimeError::MissingValue { at: self.pc })
    }

    /// Pop a return address off the call stack.
    pub(crate) fn pop_return(&mut self) -> Result<usize, RuntimeError> {
        self.calls
            .pop()
            .ok_or(RuntimeError::MissingValue { at: self.pc })
    }

    /// Resolve a label name against the program's label table.
    pub(crate) fn resolve_label(&self, name: &str) -> Result<usize, RuntimeError> {
        self.program
            .label_target(name)
            .ok_or_else(|| RuntimeError::UnknownLabel {
                at: self.pc,
                label: name.to_string(),
            })
    }

    /// Attach the current instruction index to a frame store failure.
    pub(crate) fn frame_error(&self, err: FrameError) -> RuntimeError {
        let at = self.pc;
        match err {
            FrameError::MissingFrame => RuntimeError::MissingFrame { at },
            FrameError::UnknownVariable(name) => RuntimeError::UnknownVariable { at, name },
            FrameError::MissingValue(_) => RuntimeError::MissingValue { at },
            FrameError::Redefinition(name) => RuntimeError::Redefinition { at, name },
        }
    }
}
