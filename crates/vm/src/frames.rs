//! The three-tier variable store: global frame, optional temporary
//! frame, and the local frame stack.

use std::collections::HashMap;

use ippcode_common::{Scope, Value, VarRef};

/// Failures from frame and variable access. The engine maps these to
/// [`crate::RuntimeError`] with the current instruction index.
///
/// The ordering contract: frame absence is detected before name
/// absence, which is detected before a missing (uninitialized) value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The referenced frame role does not currently exist.
    MissingFrame,
    /// The frame exists but does not contain the name.
    UnknownVariable(String),
    /// The slot exists but no value was ever assigned.
    MissingValue(String),
    /// DEFVAR on a name already declared in the same frame.
    Redefinition(String),
}

/// One variable frame: name → slot. A slot of `None` means declared
/// but uninitialized, which is distinct from holding `Value::Nil`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    slots: HashMap<String, Option<Value>>,
}

impl Frame {
    fn declare(&mut self, name: &str) -> Result<(), FrameError> {
        if self.slots.contains_key(name) {
            return Err(FrameError::Redefinition(name.to_string()));
        }
        self.slots.insert(name.to_string(), None);
        Ok(())
    }

    fn read(&self, name: &str) -> Result<&Value, FrameError> {
        let slot = self
            .slots
            .get(name)
            .ok_or_else(|| FrameError::UnknownVariable(name.to_string()))?;
        slot.as_ref()
            .ok_or_else(|| FrameError::MissingValue(name.to_string()))
    }

    fn write(&mut self, name: &str, value: Value) -> Result<(), FrameError> {
        let slot = self
            .slots
            .get_mut(name)
            .ok_or_else(|| FrameError::UnknownVariable(name.to_string()))?;
        *slot = Some(value);
        Ok(())
    }

    fn slot(&self, name: &str) -> Result<Option<&Value>, FrameError> {
        self.slots
            .get(name)
            .map(Option::as_ref)
            .ok_or_else(|| FrameError::UnknownVariable(name.to_string()))
    }
}

/// All three frame tiers.
#[derive(Debug, Default)]
pub struct FrameStore {
    pub(crate) global: Frame,
    pub(crate) temporary: Option<Frame>,
    pub(crate) locals: Vec<Frame>,
}

impl FrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn frame(&self, scope: Scope) -> Result<&Frame, FrameError> {
        match scope {
            Scope::Global => Ok(&self.global),
            Scope::Temporary => self.temporary.as_ref().ok_or(FrameError::MissingFrame),
            Scope::Local => self.locals.last().ok_or(FrameError::MissingFrame),
        }
    }

    fn frame_mut(&mut self, scope: Scope) -> Result<&mut Frame, FrameError> {
        match scope {
            Scope::Global => Ok(&mut self.global),
            Scope::Temporary => self.temporary.as_mut().ok_or(FrameError::MissingFrame),
            Scope::Local => self.locals.last_mut().ok_or(FrameError::MissingFrame),
        }
    }

    /// Declare a new, uninitialized variable.
    pub fn declare(&mut self, var: &VarRef) -> Result<(), FrameError> {
        self.frame_mut(var.scope)?.declare(&var.name)
    }

    /// Read a variable's value.
    pub fn read(&self, var: &VarRef) -> Result<&Value, FrameError> {
        self.frame(var.scope)?.read(&var.name)
    }

    /// Assign a variable. Initializes an uninitialized slot; never
    /// fails on one.
    pub fn write(&mut self, var: &VarRef, value: Value) -> Result<(), FrameError> {
        self.frame_mut(var.scope)?.write(&var.name, value)
    }

    /// The slot contents without the missing-value check. Used by TYPE,
    /// where an uninitialized slot is an answer, not an error.
    pub fn slot(&self, var: &VarRef) -> Result<Option<&Value>, FrameError> {
        self.frame(var.scope)?.slot(&var.name)
    }

    /// CREATEFRAME: replace the temporary frame with a fresh empty one,
    /// discarding any previous contents.
    pub fn create_temporary(&mut self) {
        self.temporary = Some(Frame::default());
    }

    /// PUSHFRAME: move the temporary frame onto the local stack,
    /// leaving no temporary frame.
    pub fn push_temporary(&mut self) -> Result<(), FrameError> {
        let frame = self.temporary.take().ok_or(FrameError::MissingFrame)?;
        self.locals.push(frame);
        Ok(())
    }

    /// POPFRAME: pop the top local frame into the temporary slot,
    /// overwriting whatever was there.
    pub fn pop_local(&mut self) -> Result<(), FrameError> {
        let frame = self.locals.pop().ok_or(FrameError::MissingFrame)?;
        self.temporary = Some(frame);
        Ok(())
    }
}
