//! Shared program representation for the IPPcode22 interpreter.
//!
//! This crate provides the types both the loader and the execution
//! engine operate on:
//!
//! - [`Value`] — tagged runtime values
//! - [`Opcode`] — the instruction set, with the operand-sourcing
//!   [`Mode`] (positional vs stack) factored out
//! - [`Instruction`] / [`Operand`] / [`VarRef`] — decoded instructions
//! - [`Program`] — the immutable instruction list plus label table
//! - [`hexfloat`] — the hexadecimal float text codec used by WRITE,
//!   READ, and float literals

pub mod hexfloat;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod value;

pub use instruction::{Instruction, Operand, Scope, VarRef};
pub use opcode::{ArgKind, Mode, Opcode};
pub use program::{Program, ProgramError};
pub use value::Value;
