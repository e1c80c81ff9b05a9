//! IPPcode22 execution engine — runs loaded programs sequentially.
//!
//! The engine is a straightforward fetch-decode-execute loop over an
//! immutable [`Program`], with:
//! - Three variable frame tiers (global, temporary, local stack)
//! - A data stack for PUSHS/POPS and the stack-form instructions
//! - A call stack of return addresses for CALL/RETURN
//!
//! # Usage
//!
//! ```
//! use ippcode_common::{Instruction, Opcode, Operand, Program, Value};
//! use ippcode_vm::run;
//!
//! let program = Program::new(vec![
//!     Instruction::new(Opcode::Write, vec![Operand::Literal(Value::Int(42))]),
//! ])
//! .unwrap();
//!
//! let mut input = std::io::empty();
//! let mut output = Vec::new();
//! let mut diag = Vec::new();
//! let code = run(&program, &mut input, &mut output, &mut diag).unwrap();
//! assert_eq!(code, 0);
//! assert_eq!(output, b"42");
//! ```

pub mod error;
pub mod execute;
pub mod frames;
pub mod machine;

pub use error::RuntimeError;
pub use frames::{Frame, FrameError, FrameStore};
pub use machine::Vm;

use std::io::{BufRead, Write};

use ippcode_common::Program;

/// Execute a program and return the process exit code.
///
/// This is the primary entry point for the engine. Input is consumed
/// line by line through READ, program output goes to `output`, and
/// DPRINT/BREAK diagnostics go to `diag`. Execution ends at the end of
/// the program (code 0) or at an EXIT instruction (its operand).
///
/// # Errors
///
/// Returns [`RuntimeError`] if execution fails; [`RuntimeError::exit_code`]
/// gives the process exit code for the failure's category.
pub fn run(
    program: &Program,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
    diag: &mut dyn Write,
) -> Result<i32, RuntimeError> {
    let mut vm = Vm::new(program, input, output, diag);
    vm.execute()
}
