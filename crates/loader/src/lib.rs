//! IPPcode22 program loader — parses the XML representation into the
//! immutable [`Program`](ippcode_common::Program) the engine executes.
//!
//! # Usage
//!
//! ```
//! let source = r#"<?xml version="1.0" encoding="UTF-8"?>
//! <program language="IPPcode22">
//!   <instruction order="1" opcode="WRITE">
//!     <arg1 type="int">42</arg1>
//!   </instruction>
//! </program>"#;
//!
//! let program = ippcode_loader::load(source).unwrap();
//! assert_eq!(program.len(), 1);
//! ```

pub mod error;
mod xml;

pub use error::LoadError;
pub use xml::load;
