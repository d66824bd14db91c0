//! Execution engine for the IPPcode23 three-address pseudo-assembly
//! language. This crate owns everything downstream of a parsed instruction
//! stream: decoding operands, building a label-resolved [`program::Program`],
//! and running it to completion or to the fault that stops it.
//!
//! Turning XML source into that instruction stream is a separate concern,
//! owned by the `ippcode23-loader` crate in this workspace.

pub mod decode;
pub mod engine;
pub mod error;
pub mod frame;
pub mod instruction;
pub mod opcode;
pub mod operand;
pub mod program;
pub mod raw;
pub mod value;


pub use engine::Engine;
pub use error::{BuildFault, EngineFault, ExitCode, Fault, ProgramError};
pub use instruction::Instruction;
pub use opcode::OpCode;
pub use operand::{Operand, VarRef};
pub use program::Program;
pub use raw::{RawArg, RawArgKind, RawInstruction};
pub use value::{Value, ValueType};
