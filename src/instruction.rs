use crate::opcode::OpCode;
use crate::operand::Operand;

/// A fully decoded instruction, addressed by its position in the sorted
/// program (not by its source `order` attribute, which only determines that
/// position).
///
/// `jump_target`, when set, is the pre-resolved address a `CALL`/`JUMP`/
/// `JUMPIFEQ`/`JUMPIFNEQ` lands on. Resolving it once during
/// [`crate::program::Program::build`] means the execution loop never has to
/// fail a label lookup mid-run: a missing label is a build-time
/// [`crate::error::ProgramError::UndefinedLabel`], not a runtime fault.
#[derive(Clone, PartialEq, Debug)]
pub struct Instruction {
    pub address: usize,
    pub opcode: OpCode,
    pub operands: Vec<Operand>,
    pub jump_target: Option<usize>,
}

impl Instruction {
    pub fn new(address: usize, opcode: OpCode, operands: Vec<Operand>) -> Instruction {
        Instruction {
            address,
            opcode,
            operands,
            jump_target: None,
        }
    }
}
