use util::EnumFromStr;
use util_derive::EnumFromStr;

/// The shape a decoded operand list must take for a given [`OpCode`],
/// checked by [`crate::program::Program::build`] before execution ever sees
/// the instruction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OperandSlot {
    /// A writable variable reference.
    Var,
    /// A variable reference or a literal constant.
    Symb,
    /// A label name.
    Label,
    /// One of `int`/`bool`/`string` (only `READ`'s second argument).
    Type,
}

/// The full mnemonic vocabulary of the language. Variant names are the
/// mnemonics themselves, so [`EnumFromStr`] parses an XML `opcode` attribute
/// (already upper-cased by the loader) straight into this enum.
#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumFromStr)]
pub enum OpCode {
    MOVE,
    CREATEFRAME,
    PUSHFRAME,
    POPFRAME,
    DEFVAR,
    CALL,
    RETURN,
    PUSHS,
    POPS,
    ADD,
    SUB,
    MUL,
    IDIV,
    LT,
    GT,
    EQ,
    AND,
    OR,
    NOT,
    INT2CHAR,
    STRI2INT,
    CONCAT,
    GETCHAR,
    SETCHAR,
    STRLEN,
    TYPE,
    LABEL,
    JUMP,
    JUMPIFEQ,
    JUMPIFNEQ,
    EXIT,
    DPRINT,
    WRITE,
    READ,
    BREAK,
}

impl OpCode {
    /// The operand shape this opcode requires, in order. Arity is the slice
    /// length; no opcode accepts a variable number of operands.
    pub fn operand_shape(self) -> &'static [OperandSlot] {
        use OperandSlot::*;
        match self {
            OpCode::MOVE => &[Var, Symb],
            OpCode::CREATEFRAME => &[],
            OpCode::PUSHFRAME => &[],
            OpCode::POPFRAME => &[],
            OpCode::DEFVAR => &[Var],
            OpCode::CALL => &[Label],
            OpCode::RETURN => &[],
            OpCode::PUSHS => &[Symb],
            OpCode::POPS => &[Var],
            OpCode::ADD => &[Var, Symb, Symb],
            OpCode::SUB => &[Var, Symb, Symb],
            OpCode::MUL => &[Var, Symb, Symb],
            OpCode::IDIV => &[Var, Symb, Symb],
            OpCode::LT => &[Var, Symb, Symb],
            OpCode::GT => &[Var, Symb, Symb],
            OpCode::EQ => &[Var, Symb, Symb],
            OpCode::AND => &[Var, Symb, Symb],
            OpCode::OR => &[Var, Symb, Symb],
            OpCode::NOT => &[Var, Symb],
            OpCode::INT2CHAR => &[Var, Symb],
            OpCode::STRI2INT => &[Var, Symb, Symb],
            OpCode::CONCAT => &[Var, Symb, Symb],
            OpCode::GETCHAR => &[Var, Symb, Symb],
            OpCode::SETCHAR => &[Var, Symb, Symb],
            OpCode::STRLEN => &[Var, Symb],
            OpCode::TYPE => &[Var, Symb],
            OpCode::LABEL => &[Label],
            OpCode::JUMP => &[Label],
            OpCode::JUMPIFEQ => &[Label, Symb, Symb],
            OpCode::JUMPIFNEQ => &[Label, Symb, Symb],
            OpCode::EXIT => &[Symb],
            OpCode::DPRINT => &[Symb],
            OpCode::WRITE => &[Symb],
            OpCode::READ => &[Var, Type],
            OpCode::BREAK => &[],
        }
    }

    pub fn arity(self) -> usize {
        self.operand_shape().len()
    }

    /// Whether this opcode carries a label operand that the pre-pass must
    /// resolve to an instruction address before execution begins.
    pub fn is_jump(self) -> bool {
        matches!(
            self,
            OpCode::CALL | OpCode::JUMP | OpCode::JUMPIFEQ | OpCode::JUMPIFNEQ
        )
    }
}
