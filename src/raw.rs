/// The lexical kind an XML `<arg>` element declares via its `type` attribute,
/// before [`crate::decode`] turns the text into an [`crate::operand::Operand`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RawArgKind {
    Var,
    Int,
    Str,
    Bool,
    Nil,
    Label,
    Type,
}

/// One `<arg>` element, still as text: the loader's job ends at producing
/// this; everything past it is this crate's.
#[derive(Clone, PartialEq, Debug)]
pub struct RawArg {
    pub kind: RawArgKind,
    pub text: String,
}

impl RawArg {
    pub fn new(kind: RawArgKind, text: impl Into<String>) -> RawArg {
        RawArg {
            kind,
            text: text.into(),
        }
    }
}

/// One `<instruction>` element: an `order`, an `opcode` mnemonic, and its
/// `<arg1>`/`<arg2>`/`<arg3>` operands in position order. This is the
/// external contract surface spec'd in spec §6 — the loader owns turning
/// bytes into this, the engine owns everything from here on.
#[derive(Clone, PartialEq, Debug)]
pub struct RawInstruction {
    pub order: u64,
    pub opcode: String,
    pub args: Vec<RawArg>,
}

impl RawInstruction {
    pub fn new(order: u64, opcode: impl Into<String>, args: Vec<RawArg>) -> RawInstruction {
        RawInstruction {
            order,
            opcode: opcode.into(),
            args,
        }
    }
}
