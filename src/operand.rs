use crate::frame::FrameTag;
use crate::value::{Value, ValueType};

/// A reference to a variable slot: which frame it lives in, and its name.
#[derive(Clone, PartialEq, Debug)]
pub struct VarRef {
    pub frame: FrameTag,
    pub name: String,
}

impl VarRef {
    pub fn new(frame: FrameTag, name: impl Into<String>) -> VarRef {
        VarRef {
            frame,
            name: name.into(),
        }
    }
}

/// A decoded instruction argument. `Operand::Type` is only ever produced
/// for `READ`'s second argument.
#[derive(Clone, PartialEq, Debug)]
pub enum Operand {
    Var(VarRef),
    Const(Value),
    Label(String),
    Type(ValueType),
}

impl Operand {
    pub fn as_var(&self) -> Option<&VarRef> {
        match self {
            Operand::Var(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            Operand::Label(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<ValueType> {
        match self {
            Operand::Type(t) => Some(*t),
            _ => None,
        }
    }
}
