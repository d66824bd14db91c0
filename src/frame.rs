use std::collections::HashMap;

use util::EnumFromStr;

use crate::error::EngineFault;
use crate::value::Value;

/// Which of the three frame flavors a `VarRef` names.
#[derive(Clone, Copy, PartialEq, Eq, Debug, util_derive::EnumFromStr)]
pub enum FrameTag {
    GF,
    LF,
    TF,
}

/// A bag of named variable slots. Keys are unique within a frame;
/// insertion order carries no meaning.
#[derive(Default, Clone, Debug)]
pub struct Frame {
    slots: HashMap<String, Value>,
}

impl Frame {
    pub fn new() -> Frame {
        Frame::default()
    }

    /// Declares `name` as holding `Undef`. Fails with
    /// [`EngineFault::VarRedefined`] if the name already exists in this frame.
    pub fn declare(&mut self, name: &str) -> Result<(), EngineFault> {
        if self.slots.contains_key(name) {
            return Err(EngineFault::VarRedefined(name.to_owned()));
        }
        self.slots.insert(name.to_owned(), Value::Undef);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slots.get(name)
    }

    pub fn set(&mut self, name: &str, value: Value) -> Result<(), EngineFault> {
        match self.slots.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(EngineFault::VarNotDeclared(name.to_owned())),
        }
    }
}
