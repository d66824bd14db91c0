//! The execution loop. `Engine` is generic over its three I/O channels —
//! program output, program input, and the diagnostic channel `DPRINT`/`BREAK`
//! write to — so tests can run a program against plain `Vec<u8>` buffers
//! without touching real stdio, the same shape the teacher's test harness
//! gave its memory-mapped `StorageMut`.

use std::io::{BufRead, Write};

use crate::decode;
use crate::error::{EngineFault, Fault};
use crate::frame::{Frame, FrameTag};
use crate::operand::{Operand, VarRef};
use crate::opcode::OpCode;
use crate::program::Program;
use crate::value::Value;

enum StepOutcome {
    Continue,
    Exit(i32),
}

/// Live state across one run of a [`Program`]: the program counter, the
/// three frame kinds (`GF` always present, `TF` optional, `LF` the top of
/// `frame_stack`), the call stack of return addresses, and the data stack
/// `PUSHS`/`POPS` operate on.
pub struct Engine<'p, O: Write, I: BufRead, D: Write> {
    program: &'p Program,
    pc: usize,
    gf: Frame,
    tf: Option<Frame>,
    frame_stack: Vec<Frame>,
    call_stack: Vec<usize>,
    data_stack: Vec<Value>,
    output: O,
    input: I,
    diag: D,
}

impl<'p, O: Write, I: BufRead, D: Write> Engine<'p, O, I, D> {
    pub fn new(program: &'p Program, output: O, input: I, diag: D) -> Engine<'p, O, I, D> {
        Engine {
            program,
            pc: 0,
            gf: Frame::new(),
            tf: None,
            frame_stack: Vec::new(),
            call_stack: Vec::new(),
            data_stack: Vec::new(),
            output,
            input,
            diag,
        }
    }

    /// Runs to completion: either the program counter walks off the end, or
    /// an `EXIT` instruction halts it. Returns the process exit code on
    /// success (`0` if the program simply ran out of instructions) and the
    /// fault on failure — callers map that through `ExitCode::from`.
    ///
    /// `step` never advances `pc` on an `Err` path, so `self.pc` at the
    /// point of failure is exactly the address of the instruction that
    /// raised it; that is what locates the [`Fault`] this returns.
    pub fn run(&mut self) -> Result<i32, Fault> {
        while self.pc < self.program.len() {
            let address = self.pc;
            match self.step().map_err(|kind| Fault::new(address, kind))? {
                StepOutcome::Continue => {}
                StepOutcome::Exit(code) => return Ok(code),
            }
        }
        Ok(0)
    }

    fn step(&mut self) -> Result<StepOutcome, EngineFault> {
        let program = self.program;
        let instr = &program.instructions[self.pc];
        let opcode = instr.opcode;
        let operands = &instr.operands;
        let jump_target = instr.jump_target;
        let mut next_pc = self.pc + 1;

        match opcode {
            OpCode::MOVE => {
                let value = self.eval_defined_symb(&operands[1])?;
                self.write_var(expect_var(&operands[0])?, value)?;
            }
            OpCode::CREATEFRAME => {
                self.tf = Some(Frame::new());
            }
            OpCode::PUSHFRAME => {
                let frame = self.tf.take().ok_or(EngineFault::FrameMissing("TF"))?;
                self.frame_stack.push(frame);
            }
            OpCode::POPFRAME => {
                let frame = self
                    .frame_stack
                    .pop()
                    .ok_or(EngineFault::FrameMissing("LF"))?;
                self.tf = Some(frame);
            }
            OpCode::DEFVAR => {
                let vref = expect_var(&operands[0])?;
                self.frame_mut(vref.frame)?.declare(&vref.name)?;
            }
            OpCode::CALL => {
                self.call_stack.push(next_pc);
                next_pc = expect_jump_target(jump_target)?;
            }
            OpCode::RETURN => {
                next_pc = self
                    .call_stack
                    .pop()
                    .ok_or(EngineFault::ValueMissing("call stack is empty"))?;
            }
            OpCode::PUSHS => {
                let value = self.eval_defined_symb(&operands[0])?;
                self.data_stack.push(value);
            }
            OpCode::POPS => {
                let value = self
                    .data_stack
                    .pop()
                    .ok_or(EngineFault::ValueMissing("data stack is empty"))?;
                self.write_var(expect_var(&operands[0])?, value)?;
            }
            OpCode::ADD | OpCode::SUB | OpCode::MUL | OpCode::IDIV => {
                self.exec_arith(opcode, operands)?;
            }
            OpCode::LT | OpCode::GT | OpCode::EQ => {
                self.exec_compare(opcode, operands)?;
            }
            OpCode::AND | OpCode::OR | OpCode::NOT => {
                self.exec_logic(opcode, operands)?;
            }
            OpCode::INT2CHAR => self.exec_int2char(operands)?,
            OpCode::STRI2INT => self.exec_stri2int(operands)?,
            OpCode::CONCAT => self.exec_concat(operands)?,
            OpCode::GETCHAR => self.exec_getchar(operands)?,
            OpCode::SETCHAR => self.exec_setchar(operands)?,
            OpCode::STRLEN => self.exec_strlen(operands)?,
            OpCode::TYPE => self.exec_type(operands)?,
            OpCode::LABEL => {}
            OpCode::JUMP => {
                next_pc = expect_jump_target(jump_target)?;
            }
            OpCode::JUMPIFEQ => {
                if self.values_equal_for_jump(&operands[1], &operands[2])? {
                    next_pc = expect_jump_target(jump_target)?;
                }
            }
            OpCode::JUMPIFNEQ => {
                if !self.values_equal_for_jump(&operands[1], &operands[2])? {
                    next_pc = expect_jump_target(jump_target)?;
                }
            }
            OpCode::EXIT => {
                let value = self.eval_defined_symb(&operands[0])?;
                let code = match value {
                    Value::Int(n) => n,
                    _ => return Err(EngineFault::TypeMismatch("EXIT requires an int operand")),
                };
                if !(0..=49).contains(&code) {
                    return Err(EngineFault::ExitValueOutOfRange(code));
                }
                return Ok(StepOutcome::Exit(code as i32));
            }
            OpCode::DPRINT => {
                let value = self.eval_defined_symb(&operands[0])?;
                write!(self.diag, "{}", value)
                    .map_err(|e| EngineFault::Internal(e.to_string()))?;
            }
            OpCode::WRITE => {
                let value = self.eval_defined_symb(&operands[0])?;
                write!(self.output, "{}", value).map_err(|e| EngineFault::Internal(e.to_string()))?;
            }
            OpCode::READ => self.exec_read(operands)?,
            OpCode::BREAK => self.exec_break()?,
        }

        self.pc = next_pc;
        Ok(StepOutcome::Continue)
    }

    fn frame_ref(&self, tag: FrameTag) -> Result<&Frame, EngineFault> {
        match tag {
            FrameTag::GF => Ok(&self.gf),
            FrameTag::LF => self.frame_stack.last().ok_or(EngineFault::FrameMissing("LF")),
            FrameTag::TF => self.tf.as_ref().ok_or(EngineFault::FrameMissing("TF")),
        }
    }

    fn frame_mut(&mut self, tag: FrameTag) -> Result<&mut Frame, EngineFault> {
        match tag {
            FrameTag::GF => Ok(&mut self.gf),
            FrameTag::LF => self
                .frame_stack
                .last_mut()
                .ok_or(EngineFault::FrameMissing("LF")),
            FrameTag::TF => self.tf.as_mut().ok_or(EngineFault::FrameMissing("TF")),
        }
    }

    fn read_var(&self, vref: &VarRef) -> Result<Value, EngineFault> {
        let frame = self.frame_ref(vref.frame)?;
        frame
            .get(&vref.name)
            .cloned()
            .ok_or_else(|| EngineFault::VarNotDeclared(vref.name.clone()))
    }

    fn write_var(&mut self, vref: &VarRef, value: Value) -> Result<(), EngineFault> {
        self.frame_mut(vref.frame)?.set(&vref.name, value)
    }

    fn eval_symb(&self, operand: &Operand) -> Result<Value, EngineFault> {
        match operand {
            Operand::Const(value) => Ok(value.clone()),
            Operand::Var(vref) => self.read_var(vref),
            _ => Err(EngineFault::Internal(
                "operand decoded as a non-symb value in a symb position".into(),
            )),
        }
    }

    fn eval_defined_symb(&self, operand: &Operand) -> Result<Value, EngineFault> {
        let value = self.eval_symb(operand)?;
        if value.is_undef() {
            return Err(EngineFault::ValueMissing("read of an undefined variable"));
        }
        Ok(value)
    }

    fn exec_arith(&mut self, opcode: OpCode, operands: &[Operand]) -> Result<(), EngineFault> {
        let a = expect_int(&self.eval_defined_symb(&operands[1])?)?;
        let b = expect_int(&self.eval_defined_symb(&operands[2])?)?;
        let result = match opcode {
            OpCode::ADD => a.checked_add(b),
            OpCode::SUB => a.checked_sub(b),
            OpCode::MUL => a.checked_mul(b),
            OpCode::IDIV => {
                if b == 0 {
                    return Err(EngineFault::DivisionByZero);
                }
                a.checked_div(b)
            }
            _ => unreachable!("exec_arith only dispatches ADD/SUB/MUL/IDIV"),
        }
        .ok_or_else(|| EngineFault::Internal("integer overflow".into()))?;
        self.write_var(expect_var(&operands[0])?, Value::Int(result))
    }

    fn exec_compare(&mut self, opcode: OpCode, operands: &[Operand]) -> Result<(), EngineFault> {
        let a = self.eval_defined_symb(&operands[1])?;
        let b = self.eval_defined_symb(&operands[2])?;
        let result = match opcode {
            OpCode::EQ => values_equal(&a, &b)?,
            OpCode::LT => ordered_compare(&a, &b)? == std::cmp::Ordering::Less,
            OpCode::GT => ordered_compare(&a, &b)? == std::cmp::Ordering::Greater,
            _ => unreachable!("exec_compare only dispatches LT/GT/EQ"),
        };
        self.write_var(expect_var(&operands[0])?, Value::Bool(result))
    }

    fn values_equal_for_jump(&self, lhs: &Operand, rhs: &Operand) -> Result<bool, EngineFault> {
        let a = self.eval_defined_symb(lhs)?;
        let b = self.eval_defined_symb(rhs)?;
        values_equal(&a, &b)
    }

    fn exec_logic(&mut self, opcode: OpCode, operands: &[Operand]) -> Result<(), EngineFault> {
        let result = match opcode {
            OpCode::NOT => {
                let a = expect_bool(&self.eval_defined_symb(&operands[1])?)?;
                !a
            }
            OpCode::AND | OpCode::OR => {
                let a = expect_bool(&self.eval_defined_symb(&operands[1])?)?;
                let b = expect_bool(&self.eval_defined_symb(&operands[2])?)?;
                if opcode == OpCode::AND {
                    a && b
                } else {
                    a || b
                }
            }
            _ => unreachable!("exec_logic only dispatches AND/OR/NOT"),
        };
        self.write_var(expect_var(&operands[0])?, Value::Bool(result))
    }

    fn exec_int2char(&mut self, operands: &[Operand]) -> Result<(), EngineFault> {
        let code = expect_int(&self.eval_defined_symb(&operands[1])?)?;
        let ch = u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| EngineFault::Encoding(format!("{} is not a valid code point", code)))?;
        self.write_var(expect_var(&operands[0])?, Value::Str(ch.to_string()))
    }

    fn exec_stri2int(&mut self, operands: &[Operand]) -> Result<(), EngineFault> {
        let s = expect_str(&self.eval_defined_symb(&operands[1])?)?;
        let index = expect_int(&self.eval_defined_symb(&operands[2])?)?;
        let ch = char_at(&s, index)
            .ok_or_else(|| EngineFault::Encoding(format!("index {} out of range", index)))?;
        self.write_var(expect_var(&operands[0])?, Value::Int(ch as i64))
    }

    fn exec_concat(&mut self, operands: &[Operand]) -> Result<(), EngineFault> {
        let a = expect_str(&self.eval_defined_symb(&operands[1])?)?;
        let b = expect_str(&self.eval_defined_symb(&operands[2])?)?;
        self.write_var(expect_var(&operands[0])?, Value::Str(a + &b))
    }

    fn exec_getchar(&mut self, operands: &[Operand]) -> Result<(), EngineFault> {
        let s = expect_str(&self.eval_defined_symb(&operands[1])?)?;
        let index = expect_int(&self.eval_defined_symb(&operands[2])?)?;
        let ch = char_at(&s, index)
            .ok_or_else(|| EngineFault::Encoding(format!("index {} out of range", index)))?;
        self.write_var(expect_var(&operands[0])?, Value::Str(ch.to_string()))
    }

    fn exec_setchar(&mut self, operands: &[Operand]) -> Result<(), EngineFault> {
        let vref = expect_var(&operands[0])?;
        let dest = self.read_var(vref)?;
        let mut chars: Vec<char> = expect_str(&dest)?.chars().collect();

        let index = expect_int(&self.eval_defined_symb(&operands[1])?)?;
        let source = expect_str(&self.eval_defined_symb(&operands[2])?)?;
        let replacement = source
            .chars()
            .next()
            .ok_or_else(|| EngineFault::Encoding("SETCHAR source string is empty".into()))?;

        let i = usize::try_from(index)
            .ok()
            .filter(|&i| i < chars.len())
            .ok_or_else(|| EngineFault::Encoding(format!("index {} out of range", index)))?;
        chars[i] = replacement;

        self.write_var(vref, Value::Str(chars.into_iter().collect()))
    }

    fn exec_strlen(&mut self, operands: &[Operand]) -> Result<(), EngineFault> {
        let s = expect_str(&self.eval_defined_symb(&operands[1])?)?;
        self.write_var(expect_var(&operands[0])?, Value::Int(s.chars().count() as i64))
    }

    fn exec_type(&mut self, operands: &[Operand]) -> Result<(), EngineFault> {
        let value = self.eval_symb(&operands[1])?;
        self.write_var(expect_var(&operands[0])?, Value::Str(value.type_name().to_owned()))
    }

    fn exec_read(&mut self, operands: &[Operand]) -> Result<(), EngineFault> {
        let vref = expect_var(&operands[0])?;
        let ty = operands[1].as_type().ok_or_else(|| {
            EngineFault::Internal("READ's second operand did not decode as a Type".into())
        })?;

        let mut line = String::new();
        let value = match self.input.read_line(&mut line) {
            Ok(0) => Value::Nil,
            Ok(_) => {
                let text = line.trim_end_matches(['\n', '\r']);
                read_value(ty, text).unwrap_or(Value::Nil)
            }
            Err(_) => Value::Nil,
        };

        self.write_var(vref, value)
    }

    fn exec_break(&mut self) -> Result<(), EngineFault> {
        writeln!(
            self.diag,
            "at address {} (pc={}): GF={:?} LF depth={} TF={} call depth={} data depth={}",
            self.pc,
            self.pc,
            self.gf,
            self.frame_stack.len(),
            self.tf.is_some(),
            self.call_stack.len(),
            self.data_stack.len(),
        )
        .map_err(|e| EngineFault::Internal(e.to_string()))
    }
}

/// Every call site here sits behind an operand slot `Program::build` already
/// checked against `OpCode::operand_shape`, so this only fails if `decode`
/// or `program` disagree with that table — an engine bug, not a malformed
/// program, mirroring how the teacher's `Core::tick` treats an opcode its
/// own dispatch table doesn't recognize as a no-op rather than a panic.
fn expect_var(operand: &Operand) -> Result<&VarRef, EngineFault> {
    operand.as_var().ok_or_else(|| {
        EngineFault::Internal("operand did not decode as a Var in a Var position".into())
    })
}

fn expect_jump_target(jump_target: Option<usize>) -> Result<usize, EngineFault> {
    jump_target.ok_or_else(|| {
        EngineFault::Internal("jump opcode reached without a pre-resolved target".into())
    })
}

fn expect_int(value: &Value) -> Result<i64, EngineFault> {
    match value {
        Value::Int(n) => Ok(*n),
        _ => Err(EngineFault::TypeMismatch("expected an int operand")),
    }
}

fn expect_bool(value: &Value) -> Result<bool, EngineFault> {
    match value {
        Value::Bool(b) => Ok(*b),
        _ => Err(EngineFault::TypeMismatch("expected a bool operand")),
    }
}

fn expect_str(value: &Value) -> Result<String, EngineFault> {
    match value {
        Value::Str(s) => Ok(s.clone()),
        _ => Err(EngineFault::TypeMismatch("expected a string operand")),
    }
}

fn char_at(s: &str, index: i64) -> Option<char> {
    usize::try_from(index).ok().and_then(|i| s.chars().nth(i))
}

fn values_equal(a: &Value, b: &Value) -> Result<bool, EngineFault> {
    match (a, b) {
        (Value::Nil, Value::Nil) => Ok(true),
        (Value::Nil, _) | (_, Value::Nil) => Ok(false),
        (Value::Int(x), Value::Int(y)) => Ok(x == y),
        (Value::Bool(x), Value::Bool(y)) => Ok(x == y),
        (Value::Str(x), Value::Str(y)) => Ok(x == y),
        _ => Err(EngineFault::TypeMismatch(
            "EQ requires operands of the same type, or one of them nil",
        )),
    }
}

fn ordered_compare(a: &Value, b: &Value) -> Result<std::cmp::Ordering, EngineFault> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Ok(x.cmp(y)),
        (Value::Str(x), Value::Str(y)) => Ok(x.cmp(y)),
        _ => Err(EngineFault::TypeMismatch(
            "LT/GT require operands of the same type, excluding nil",
        )),
    }
}

fn read_value(ty: crate::value::ValueType, text: &str) -> Option<Value> {
    use crate::value::ValueType;
    match ty {
        ValueType::Int => decode::decode_int(text).ok().map(Value::Int),
        // Unlike Int/Str, bool READ never fails: any text other than a
        // case-insensitive "true" reads as false.
        ValueType::Bool => Some(Value::Bool(text.eq_ignore_ascii_case("true"))),
        ValueType::Str => Some(Value::Str(text.to_owned())),
    }
}
