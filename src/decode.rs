//! Turns the still-textual [`crate::raw::RawArg`] produced by the loader
//! into a typed [`Operand`]. Integer literals and string escapes are decoded
//! by hand-written scanners rather than a regex or a borrowed parser crate:
//! the grammar (underscore digit separators, `0x`/`0o` radix prefixes,
//! `\ddd` escapes) is small and idiosyncratic enough that a scanner reads
//! more plainly than a pattern would, and it lets each malformed-input case
//! report exactly which rule it broke.

use crate::error::ProgramError;
use crate::frame::FrameTag;
use crate::opcode::OperandSlot;
use crate::operand::{Operand, VarRef};
use crate::raw::{RawArg, RawArgKind};
use crate::value::{Value, ValueType};

/// Parses an IPPcode23 integer literal: an optional sign, an optional
/// `0x`/`0X` (hex) or `0o`/`0O` (octal) radix prefix, then one or more
/// digits of that radix, with `_` permitted between any two digits as a
/// separator.
pub fn decode_int(text: &str) -> Result<i64, ProgramError> {
    let bad = || ProgramError::BadIntLiteral(text.to_owned());

    let mut chars = text.chars().peekable();
    let negative = match chars.peek() {
        Some('+') => {
            chars.next();
            false
        }
        Some('-') => {
            chars.next();
            true
        }
        _ => false,
    };

    // A leading `0` is ambiguous between decimal zero and octal: `0` alone is
    // decimal, `0x../0o..` carry an explicit radix prefix, but `052` is
    // octal-by-leading-zero with no `o` at all — the `0` itself is left
    // unconsumed so the digit loop below folds it in as the first octal
    // digit.
    let radix = if *chars.peek().ok_or_else(bad)? == '0' {
        let mut lookahead = chars.clone();
        lookahead.next();
        match lookahead.peek() {
            Some('x') | Some('X') => {
                chars.next();
                chars.next();
                16
            }
            Some('o') | Some('O') => {
                chars.next();
                chars.next();
                8
            }
            Some(c) if c.is_ascii_digit() || *c == '_' => 8,
            _ => 10,
        }
    } else {
        10
    };

    let mut digits = String::new();
    let mut last_was_digit = false;
    for c in chars {
        if c == '_' {
            if !last_was_digit {
                return Err(bad());
            }
            last_was_digit = false;
            continue;
        }
        if !c.is_digit(radix) {
            return Err(bad());
        }
        digits.push(c);
        last_was_digit = true;
    }
    if digits.is_empty() || !last_was_digit {
        return Err(bad());
    }

    let magnitude = i64::from_str_radix(&digits, radix).map_err(|_| bad())?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Decodes `\ddd` escapes (three decimal digits naming a Unicode scalar
/// value) in an XML `<arg type="string">` body. A backslash not followed by
/// three ASCII digits is left untouched, matching how the loader's upstream
/// text already passed through XML's own entity decoding.
pub fn decode_string(text: &str) -> Result<String, ProgramError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let mut lookahead = chars.clone();
        let digits: String = (0..3)
            .filter_map(|_| lookahead.next().filter(char::is_ascii_digit))
            .collect();

        if digits.len() != 3 {
            out.push('\\');
            continue;
        }

        let code = digits.parse::<u32>().expect("three ascii digits");
        match char::from_u32(code) {
            Some(decoded) => {
                out.push(decoded);
                chars = lookahead;
            }
            None => return Err(ProgramError::BadStringLiteral(text.to_owned())),
        }
    }

    Ok(out)
}

fn decode_bool(text: &str) -> Result<bool, ProgramError> {
    match text {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ProgramError::BadOperand(text.to_owned())),
    }
}

fn decode_var(text: &str) -> Result<VarRef, ProgramError> {
    let (frame_text, name) = text
        .split_once('@')
        .ok_or_else(|| ProgramError::BadOperand(text.to_owned()))?;
    let frame = frame_text
        .parse::<FrameTag>()
        .map_err(|_| ProgramError::BadOperand(text.to_owned()))?;
    Ok(VarRef::new(frame, name))
}

fn decode_type(text: &str) -> Result<ValueType, ProgramError> {
    match text {
        "int" => Ok(ValueType::Int),
        "bool" => Ok(ValueType::Bool),
        "string" => Ok(ValueType::Str),
        _ => Err(ProgramError::BadOperand(text.to_owned())),
    }
}

/// Decodes one raw argument into the [`Operand`] its position in the
/// instruction's [`OperandSlot`] shape demands, rejecting kinds the slot
/// cannot hold (e.g. a `label`-typed argument where a `Symb` was expected).
pub fn decode_arg(raw: &RawArg, slot: OperandSlot) -> Result<Operand, ProgramError> {
    match (slot, raw.kind) {
        (OperandSlot::Var, RawArgKind::Var) => Ok(Operand::Var(decode_var(&raw.text)?)),
        (OperandSlot::Label, RawArgKind::Label) => Ok(Operand::Label(raw.text.clone())),
        (OperandSlot::Type, RawArgKind::Type) => Ok(Operand::Type(decode_type(&raw.text)?)),
        (OperandSlot::Symb, RawArgKind::Var) => Ok(Operand::Var(decode_var(&raw.text)?)),
        (OperandSlot::Symb, RawArgKind::Int) => Ok(Operand::Const(Value::Int(decode_int(
            &raw.text,
        )?))),
        (OperandSlot::Symb, RawArgKind::Bool) => {
            Ok(Operand::Const(Value::Bool(decode_bool(&raw.text)?)))
        }
        (OperandSlot::Symb, RawArgKind::Str) => {
            Ok(Operand::Const(Value::Str(decode_string(&raw.text)?)))
        }
        (OperandSlot::Symb, RawArgKind::Nil) => {
            if raw.text == "nil" {
                Ok(Operand::Const(Value::Nil))
            } else {
                Err(ProgramError::BadOperand(raw.text.clone()))
            }
        }
        _ => Err(ProgramError::BadOperand(raw.text.clone())),
    }
}
