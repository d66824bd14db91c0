//! Turns IPPcode23 XML source into the engine's [`RawInstruction`] stream.
//!
//! Validation here covers only *structure*: the root element, the
//! `<instruction>`/`<argN>` shape, and which lexical category each argument
//! claims to be. It deliberately does not validate an argument's text
//! against its claimed kind's grammar (an `int` arg whose text isn't a
//! number, say) — that's [`ippcode23::decode`]'s job once the instruction
//! reaches `Program::build`, the same division of labor the engine's own
//! module boundary draws between "shape" and "content".

use roxmltree::{Document, Node};

use ippcode23::{RawArg, RawArgKind, RawInstruction};

use crate::error::LoaderError;

pub fn parse(source: &str) -> Result<Vec<RawInstruction>, LoaderError> {
    let doc = Document::parse(source)?;
    let root = doc.root_element();

    if root.tag_name().name() != "program" {
        return Err(structure(format!(
            "root element must be <program>, found <{}>",
            root.tag_name().name()
        )));
    }

    let language_ok = root
        .attribute("language")
        .map(|v| v.eq_ignore_ascii_case("ippcode23"))
        .unwrap_or(false);
    if !language_ok {
        return Err(structure(
            "<program> is missing a language=\"IPPcode23\" attribute".to_owned(),
        ));
    }

    let mut instructions = Vec::new();
    for child in root.children().filter(Node::is_element) {
        if child.tag_name().name() != "instruction" {
            return Err(structure(format!(
                "expected <instruction>, found <{}>",
                child.tag_name().name()
            )));
        }
        instructions.push(parse_instruction(child)?);
    }

    Ok(instructions)
}

fn parse_instruction(node: Node) -> Result<RawInstruction, LoaderError> {
    let order = node
        .attribute("order")
        .ok_or_else(|| structure("<instruction> is missing an order attribute".to_owned()))?
        .parse::<u64>()
        .map_err(|_| structure("instruction order must be a non-negative integer".to_owned()))?;

    let opcode = node
        .attribute("opcode")
        .ok_or_else(|| structure("<instruction> is missing an opcode attribute".to_owned()))?
        .trim()
        .to_ascii_uppercase();
    if opcode.is_empty() {
        return Err(structure("instruction opcode must not be empty".to_owned()));
    }

    let mut args: Vec<(usize, RawArg)> = Vec::new();
    for child in node.children().filter(Node::is_element) {
        let position = arg_position(child.tag_name().name())
            .ok_or_else(|| structure(format!("unexpected element <{}>", child.tag_name().name())))?;
        args.push((position, parse_arg(child)?));
    }
    args.sort_by_key(|(position, _)| *position);
    for (index, (position, _)) in args.iter().enumerate() {
        if *position != index + 1 {
            return Err(structure(format!(
                "instruction {} has non-contiguous argument positions",
                order
            )));
        }
    }

    Ok(RawInstruction::new(
        order,
        opcode,
        args.into_iter().map(|(_, arg)| arg).collect(),
    ))
}

fn arg_position(tag: &str) -> Option<usize> {
    let digits = tag.strip_prefix("arg")?;
    digits.parse::<usize>().ok().filter(|n| *n >= 1)
}

fn parse_arg(node: Node) -> Result<RawArg, LoaderError> {
    let kind_text = node
        .attribute("type")
        .ok_or_else(|| structure(format!("<{}> is missing a type attribute", node.tag_name().name())))?;
    let kind = match kind_text {
        "var" => RawArgKind::Var,
        "int" => RawArgKind::Int,
        "string" => RawArgKind::Str,
        "bool" => RawArgKind::Bool,
        "nil" => RawArgKind::Nil,
        "label" => RawArgKind::Label,
        "type" => RawArgKind::Type,
        other => return Err(structure(format!("unknown argument type: {}", other))),
    };
    let text = node.text().unwrap_or("").trim().to_owned();
    Ok(RawArg::new(kind, text))
}

fn structure(message: String) -> LoaderError {
    LoaderError::Structure(message)
}
