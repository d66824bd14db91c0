//! Assembles a decoded, address-resolved [`Program`] from the loader's
//! [`RawInstruction`] stream. Everything here runs once, before the engine
//! takes its first step: order validation, opcode/arity/operand decoding,
//! and the label pre-pass described in spec §4.4 — a single left-to-right
//! scan that registers every `LABEL`, followed by a resolution pass that
//! turns every jump target into a plain instruction address. A program that
//! survives `build` can no longer fail with an undefined label at runtime.

use std::collections::HashMap;

use crate::error::{BuildFault, ProgramError};
use crate::instruction::Instruction;
use crate::opcode::OpCode;
use crate::decode;
use crate::raw::RawInstruction;

/// A program ready to execute: instructions addressed `0..len`, and the
/// label table the pre-pass built while resolving jump targets.
#[derive(Clone, Debug)]
pub struct Program {
    pub instructions: Vec<Instruction>,
    pub labels: HashMap<String, usize>,
}

impl Program {
    pub fn build(mut raw: Vec<RawInstruction>) -> Result<Program, BuildFault> {
        let mut seen_orders = std::collections::HashSet::with_capacity(raw.len());
        for instr in &raw {
            if !seen_orders.insert(instr.order) {
                return Err(BuildFault::unlocated(ProgramError::DuplicateOrder(
                    instr.order,
                )));
            }
        }
        raw.sort_by_key(|instr| instr.order);

        let mut instructions = Vec::with_capacity(raw.len());
        for (address, instr) in raw.into_iter().enumerate() {
            instructions.push(decode_instruction(address, instr)?);
        }

        let labels = collect_labels(&instructions)?;
        resolve_jump_targets(&mut instructions, &labels)?;

        Ok(Program {
            instructions,
            labels,
        })
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }
}

fn decode_instruction(address: usize, raw: RawInstruction) -> Result<Instruction, BuildFault> {
    let opcode = raw
        .opcode
        .parse::<OpCode>()
        .map_err(|_| BuildFault::new(address, ProgramError::UnknownOpcode(raw.opcode.clone())))?;

    let shape = opcode.operand_shape();
    if raw.args.len() != shape.len() {
        return Err(BuildFault::new(
            address,
            ProgramError::BadArity(raw.opcode.clone()),
        ));
    }

    let operands = raw
        .args
        .iter()
        .zip(shape.iter())
        .map(|(arg, slot)| decode::decode_arg(arg, *slot))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| BuildFault::new(address, e))?;

    Ok(Instruction::new(address, opcode, operands))
}

fn collect_labels(instructions: &[Instruction]) -> Result<HashMap<String, usize>, BuildFault> {
    let mut labels = HashMap::new();
    for instr in instructions {
        if instr.opcode == OpCode::LABEL {
            let name = instr.operands[0]
                .as_label()
                .ok_or_else(|| {
                    BuildFault::new(
                        instr.address,
                        ProgramError::Internal("LABEL operand did not decode as a Label".into()),
                    )
                })?
                .to_owned();
            if labels.insert(name.clone(), instr.address).is_some() {
                return Err(BuildFault::new(instr.address, ProgramError::DuplicateLabel(name)));
            }
        }
    }
    Ok(labels)
}

fn resolve_jump_targets(
    instructions: &mut [Instruction],
    labels: &HashMap<String, usize>,
) -> Result<(), BuildFault> {
    for instr in instructions.iter_mut() {
        if !instr.opcode.is_jump() {
            continue;
        }
        let name = instr.operands[0].as_label().ok_or_else(|| {
            BuildFault::new(
                instr.address,
                ProgramError::Internal(
                    "jump opcode's first operand did not decode as a Label".into(),
                ),
            )
        })?;
        let target = labels.get(name).ok_or_else(|| {
            BuildFault::new(instr.address, ProgramError::UndefinedLabel(name.to_owned()))
        })?;
        instr.jump_target = Some(*target);
    }
    Ok(())
}
