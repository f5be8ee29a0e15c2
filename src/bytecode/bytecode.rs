use crate::parser::Opcode;

use super::Instruction;

/// Lowers validated opcodes into instructions, one for one.
pub fn to_bytecode(opcodes: &[Opcode]) -> Vec<Instruction> {
    let mut instructions = Vec::with_capacity(opcodes.len());

    for &op in opcodes.iter() {
        match op {
            Opcode::Halt => break,
            // resolved during optimization, never read before then
            Opcode::JumpIfZero | Opcode::JumpIfNonZero => {
                instructions.push(Instruction::new(op, Instruction::UNRESOLVED))
            }
            _ => instructions.push(Instruction::new(op, 1)),
        }
    }

    instructions.push(Instruction::HALT);
    instructions
}
