use std::fmt;

use crate::parser::Opcode;

pub mod bytecode;

/// A uniform instruction: an opcode and its integer argument.
///
/// For arithmetic, pointer and I/O opcodes the argument is a repeat count
/// (always 1 before optimization). For jumps it is the index of the matching
/// bracket once the optimizer has resolved it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub op: Opcode,
    pub arg: usize,
}

impl Instruction {
    /// Jump target placeholder, overwritten by the optimizer before use
    pub const UNRESOLVED: usize = usize::MAX;

    pub const HALT: Instruction = Instruction { op: Opcode::Halt, arg: 0 };

    pub fn new(op: Opcode, arg: usize) -> Self {
        Self { op, arg }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            Opcode::Halt => write!(f, "{}", self.op),
            _ if self.op.is_jump() && self.arg == Self::UNRESOLVED => write!(f, "{} ?", self.op),
            _ => write!(f, "{} {}", self.op, self.arg),
        }
    }
}

/// Writes one instruction per line, prefixed by its address.
pub fn disassemble(instructions: &[Instruction], out: &mut impl std::io::Write) -> std::io::Result<()> {
    for (ip, instruction) in instructions.iter().enumerate() {
        writeln!(out, "{:05}  {}", ip, instruction)?;
    }
    Ok(())
}
