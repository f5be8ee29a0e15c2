use std::fmt;

use thiserror::Error;

pub mod parser;

/// The closed set of operations a validated program is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Add,
    Sub,

    IncPtr,
    DecPtr,

    Output,
    Input,

    JumpIfZero,
    JumpIfNonZero,

    /// End of program, every opcode sequence finishes with exactly one
    Halt,
}

impl Opcode {
    pub fn is_jump(self) -> bool {
        matches!(self, Opcode::JumpIfZero | Opcode::JumpIfNonZero)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::IncPtr => "incptr",
            Opcode::DecPtr => "decptr",
            Opcode::Output => "output",
            Opcode::Input => "input",
            Opcode::JumpIfZero => "jz",
            Opcode::JumpIfNonZero => "jnz",
            Opcode::Halt => "halt",
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Syntax error: unmatched '[' or ']'")]
    UnmatchedBracket,
}
