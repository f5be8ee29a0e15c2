use std::io::{Read, Write};

use tracing::debug;

use crate::{bytecode::Instruction, parser::Opcode};

use super::{Runtime, RuntimeError};

/// Executes optimized bytecode, i.e. jumps carry the index of their partner.
pub struct ByteCodeInterpreter {
    /// Instructions dispatched during the last run
    pub steps: u64,
    step_limit: Option<u64>,
}

impl ByteCodeInterpreter {
    pub fn new() -> Self {
        Self {
            steps: 0,
            step_limit: None,
        }
    }

    /// Gives up with `StepLimitExceeded` after `limit` dispatches
    #[cfg(test)]
    pub fn with_step_limit(limit: u64) -> Self {
        Self {
            steps: 0,
            step_limit: Some(limit),
        }
    }

    /// Runs until `Halt`. Without a step limit a program that never leaves
    /// a loop never returns.
    pub fn run<R: Read, W: Write>(
        &mut self,
        runtime: &mut Runtime<R, W>,
        instructions: &[Instruction],
    ) -> Result<(), RuntimeError> {
        let mut ip = 0;
        self.steps = 0;

        while let Some(instruction) = instructions.get(ip) {
            if let Some(limit) = self.step_limit {
                if self.steps >= limit && instruction.op != Opcode::Halt {
                    runtime.flush()?;
                    return Err(RuntimeError::StepLimitExceeded { limit });
                }
            }
            match instruction.op {
                Opcode::Add => runtime.deref_and_add_value(instruction.arg),
                Opcode::Sub => runtime.deref_and_sub_value(instruction.arg),
                Opcode::IncPtr => runtime.shift_right(instruction.arg)?,
                Opcode::DecPtr => runtime.shift_left(instruction.arg)?,
                Opcode::Output => runtime.write(instruction.arg)?,
                Opcode::Input => runtime.read(instruction.arg)?,
                Opcode::JumpIfZero => {
                    if runtime.value_is_zero() {
                        // lands on the matching close, the ++ below steps past it
                        ip = instruction.arg;
                    }
                }
                Opcode::JumpIfNonZero => {
                    if !runtime.value_is_zero() {
                        ip = instruction.arg;
                    }
                }
                Opcode::Halt => break,
            }
            self.steps += 1;
            ip += 1;
        }

        runtime.flush()?;
        debug!(steps = self.steps, "bytecode interpreter halted");
        Ok(())
    }
}

impl Default for ByteCodeInterpreter {
    fn default() -> Self {
        Self::new()
    }
}
