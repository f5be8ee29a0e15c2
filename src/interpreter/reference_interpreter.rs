use std::io::{Read, Write};

use tracing::debug;

use crate::{bytecode::Instruction, parser::Opcode};

use super::{Runtime, RuntimeError};

/// Runs bytecode without trusting jump arguments, matching brackets by
/// scanning every time a jump is taken. Slow, but works on the raw output of
/// the bytecode compiler and serves as an oracle for the optimizer.
pub struct ReferenceInterpreter {
    /// Instructions dispatched during the last run
    pub steps: u64,
    step_limit: Option<u64>,
}

impl ReferenceInterpreter {
    pub fn new() -> Self {
        Self {
            steps: 0,
            step_limit: None,
        }
    }

    #[cfg(test)]
    pub fn with_step_limit(limit: u64) -> Self {
        Self {
            steps: 0,
            step_limit: Some(limit),
        }
    }

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
                        ip = Self::matching_close(instructions, ip);
                    }
                }
                Opcode::JumpIfNonZero => {
                    if !runtime.value_is_zero() {
                        ip = Self::matching_open(instructions, ip);
                    }
                }
                Opcode::Halt => break,
            }
            self.steps += 1;
            ip += 1;
        }

        runtime.flush()?;
        debug!(steps = self.steps, "reference interpreter halted");
        Ok(())
    }

    fn matching_close(instructions: &[Instruction], open: usize) -> usize {
        let mut depth = 0usize;
        for (ip, instruction) in instructions.iter().enumerate().skip(open) {
            match instruction.op {
                Opcode::JumpIfZero => depth += 1,
                Opcode::JumpIfNonZero => {
                    depth -= 1;
                    if depth == 0 {
                        return ip;
                    }
                }
                _ => {}
            }
        }
        unreachable!("loop open at {} is never closed", open)
    }

    fn matching_open(instructions: &[Instruction], close: usize) -> usize {
        let mut depth = 0usize;
        for ip in (0..=close).rev() {
            match instructions[ip].op {
                Opcode::JumpIfNonZero => depth += 1,
                Opcode::JumpIfZero => {
                    depth -= 1;
                    if depth == 0 {
                        return ip;
                    }
                }
                _ => {}
            }
        }
        unreachable!("loop close at {} is never opened", close)
    }
}

impl Default for ReferenceInterpreter {
    fn default() -> Self {
        Self::new()
    }
}
