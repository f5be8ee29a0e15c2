use crate::bytecode::Instruction;

/// Counts the run of instructions sharing the opcode at `start`, returning
/// the accumulated repeat count and how many instructions it consumed.
pub fn fold_run(instructions: &[Instruction], start: usize) -> (usize, usize) {
    let op = instructions[start].op;
    // accumulate all the counts into this "constant"
    let mut acc = 0;
    let mut pc = start;

    while pc < instructions.len() && instructions[pc].op == op {
        acc += instructions[pc].arg;
        pc += 1;
    }

    (acc, pc - start)
}
