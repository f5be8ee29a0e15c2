use tracing::debug;

use crate::{bytecode::Instruction, parser::Opcode};

use self::constant_folding::fold_run;

pub mod constant_folding;

/// Folds runs of identical non-jump instructions into a single counted
/// instruction and links every bracket pair to its partner, in one forward
/// pass. The output ends in `Halt`.
///
/// Expects bytecode from a validated program: every `JumpIfNonZero` has an
/// earlier unmatched `JumpIfZero`.
pub fn optimize(bytecode: &[Instruction]) -> Vec<Instruction> {
    let mut out: Vec<Instruction> = Vec::with_capacity(bytecode.len());
    // output indices of loop openings still waiting for their close
    let mut loop_stack: Vec<usize> = Vec::new();
    let mut i = 0;

    while i < bytecode.len() && bytecode[i].op != Opcode::Halt {
        let cur = out.len();
        match bytecode[i].op {
            Opcode::JumpIfZero => {
                out.push(Instruction::new(Opcode::JumpIfZero, Instruction::UNRESOLVED));
                loop_stack.push(cur);
                i += 1;
            }
            Opcode::JumpIfNonZero => {
                let Some(open) = loop_stack.pop() else {
                    unreachable!("loop close at {} has no pending open", i);
                };
                out[open].arg = cur;
                out.push(Instruction::new(Opcode::JumpIfNonZero, open));
                i += 1;
            }
            op => {
                let (count, consumed) = fold_run(&bytecode[..], i);
                out.push(Instruction::new(op, count));
                i += consumed;
            }
        }
    }

    debug_assert!(loop_stack.is_empty(), "unclosed loops at {:?}", loop_stack);
    out.push(Instruction::HALT);

    debug!(
        before = bytecode.len(),
        after = out.len(),
        "optimized bytecode"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bytecode::bytecode::to_bytecode, lexer::lexer::Lexer, parser::parser::Parser};

    fn raw(source: &str) -> Vec<Instruction> {
        let tokens = Lexer::new(source.as_bytes(), 30_000).collect_results().unwrap();
        let opcodes = Parser::new(&tokens).parse_program().unwrap();
        to_bytecode(&opcodes)
    }

    /// Pairs (open, close) of raw bracket indices, found by a plain scan
    fn bracket_pairs(instructions: &[Instruction]) -> Vec<(usize, usize)> {
        let mut open = vec![];
        let mut pairs = vec![];
        for (i, instruction) in instructions.iter().enumerate() {
            match instruction.op {
                Opcode::JumpIfZero => open.push(i),
                Opcode::JumpIfNonZero => pairs.push((open.pop().unwrap(), i)),
                _ => {}
            }
        }
        pairs.sort();
        pairs
    }

    #[test]
    fn empty_program_stays_halt() {
        assert_eq!(optimize(&raw("")), vec![Instruction::HALT]);
    }

    #[test]
    fn runs_are_folded() {
        assert_eq!(
            optimize(&raw("+++>>--<...,,")),
            vec![
                Instruction::new(Opcode::Add, 3),
                Instruction::new(Opcode::IncPtr, 2),
                Instruction::new(Opcode::Sub, 2),
                Instruction::new(Opcode::DecPtr, 1),
                Instruction::new(Opcode::Output, 3),
                Instruction::new(Opcode::Input, 2),
                Instruction::HALT,
            ]
        );
    }

    #[test]
    fn opposite_operations_are_not_merged() {
        assert_eq!(
            optimize(&raw("+-+")),
            vec![
                Instruction::new(Opcode::Add, 1),
                Instruction::new(Opcode::Sub, 1),
                Instruction::new(Opcode::Add, 1),
                Instruction::HALT,
            ]
        );
    }

    #[test]
    fn jumps_are_never_folded() {
        assert_eq!(
            optimize(&raw("[[]]")),
            vec![
                Instruction::new(Opcode::JumpIfZero, 3),
                Instruction::new(Opcode::JumpIfZero, 2),
                Instruction::new(Opcode::JumpIfNonZero, 1),
                Instruction::new(Opcode::JumpIfNonZero, 0),
                Instruction::HALT,
            ]
        );
    }

    #[test]
    fn empty_loop_points_at_itself() {
        assert_eq!(
            optimize(&raw("+[]")),
            vec![
                Instruction::new(Opcode::Add, 1),
                Instruction::new(Opcode::JumpIfZero, 2),
                Instruction::new(Opcode::JumpIfNonZero, 1),
                Instruction::HALT,
            ]
        );
    }

    #[test]
    fn runs_do_not_cross_brackets() {
        assert_eq!(
            optimize(&raw("++[++]++")),
            vec![
                Instruction::new(Opcode::Add, 2),
                Instruction::new(Opcode::JumpIfZero, 3),
                Instruction::new(Opcode::Add, 2),
                Instruction::new(Opcode::JumpIfNonZero, 1),
                Instruction::new(Opcode::Add, 2),
                Instruction::HALT,
            ]
        );
    }

    #[test]
    fn jump_pairs_reference_each_other() {
        let source = "++[>+++[>++<-]<-]>>[-[+]]+[[-]][.,]";
        let raw = raw(source);
        let optimized = optimize(&raw);

        let raw_pairs = bracket_pairs(&raw);
        let optimized_pairs = bracket_pairs(&optimized);
        assert_eq!(raw_pairs.len(), optimized_pairs.len());

        for (open, close) in optimized_pairs {
            assert!(open < close);
            assert_eq!(optimized[open].arg, close);
            assert_eq!(optimized[close].arg, open);
        }
    }

    #[test]
    fn deep_nesting_uses_the_explicit_stack() {
        let depth = 14_000;
        let source = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let optimized = optimize(&raw(&source));
        assert_eq!(optimized[0].arg, 2 * depth - 1);
        assert_eq!(optimized[depth - 1].arg, depth);
        assert_eq!(optimized[2 * depth - 1].arg, 0);
    }

    #[test]
    fn long_runs_fold_to_one_instruction() {
        let optimized = optimize(&raw(&">".repeat(20_000)));
        assert_eq!(
            optimized,
            vec![Instruction::new(Opcode::IncPtr, 20_000), Instruction::HALT]
        );
    }
}
