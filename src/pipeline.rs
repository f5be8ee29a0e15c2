use std::{io::Read, time::Instant};

use tracing::debug;

use crate::{
    bytecode::{bytecode::to_bytecode, Instruction},
    config::Config,
    error::Error,
    lexer::{lexer::Lexer, LexerTokenKind},
    optimizer::optimize,
    parser::{parser::Parser, Opcode},
};

/// Every stage of a compiled program, kept so any of them can be dumped.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub tokens: Vec<LexerTokenKind>,
    pub opcodes: Vec<Opcode>,
    pub bytecode: Vec<Instruction>,
    pub optimized: Vec<Instruction>,
}

/// Reads `input` to end-of-stream and runs it through lexing, validation,
/// bytecode compilation and optimization. Fails before anything executes.
pub fn compile<R: Read>(input: &mut R, config: &Config) -> Result<Compiled, Error> {
    let now = Instant::now();
    let tokens = Lexer::new(input, config.tape_size).collect_results()?;
    debug!(tokens = tokens.len() - 1, elapsed = ?now.elapsed(), "finished lexing");

    let now = Instant::now();
    let opcodes = Parser::new(&tokens).parse_program()?;
    debug!(elapsed = ?now.elapsed(), "finished parsing");

    let now = Instant::now();
    let bytecode = to_bytecode(&opcodes);
    debug!(len = bytecode.len(), elapsed = ?now.elapsed(), "finished bytecode");

    let now = Instant::now();
    let optimized = optimize(&bytecode);
    debug!(len = optimized.len(), elapsed = ?now.elapsed(), "finished optimizations");

    Ok(Compiled {
        tokens,
        opcodes,
        bytecode,
        optimized,
    })
}
