use tracing::trace;

use crate::lexer::LexerTokenKind;

use super::{Opcode, ParseError};

pub struct Parser<'a> {
    tokens: std::slice::Iter<'a, LexerTokenKind>,
    depth: i64,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [LexerTokenKind]) -> Parser<'a> {
        Parser {
            tokens: tokens.iter(),
            depth: 0,
        }
    }

    fn transform_to_opcode(&mut self, token: LexerTokenKind) -> Result<Opcode, ParseError> {
        Ok(match token {
            LexerTokenKind::DerefIncrement => Opcode::Add,
            LexerTokenKind::DerefDecrement => Opcode::Sub,
            LexerTokenKind::Increment => Opcode::IncPtr,
            LexerTokenKind::Decrement => Opcode::DecPtr,
            LexerTokenKind::Write => Opcode::Output,
            LexerTokenKind::Read => Opcode::Input,
            LexerTokenKind::JumpStart => {
                self.depth += 1;
                Opcode::JumpIfZero
            }
            LexerTokenKind::JumpEnd => {
                self.depth -= 1;
                // a close with nothing open can never be matched later on
                if self.depth < 0 {
                    return Err(ParseError::UnmatchedBracket);
                }
                Opcode::JumpIfNonZero
            }
            LexerTokenKind::EOF => Opcode::Halt,
        })
    }

    /// Validates bracket nesting and lowers tokens to opcodes, the result
    /// ends in `Halt`. Jumps are left unresolved.
    pub fn parse_program(&mut self) -> Result<Vec<Opcode>, ParseError> {
        let mut opcodes = Vec::with_capacity(self.tokens.len() + 1);

        while let Some(&token) = self.tokens.next() {
            let opcode = self.transform_to_opcode(token)?;
            if opcode == Opcode::Halt {
                break;
            }
            opcodes.push(opcode);
        }

        if self.depth != 0 {
            return Err(ParseError::UnmatchedBracket);
        }

        opcodes.push(Opcode::Halt);
        trace!(opcodes = opcodes.len(), "parsed program");
        Ok(opcodes)
    }
}
