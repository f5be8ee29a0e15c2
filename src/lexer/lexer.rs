use std::io::{self, Read};

use tracing::trace;

use super::{LexerError, LexerTokenKind, RESERVED_SLOTS};

pub struct Lexer<R: Read> {
    /** 'raw' format / offset within the input (in bytes) */
    pub byte_offset: usize,

    bytes: io::Bytes<R>,
    /** Maximum number of significant tokens we are allowed to keep */
    limit: usize,
    count: usize,
}

impl<R: Read> Lexer<R> {
    pub fn new(input: R, capacity: usize) -> Lexer<R> {
        Lexer {
            byte_offset: 0,

            bytes: input.bytes(),
            limit: capacity.saturating_sub(RESERVED_SLOTS),
            count: 0,
        }
    }

    fn consume_byte(&mut self) -> Result<Option<u8>, LexerError> {
        match self.bytes.next() {
            Some(byte) => {
                self.byte_offset += 1;
                Ok(Some(byte?))
            }
            None => Ok(None),
        }
    }

    /// Skips comment bytes and returns the next significant token,
    /// `EOF` once the stream is exhausted.
    pub fn next_token(&mut self) -> Result<LexerTokenKind, LexerError> {
        while let Some(byte) = self.consume_byte()? {
            if let Some(token) = LexerTokenKind::from_byte(byte) {
                if self.count >= self.limit {
                    return Err(LexerError::CapacityExceeded { limit: self.limit });
                }
                self.count += 1;
                return Ok(token);
            }
        }

        Ok(LexerTokenKind::EOF)
    }

    /// Drains the stream, the returned tokens always end in `EOF`.
    pub fn collect_results(&mut self) -> Result<Vec<LexerTokenKind>, LexerError> {
        let mut v = Vec::with_capacity(self.limit + 1);
        loop {
            let token = self.next_token()?;
            v.push(token);
            if token == LexerTokenKind::EOF {
                trace!(tokens = v.len() - 1, bytes = self.byte_offset, "lexed program");
                return Ok(v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Lexer, LexerError, LexerTokenKind};
    use crate::lexer::LexerTokenKind::*;

    fn lex(source: &str, capacity: usize) -> Result<Vec<LexerTokenKind>, LexerError> {
        Lexer::new(source.as_bytes(), capacity).collect_results()
    }

    #[test]
    fn empty_source_is_only_eof() {
        assert_eq!(lex("", 30_000).unwrap(), vec![EOF]);
    }

    #[test]
    fn comments_and_whitespace_are_dropped() {
        let tokens = lex("add two: ++ \n then print it .\t[-]", 30_000).unwrap();
        assert_eq!(
            tokens,
            vec![
                DerefIncrement,
                DerefIncrement,
                Write,
                JumpStart,
                DerefDecrement,
                JumpEnd,
                EOF
            ]
        );
    }

    #[test]
    fn every_significant_byte_maps_in_order() {
        let tokens = lex("+-><.,[]", 30_000).unwrap();
        assert_eq!(
            tokens,
            vec![
                DerefIncrement,
                DerefDecrement,
                Increment,
                Decrement,
                Write,
                Read,
                JumpStart,
                JumpEnd,
                EOF
            ]
        );
    }

    #[test]
    fn program_filling_capacity_is_accepted() {
        // capacity 10 leaves room for 8 tokens
        let tokens = lex("++++++++  trailing comment", 10).unwrap();
        assert_eq!(tokens.len(), 9);
    }

    #[test]
    fn program_over_capacity_is_rejected() {
        match lex("+++++++++", 10) {
            Err(LexerError::CapacityExceeded { limit }) => assert_eq!(limit, 8),
            other => panic!("expected CapacityExceeded, got {:?}", other),
        }
    }

    #[test]
    fn byte_offset_counts_comments_too() {
        let mut lexer = Lexer::new("ab+".as_bytes(), 30_000);
        assert_eq!(lexer.next_token().unwrap(), DerefIncrement);
        assert_eq!(lexer.byte_offset, 3);
        assert_eq!(lexer.next_token().unwrap(), EOF);
    }

    #[test]
    fn non_utf8_input_is_just_comment() {
        let source: &[u8] = &[0xff, b'+', 0xc3, 0x28, b'.'];
        let tokens = Lexer::new(source, 30_000).collect_results().unwrap();
        assert_eq!(tokens, vec![DerefIncrement, Write, EOF]);
    }
}
