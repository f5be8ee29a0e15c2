use std::fmt;

use thiserror::Error;

pub mod lexer;

/// Slots of the capacity bound held back for the end-of-program sentinels.
pub const RESERVED_SLOTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexerTokenKind {
    // `+`: Increment the byte at the `data pointer` by one
    DerefIncrement,
    // `-`: Decrement the byte at the `data pointer` by one
    DerefDecrement,

    // `>`: Increment the `data pointer` by one
    Increment,
    // `<`: Decrement the `data pointer` by one
    Decrement,

    // `.`: Write the byte at the `data pointer` to the `output device`
    Write,
    // `,`: Read the next byte from the `input device` and store it at the `data pointer`
    Read,

    // `[`: If the byte at the `data pointer` is zero, jump past the matching `]`
    JumpStart,
    // `]`: If the byte at the `data pointer` is non-zero, jump back to just after the matching `[`
    JumpEnd,

    // End of file: no more tokens left
    EOF,
}

impl LexerTokenKind {
    /// Maps a source byte to its token, `None` for comment bytes.
    pub fn from_byte(byte: u8) -> Option<LexerTokenKind> {
        match byte {
            b'+' => Some(LexerTokenKind::DerefIncrement),
            b'-' => Some(LexerTokenKind::DerefDecrement),
            b'>' => Some(LexerTokenKind::Increment),
            b'<' => Some(LexerTokenKind::Decrement),
            b'.' => Some(LexerTokenKind::Write),
            b',' => Some(LexerTokenKind::Read),
            b'[' => Some(LexerTokenKind::JumpStart),
            b']' => Some(LexerTokenKind::JumpEnd),
            _ => None,
        }
    }
}

impl fmt::Display for LexerTokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LexerTokenKind::DerefIncrement => "+",
            LexerTokenKind::DerefDecrement => "-",
            LexerTokenKind::Increment => ">",
            LexerTokenKind::Decrement => "<",
            LexerTokenKind::Write => ".",
            LexerTokenKind::Read => ",",
            LexerTokenKind::JumpStart => "[",
            LexerTokenKind::JumpEnd => "]",
            LexerTokenKind::EOF => "\n",
        })
    }
}

#[derive(Error, Debug)]
pub enum LexerError {
    #[error("IO Error: {0}")]
    FileIO(
        #[from]
        std::io::Error,
    ),

    #[error("Program exceeds available memory (at most {limit} instructions)")]
    CapacityExceeded { limit: usize },
}
