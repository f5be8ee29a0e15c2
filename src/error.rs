use thiserror::Error;

use crate::{config::ConfigError, interpreter::RuntimeError, lexer::LexerError, parser::ParseError};

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexerError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Can't read {path}: {source}")]
    Source {
        path: String,
        source: std::io::Error,
    },

    #[error("IO Error: {0}")]
    Io(
        #[from]
        std::io::Error,
    ),
}
