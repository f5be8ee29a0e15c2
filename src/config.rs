use clap::ValueEnum;
use thiserror::Error;

use crate::lexer::RESERVED_SLOTS;

/// Tape length (and program capacity bound) when none is given
pub const DEFAULT_TAPE_SIZE: usize = 30_000;

/// Cell value stored by an input read that hits end-of-stream: the byte an
/// end-of-stream marker of -1 narrows to.
pub const DEFAULT_EOF_VALUE: u8 = 255;

/// What happens when the data pointer is moved off either end of the tape.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerPolicy {
    /// Stop execution with an out-of-bounds error
    #[default]
    Fatal,
    /// Wrap around modulo the tape length
    Wrap,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Tape size {size} is too small (minimum {min})")]
    TapeTooSmall { size: usize, min: usize },

    #[error("Tape size {size} is too large (maximum {max})")]
    TapeTooLarge { size: usize, max: usize },
}

/// Settings for a single compile and run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of cells on the tape, also bounds program length
    pub tape_size: usize,
    pub eof_value: u8,
    pub pointer_policy: PointerPolicy,
}

impl Config {
    pub const MIN_TAPE_SIZE: usize = RESERVED_SLOTS + 1;
    /// Tape and token buffer are both allocated up front from the tape size
    pub const MAX_TAPE_SIZE: usize = 1 << 24;

    pub fn new(tape_size: usize, eof_value: u8, pointer_policy: PointerPolicy) -> Result<Self, ConfigError> {
        if tape_size < Self::MIN_TAPE_SIZE {
            return Err(ConfigError::TapeTooSmall {
                size: tape_size,
                min: Self::MIN_TAPE_SIZE,
            });
        }
        if tape_size > Self::MAX_TAPE_SIZE {
            return Err(ConfigError::TapeTooLarge {
                size: tape_size,
                max: Self::MAX_TAPE_SIZE,
            });
        }

        Ok(Self {
            tape_size,
            eof_value,
            pointer_policy,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tape_size: DEFAULT_TAPE_SIZE,
            eof_value: DEFAULT_EOF_VALUE,
            pointer_policy: PointerPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_plain_invocation() {
        let config = Config::default();
        assert_eq!(config.tape_size, 30_000);
        assert_eq!(config.eof_value, 255);
        assert_eq!(config.pointer_policy, PointerPolicy::Fatal);
    }

    #[test]
    fn tiny_tapes_are_rejected() {
        assert_eq!(
            Config::new(2, 0, PointerPolicy::Wrap),
            Err(ConfigError::TapeTooSmall { size: 2, min: 3 })
        );
        assert!(Config::new(3, 0, PointerPolicy::Wrap).is_ok());
    }

    #[test]
    fn huge_tapes_are_rejected() {
        assert_eq!(
            Config::new(usize::MAX, 255, PointerPolicy::Fatal),
            Err(ConfigError::TapeTooLarge {
                size: usize::MAX,
                max: Config::MAX_TAPE_SIZE
            })
        );
        assert!(Config::new(Config::MAX_TAPE_SIZE + 1, 255, PointerPolicy::Fatal).is_err());
        assert!(Config::new(Config::MAX_TAPE_SIZE, 255, PointerPolicy::Fatal).is_ok());
    }
}
