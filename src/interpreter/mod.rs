pub mod bytecode_interpreter;
pub mod reference_interpreter;

use std::io::{self, Read, Write};

use thiserror::Error;
use tracing::trace;

use crate::config::{Config, PointerPolicy};

/// Number of distinct cell values, cell arithmetic is modulo this
const CELL_MODULUS: usize = 256;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("IO Error: {0}")]
    Io(
        #[from]
        io::Error,
    ),

    #[error("Data pointer ({pointer}) moved by {delta} out of bounds (tape length {tape_len})")]
    PointerOutOfBounds {
        pointer: usize,
        delta: isize,
        tape_len: usize,
    },

    #[error("Gave up after {limit} steps")]
    StepLimitExceeded { limit: u64 },
}

/// The machine state shared by the interpreters: tape, data pointer and the
/// program's I/O streams.
pub struct Runtime<R: Read, W: Write> {
    /// Pointer into the tape
    data_pointer: usize,

    /// Allocated once, never resized
    tape: Vec<u8>,

    pointer_policy: PointerPolicy,
    eof_value: u8,

    in_stream: R,
    out_stream: W,
}

impl<R: Read, W: Write> Runtime<R, W> {
    pub fn new(config: &Config, in_stream: R, out_stream: W) -> Self {
        Self {
            data_pointer: 0,
            tape: vec![0; config.tape_size],
            pointer_policy: config.pointer_policy,
            eof_value: config.eof_value,
            in_stream,
            out_stream,
        }
    }

    /// Read `len` bytes from the input stream into the current cell, the
    /// cell keeps the last one. End-of-stream stores the configured EOF value.
    pub fn read(&mut self, len: usize) -> Result<(), RuntimeError> {
        // prompts written so far have to be visible before we block
        self.out_stream.flush()?;

        for _ in 0..len {
            let mut byte = [0u8; 1];
            let value = loop {
                match self.in_stream.read(&mut byte) {
                    Ok(0) => break self.eof_value,
                    Ok(_) => break byte[0],
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            };
            self.tape[self.data_pointer] = value;
        }
        Ok(())
    }

    /// Write the current cell to the output stream `len` times
    pub fn write(&mut self, len: usize) -> Result<(), RuntimeError> {
        let value = self.tape[self.data_pointer];
        for _ in 0..len {
            self.out_stream.write_all(&[value])?;
        }
        Ok(())
    }

    pub fn deref_and_add_value(&mut self, by: usize) {
        let cell = &mut self.tape[self.data_pointer];
        *cell = ((*cell as usize + by % CELL_MODULUS) % CELL_MODULUS) as u8;
    }

    pub fn deref_and_sub_value(&mut self, by: usize) {
        let cell = &mut self.tape[self.data_pointer];
        *cell = ((*cell as usize + CELL_MODULUS - by % CELL_MODULUS) % CELL_MODULUS) as u8;
    }

    pub fn shift_right(&mut self, by: usize) -> Result<(), RuntimeError> {
        let len = self.tape.len();
        self.data_pointer = match self.pointer_policy {
            PointerPolicy::Wrap => (self.data_pointer + by % len) % len,
            PointerPolicy::Fatal => match self.data_pointer.checked_add(by) {
                Some(target) if target < len => target,
                _ => return Err(self.out_of_bounds(by as isize)),
            },
        };
        Ok(())
    }

    pub fn shift_left(&mut self, by: usize) -> Result<(), RuntimeError> {
        let len = self.tape.len();
        self.data_pointer = match self.pointer_policy {
            PointerPolicy::Wrap => (self.data_pointer + len - by % len) % len,
            PointerPolicy::Fatal => match self.data_pointer.checked_sub(by) {
                Some(target) => target,
                None => return Err(self.out_of_bounds(-(by as isize))),
            },
        };
        Ok(())
    }

    /// is the value at the data pointer zero?
    pub fn value_is_zero(&self) -> bool {
        self.tape[self.data_pointer] == 0
    }

    pub fn flush(&mut self) -> Result<(), RuntimeError> {
        self.out_stream.flush()?;
        Ok(())
    }

    pub fn tape(&self) -> &[u8] {
        &self.tape
    }

    pub fn data_pointer(&self) -> usize {
        self.data_pointer
    }

    /// Gives the streams back, e.g. to inspect captured output
    pub fn into_streams(self) -> (R, W) {
        (self.in_stream, self.out_stream)
    }

    fn out_of_bounds(&self, delta: isize) -> RuntimeError {
        trace!(pointer = self.data_pointer, delta, "data pointer left the tape");
        RuntimeError::PointerOutOfBounds {
            pointer: self.data_pointer,
            delta,
            tape_len: self.tape.len(),
        }
    }
}
