//! Execution options

use std::time::Duration;

use crate::{
    error::{Error, Result},
    io::{Input, Output},
};

/// Tape length used when nothing else is asked for
pub const DEFAULT_TAPE_SIZE: usize = 30_000;

/// Options for a single run.
///
/// Defaults to a 30000 cell tape, no time limit, and live stdin/stdout.
#[derive(Debug)]
pub struct Options {
    pub tape_size: usize,
    pub time_limit: Option<Duration>,
    pub input: Input,
    pub output: Output,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            tape_size: DEFAULT_TAPE_SIZE,
            time_limit: None,
            input: Input::Stdin,
            output: Output::Stdout,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tape_size(mut self, tape_size: usize) -> Self {
        self.tape_size = tape_size;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    /// Read input from `bytes` instead of stdin
    pub fn with_input_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.input = Input::Bytes(bytes.into());
        self
    }

    pub fn read_with(mut self, callback: impl FnMut() -> Option<u8> + 'static) -> Self {
        self.input = Input::Callback(Box::new(callback));
        self
    }

    /// Collect output and return it in the `Outcome`
    pub fn buffer_output(mut self) -> Self {
        self.output = Output::Buffer;
        self
    }

    pub fn write_with(mut self, callback: impl FnMut(u8) + 'static) -> Self {
        self.output = Output::Callback(Box::new(callback));
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.tape_size == 0 {
            return Err(Error::InvalidOptions("tape size must be positive"));
        }
        if self.time_limit == Some(Duration::ZERO) {
            return Err(Error::InvalidOptions("time limit must be positive"));
        }
        Ok(())
    }
}
