//! Single byte input and output hooks used by the VM

use std::{
    collections::VecDeque,
    fmt,
    io::{self, Read, Write},
};

/// Where `,` reads from. `None` means no byte is available.
pub trait ByteSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

/// Where `.` writes to.
pub trait ByteSink {
    fn write_byte(&mut self, byte: u8) -> io::Result<()>;
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }
}

impl<T: ByteSource + ?Sized> ByteSource for Box<T> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }
}

impl<T: ByteSink + ?Sized> ByteSink for &mut T {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        (**self).write_byte(byte)
    }
}

impl<T: ByteSink + ?Sized> ByteSink for Box<T> {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        (**self).write_byte(byte)
    }
}

/// Pre-supplied input, consumed front to back
impl ByteSource for VecDeque<u8> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.pop_front())
    }
}

/// In-memory accumulation
impl ByteSink for Vec<u8> {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.push(byte);
        Ok(())
    }
}

/// Blocking reads from the process' standard input
#[derive(Debug, Default)]
pub struct StdinSource;

impl ByteSource for StdinSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match io::stdin().lock().read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }
}

/// Writes to the process' standard output, flushing every byte so
/// interactive programs show their prompts.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl ByteSink for StdoutSink {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(&[byte])?;
        stdout.flush()
    }
}

/// Caller supplied input callback
pub struct FnSource<F>(pub F);

impl<F: FnMut() -> Option<u8>> ByteSource for FnSource<F> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        Ok((self.0)())
    }
}

/// Caller supplied output callback
pub struct FnSink<F>(pub F);

impl<F: FnMut(u8)> ByteSink for FnSink<F> {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        (self.0)(byte);
        Ok(())
    }
}

/// Input selection for `run`
pub enum Input {
    /// Live standard input
    Stdin,
    /// Fixed bytes, read front to back
    Bytes(Vec<u8>),
    Callback(Box<dyn FnMut() -> Option<u8>>),
}

impl Input {
    pub fn into_source(self) -> Box<dyn ByteSource> {
        match self {
            Input::Stdin => Box::new(StdinSource),
            Input::Bytes(bytes) => Box::new(VecDeque::from(bytes)),
            Input::Callback(callback) => Box::new(FnSource(callback)),
        }
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Stdin => f.write_str("Stdin"),
            Input::Bytes(bytes) => f.debug_tuple("Bytes").field(bytes).finish(),
            Input::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Output selection for `run`
pub enum Output {
    /// Live standard output
    Stdout,
    /// Collect the output and hand it back in the `Outcome`
    Buffer,
    Callback(Box<dyn FnMut(u8)>),
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Stdout => f.write_str("Stdout"),
            Output::Buffer => f.write_str("Buffer"),
            Output::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}
