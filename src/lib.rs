//! Brainfuck Interpreter (BFI) is an optimizing interpreter for the eight
//! command tape language.
//!
//! Source text is compiled into a compact bytecode in a single pass, then
//! run by a dispatch loop against a bounded tape of bytes.
//!
//! # Example
//!
//! ```
//! use bfi::{interpret, Options};
//!
//! let outcome = interpret("++++++++[>++++++++<-]>.", Options::new().buffer_output()).unwrap();
//! assert_eq!(outcome.output, Some(vec![64]));
//! ```
//!
//! # Commands
//!
//! | Command | Effect |
//! |---------|--------|
//! | `>`     | Move the cursor one cell right |
//! | `<`     | Move the cursor one cell left |
//! | `+`     | Increment the cell, wrapping at 256 |
//! | `-`     | Decrement the cell, wrapping at 0 |
//! | `[`     | Skip past the matching `]` if the cell is zero |
//! | `]`     | Jump back behind the matching `[` if the cell is not zero |
//! | `,`     | Read one byte into the cell |
//! | `.`     | Write the cell as one byte |
//!
//! Every other character is a comment.
//!
//! # Bytecode
//!
//! | Opcode    | Listing         | Produced from |
//! |-----------|-----------------|---------------|
//! | Add       | `add 0 3`       | A run of `+` |
//! | Sub       | `sub 0 3`       | A run of `-` |
//! | Clear     | `clear 0`       | `[-]` or `[+]` |
//! | Copy      | `copy 0 {1: 2}` | Copy and multiply loops like `[->++<]` |
//! | ScanLeft  | `scanl 0`       | `[<]` |
//! | ScanRight | `scanr 0`       | `[>]` |
//! | Input     | `input 0`       | `,` |
//! | Output    | `output 0`      | `.` |
//! | Open      | `open 0 -> 4`   | Any other `[` |
//! | Close     | `close 0 -> 1`  | Any other `]` |
//!
//! The number after the opcode name is the cursor movement applied before
//! the opcode runs. Runs of `>` and `<` are folded into it.
//!
//! # Important notes
//!
//! - Moving the cursor off the tape is a `MemoryError`. It never wraps.
//! - Reading a zero byte leaves the cell unchanged, just like reading at the
//!   end of input. A program can not tell the two apart.
//! - The time limit is checked between opcodes, so a single scan still runs
//!   to completion.
//!

pub mod bytecode;
pub mod error;
pub mod io;
mod lexer;
mod optimizer;
pub mod options;
pub mod tape;
pub mod token;
pub mod vm;


pub use bytecode::{Opcode, Parser, Program};
pub use error::{Bracket, Error, MemoryError, Result, SyntaxError};
pub use io::{ByteSink, ByteSource, Input, Output};
pub use options::{Options, DEFAULT_TAPE_SIZE};
pub use tape::Tape;
pub use vm::{run, Outcome, Status, Vm};

/// Compile source text into a `Program`
pub fn compile(source: &str) -> std::result::Result<Program, SyntaxError> {
    Parser::new(source).parse()
}

/// Compile raw bytes, failing with `Error::InvalidInput` unless they are UTF-8 text
pub fn compile_bytes(source: &[u8]) -> Result<Program> {
    let source = std::str::from_utf8(source)?;
    Ok(compile(source)?)
}

/// Compile and run `source`
pub fn interpret(source: &str, options: Options) -> Result<Outcome> {
    let program = compile(source)?;
    run(&program, options)
}
