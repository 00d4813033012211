//! Virtual machine that runs the bytecode

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::{
    bytecode::{Opcode, Program},
    error::Result,
    io::{ByteSink, ByteSource, FnSink, Output, StdoutSink},
    options::Options,
    tape::Tape,
};

/// How a run ended
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Status {
    /// The last opcode was executed
    Completed,
    /// The time limit ran out first
    TimedOut,
}

/// Result of `run`
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Outcome {
    /// Everything written by the program, if output was buffered
    pub output: Option<Vec<u8>>,
    pub timed_out: bool,
}

/// Virtual machine representation
pub struct Vm<'p, I, O> {
    program: &'p Program,
    tape: Tape,
    ip: usize,  // instruction pointer
    steps: u64, // opcodes executed so far
    input: I,
    output: O,
    time_limit: Option<Duration>,
}

impl<'p, I: ByteSource, O: ByteSink> Vm<'p, I, O> {
    pub fn new(program: &'p Program, tape: Tape, input: I, output: O) -> Self {
        Vm {
            program,
            tape,
            ip: 0,
            steps: 0,
            input,
            output,
            time_limit: None,
        }
    }

    /// Stop `run` once `time_limit` of wall time has passed. The clock is
    /// only checked between opcodes.
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    pub fn run(&mut self) -> Result<Status> {
        // A limit too far out to represent never expires
        let deadline = self
            .time_limit
            .and_then(|limit| Instant::now().checked_add(limit));

        debug!(
            opcodes = self.program.len(),
            tape_size = self.tape.len(),
            "starting execution"
        );

        while !self.is_finished() {
            self.next_instruction()?;

            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                warn!(steps = self.steps, ip = self.ip, "time limit exceeded");
                return Ok(Status::TimedOut);
            }
        }

        debug!(steps = self.steps, "execution finished");
        Ok(Status::Completed)
    }

    /// Execute a single opcode
    pub fn next_instruction(&mut self) -> Result<()> {
        let program = self.program;
        let Some(opcode) = program.get(self.ip) else {
            return Ok(());
        };

        self.tape.shift(opcode.shift())?;
        let mut next_ip = self.ip + 1;

        match opcode {
            Opcode::Add { count, .. } => self.tape.add(*count as u8),
            Opcode::Sub { count, .. } => self.tape.sub(*count as u8),
            Opcode::Clear { .. } => self.tape.set(0),
            Opcode::Copy { targets, .. } => self.ins_copy(targets.iter())?,
            Opcode::ScanLeft { .. } => self.tape.scan_left(),
            Opcode::ScanRight { .. } => self.tape.scan_right(),
            Opcode::Input { .. } => self.ins_input()?,
            Opcode::Output { .. } => self.output.write_byte(self.tape.get())?,
            Opcode::Open { partner, .. } => {
                if self.tape.get() == 0 {
                    next_ip = *partner + 1;
                }
            }
            Opcode::Close { partner, .. } => {
                if self.tape.get() != 0 {
                    next_ip = *partner + 1;
                }
            }
        }

        self.ip = next_ip;
        self.steps += 1;
        Ok(())
    }

    /// Add a multiple of the cell to every target, then clear the cell
    fn ins_copy<'a>(
        &mut self,
        targets: impl Iterator<Item = (&'a isize, &'a u32)>,
    ) -> Result<()> {
        let value = self.tape.get();
        if value == 0 {
            return Ok(());
        }

        for (&offset, &mult) in targets {
            let cell = self.tape.cell_at(offset)?;
            *cell = cell.wrapping_add(value.wrapping_mul(mult as u8));
        }
        self.tape.set(0);

        Ok(())
    }

    /// Read a byte into the cell. A zero byte is treated like missing input
    /// and leaves the cell alone.
    fn ins_input(&mut self) -> Result<()> {
        if let Some(byte) = self.input.read_byte()?.filter(|&byte| byte != 0) {
            self.tape.set(byte);
        }
        Ok(())
    }

    pub fn is_finished(&self) -> bool {
        self.ip >= self.program.len()
    }

    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }
}

/// Run `program` with a fresh tape, wiring up the I/O selected in `options`.
pub fn run(program: &Program, options: Options) -> Result<Outcome> {
    options.validate()?;

    let Options {
        tape_size,
        time_limit,
        input,
        output,
    } = options;

    let source = input.into_source();

    let (status, output) = match output {
        Output::Stdout => (execute(program, tape_size, time_limit, source, StdoutSink)?.0, None),
        Output::Buffer => {
            let (status, buffer) = execute(program, tape_size, time_limit, source, Vec::new())?;
            (status, Some(buffer))
        }
        Output::Callback(callback) => (
            execute(program, tape_size, time_limit, source, FnSink(callback))?.0,
            None,
        ),
    };

    Ok(Outcome {
        output,
        timed_out: status == Status::TimedOut,
    })
}

fn execute<I: ByteSource, O: ByteSink>(
    program: &Program,
    tape_size: usize,
    time_limit: Option<Duration>,
    input: I,
    output: O,
) -> Result<(Status, O)> {
    let mut vm = Vm::new(program, Tape::new(tape_size), input, output);
    if let Some(limit) = time_limit {
        vm = vm.with_time_limit(limit);
    }

    let status = vm.run()?;
    Ok((status, vm.into_output()))
}
