use std::{fs, path::PathBuf, time::Duration};

use anyhow::{bail, Context};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use bfi::{compile_bytes, run, Options, DEFAULT_TAPE_SIZE};

#[derive(Parser, Debug)]
#[command(name = "bfi")]
#[command(about = "Run a Brainfuck program from a source file")]
struct Args {
    /// Path to the source file
    source: PathBuf,

    /// Number of cells on the tape
    #[arg(long, default_value_t = DEFAULT_TAPE_SIZE)]
    tape_size: usize,

    /// Stop after this many seconds
    #[arg(long, value_name = "SECONDS")]
    time_limit: Option<f64>,

    /// Print the compiled bytecode instead of running it
    #[arg(long)]
    dump: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    if let Err(err) = try_main(Args::parse()) {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

fn try_main(args: Args) -> anyhow::Result<()> {
    let source = fs::read(&args.source)
        .with_context(|| format!("failed to read {}", args.source.display()))?;
    let program = compile_bytes(&source)
        .with_context(|| format!("failed to compile {}", args.source.display()))?;

    if args.dump {
        print!("{}", program);
        return Ok(());
    }

    let mut options = Options::new().with_tape_size(args.tape_size);
    if let Some(seconds) = args.time_limit {
        let limit = match Duration::try_from_secs_f64(seconds) {
            Ok(limit) if !limit.is_zero() => limit,
            _ => bail!("time limit must be a positive number of seconds, got {}", seconds),
        };
        options = options.with_time_limit(limit);
    }

    // A timeout is logged by the VM and is not a failure
    run(&program, options).context("execution failed")?;
    Ok(())
}
