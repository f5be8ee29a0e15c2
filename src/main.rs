extern crate clap;
extern crate thiserror;

pub mod bytecode;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod optimizer;
pub mod parser;
pub mod pipeline;

use std::{
    collections::BTreeSet,
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    process::ExitCode,
    time::Instant,
};

use clap::{Parser, ValueEnum};
use colored::Colorize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{
    bytecode::disassemble,
    config::{Config, PointerPolicy, DEFAULT_EOF_VALUE, DEFAULT_TAPE_SIZE},
    error::Error,
    interpreter::{
        bytecode_interpreter::ByteCodeInterpreter, reference_interpreter::ReferenceInterpreter, Runtime,
    },
    pipeline::{compile, Compiled},
};

/// Optimizing bytecode compiler and virtual machine for Brainf**k.
///
/// With no FILE the program is read from stdin up to end-of-stream, and stdin
/// is then reused as the program's input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Read the program from this file, leaving stdin to the program's input
    #[arg()]
    file: Option<String>,

    /// Dump a compilation stage to stderr
    #[arg(short, long, value_enum)]
    emit: Vec<Emit>,

    /// Stop after compiling
    #[arg(long)]
    no_run: bool,

    /// Number of tape cells, also bounds the program length
    #[arg(short, long, default_value_t = DEFAULT_TAPE_SIZE)]
    tape_size: usize,

    /// Cell value stored when input hits end-of-stream
    #[arg(long, default_value_t = DEFAULT_EOF_VALUE)]
    eof: u8,

    /// What to do when the data pointer leaves the tape
    #[arg(short, long, value_enum, default_value_t = PointerPolicy::Fatal)]
    pointer: PointerPolicy,

    /// Run the unoptimized bytecode on the reference interpreter
    #[arg(long)]
    reference: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Emit {
    /// Significant tokens left after lexing
    Tokens,
    /// Validated opcodes
    Opcodes,
    /// Bytecode before optimization
    Bytecode,
    /// Bytecode after run folding and jump resolution
    Optimized,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout belongs to the running program
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn emit_stages(compiled: &Compiled, stages: &BTreeSet<Emit>) -> io::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    for stage in stages {
        writeln!(out, "{}", format!("{:?}", stage).blue())?;
        match stage {
            Emit::Tokens => {
                for token in compiled.tokens.iter() {
                    write!(out, "{}", token)?;
                }
            }
            Emit::Opcodes => {
                for (i, opcode) in compiled.opcodes.iter().enumerate() {
                    writeln!(out, "{:05}  {}", i, opcode)?;
                }
            }
            Emit::Bytecode => disassemble(&compiled.bytecode, &mut out)?,
            Emit::Optimized => disassemble(&compiled.optimized, &mut out)?,
        }
    }

    Ok(())
}

fn run(args: Args) -> Result<(), Error> {
    let config = Config::new(args.tape_size, args.eof, args.pointer)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let compiled = match &args.file {
        Some(path) => {
            info!("Compiling {}", path);
            let file = File::open(path).map_err(|source| Error::Source {
                path: path.clone(),
                source,
            })?;
            compile(&mut BufReader::new(file), &config)?
        }
        None => {
            info!("Compiling from stdin");
            compile(&mut input, &config)?
        }
    };

    let stages: BTreeSet<Emit> = args.emit.iter().copied().collect();
    if !stages.is_empty() {
        emit_stages(&compiled, &stages)?;
    }

    if args.no_run {
        return Ok(());
    }

    // the same stdin handle keeps serving bytes after the source hit end-of-stream
    let stdout = io::stdout();
    let mut runtime = Runtime::new(&config, input, BufWriter::new(stdout.lock()));

    let now = Instant::now();
    if args.reference {
        ReferenceInterpreter::new().run(&mut runtime, &compiled.bytecode)?;
    } else {
        ByteCodeInterpreter::new().run(&mut runtime, &compiled.optimized)?;
    }
    debug!(
        elapsed = ?now.elapsed(),
        data_pointer = runtime.data_pointer(),
        cell = runtime.tape()[runtime.data_pointer()],
        "finished running"
    );

    // dropping a BufWriter would swallow a failed final flush
    let (_, out) = runtime.into_streams();
    let _stdout = out.into_inner().map_err(|e| e.into_error())?;

    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            ExitCode::FAILURE
        }
    }
}
