//! IPPcode22 interpreter CLI.
//!
//! Exit codes:
//! - 0..=49: the interpreted program's own exit code
//! - 10: invalid command-line arguments
//! - 11: a given file cannot be opened
//! - 31, 32, 52: program loading failed (format, structure, semantics)
//! - 52..=58: runtime error

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;

/// Interpreter for the XML representation of IPPcode22 programs.
///
/// Exactly one of --source and --input must name a file; the stream
/// left out is read from standard input.
#[derive(Parser, Debug)]
#[command(version, about, group(
    clap::ArgGroup::new("streams").required(true).multiple(false)
))]
struct Args {
    /// XML program source file (stdin when omitted).
    #[arg(short, long, value_name = "FILE", group = "streams")]
    source: Option<PathBuf>,

    /// Input file consumed by READ instructions (stdin when omitted).
    #[arg(short, long, value_name = "FILE", group = "streams")]
    input: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 10,
            };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };
    ExitCode::from(interpret(&args) as u8)
}

fn interpret(args: &Args) -> i32 {
    let source = match read_source(args.source.as_deref()) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read program source: {err}");
            return 11;
        }
    };

    let program = match ippcode_loader::load(&source) {
        Ok(program) => program,
        Err(err) => {
            eprintln!("error: {err}");
            return err.exit_code();
        }
    };

    let mut input: Box<dyn BufRead> = match &args.input {
        Some(path) => match File::open(path) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(err) => {
                eprintln!("error: cannot open {}: {err}", path.display());
                return 11;
            }
        },
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut output = io::stdout().lock();
    let mut diag = io::stderr();
    match ippcode_vm::run(&program, &mut input, &mut output, &mut diag) {
        Ok(code) => {
            let _ = output.flush();
            code
        }
        Err(err) => {
            let _ = output.flush();
            eprintln!("error: {err}");
            err.exit_code()
        }
    }
}

fn read_source(path: Option<&Path>) -> io::Result<String> {
    let mut source = String::new();
    match path {
        Some(path) => {
            File::open(path)?.read_to_string(&mut source)?;
        }
        None => {
            io::stdin().read_to_string(&mut source)?;
        }
    }
    Ok(source)
}
