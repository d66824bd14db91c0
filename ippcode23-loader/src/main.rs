use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ippcode23::{Engine, Program};
use ippcode23_loader::CliError;

/// Interprets an IPPcode23 program given as XML.
#[derive(Parser, Debug)]
#[command(name = "ippcode23-loader", version, about)]
struct Args {
    /// Path to the XML source file. Defaults to standard input.
    #[arg(short, long, value_name = "FILE")]
    source: Option<PathBuf>,

    /// Path to the file providing the program's standard input. Defaults to
    /// standard input.
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(code) => code_to_exit_code(code),
        Err(err) => {
            eprintln!("{}", err);
            code_to_exit_code(err.exit_code())
        }
    }
}

fn run(args: Args) -> Result<i32, CliError> {
    if args.source.is_none() && args.input.is_none() {
        return Err(CliError::Usage(
            "at least one of --source or --input must be given".to_owned(),
        ));
    }

    let source_text = read_to_string_or_stdin(args.source.as_deref())?;
    let raw = ippcode23_loader::parse(&source_text)?;
    let program = Program::build(raw)?;

    let stdout = io::stdout();
    let stderr = io::stderr();
    let code = match args.input {
        Some(path) => {
            let reader = BufReader::new(open(&path)?);
            let mut engine = Engine::new(&program, stdout.lock(), reader, stderr.lock());
            engine.run()
        }
        None => {
            let mut engine = Engine::new(&program, stdout.lock(), io::stdin().lock(), stderr.lock());
            engine.run()
        }
    };

    code.map_err(CliError::from)
}

fn read_to_string_or_stdin(path: Option<&std::path::Path>) -> Result<String, CliError> {
    match path {
        Some(path) => {
            let mut text = String::new();
            open(path)?
                .read_to_string(&mut text)
                .map_err(|err| CliError::Io(err, path.to_owned()))?;
            Ok(text)
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .lock()
                .lines()
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| CliError::Io(err, PathBuf::from("<stdin>")))?
                .into_iter()
                .for_each(|line| {
                    text.push_str(&line);
                    text.push('\n');
                });
            Ok(text)
        }
    }
}

fn open(path: &std::path::Path) -> Result<File, CliError> {
    File::open(path).map_err(|err| CliError::Io(err, path.to_owned()))
}

fn code_to_exit_code(code: i32) -> ExitCode {
    ExitCode::from(code.clamp(0, 255) as u8)
}
