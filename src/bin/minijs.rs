//! Command-line entry point.
//!
//! Runs the program in the given file and prints what its `main` function returns.  Set
//! `RUST_LOG` (e.g. `RUST_LOG=minijs=debug`) to trace the pipeline on stderr.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use minijs::interpreter::{render, Error};
use minijs::{eval, lexer, parser};

/// Interpret a JavaScript-like source file.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Print the token stream instead of running the program.
    #[arg(long, conflicts_with = "ast")]
    tokens: bool,

    /// Print the syntax tree instead of running the program.
    #[arg(long)]
    ast: bool,

    /// Source file to run.
    file: PathBuf,
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(Some(result)) => {
            println!("{}", result);
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            let code = e.downcast_ref::<Error>().map_or(1, Error::exit_code);
            ExitCode::from(code)
        }
    }
}

/// Returns the rendered result, or `None` when only a dump was requested.
fn run(args: &Args) -> Result<Option<String>, anyhow::Error> {
    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let tokens = lexer::lex(&source).map_err(Error::from)?;
    if args.tokens {
        for t in &tokens {
            println!("{}:{}\t{}\t{}", t.line, t.column, t.kind, t.text);
        }
        return Ok(None);
    }

    let program = parser::parse(&tokens).map_err(Error::from)?;
    if args.ast {
        println!("{:#?}", program);
        return Ok(None);
    }

    let result = eval::interpret(&program).map_err(Error::from)?;
    Ok(Some(render(result)))
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Only log when asked to, so stdout and stderr stay clean by default.
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}
