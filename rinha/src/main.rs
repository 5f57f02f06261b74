//! Rinha Interpreter CLI

use clap::{Parser, Subcommand};
use rinha::interp::{Config, Interpreter};
use rinha::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "rinha", version, about = "Rinha - tree-walking interpreter")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a program from its JSON syntax tree
    Run {
        /// JSON AST file to evaluate
        file: PathBuf,
        /// Print the program's final value after evaluation
        #[arg(long)]
        show_result: bool,
        /// Maximum nesting of function calls
        #[arg(long, default_value_t = Config::default().max_depth)]
        max_depth: usize,
    },
    /// Parse a JSON syntax tree and dump it back (debug)
    Dump {
        /// JSON AST file to dump
        file: PathBuf,
    },
}

/// Install a stderr subscriber when `RUST_LOG` is set
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run {
            file,
            show_result,
            max_depth,
        } => run_file(&file, show_result, Config { max_depth }),
        Command::Dump { file } => dump_file(&file).map(|()| ExitCode::SUCCESS),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_file(
    path: &Path,
    show_result: bool,
    config: Config,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let program = File::load(path)?;

    let mut interp = Interpreter::new().with_config(config);
    match interp.run(&program) {
        Ok(value) => {
            if show_result {
                println!("{value}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "runtime error");
            rinha::error::report_runtime_error(&e)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn dump_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let program = File::load(path)?;
    println!("{}", serde_json::to_string_pretty(&program)?);
    Ok(())
}
