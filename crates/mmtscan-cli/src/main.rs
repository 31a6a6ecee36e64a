//! # mmtscan CLI entry point
//!
//! Parses command-line arguments, sets up logging on stderr, and runs the
//! check with its report on stdout.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mmtscan_cli::{run_check, CheckArgs, EXIT_ERROR};

/// Syntax-check every `.mmt` model file below a directory.
///
/// Prints one progress line per model, then the error output of every
/// failing model and a final tally. Exits non-zero when any model failed.
#[derive(Parser, Debug)]
#[command(name = "mmtscan", version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    check: CheckArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("mmtscan v{} starting", env!("CARGO_PKG_VERSION"));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match run_check(&cli.check, &mut out) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            let _ = out.flush();
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
