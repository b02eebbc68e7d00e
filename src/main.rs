//! xconf CLI.
//!
//! - `xconf compile` - Compile configuration files and print the result
//! - `xconf check` - Compile configuration files and report errors only

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use xconf_config::cli::{CheckArgs, CompileArgs};

/// xconf unified CLI.
#[derive(Parser)]
#[command(
    name = "xconf",
    version,
    about = "Configuration compiler for a multi-protocol proxy runtime",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile configuration files to runtime JSON on stdout.
    #[command(name = "compile", alias = "build")]
    Compile(CompileArgs),

    /// Validate configuration files without printing the result.
    #[command(name = "check", alias = "test")]
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile(args) => xconf_config::cli::run_compile(args),
        Commands::Check(args) => xconf_config::cli::run_check(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
