//! CLI for compiling and checking configuration documents.

use std::io;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use xconf_core::app::CompiledConfig;

use crate::error::ConfigError;
use crate::loader::load_configs;
use crate::merge::OverrideOptions;

/// Diagnostic output format on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

/// Logging flags shared by every subcommand.
#[derive(Parser, Debug, Clone)]
pub struct LogArgs {
    /// Log level or filter directive (trace/debug/info/warn/error).
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// Arguments for `xconf compile`.
#[derive(Parser, Debug, Clone)]
pub struct CompileArgs {
    /// Config file path (json/jsonc/yaml/toml). Repeat to layer overrides.
    #[arg(short, long = "config", required = true)]
    pub config: Vec<PathBuf>,

    /// Append a single unmatched override outbound instead of prepending it.
    #[arg(long)]
    pub append_outbounds: bool,

    /// Pretty-print the compiled JSON.
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub log: LogArgs,
}

/// Arguments for `xconf check`.
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Config file path (json/jsonc/yaml/toml). Repeat to layer overrides.
    #[arg(short, long = "config", required = true)]
    pub config: Vec<PathBuf>,

    /// Append a single unmatched override outbound instead of prepending it.
    #[arg(long)]
    pub append_outbounds: bool,

    #[command(flatten)]
    pub log: LogArgs,
}

/// Load, merge and compile `paths`.
pub fn compile_files(
    paths: &[PathBuf],
    options: &OverrideOptions,
) -> Result<CompiledConfig, ConfigError> {
    load_configs(paths, options)?.build()
}

/// Compile and print the result as JSON on stdout.
pub fn run_compile(args: CompileArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(&args.log);
    let options = OverrideOptions {
        append_unmatched_outbound: args.append_outbounds,
    };
    let compiled = compile_files(&args.config, &options)?;
    let out = if args.pretty {
        serde_json::to_string_pretty(&compiled)?
    } else {
        serde_json::to_string(&compiled)?
    };
    println!("{out}");
    Ok(())
}

/// Compile and report success without printing the result.
pub fn run_check(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(&args.log);
    let options = OverrideOptions {
        append_unmatched_outbound: args.append_outbounds,
    };
    let compiled = compile_files(&args.config, &options)?;
    info!(
        apps = compiled.app.len(),
        inbounds = compiled.inbound.len(),
        outbounds = compiled.outbound.len(),
        "configuration OK"
    );
    eprintln!("Configuration OK.");
    Ok(())
}

fn init_tracing(args: &LogArgs) {
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    match args.log_format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(io::stderr))
                .init();
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::stderr))
                .init();
        }
    }
}
