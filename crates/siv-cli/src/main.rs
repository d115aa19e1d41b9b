//! `siv` command entry point.
//!
//! Sequence:
//! 1. Parse arguments.
//! 2. Load and validate [`Config`] from environment variables.
//! 3. Initialise structured logging.
//! 4. Decode the key and build the SIV context.
//! 5. Run the subcommand and map any failure onto an exit code.

mod cli;
mod commands;
mod config;
mod telemetry;

use std::process::ExitCode;

use clap::Parser;
use common::protocol::ErrorResponse;
use common::ToolError;
use tracing::{error, info};

use cli::Cli;
use config::Config;

fn main() -> ExitCode {
    // -----------------------------------------------------------------------
    // 1. Arguments
    // -----------------------------------------------------------------------
    let cli = Cli::parse();
    let json = cli.command.args().json;

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Telemetry is not yet up; write to stderr directly.
            return report(&ToolError::BadInput(format!("{e:#}")), json);
        }
    };

    // -----------------------------------------------------------------------
    // 3. Telemetry
    // -----------------------------------------------------------------------
    if let Err(e) = telemetry::init(&cfg.log_level) {
        return report(&ToolError::Internal(format!("{e:#}")), json);
    }
    info!(version = env!("CARGO_PKG_VERSION"), "siv starting");

    // -----------------------------------------------------------------------
    // 4-5. Key, context, command
    // -----------------------------------------------------------------------
    match run(&cli, &cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.code(), error = %e, "command failed");
            report(&e, json)
        }
    }
}

fn run(cli: &Cli, cfg: &Config) -> Result<(), ToolError> {
    let key = cfg
        .key_bytes()
        .map_err(|e| ToolError::BadInput(format!("{e:#}")))?;
    let ctx = siv::setup(&key).map_err(commands::siv_error)?;
    info!(key_bits = ctx.key_size().bits(), "context ready");

    commands::execute(&cli.command, &ctx)
}

fn report(e: &ToolError, json: bool) -> ExitCode {
    if json {
        match serde_json::to_string(&ErrorResponse::from(e)) {
            Ok(body) => eprintln!("{body}"),
            Err(_) => eprintln!("Error: {e}"),
        }
    } else {
        eprintln!("Error: {e}");
    }
    ExitCode::from(e.exit_code())
}
