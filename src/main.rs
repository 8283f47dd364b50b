use clap::Parser;
use expense_sheet::args::{Args, Command};
use expense_sheet::{commands, Config, Mode, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let config_path = args.common().config().path();

    // When EXPENSE_SHEET_IN_TEST_MODE is set and non-empty, rows are kept in memory instead of
    // being sent to Google.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(config_path, init_args).await?.print(),

        Command::Serve(serve_args) => {
            let config = Config::load(config_path).await?;
            commands::serve(config, mode, serve_args).await?.print()
        }

        Command::Submit(payload_args) => {
            let config = Config::load(config_path).await?;
            commands::submit(config, mode, payload_args).await?.print()
        }

        Command::Validate(payload_args) => {
            let config = Config::load(config_path).await?;
            commands::validate(&config, payload_args).await?.print()
        }

        Command::Categories => {
            let config = Config::load(config_path).await?;
            commands::categories(&config).await?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        // Without RUST_LOG, only this crate logs, at `level`. The binary and the library share
        // the crate name.
        None => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
