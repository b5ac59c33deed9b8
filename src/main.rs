//! Suture CLI entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use suture::{OperationMode, PatchError, SutureConfig};
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

/// Installs a stderr subscriber filtered by `RUST_LOG`, defaulting to `info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<(), PatchError> {
    let config = load_config()?;
    config.validate()?;

    match config.operation_mode() {
        OperationMode::Locate => cli::locate::run(&config),
        OperationMode::DetectPaths => cli::detect_paths::run(&config),
        OperationMode::Submit => cli::submit::run(&config).await,
        OperationMode::UpdateBranch => cli::update_branch::run(&config).await,
        OperationMode::ListPulls
        | OperationMode::Approve
        | OperationMode::Comment
        | OperationMode::Merge
        | OperationMode::Close
        | OperationMode::DeleteBranch => cli::pull_requests::run(&config).await,
        OperationMode::Unspecified => Err(PatchError::Configuration {
            message: "nothing to do: pass --file with --offset or --detect-paths, \
                      --manifest, --update-branch, --comment-on, --list-pulls, \
                      --approve, --merge, --close or --delete-branch"
                .to_owned(),
        }),
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`PatchError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<SutureConfig, PatchError> {
    SutureConfig::load().map_err(|error| PatchError::Configuration {
        message: error.to_string(),
    })
}
