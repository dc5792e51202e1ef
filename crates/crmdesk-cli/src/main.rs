//! crmdesk - a command-line client for the CRM.
//!
//! Logs in against the CRM backend and lists, creates, updates and deletes
//! customers, contacts, deals and tasks, plus a dashboard summary.

mod commands;
mod fields;
mod render;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crmdesk_core::{ApiClient, ApiError, Config, LoginRedirect};

use commands::Context;

// ============================================================================
// Constants
// ============================================================================

/// Log file name prefix inside the log directory (rotated daily)
const LOG_FILE_PREFIX: &str = "crmdesk.log";

/// Exit status when the command needs the user to log in first
const EXIT_LOGIN_REQUIRED: u8 = 2;

/// Initialize the tracing subscriber for logging.
///
/// Logs go to a daily rolling file so stdout stays clean for command output.
/// Falls back to stderr when there is no writable log directory.
fn init_tracing(log_dir: Option<PathBuf>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_dir.filter(|dir| std::fs::create_dir_all(dir).is_ok()) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config_result = Config::load();
    let config = config_result.as_ref().cloned().unwrap_or_default().with_env();

    let _log_guard = init_tracing(config.log_dir().ok());
    info!("crmdesk starting");
    if let Err(e) = config_result {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    let navigator = Arc::new(LoginRedirect::new());
    let result = match build_context(config, navigator.clone()) {
        Ok(mut ctx) => {
            let args: Vec<String> = std::env::args().skip(1).collect();
            commands::run(&mut ctx, &args).await
        }
        Err(e) => Err(e),
    };

    if navigator.take_pending() {
        // A 401 message is worth showing; a bare "not logged in" is not
        if let Err(e) = &result {
            if e.downcast_ref::<ApiError>() != Some(&ApiError::NotAuthenticated) {
                eprintln!("{}", e);
            }
        }
        eprintln!("Not logged in. Run `crmdesk login` to sign in.");
        return ExitCode::from(EXIT_LOGIN_REQUIRED);
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_context(config: Config, navigator: Arc<LoginRedirect>) -> anyhow::Result<Context> {
    let session = config.session_store()?;
    let api = ApiClient::from_config(&config, session, navigator.clone())?;
    Ok(Context {
        config,
        api,
        navigator,
    })
}
