//! Zenban server -- REST API for a kanban board.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:27001 with the demo board
//! cargo run --bin zenban-server
//!
//! # Empty board on a custom address
//! cargo run --bin zenban-server -- --bind 127.0.0.1:8080 --no-seed
//!
//! # Or via environment variable
//! ZENBAN_ADDR=127.0.0.1:8080 cargo run --bin zenban-server
//! ```

use std::sync::Arc;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use zenban_core::Board;
use zenban_core::seed::demo_board;
use zenban_server::config::{ServerCliArgs, ServerConfig};
use zenban_server::server;
use zenban_server::state::AppState;

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let _log_guard = init_logging(&config);

    let board = if config.seed_demo_board {
        demo_board()
    } else {
        Board::new()
    };
    tracing::info!(
        addr = %config.bind_addr,
        seeded = config.seed_demo_board,
        "starting zenban server"
    );

    match server::start_server_with_state(&config.bind_addr, Arc::new(AppState::new(board))).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "api server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "api server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start api server");
            std::process::exit(1);
        }
    }
}

/// Initialize logging to stdout, or to the configured log file.
///
/// Returns a [`WorkerGuard`] for file logging that must be held until
/// shutdown so buffered entries are flushed.
fn init_logging(config: &ServerConfig) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    let Some((log_dir, file_name)) = config.log_file_parts() else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
        return None;
    };

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}
