//! nlcmd command line tool
//!
//! Prints a shell command for a natural-language request and optionally runs
//! it after confirmation.

use clap::Parser;
use nlcmd::cli::{self, display, Cli};
use nlcmd::config::{dotfiles, env_lookup};
use nlcmd::utils::logging::init_logging;
use nlcmd::AppError;
use std::process::ExitCode;
use tracing::{debug, warn};

#[tokio::main]
async fn main() -> ExitCode {
    // RUST_LOG may come from a dotfile, so load them before the subscriber
    let dotfiles = dotfiles::load_dotfiles();

    let filter = env_lookup("RUST_LOG").unwrap_or_else(|| "warn".to_string());
    if let Err(e) = init_logging(&filter, "text") {
        display::print_error(&AppError::Config(format!("{:#}", e)));
        return ExitCode::FAILURE;
    }

    for path in &dotfiles.loaded {
        debug!("Loaded environment from {:?}", path);
    }
    for (path, reason) in &dotfiles.failed {
        warn!("Ignoring unreadable dotfile {:?}: {}", path, reason);
    }

    let cli = Cli::parse();
    cli::run(cli, &dotfiles).await
}
