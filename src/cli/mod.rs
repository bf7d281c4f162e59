//! Command line front end
//!
//! Calls a vendor directly with the user's own credentials. No quota applies.

pub mod display;
pub mod gate;

use crate::config::dotfiles::Dotfiles;
use crate::config::{env_lookup, Credentials, ProviderSettings};
use crate::providers::{HttpProviderFactory, Vendor};
use crate::services::{select_vendor, Dispatcher, ProviderSelector};
use crate::utils::error::{AppError, AppResult};
use clap::Parser;
use colored::*;
use gate::{ExecutionGate, GateOutcome, SystemShell, TerminalConfirmer};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "nlcmd")]
#[command(version)]
#[command(about = "Turn natural language into shell commands", long_about = None)]
pub struct Cli {
    /// Natural language description of the command you need
    pub prompt: Vec<String>,

    /// Execute the command after confirmation
    #[arg(short, long)]
    pub execute: bool,

    /// Force a provider (anthropic or openai)
    #[arg(short, long)]
    pub provider: Option<Vendor>,

    /// Model to use for the selected provider
    #[arg(short, long)]
    pub model: Option<String>,

    /// Show API key status and setup instructions
    #[arg(long)]
    pub config: bool,
}

impl Cli {
    /// Prompt words joined by spaces, if any
    pub fn prompt_text(&self) -> Option<String> {
        let prompt = self.prompt.join(" ");
        let prompt = prompt.trim();
        (!prompt.is_empty()).then(|| prompt.to_string())
    }
}

/// Run one invocation
///
/// `dotfiles` describes the `.env` files read at startup, for `--config`.
pub async fn run(cli: Cli, dotfiles: &Dotfiles) -> ExitCode {
    if cli.config {
        println!("{}", config_screen(env_lookup, dotfiles));
        return ExitCode::SUCCESS;
    }

    let settings = match ProviderSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            display::print_error(&AppError::Config(format!("{:#}", e)));
            return ExitCode::FAILURE;
        }
    };

    let Some(prompt) = cli.prompt_text() else {
        println!("{}", display::usage_text());
        return ExitCode::SUCCESS;
    };

    match generate_and_present(&cli, settings, &prompt).await {
        Ok(GateOutcome::Executed { exit_code }) => exit_status(exit_code),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

/// `--config` output
///
/// Works from the raw keys so it still helps when other settings are invalid.
fn config_screen<F>(lookup: F, dotfiles: &Dotfiles) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let credentials = Credentials::from_lookup(&lookup);
    let problem = ProviderSettings::from_lookup(&lookup)
        .err()
        .map(|e| format!("{:#}", e));

    display::config_report(&credentials, dotfiles, problem.as_deref())
}

async fn generate_and_present(
    cli: &Cli,
    settings: ProviderSettings,
    prompt: &str,
) -> AppResult<GateOutcome> {
    let credentials = settings.credentials();
    let deadline = Duration::from_secs(settings.request_timeout);

    let mut factory =
        HttpProviderFactory::new(settings).map_err(|e| AppError::Internal(format!("{:#}", e)))?;
    if let Some(model) = &cli.model {
        let primary = select_vendor(&credentials, cli.provider)?;
        debug!("Using model {} for {}", model, primary);
        factory = factory.with_model(primary, model.clone());
    }

    let dispatcher = Dispatcher::new(ProviderSelector::new(credentials, Arc::new(factory)), deadline);

    eprintln!("{}", "Thinking...".yellow());
    let generated = dispatcher.dispatch(Some(prompt), None, cli.provider).await?;

    if generated.fell_back {
        eprintln!(
            "{}",
            format!("Primary provider failed, answered by {}", generated.vendor).dimmed()
        );
    }

    ExecutionGate::new(TerminalConfirmer, SystemShell)
        .present(&generated.command, cli.execute)
        .await
}

/// Exit status of an executed command, clamped to what a process can return
fn exit_status(code: i32) -> ExitCode {
    ExitCode::from(exit_byte(code))
}

fn exit_byte(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}
