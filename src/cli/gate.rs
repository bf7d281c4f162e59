//! Execution gate
//!
//! Shows a generated command and runs it through the shell only after the
//! user explicitly confirms.

use super::display;
use crate::utils::error::{AppError, AppResult};
use async_trait::async_trait;
use colored::*;
use dialoguer::Confirm;
use tokio::process::Command;
use tracing::{debug, info};

/// Asks the user a yes/no question
pub trait Confirmer {
    fn confirm(&self, prompt: &str) -> AppResult<bool>;
}

/// Interactive terminal prompt, defaulting to no
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, prompt: &str) -> AppResult<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| AppError::Execution(format!("confirmation prompt unavailable: {}", e)))
    }
}

/// Runs a command string, returning its exit code
#[async_trait]
pub trait ShellRunner: Send + Sync {
    async fn run(&self, command: &str) -> AppResult<i32>;
}

/// `sh -c` with the terminal's stdio inherited
pub struct SystemShell;

#[async_trait]
impl ShellRunner for SystemShell {
    async fn run(&self, command: &str) -> AppResult<i32> {
        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .status()
            .await
            .map_err(|e| AppError::Execution(e.to_string()))?;

        debug!("Shell exited with {}", status);
        // Killed by a signal
        Ok(status.code().unwrap_or(1))
    }
}

/// What happened to a generated command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Shown only
    Displayed,
    /// Execution requested but declined
    Declined,
    /// Ran through the shell
    Executed { exit_code: i32 },
}

pub struct ExecutionGate<C, R> {
    confirmer: C,
    runner: R,
}

impl<C: Confirmer, R: ShellRunner> ExecutionGate<C, R> {
    pub fn new(confirmer: C, runner: R) -> Self {
        Self { confirmer, runner }
    }

    /// Show the command and, when asked to execute, confirm then run it
    pub async fn present(&self, command: &str, execute: bool) -> AppResult<GateOutcome> {
        if command.trim().is_empty() {
            return Err(AppError::Execution("no command was generated".to_string()));
        }

        display::print_command(command);

        if !execute {
            display::print_execute_hint();
            return Ok(GateOutcome::Displayed);
        }

        if !self.confirmer.confirm("Execute this command?")? {
            info!("Execution declined");
            return Ok(GateOutcome::Declined);
        }

        println!("\n{} {}", "Executing:".dimmed(), command);
        let exit_code = self.runner.run(command).await?;

        Ok(GateOutcome::Executed { exit_code })
    }
}
