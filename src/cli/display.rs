//! Terminal output for the command line tool

use crate::config::dotfiles::Dotfiles;
use crate::config::Credentials;
use crate::providers::Vendor;
use crate::utils::error::AppError;
use crate::utils::logging::mask_secret;
use colored::*;

/// Title drawn on the command frame
pub const FRAME_TITLE: &str = "Generated Command";

/// Draw a box around the command
///
/// Multi-line commands (here-documents) keep their line breaks.
pub fn frame_command(command: &str) -> String {
    let lines: Vec<&str> = command.lines().collect();
    let width = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
        .max(FRAME_TITLE.chars().count() + 2);

    let title = format!(" {} ", FRAME_TITLE);
    let top_fill = "─".repeat(width + 2 - title.chars().count());
    let mut framed = format!("╭{}{}╮\n", title, top_fill);

    for line in &lines {
        let pad = width - line.chars().count();
        framed.push_str(&format!("│ {}{} │\n", line, " ".repeat(pad)));
    }

    framed.push_str(&format!("╰{}╯", "─".repeat(width + 2)));
    framed
}

/// Print the framed command to stdout
pub fn print_command(command: &str) {
    println!("{}", frame_command(command).green());
}

/// Usage screen shown when no prompt is given
pub fn usage_text() -> String {
    format!(
        "{} nlcmd \"your command description\"\n\n\
         {}\n  \
         nlcmd \"git push\"\n  \
         nlcmd \"what's running on port 8000\"\n  \
         nlcmd \"find large files\"\n  \
         nlcmd -e \"list all files\"   (confirm, then run)\n\n\
         {}\n  \
         nlcmd --config  (to set up API keys)",
        "Usage:".yellow().bold(),
        "Examples:".dimmed(),
        "Configuration:".dimmed(),
    )
}

/// Credential diagnostics and setup instructions
///
/// `problem` is a settings error that would stop a generation request.
pub fn config_report(credentials: &Credentials, dotfiles: &Dotfiles, problem: Option<&str>) -> String {
    let mut report = format!("{}\n\nCurrent configuration:\n", "nlcmd configuration".bold());

    for vendor in Vendor::ALL {
        let state = match credentials.get(vendor) {
            Some(key) => format!("set ({})", mask_secret(key)).green(),
            None => "not set".red(),
        };
        report.push_str(&format!("  {} ({}): {}\n", vendor.display_name(), vendor.key_env(), state));
    }

    if dotfiles.loaded.is_empty() {
        report.push_str("\nNo .env file loaded\n");
    } else {
        report.push_str("\nLoaded from:\n");
        for path in &dotfiles.loaded {
            report.push_str(&format!("  {}\n", path.display()));
        }
    }

    for (path, reason) in &dotfiles.failed {
        report.push_str(&format!(
            "{} {}: {}\n",
            "Could not read".yellow(),
            path.display(),
            reason
        ));
    }

    if let Some(problem) = problem {
        report.push_str(&format!("\n{} {}\n", "Invalid configuration:".red().bold(), problem));
    }

    report.push_str(&format!(
        "\n{}\n\n{}\n  export ANTHROPIC_API_KEY='your-anthropic-api-key'\n\n{}\n  export OPENAI_API_KEY='your-openai-api-key'\n\n{}",
        "To set up API keys, add them to your environment:".dimmed(),
        "For Anthropic:".bold(),
        "For OpenAI:".bold(),
        "Or add them to a .env file in your home directory".dimmed(),
    ));

    if credentials.is_empty() {
        report.push_str(&format!(
            "\n\n{}",
            "No API keys found. You need at least one to use nlcmd.".yellow()
        ));
    }

    report
}

/// Hint printed after a command that was only shown
pub fn print_execute_hint() {
    println!("\n{}", "Use -e flag to execute".dimmed());
}

/// Report a failure on stderr
pub fn print_error(err: &AppError) {
    eprintln!("{} {}", "Error:".red().bold(), err);
    if let Some(detail) = err.detail() {
        eprintln!("{}", detail);
    }
    if err.suggests_config() {
        eprintln!("\n{}", "Run 'nlcmd --config' to set up your API keys".yellow());
    }
}
