use std::fs;
use std::io::{stdout, Write};
use std::path::{Path, PathBuf};

use colored::*;
use tracing::info;

use super::display::display_history;
use super::log::ChatLog;
use crate::error::Result;

/// Lines starting with '/' that the chat window handles itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum ChatCommand {
    Help,
    Clear,
    History,
    Save(Option<PathBuf>),
    Exit,
    Unknown(String),
}

/// Returns `None` when the line is a message for the bot.
pub(super) fn parse_command(line: &str) -> Option<ChatCommand> {
    let line = line.trim();
    let rest = line.strip_prefix('/')?;
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "help" => ChatCommand::Help,
        "clear" => ChatCommand::Clear,
        "history" => ChatCommand::History,
        "save" if arg.is_empty() => ChatCommand::Save(None),
        "save" => ChatCommand::Save(Some(PathBuf::from(arg))),
        "exit" | "quit" | "bye" => ChatCommand::Exit,
        _ => ChatCommand::Unknown(line.to_string()),
    };
    Some(command)
}

const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const BRIGHT_CYAN: &str = "\x1b[96m";
const RESET: &str = "\x1b[0m";

pub(super) fn print_help() {
    println!("\n{CYAN}SilverBot Chat Commands{RESET}");
    println!("{BRIGHT_CYAN}{}{RESET}", "=".repeat(60));
    println!("{GREEN}/exit, /quit, /bye{RESET} - Exit the chat");
    println!("{GREEN}/help{RESET}              - Show this help message");
    println!("{GREEN}/clear{RESET}             - Clear the screen (the log is kept)");
    println!("{GREEN}/history{RESET}           - Show everything said so far");
    println!("{GREEN}/save <file.html>{RESET}  - Write the conversation as HTML");
    println!("Anything else is sent to the bot.");
    println!();
}

pub(super) fn handle_clear() -> Result<()> {
    print!("\x1B[2J\x1B[1;1H");
    stdout().flush()?;
    Ok(())
}

pub(super) fn handle_history(log: &ChatLog) {
    display_history(log);
}

pub(super) fn handle_save(log: &ChatLog, path: &Path) -> Result<()> {
    save_transcript(log, path)?;
    println!("{} {}", "Conversation saved to".green(), path.display());
    Ok(())
}

/// Writes the log as HTML, creating parent directories as needed.
pub(super) fn save_transcript(log: &ChatLog, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, log.to_html())?;
    info!("Wrote {} log entries to {}", log.len(), path.display());
    Ok(())
}
