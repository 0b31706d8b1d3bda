use std::path::PathBuf;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{info, warn};

use super::command_handlers::{
    handle_clear, handle_history, handle_save, parse_command, print_help, save_transcript,
    ChatCommand,
};
use super::display::print_message;
use super::handler::{ChatInputHandler, PendingReply};
use super::input::InputField;
use crate::error::Result;

/// Options for an interactive session
#[derive(Debug, Default, Clone)]
pub struct ChatOptions {
    /// Where to write the HTML transcript when the session ends
    pub transcript: Option<PathBuf>,
    /// Shown in the banner
    pub server_url: String,
}

/// Prints the log entries that appeared since the last call.
pub fn print_new_entries(handler: &ChatInputHandler) {
    let fresh = handler.conversation().log.take_unseen();
    for message in &fresh {
        print_message(message);
    }
}

async fn await_reply(pending: PendingReply) {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("waiting for the bot...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    pending.wait().await;

    spinner.finish_and_clear();
}

// --- Main Chat Loop ---

pub async fn chat_loop(handler: &ChatInputHandler, options: &ChatOptions) -> Result<()> {
    println!("Starting chat session with {}", options.server_url.bold());
    print_help();

    let mut rl = DefaultEditor::new()?;
    let mut field = InputField::new();

    loop {
        let line = match rl.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if !line.trim().is_empty() {
            let _ = rl.add_history_entry(line.trim());
        }

        match parse_command(&line) {
            Some(ChatCommand::Exit) => {
                println!("Goodbye!");
                break;
            }
            Some(ChatCommand::Help) => print_help(),
            Some(ChatCommand::Clear) => handle_clear()?,
            Some(ChatCommand::History) => handle_history(&handler.conversation().log),
            Some(ChatCommand::Save(path)) => match path.or_else(|| options.transcript.clone()) {
                Some(path) => {
                    let log = handler.conversation().log.clone();
                    if let Err(e) = handle_save(&log, &path) {
                        println!("{} {}", "Could not save the conversation:".red(), e);
                    }
                }
                None => println!("Usage: /save <file.html>"),
            },
            Some(ChatCommand::Unknown(command)) => {
                println!("Unknown command {}. Type /help for the list.", command.yellow());
            }
            None => {
                field.set_value(line);
                if let Some(pending) = handler.submit(&mut field) {
                    print_new_entries(handler);
                    await_reply(pending).await;
                    print_new_entries(handler);
                }
            }
        }
    }

    if let Some(path) = &options.transcript {
        let log = handler.conversation().log.clone();
        match save_transcript(&log, path) {
            Ok(()) => info!("Transcript written to {}", path.display()),
            Err(e) => warn!("Failed to write transcript to {}: {}", path.display(), e),
        }
    }

    Ok(())
}
