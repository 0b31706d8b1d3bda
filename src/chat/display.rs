use colored::*;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use super::log::ChatLog;
use super::message::{Content, Message, Sender};

/// Prints one log entry the way the chat window shows it.
pub fn print_message(message: &Message) {
    println!("{}", format_message(message));
}

pub(super) fn format_message(message: &Message) -> String {
    match (&message.sender, &message.content) {
        (Sender::User, Content::Text { text }) => format!("{} {}", "[you]".bold().green(), text),
        (Sender::Bot, Content::Text { text }) => {
            // The reply service breaks lines with <br>
            let text = text.replace("<br>", "\n");
            format!("{} {}", "[bot]".bold().cyan(), text.bright_cyan())
        }
        (_, Content::Image { url }) => {
            format!("{} {} {}", "[bot]".bold().cyan(), "[image]".magenta(), url.underline())
        }
        (_, Content::Error { text }) => format!("{} {}", "[bot]".bold().red(), text.red()),
    }
}

/// Displays the whole log as a table.
pub(super) fn display_history(log: &ChatLog) {
    if log.is_empty() {
        println!("{}", "Nothing has been said yet".yellow());
        return;
    }

    let header = |title: &str| {
        Cell::new(title)
            .fg(comfy_table::Color::Cyan)
            .add_attribute(Attribute::Bold)
    };

    let mut table = Table::new();
    table
        .set_header(vec![header("#"), header("Time"), header("From"), header("Message")])
        .load_preset(comfy_table::presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    for (i, message) in log.entries().iter().enumerate() {
        let (from, colour) = match message.sender {
            Sender::User => ("you", comfy_table::Color::Green),
            Sender::Bot => ("bot", comfy_table::Color::Yellow),
        };
        let body = match &message.content {
            Content::Text { text } => Cell::new(text),
            Content::Image { url } => Cell::new(format!("[image] {}", url)).fg(comfy_table::Color::Magenta),
            Content::Error { text } => Cell::new(text).fg(comfy_table::Color::Red),
        };
        table.add_row(vec![
            Cell::new(i + 1).set_alignment(CellAlignment::Right),
            Cell::new(message.at.format("%H:%M:%S").to_string()).fg(comfy_table::Color::DarkGrey),
            Cell::new(from).fg(colour).set_alignment(CellAlignment::Center),
            body,
        ]);
    }

    println!("{table}");
}
