// Data model: entries and the log they are appended to
pub mod message;
pub mod log;
pub mod input;
pub mod sequencer;

// The submit operation
pub mod handler;

// Terminal front end
mod display;
mod command_handlers;
mod chat;

pub use chat::{chat_loop, print_new_entries, ChatOptions};
pub use display::print_message;
pub use handler::{ChatInputHandler, Conversation, PendingReply};
pub use input::InputField;
pub use log::ChatLog;
pub use message::{Content, Message, Sender};
