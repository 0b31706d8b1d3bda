//! SilverBot: a terminal chat client for a `/get-response/` reply service,
//! plus a small demo implementation of that service.

pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod server;

pub use chat::{ChatInputHandler, ChatLog, InputField, Message};
pub use client::{HttpReplyService, Reply, ReplyService};
pub use config::Settings;
pub use error::{ChatError, Result};
