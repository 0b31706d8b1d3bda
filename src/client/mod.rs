mod client;
mod types;

pub use client::{HttpReplyService, ReplyService};
pub use types::Reply;
