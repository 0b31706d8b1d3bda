pub mod bot;
mod routes;
mod server;

pub use bot::{Intent, ReplyEngine};
pub use server::ApiServer;
