use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use silverbot::chat::{self, ChatInputHandler, ChatOptions, InputField};
use silverbot::client::HttpReplyService;
use silverbot::config::{LoggingConfig, Settings};
use silverbot::server::ApiServer;

#[derive(Parser)]
#[command(name = "silverbot", version, about = "Chat with a /get-response/ reply service")]
struct Cli {
    /// Directory holding default.toml and the optional local.toml
    #[arg(long, global = true, default_value = "config")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive chat against a running reply service (default)
    Chat {
        /// Overrides client.base_url
        #[arg(long)]
        url: Option<String>,
        /// Write the conversation as HTML on exit
        #[arg(long)]
        transcript: Option<PathBuf>,
    },
    /// Send one message, print the reply and exit
    Send {
        #[arg(long)]
        url: Option<String>,
        /// Print the log as JSON
        #[arg(long)]
        json: bool,
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Run only the demo reply service
    Serve,
    /// Run the demo reply service in the background and chat with it
    Run {
        #[arg(long)]
        transcript: Option<PathBuf>,
    },
}

fn init_logging(config: &LoggingConfig) -> anyhow::Result<WorkerGuard> {
    let log_path = config.file.as_deref().unwrap_or_else(|| Path::new("logs"));
    std::fs::create_dir_all(log_path)
        .with_context(|| format!("creating log directory {}", log_path.display()))?;

    let file_appender = tracing_appender::rolling::RollingFileAppender::new(
        tracing_appender::rolling::Rotation::DAILY,
        log_path,
        "silverbot",
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_lowercase()));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        // Disable ANSI colors for cleaner log files
        .with_ansi(false)
        .with_line_number(true)
        .with_file(true)
        .with_thread_ids(true)
        .with_target(false)
        .with_env_filter(filter)
        .init();

    let full_log_path = std::fs::canonicalize(log_path)?;
    info!("Log directory: {}", full_log_path.display());
    Ok(guard)
}

fn reply_handler(settings: &Settings, url: Option<String>) -> anyhow::Result<(ChatInputHandler, String)> {
    let mut client_config = settings.client.clone();
    if let Some(url) = url {
        client_config.base_url = url;
    }
    let service = HttpReplyService::new(&client_config)?;
    let server_url = service.url().to_string();
    Ok((ChatInputHandler::new(Arc::new(service)), server_url))
}

async fn send_once(handler: &ChatInputHandler, message: &str, json: bool) -> anyhow::Result<()> {
    let mut field = InputField::from(message);
    let Some(pending) = handler.submit(&mut field) else {
        bail!("nothing to send: the message is empty");
    };
    pending.wait().await;

    let mut conversation = handler.conversation();
    if json {
        println!("{}", serde_json::to_string_pretty(conversation.log.entries())?);
    } else {
        for message in conversation.log.take_unseen() {
            chat::print_message(&message);
        }
    }

    if conversation.log.last().is_some_and(|m| m.is_error()) {
        bail!("the bot could not respond");
    }
    Ok(())
}

/// Main entry point for the SilverBot application
///
/// Loads settings, sets up file logging and dispatches on the subcommand:
/// - Chat: interactive session against a running reply service
/// - Send: a single round trip
/// - Serve: only the demo reply service
/// - Run: the demo reply service plus an interactive session
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::from_dir(&cli.config_dir)
        .with_context(|| format!("loading settings from {}", cli.config_dir.display()))?;
    let _guard = init_logging(&settings.logging)?;
    info!("SilverBot starting up");

    match cli.command.unwrap_or(Command::Chat { url: None, transcript: None }) {
        Command::Chat { url, transcript } => {
            let (handler, server_url) = reply_handler(&settings, url)?;
            chat::chat_loop(&handler, &ChatOptions { transcript, server_url }).await?;
        }
        Command::Send { url, json, message } => {
            let (handler, _) = reply_handler(&settings, url)?;
            send_once(&handler, &message.join(" "), json).await?;
        }
        Command::Serve => {
            ApiServer::from_settings(&settings).start().await?;
        }
        Command::Run { transcript } => {
            let server = ApiServer::from_settings(&settings);
            tokio::spawn(async move {
                if let Err(e) = server.start().await {
                    error!("Server error: {}", e);
                    eprintln!("Server error: {}", e);
                }
            });

            // Give the server a moment to start
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

            let url = format!("http://{}:{}", settings.server.host, settings.server.port);
            let (handler, server_url) = reply_handler(&settings, Some(url))?;
            chat::chat_loop(&handler, &ChatOptions { transcript, server_url }).await?;
        }
    }

    info!("SilverBot shutting down");
    Ok(())
}
