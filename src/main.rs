mod cli;
mod config;
mod response_provider;

use std::io::{self, IsTerminal};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use eyre::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use crate::cli::chat::ChatContext;
use crate::config::{ChatArgs, ChatConfig};
use crate::response_provider::ResponseProvider;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    args: ChatArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a chat session
    Chat(ChatArgs),
}

impl Cli {
    fn chat_args(self) -> ChatArgs {
        match self.command {
            Some(Commands::Chat(args)) => args,
            // Default to chat if no subcommand is provided
            None => self.args,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    dotenv().ok();

    let args = Cli::parse().chat_args();

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ChatConfig::from(&args);
    let responder = config.responder()?;
    info!(reply_delay_ms = responder.delay().as_millis() as u64, "Starting CUTM GPT");
    let provider: Arc<dyn ResponseProvider> = Arc::new(responder);

    let interactive = io::stdout().is_terminal();
    let mut chat_context =
        ChatContext::new(Box::new(io::stdout()), args.input, interactive, config, provider);
    chat_context.run().await
}
