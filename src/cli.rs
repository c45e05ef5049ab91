use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sales-assistant")]
#[command(about = "Terminal chat assistant backed by a hosted Bedrock model")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Bedrock model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// AWS region of the model endpoint
    #[arg(short, long)]
    pub region: Option<String>,

    /// AWS shared-config profile to take credentials from
    #[arg(short, long)]
    pub profile: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Start the interactive chat interface
    Chat,

    /// Send a single message and print the reply
    Ask {
        /// Message to send
        prompt: String,
    },

    /// Print the effective configuration
    Config,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Chat)
    }

    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}
