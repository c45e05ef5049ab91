use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use sales_assistant::app::AppConfig;
use sales_assistant::chat::ChatSession;
use sales_assistant::cli::{Cli, Commands};
use sales_assistant::logging::init_logging;
use sales_assistant::models::BedrockProvider;
use sales_assistant::platform::AppPaths;
use sales_assistant::tui;
use sales_assistant::Error;

const INIT_FAILURE_MESSAGE: &str =
    "Failed to initialize the Bedrock agent. Please check your AWS configuration.";

/// Endpoint problems get the operator-facing message whichever layer caught them.
fn report_init_failure(e: Error) -> Error {
    if matches!(e, Error::Configuration(_)) {
        eprintln!("{}", INIT_FAILURE_MESSAGE);
    }
    e
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command();

    let paths = AppPaths::new()?;
    paths.ensure_dirs_exist()?;

    let mut config = AppConfig::load(&paths, cli.config.as_deref())
        .await
        .map_err(report_init_failure)
        .context("Failed to load configuration")?;
    config.apply_overrides(cli.model.clone(), cli.region.clone(), cli.profile.clone());
    config.validate().map_err(report_init_failure)?;

    let level = if cli.debug {
        cli.log_level()
    } else {
        config.logging.level.as_str()
    };
    let _log_guard = init_logging(
        &paths.logs_dir(),
        &config.logging.file_name,
        level,
        command != Commands::Chat,
    )?;

    info!("Starting Sales Assistant");

    let prompt = match command {
        Commands::Config => {
            print!("{}", config.to_toml()?);
            return Ok(());
        }
        Commands::Ask { prompt } => Some(prompt),
        Commands::Chat => None,
    };

    let provider = match BedrockProvider::new(config.to_endpoint_config()).await {
        Ok(provider) => provider,
        Err(e) => {
            error!(agent = %config.inference.agent_name, "Agent initialization error: {}", e);
            return Err(report_init_failure(e).into());
        }
    };
    info!(agent = %config.inference.agent_name, "Agent initialized");

    let mut session = ChatSession::new(Arc::new(provider));

    match prompt {
        Some(prompt) => {
            session.submit(&prompt).await?;
            if let Some(reply) = session.transcript().last() {
                println!("{}", reply.message());
            }
        }
        None => tui::run(session, &config.ui).await?,
    }

    Ok(())
}
