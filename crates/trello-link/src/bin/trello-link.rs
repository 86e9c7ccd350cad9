//! trello-link - GitHub Action entry point.
//!
//! Reads the event file written by the Actions runner, finds the Trello cards
//! referenced by the head commit message or pull request title, then attaches
//! a link (or posts a comment) and moves each card to the configured list.
//!
//! # Environment Variables
//!
//! Action inputs arrive as `INPUT_<NAME>` variables:
//!
//! - `INPUT_TRELLO-API-KEY` - Trello API key (required)
//! - `INPUT_TRELLO-AUTH-TOKEN` - Trello auth token (required)
//! - `INPUT_TRELLO-BOARD-ID` - Board holding the cards (required)
//! - `INPUT_TRELLO-CARD-ACTION` - `attachment` or `comment` (required)
//! - `INPUT_TRELLO-LIST-NAME-COMMIT` - List for cards referenced by commits (required)
//! - `INPUT_TRELLO-LIST-NAME-PR-OPEN` - List for cards referenced by open PRs
//! - `INPUT_TRELLO-LIST-NAME-PR-CLOSED` - List for cards referenced by closed PRs and merges
//! - `GITHUB_EVENT_PATH` - Event payload file (set by the runner)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trello_link::{route_payload, CardAction, Config, EventPayload, ListNames, TrelloClient};

/// Link GitHub commits and pull requests to Trello cards.
#[derive(Parser)]
#[command(name = "trello-link")]
#[command(about = "Link GitHub commits and pull requests to Trello cards")]
#[command(version)]
struct Cli {
    /// Trello API key
    #[arg(long, env = "INPUT_TRELLO-API-KEY", hide_env_values = true)]
    api_key: String,

    /// Trello auth token
    #[arg(long, env = "INPUT_TRELLO-AUTH-TOKEN", hide_env_values = true)]
    auth_token: String,

    /// Board holding the referenced cards
    #[arg(long, env = "INPUT_TRELLO-BOARD-ID")]
    board_id: String,

    /// What to add to each card: attachment or comment
    #[arg(long, env = "INPUT_TRELLO-CARD-ACTION")]
    card_action: CardAction,

    /// List for cards referenced by a pushed commit; blank disables the move
    #[arg(long, env = "INPUT_TRELLO-LIST-NAME-COMMIT")]
    list_name_commit: String,

    /// List for cards referenced by an open pull request
    #[arg(long, env = "INPUT_TRELLO-LIST-NAME-PR-OPEN")]
    list_name_pr_open: Option<String>,

    /// List for cards referenced by a closed pull request or merge commit
    #[arg(long, env = "INPUT_TRELLO-LIST-NAME-PR-CLOSED")]
    list_name_pr_closed: Option<String>,

    /// Event payload file; nothing is done when unset
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    /// Trello API root
    #[arg(long, env = "TRELLO_API_URL", default_value = trello_link::config::DEFAULT_API_URL)]
    api_url: String,

    /// Maximum number of cards processed at once
    #[arg(long, env = "TRELLO_LINK_MAX_CONCURRENCY", default_value_t = 1)]
    max_concurrency: usize,

    /// Log output format
    #[arg(long, env = "TRELLO_LINK_LOG_FORMAT", value_enum, default_value_t)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum LogFormat {
    #[default]
    Text,
    Json,
}

fn init_tracing(format: LogFormat) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("trello_link=info".parse()?);

    match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format)?;

    let config = Config::new(cli.api_key, cli.auth_token, cli.board_id, cli.card_action)
        .with_lists(ListNames::new(
            Some(cli.list_name_commit),
            cli.list_name_pr_open,
            cli.list_name_pr_closed,
        ))
        .with_api_url(cli.api_url)
        .with_max_concurrency(cli.max_concurrency);
    config.validate().context("Invalid configuration")?;

    info!(
        board = %config.board_id,
        action = %config.card_action,
        max_concurrency = config.max_concurrency,
        "Starting trello-link"
    );

    let Some(event_path) = cli.event_path else {
        info!("GITHUB_EVENT_PATH is not set, nothing to do");
        return Ok(());
    };

    let payload = EventPayload::from_file(&event_path).await?;
    let client = TrelloClient::from_config(&config)?;

    let report = route_payload(&config, &client, payload).await;
    info!(
        referenced = report.referenced(),
        resolved = report.resolved(),
        moved = report.moved(),
        "Done"
    );

    Ok(())
}
