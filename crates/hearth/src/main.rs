//! Hearth - command-line client for the family organizer.
//!
//! Main entry point for the Hearth CLI.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use console::Style;
use hearth_client::{HearthClient, TokenStore};

mod commands;

use commands::{auth, events, meals, recipes, status};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Hearth - family calendar, recipes and meal planning
#[derive(Parser)]
#[command(name = "hearth")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// API base URL (default: http://localhost:8000/api)
    #[arg(long, global = true, env = "HEARTH_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session
    Login(auth::LoginArgs),

    /// Create an account and log into it
    Register(auth::RegisterArgs),

    /// Forget the stored session
    Logout,

    /// Show the configured backend and session state
    Status(status::StatusArgs),

    /// Calendar events
    Events(events::EventsArgs),

    /// Recipes and the recipe catalog
    Recipes(recipes::RecipesArgs),

    /// Meal plans and their slots
    Meals(meals::MealsArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Console (human-readable, stderr) + rotating JSON file
    let filter = if cli.verbose {
        "hearth=debug,hearth_client=debug,hearth_config=debug,info"
    } else {
        "hearth=info,hearth_client=info,warn"
    };

    let log_dir = hearth_config::data_dir()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "hearth.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(cli.verbose)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "hearth=trace,hearth_client=trace,hearth_config=trace,info",
                )),
        )
        .init();

    let loaded = hearth_config::load_config(None).context("Failed to load configuration")?;
    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }
    let config = loaded.config;

    let api_url = cli
        .api_url
        .unwrap_or_else(|| config.api_url().to_string());
    let session_file = config
        .session_file()
        .context("Failed to locate the session file")?;
    tracing::debug!(api_url = %api_url, session_file = %session_file.display(), "Using backend");

    let mut builder = HearthClient::builder()
        .base_url(api_url.clone())
        .timeout(config.timeout())
        .token_store(TokenStore::file(&session_file))
        .on_session_expired(|| {
            let yellow = Style::new().yellow();
            eprintln!(
                "{} session expired, run `hearth login`",
                yellow.apply_to("!")
            );
        });
    if let Some(agent) = &config.user_agent {
        builder = builder.user_agent(agent.clone());
    }
    let client = builder.build().context("Failed to create API client")?;

    let ctx = commands::Context {
        client,
        api_url,
        session_file,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Login(args) => auth::login(args, &ctx).await,
        Commands::Register(args) => auth::register(args, &ctx).await,
        Commands::Logout => auth::logout(&ctx),
        Commands::Status(args) => status::run(args, &ctx),
        Commands::Events(args) => events::run(args, &ctx).await,
        Commands::Recipes(args) => recipes::run(args, &ctx).await,
        Commands::Meals(args) => meals::run(args, &ctx).await,
    }
}
