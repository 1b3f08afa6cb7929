// Main entry point - Dependency injection, server setup and client commands
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::application::blend_repository::BlendRepository;
use crate::application::form_controller::FormController;
use crate::infrastructure::api_client::HttpBlendApi;
use crate::infrastructure::config::load_server_config;
use crate::infrastructure::memory_repository::MemoryBlendRepository;
use crate::infrastructure::postgres_repository::PgBlendRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::cli;
use crate::presentation::router::build_router;

#[derive(Parser, Debug)]
#[command(name = "coal-blend")]
#[command(author, version, about = "Record the current coal blend across mills")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the blend API and serve the page
    Serve {
        /// Keep blends in memory instead of the database
        #[arg(long)]
        in_memory: bool,
    },
    /// Load the current blend and print every form field
    Show {
        #[arg(long, env = "BLEND_API_BASE", default_value = "http://localhost:3000/api")]
        api_base: String,
    },
    /// Save the fields captured in a form snapshot file
    Save {
        /// TOML snapshot of the form fields
        file: PathBuf,
        #[arg(long, env = "BLEND_API_BASE", default_value = "http://localhost:3000/api")]
        api_base: String,
        /// Create a new blend even if one exists
        #[arg(long)]
        new: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Cli::parse();

    match args.command {
        Command::Serve { in_memory } => serve(in_memory).await,
        Command::Show { api_base } => {
            let mut controller = FormController::new(HttpBlendApi::new(api_base));
            cli::show(&mut controller).await
        }
        Command::Save { file, api_base, new } => {
            let mut controller = FormController::new(HttpBlendApi::new(api_base));
            cli::save(&mut controller, &file, new).await
        }
    }
}

async fn serve(in_memory: bool) -> anyhow::Result<()> {
    // Load configuration
    let config = load_server_config()?;

    // Create repository (infrastructure layer)
    let repository: Arc<dyn BlendRepository> = if in_memory {
        tracing::warn!("Using in-memory blend store; blends are lost on exit");
        Arc::new(MemoryBlendRepository::new())
    } else {
        let database_url = config.require_database_url()?;
        Arc::new(PgBlendRepository::connect(database_url).await?)
    };
    tracing::info!("Blend store connected ({} record(s))", repository.count().await?);

    // Build router (presentation layer)
    let state = AppState::new(repository);
    let router = build_router(state, &config.public_dir);

    // Start server
    let addr = config.listen_addr()?;
    tracing::info!("Server running on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
