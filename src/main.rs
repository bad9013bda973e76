// src/main.rs

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use serverhub::application::commands::*;
use serverhub::application::dto::*;
use serverhub::application::state::AppState;
use serverhub::config::AppConfig;
use serverhub::db::{
    create_connection_pool, get_connection, get_database_path, initialize_database,
    verify_database_integrity,
};
use serverhub::events::EventBus;
use serverhub::integrations::{AddressCandidateHelper, JellyfinClient, UdpServerDiscovery};
use serverhub::repositories::*;
use serverhub::services::*;

/// Shown when a resolution fails without an itemized report
const GENERIC_CONNECTION_ERROR: &str = "Could not connect to the server.";

#[derive(Debug, Parser)]
#[command(name = "serverhub", version, about = "Find and remember media servers")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overrides the configured one
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve an entered address and remember the server on success
    Connect { address: String },

    /// Look for servers on the local network
    Discover {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List remembered servers, most recent first
    Servers {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Forget a remembered server
    Forget { id: i64 },

    /// Remembered server count and database size
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init()
        .ok();

    let cli = Cli::parse();
    let state = build_state(&cli)?;

    match cli.command {
        Command::Connect { address } => {
            let result = check_server_url(&state, address).await?;

            if cli.json {
                print_json(&result)?;
            } else {
                print_check_result(&result);
            }

            if result.outcome.state != "success" {
                std::process::exit(1);
            }
        }

        Command::Discover { limit } => {
            let json = cli.json;
            let found = discover_servers(&state, limit, |server| {
                if !json {
                    println!("{}  {}  ({})", server.address, server.name, server.id);
                }
            })
            .await?;

            if json {
                print_json(&found)?;
            } else if found.is_empty() {
                println!("No servers found on the local network");
            }
        }

        Command::Servers { limit } => {
            let servers = list_servers(&state, limit).await?;

            if cli.json {
                print_json(&servers)?;
            } else if servers.is_empty() {
                println!("No remembered servers");
            } else {
                for server in &servers {
                    println!("{:>4}  {}  (last used {})", server.id, server.hostname, server.last_used_at);
                }
            }
        }

        Command::Forget { id } => {
            forget_server(&state, id).await?;
            if !cli.json {
                println!("Forgot server {}", id);
            }
        }

        Command::Status => {
            let status = database_status(&state).await?;

            if cli.json {
                print_json(&status)?;
            } else {
                print_status(&status);
            }
        }
    }

    Ok(())
}

/// Wire configuration, database, collaborators and services together
fn build_state(cli: &Cli) -> anyhow::Result<AppState> {
    // 1. CONFIGURATION
    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let db_path = match cli.database.clone().or_else(|| config.database_path.clone()) {
        Some(path) => path,
        None => get_database_path()?,
    };

    // 2. INFRASTRUCTURE
    let event_bus = Arc::new(EventBus::new());
    let pool = Arc::new(create_connection_pool(&db_path)?);

    // Initialize schema (idempotent)
    {
        let conn = get_connection(&pool)?;
        initialize_database(&conn)?;
        verify_database_integrity(&conn)?;
    }

    // 3. REPOSITORIES
    let server_repo: Arc<dyn ServerRepository> = Arc::new(SqliteServerRepository::new(pool.clone()));

    // 4. COLLABORATORS
    let client = Arc::new(JellyfinClient::new(&config.connection)?);
    let prober = Arc::new(RecommendedServerService::new(
        client,
        ScoringRules::from_config(&config.connection),
    ));
    let discovery = Arc::new(UdpServerDiscovery::new(config.discovery.clone()));

    // 5. SERVICES
    let connection_service = Arc::new(
        ConnectionService::new(
            Arc::new(AddressCandidateHelper::new()),
            prober,
            discovery,
            event_bus.clone(),
        )
        .with_messages(config.messages.clone())
        .with_max_servers(config.discovery.max_servers),
    );
    let server_service = Arc::new(ServerService::new(server_repo, event_bus.clone()));

    // 6. APPLICATION STATE
    Ok(AppState::new(
        config,
        pool,
        event_bus,
        connection_service,
        server_service,
    ))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_check_result(result: &CheckServerUrlDto) {
    match (&result.outcome.address, &result.server) {
        (Some(address), Some(server)) => {
            println!("Connected to {} (server id {})", address, server.id);
        }
        (Some(address), None) => println!("Connected to {}", address),
        (None, _) => println!(
            "{}",
            result.outcome.message.as_deref().unwrap_or(GENERIC_CONNECTION_ERROR)
        ),
    }
}

fn print_status(status: &DatabaseStatusDto) {
    println!("Remembered servers: {}", status.server_count);
    println!("Database size:      {} bytes", status.size_bytes);
    match &status.last_used {
        Some(server) => println!("Last used:          {} ({})", server.hostname, server.last_used_at),
        None => println!("Last used:          none"),
    }
}
