//! `ticketflow` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve` — start the ticket API server.
//!
//! Every option can also come from the environment (or a `.env` file in the
//! working directory).

use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use db::{GatewayConfig, MySqlGateway};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ticketflow",
    about = "HTTP API over support tickets and their workflow steps",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the REST API server.
    Serve {
        #[arg(long, env = "BIND", default_value = "0.0.0.0:5003")]
        bind: String,
        /// Path prefix for every route.
        #[arg(long, env = "API_PREFIX", default_value = "/api")]
        prefix: String,
        /// Comma-separated CORS origins; `*` allows any.
        #[arg(long, env = "ALLOWED_ORIGINS", value_delimiter = ',', default_value = "*")]
        allowed_origins: Vec<String>,
        #[command(flatten)]
        database: DatabaseArgs,
    },
}

#[derive(Args)]
struct DatabaseArgs {
    #[arg(long, env = "DB_HOST", default_value = "127.0.0.1")]
    db_host: String,
    #[arg(long, env = "DB_PORT", default_value_t = 3306)]
    db_port: u16,
    #[arg(long, env = "DB_USER")]
    db_user: String,
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    db_password: String,
    #[arg(long, env = "DB_DATABASE")]
    db_name: String,
}

impl From<DatabaseArgs> for GatewayConfig {
    fn from(args: DatabaseArgs) -> Self {
        Self {
            host: args.db_host,
            port: args.db_port,
            user: args.db_user,
            password: args.db_password,
            database: args.db_name,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may already be set.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            bind,
            prefix,
            allowed_origins,
            database,
        } => {
            let gateway_config = GatewayConfig::from(database);
            info!(database = ?gateway_config, "Starting API server on {bind}");

            let api_config = api::ApiConfig {
                bind,
                prefix,
                allowed_origins: allowed_origins
                    .into_iter()
                    .map(|origin| origin.trim().to_owned())
                    .filter(|origin| !origin.is_empty())
                    .collect(),
            };
            let storage = Arc::new(MySqlGateway::new(&gateway_config));

            api::serve(&api_config, storage)
                .await
                .context("API server stopped")?;
        }
    }

    Ok(())
}
