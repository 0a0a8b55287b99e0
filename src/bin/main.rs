use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use ledgerhost::{DatabaseConfig, ServiceConfig, create_service};

#[derive(Parser)]
#[command(name = "ledgerhost")]
#[command(about = "Multi-tenant account and ledger-storage service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP account service
    Serve {
        #[arg(short, long, default_value = "8080")]
        port: u16,
        /// Central registry database url
        #[arg(long, env = "SURREALDB_URL", default_value = "memory")]
        db_url: String,
        /// Root directory for per-tenant stores
        #[arg(long, env = "LEDGERHOST_TENANTS_ROOT", default_value = "data/tenants")]
        tenants_root: PathBuf,
        /// Secret used to sign session tokens
        #[arg(long, env = "LEDGERHOST_TOKEN_SECRET")]
        token_secret: String,
        /// Token validity window in seconds
        #[arg(long, default_value_t = ledgerhost::DEFAULT_TTL_SECONDS)]
        token_ttl: u64,
    },
    /// Initialize the central registry schema
    Init {
        #[arg(long, env = "SURREALDB_URL", default_value = "memory")]
        db_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("ledgerhost=info".parse()?),
        )
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            db_url,
            tenants_root,
            token_secret,
            token_ttl,
        } => {
            let config = ServiceConfig {
                database: DatabaseConfig {
                    url: db_url,
                    ..Default::default()
                },
                tenants_root,
                token_secret,
                token_ttl_seconds: token_ttl,
            };
            info!("Using database url: {}", config.database.url);
            info!("Tenant stores under: {}", config.tenants_root.display());

            let service = create_service(config).await?;
            let app = ledgerhost::api::create_router(service);

            let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
            info!("Account service listening on http://0.0.0.0:{}", port);

            axum::serve(listener, app).await?;
        }
        Commands::Init { db_url } => {
            let db_config = DatabaseConfig {
                url: db_url,
                ..Default::default()
            };
            info!("Using database url for initialization: {}", db_config.url);

            info!("Initializing central registry...");
            let db = ledgerhost::create_connection(db_config).await?;
            ledgerhost::ensure_schema(&db).await?;
            info!("Registry initialized successfully");
        }
    }

    Ok(())
}
