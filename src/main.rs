use std::fs;
use std::path::Path;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use spendwise::config::ServerConfig;
use spendwise::server::{AppState, create_router};
use spendwise::store::{SqliteStore, Store};

#[derive(Parser)]
#[command(name = "spendwise", version)]
#[command(about = "A personal spending tracker API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema and exit
    Init {
        /// SQLite database path or URL
        #[arg(long, env = "DATABASE_URL", default_value = "./data/spendwise.db")]
        database_url: String,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "8080")]
        port: u16,

        /// SQLite database path or URL
        #[arg(long, env = "DATABASE_URL", default_value = "./data/spendwise.db")]
        database_url: String,

        /// Secret used to sign session tokens
        #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
        jwt_secret: Option<String>,
    },
}

fn open_store(config: &ServerConfig) -> spendwise::error::Result<SqliteStore> {
    let db_path = config.db_path();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !is_memory(&db_path) {
            fs::create_dir_all(parent)?;
        }
    }

    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;
    Ok(store)
}

fn is_memory(path: &Path) -> bool {
    path.as_os_str() == ":memory:"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("spendwise=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { database_url } => {
            let config = ServerConfig {
                database_url,
                ..ServerConfig::default()
            };
            open_store(&config)?;
            println!("Database initialized at {}", config.db_path().display());
        }
        Commands::Serve {
            host,
            port,
            database_url,
            jwt_secret,
        } => {
            let config = ServerConfig {
                host,
                port,
                database_url,
                jwt_secret,
            };

            let secret = config.signing_secret()?;
            let store: Arc<dyn Store> = Arc::new(open_store(&config)?);
            info!("Using database at {}", config.db_path().display());

            let state = Arc::new(AppState::new(Arc::clone(&store), &secret));
            let app = create_router(state);
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            store.close()?;
            info!("Server stopped");
        }
    }

    Ok(())
}
