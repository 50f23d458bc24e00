use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use experiment_api::{api, config::Config, db::Database, seed};

#[derive(Parser)]
#[command(name = "experiment-api")]
#[command(about = "REST API for tracking research experiments")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Port for HTTP API, overrides PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Replace all experiments with sample data
    Seed,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "experiment_api=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Open the store and bring its schema up to date. Any failure here is fatal.
fn open_store(config: &Config) -> anyhow::Result<Database> {
    let db = Database::connect(config.database_url.as_deref())
        .context("Failed to connect to database")?;
    db.migrate().context("Failed to migrate database")?;
    Ok(db)
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let db = open_store(&config)?;
    let app = api::create_router(db.clone(), &config);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;
    tracing::info!(
        "Experiment API listening on http://{}/api/{}/experiments",
        listener.local_addr()?,
        config.api_version
    );
    tracing::info!("Environment: {}", config.environment);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down gracefully");
    db.close()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::from_env()?;

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await?;
        }
        Commands::Seed => {
            let db = open_store(&config)?;
            let count = seed::seed(&db)?;
            tracing::info!("Seeded {} experiments", count);
            db.close()?;
        }
    }

    Ok(())
}
