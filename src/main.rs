use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trailbook::config::Config;
use trailbook::AppState;

#[derive(Parser, Debug)]
#[command(name = "trailbook")]
#[command(author, version, about = "Tour booking platform", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "trailbook.toml")]
    config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;

    let log_level = cli
        .log_level
        .as_ref()
        .unwrap_or(&config.logging.level)
        .clone();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Starting Trailbook v{} ({})",
        env!("CARGO_PKG_VERSION"),
        config.server.environment
    );

    // Ensure data and upload directories exist
    std::fs::create_dir_all(&config.server.data_dir)?;
    let img_dir = config.server.uploads_dir.join("img");
    std::fs::create_dir_all(img_dir.join("tours"))?;
    std::fs::create_dir_all(img_dir.join("users"))?;

    let db = trailbook::db::init(&config.server.data_dir).await?;

    if config.server.seed_demo_data {
        trailbook::db::seed_demo_tours(&db).await?;
    }

    if !config.email.is_configured() {
        tracing::warn!("Email transport not configured; password resets will fail");
    }
    if config.payments.webhook_secret.is_none() {
        tracing::warn!("Payment webhook secret not configured; webhook deliveries will be rejected");
    }

    let state = Arc::new(AppState::new(config.clone(), db));

    if !state.payments.is_configured() {
        tracing::warn!("Payment provider secret key not configured; checkout will fail");
    }

    // Periodically drop idle rate-limit entries
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            cleanup_state.rate_limiter.cleanup_expired();
        }
    });

    let app = trailbook::api::create_router(state.clone())
        .merge(trailbook::ui::create_router().with_state(state))
        .nest_service("/img", ServeDir::new(&img_dir));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
