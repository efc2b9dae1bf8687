// ABOUTME: Main entry point for the paylink backend
// ABOUTME: Loads configuration, falls back to demo mode, starts the session sweeper and serves the API

use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paylink::{build_router, config::AppConfig, storage::Storage, AppState};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(4 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paylink=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    if config.is_demo_mode() {
        tracing::warn!(
            "Hosted project not configured; running in demo mode (sign-in disabled, avatars not removed)"
        );
    }
    if config.database_url.is_none() {
        tracing::warn!("DATABASE_URL not set; using an in-memory database");
    }

    let storage = Storage::connect(config.database_url_or_demo()).await?;

    let bind_addr = format!("{}:{}", config.host, config.port);
    let session_max_age = config.session_max_age_secs;
    let state = AppState::from_config(config, storage);

    // Sweep idle sessions in the background
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = sessions.cleanup_expired_sessions(session_max_age);
            if removed > 0 {
                tracing::debug!("Swept {} expired sessions", removed);
            }
        }
    });

    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server running on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
