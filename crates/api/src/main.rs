use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use postforge_api::cache::CampaignCache;
use postforge_api::config::{LogFormat, ServerConfig, WEBHOOK_URL_VAR};
use postforge_api::router::build_app_router;
use postforge_api::state::{AppState, Clock};
use postforge_events::{CampaignNotifier, DisabledNotifier, WebhookNotifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid server configuration")?;

    // --- Tracing ---
    let (json_layer, text_layer) = match config.log_format {
        LogFormat::Json => (Some(tracing_subscriber::fmt::layer().json()), None),
        LogFormat::Text => (None, Some(tracing_subscriber::fmt::layer())),
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postforge_api=debug,tower_http=debug".into()),
        )
        .with(json_layer)
        .with(text_layer)
        .init();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let pool = postforge_db::create_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    postforge_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    postforge_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    // --- Notifier ---
    let notifier: Arc<dyn CampaignNotifier> = match &config.webhook_url {
        Some(url) => {
            let webhook = WebhookNotifier::new(url.clone())
                .context("Failed to build webhook HTTP client")?;
            tracing::info!(url = %webhook.url(), "Campaign webhook enabled");
            Arc::new(webhook)
        }
        None => {
            tracing::warn!("{WEBHOOK_URL_VAR} is not set, campaign notifications are disabled");
            Arc::new(DisabledNotifier::new(WEBHOOK_URL_VAR))
        }
    };

    // --- App state ---
    let cache = Arc::new(CampaignCache::new(
        config.view_cache_capacity,
        Duration::from_secs(config.view_cache_ttl_secs),
    ));
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        cache,
        notifier,
        clock: Clock::system(),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let host = config
        .host
        .parse::<std::net::IpAddr>()
        .with_context(|| format!("Invalid HOST address '{}'", config.host))?;
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped accepting connections, closing database pool");
    pool.close().await;
    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM. If a handler cannot be installed, that branch
/// never fires and the other one still can.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
