use std::sync::Arc;

use tokio::{net::TcpListener, signal};
use tracing_subscriber::EnvFilter;

use internship_radar::{
    config::Config,
    create_router,
    db::{self, CacheWriterHandle, MemorySessionStore, RedisSessionStore, SessionStore},
    services::{providers::RecommendApiProvider, session},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("internship_radar=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let provider = RecommendApiProvider::from_config(&config)?;
    tracing::info!(api_url = %config.recommend_api_url, "Recommendation API configured");

    let (sessions, writer) = session_store(&config).await?;

    let state = AppState::new(Arc::new(provider), sessions);
    session::restore(&state.store, state.sessions.as_ref()).await;

    let app = create_router(state);

    let address = config.bind_addr();
    let listener = TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(writer) = writer {
        writer.shutdown().await;
    }
    Ok(())
}

/// Redis when configured, otherwise a session that lives as long as the process
async fn session_store(
    config: &Config,
) -> anyhow::Result<(Arc<dyn SessionStore>, Option<CacheWriterHandle>)> {
    match &config.redis_url {
        Some(url) => {
            let client = db::create_redis_client(url)?;
            let (cache, writer) = db::Cache::new(client).await;
            tracing::info!(slot = %config.session_slot, "Persisting sessions in Redis");
            let store = RedisSessionStore::new(cache, &config.session_slot, config.session_ttl_secs);
            Ok((Arc::new(store), Some(writer)))
        }
        None => {
            tracing::warn!("REDIS_URL not set, sessions will not survive a restart");
            Ok((Arc::new(MemorySessionStore::new()), None))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install terminate handler");
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

    tracing::info!("Shutdown signal received");
}
