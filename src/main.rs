use std::sync::Arc;

use cinematch_api::{
    cache::{create_redis_client, Cache},
    config::Config,
    routes::{create_router, AppState},
    services::{
        inference::OpenRouterProvider, metadata::TmdbProvider, RecommendationResolver,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinematch_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let (cache, cache_writer) = match config.redis_url.as_deref() {
        Some(url) => {
            let (cache, handle) = Cache::new(create_redis_client(url)?);
            tracing::info!(ttl_secs = config.cache_ttl_secs, "Metadata cache enabled");
            (Some(cache), Some(handle))
        }
        None => {
            tracing::info!("REDIS_URL not set, metadata cache disabled");
            (None, None)
        }
    };

    let http_client = reqwest::Client::new();

    let catalog = Arc::new(TmdbProvider::new(
        http_client.clone(),
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        cache,
        config.cache_ttl_secs,
    ));
    let recommender = Arc::new(OpenRouterProvider::new(
        http_client,
        config.openrouter_api_key.clone(),
        config.openrouter_api_url.clone(),
        config.inference_model.clone(),
        config.site_url.clone(),
    ));

    let resolver = RecommendationResolver::new(recommender, catalog.clone());
    let state = Arc::new(AppState::new(catalog, resolver));
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, model = %config.inference_model, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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
