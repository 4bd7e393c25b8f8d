use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use tts_relay::api::routes::{create_router, AppState};
use tts_relay::cache::MemoryCache;
use tts_relay::config::Config;
use tts_relay::tts::{GoogleTts, TokenSource, TtsService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().inspect_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
    })?;

    tracing::info!("TTS relay v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Starting server on http://{}", config.addr);
    tracing::info!("Locale: {}", config.locale);
    if let Some(dir) = &config.static_dir {
        tracing::info!("Serving static files from {}", dir.display());
    }

    // Provider
    let client = reqwest::Client::builder().build()?;
    let tokens = TokenSource::new(client.clone(), config.credentials)?;
    let google = GoogleTts::new(client, config.api_base_url, config.project_id, tokens);

    // Lives as long as the process
    let cache = Arc::new(MemoryCache::new());

    let tts = TtsService::new(config.locale, Arc::new(google), cache);
    let state = Arc::new(AppState { tts });

    let app = create_router(state, config.static_dir.as_deref());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
