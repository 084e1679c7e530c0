use anyhow::Context;
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{info, warn};

use sentiment_desk::api::{self, AppState};
use sentiment_desk::{Analyzer, InferenceClient, ResultStore, Scheduler, Settings, Simulator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let settings = Settings::from_env();

    let scheduler = if settings.has_valid_api_key() {
        let client = InferenceClient::new(&settings).context("failed to build inference client")?;
        info!(primary = %settings.primary_url, "🔑 API key found, live analysis enabled");
        Some(Scheduler::spawn(Arc::new(client), settings.request_delay))
    } else {
        if settings.api_key.is_some() {
            warn!("⚠️ HF_API_KEY is malformed, falling back to demo mode");
        } else {
            info!("🎭 No HF_API_KEY set, running in demo mode");
        }
        None
    };

    let store = ResultStore::open(settings.data_dir.clone())
        .with_context(|| format!("failed to open data dir {}", settings.data_dir.display()))?;
    let analyzer = Analyzer::open(store, scheduler, Simulator::default());
    let state = Arc::new(AppState::new(analyzer));

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
