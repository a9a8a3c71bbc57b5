mod config;
mod routes;
mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use feedback::{FeedbackService, SubmissionStore};
use textgen::{OpenAiCompatGenerator, RetryingGenerator, TextGenerator};

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env()?;

    // --- Submission log ---
    let store = SubmissionStore::new(&cfg.data_file);
    store
        .initialize()
        .with_context(|| format!("Failed to initialize submission log at {}", cfg.data_file))?;
    info!(path = %cfg.data_file, "store: ok");

    // --- Text generation ---
    let client = OpenAiCompatGenerator::new(&cfg.generator).context("Failed to build LLM client")?;
    let generator: Arc<dyn TextGenerator> = Arc::new(RetryingGenerator::new(client, cfg.generator.retry.clone()));
    let gi = generator.info();
    info!(model = %gi.model, base_url = %gi.base_url, "textgen: configured");

    let feedback = FeedbackService::new(generator, store, cfg.feedback.clone());
    let app = routes::app(Arc::new(AppState::new(feedback)));

    let addr = &cfg.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("feedback-api listening on http://{addr}");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
