//! # Page Insights
//!
//! Facebook Page analytics service: pulls engagement counters from the Graph
//! API, derives marketing ratios, asks a chat-completion model for written
//! insights (checked by a second evaluator call) and serves the result to a
//! browser dashboard.
//!
//! ## Architecture
//!
//! ```text
//! Dashboard → axum server → AnalyticsPipeline ─┬→ Graph API (metrics)
//!                                               ├→ Chat completions (insights)
//!                                               └→ fb_metrics.json
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use page_insights::{build_pipeline, server, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let pipeline = build_pipeline(&config)?;
//!     let state = Arc::new(server::AppState::new(
//!         pipeline,
//!         config.facebook.clone(),
//!         &config.server.static_dir,
//!     ));
//!     server::serve(state, &config.server.host, config.server.port).await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

/// Environment-driven configuration.
pub mod config;
/// Error types and result aliases.
pub mod error;
/// Graph API client and response types.
pub mod graph;
/// Generator, evaluator and the bounded feedback loop.
pub mod insights;
/// Chat-completion client and the `CompletionModel` seam.
pub mod llm;
/// Raw counters, derived ratios and the metrics fetcher.
pub mod metrics;
/// The end-to-end analysis cycle.
pub mod pipeline;
/// Prompt templates.
pub mod prompts;
/// HTTP routes and handlers.
pub mod server;
/// Report file, settings file and the Postgres credential loader.
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use pipeline::{AnalyticsPipeline, MetricsReport};

use graph::GraphClient;
use insights::FeedbackLoop;
use llm::OpenAiClient;
use metrics::MetricsFetcher;
use storage::ReportStore;

/// Assemble a pipeline from configuration using the hosted model.
pub fn build_pipeline(config: &Config) -> AppResult<AnalyticsPipeline> {
    let llm = OpenAiClient::new(&config.openai, config.request.clone())?;
    build_pipeline_with_model(config, Arc::new(llm))
}

/// Assemble a pipeline around an arbitrary completion model.
pub fn build_pipeline_with_model(
    config: &Config,
    model: Arc<dyn llm::CompletionModel>,
) -> AppResult<AnalyticsPipeline> {
    let graph = GraphClient::new(&config.graph, &config.request)?;
    let fetcher = MetricsFetcher::new(graph, &config.graph);
    let feedback_loop = FeedbackLoop::new(model, config.insights.clone());
    let store = ReportStore::new(&config.storage.output_path, &config.server.static_dir);

    Ok(AnalyticsPipeline::new(fetcher, feedback_loop, store))
}
