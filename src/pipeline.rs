//! One analysis cycle: fetch, derive, run the feedback loop, persist.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info, warn};

use crate::error::AppResult;
use crate::insights::{AnalysisFeedback, FeedbackLoop, InsightSet};
use crate::metrics::{MetricsFetcher, PageMetrics};
use crate::storage::{FacebookSettings, ReportStore};

/// Everything a cycle produces, serialized as one flat JSON object.
///
/// `ai_analysis_feedback` is present only when the loop ended without an
/// accepted candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    #[serde(flatten)]
    pub metrics: PageMetrics,
    #[serde(flatten)]
    pub insights: InsightSet,
    #[serde(
        rename = "ai_analysis_feedback",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub feedback: Option<AnalysisFeedback>,
}

/// Wires the fetcher, the feedback loop and the report store together.
#[derive(Clone)]
pub struct AnalyticsPipeline {
    fetcher: MetricsFetcher,
    feedback_loop: FeedbackLoop,
    store: ReportStore,
}

impl AnalyticsPipeline {
    pub fn new(fetcher: MetricsFetcher, feedback_loop: FeedbackLoop, store: ReportStore) -> Self {
        Self {
            fetcher,
            feedback_loop,
            store,
        }
    }

    pub fn store(&self) -> &ReportStore {
        &self.store
    }

    /// Run a full cycle for `settings` and return the report.
    ///
    /// Upstream analytics failures already degrade to zero inside the
    /// fetcher, and a failed loop yields failure text in every insight, so
    /// the report is always complete. A failed write is logged only.
    pub async fn run_cycle(&self, settings: &FacebookSettings) -> AppResult<MetricsReport> {
        let start = Instant::now();
        info!(page_id = %settings.page_id, "Starting analysis cycle");

        let raw = self.fetcher.fetch(settings).await;
        let metrics = PageMetrics::from_raw(raw);

        let (insights, feedback) = match self.feedback_loop.run(&metrics.to_json()).await {
            Ok(outcome) => (outcome.insights, outcome.feedback),
            Err(e) => {
                warn!(error = %e, "Insight generation failed");
                (InsightSet::failed(&e), None)
            }
        };

        let report = MetricsReport {
            metrics,
            insights,
            feedback,
        };

        if let Err(e) = self.store.write_report(&report).await {
            error!(
                path = %self.store.output_path().display(),
                error = %e,
                "Failed to persist report"
            );
        }

        info!(
            page_id = %settings.page_id,
            unresolved_feedback = report.feedback.is_some(),
            latency_ms = start.elapsed().as_millis(),
            "Analysis cycle complete"
        );

        Ok(report)
    }
}
