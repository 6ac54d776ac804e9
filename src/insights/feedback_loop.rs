use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::{evaluate_insights, generate_insights, AnalysisFeedback, Evaluation, LoopOutcome};
use crate::config::InsightConfig;
use crate::error::LlmResult;
use crate::llm::CompletionModel;

/// Bounded generator/evaluator loop.
///
/// Each iteration is one generator call followed by one evaluator call, run
/// strictly in sequence. The iteration cap is the only termination guarantee.
#[derive(Clone)]
pub struct FeedbackLoop {
    model: Arc<dyn CompletionModel>,
    config: InsightConfig,
}

impl FeedbackLoop {
    /// Create a loop over `model`; a cap below one is raised to one.
    pub fn new(model: Arc<dyn CompletionModel>, config: InsightConfig) -> Self {
        Self { model, config }
    }

    /// Effective iteration cap
    pub fn max_iterations(&self) -> usize {
        self.config.max_iterations.max(1)
    }

    /// Produce insights for `metrics`.
    pub async fn run(&self, metrics: &Value) -> LlmResult<LoopOutcome> {
        let start = Instant::now();
        let max_iterations = self.max_iterations();
        let mut feedback: Option<String> = None;
        let mut candidate = None;

        for iteration in 1..=max_iterations {
            let insights = generate_insights(
                self.model.as_ref(),
                &self.config,
                metrics,
                feedback.as_deref(),
            )
            .await?;

            let evaluation =
                evaluate_insights(self.model.as_ref(), &self.config, metrics, &insights).await?;

            match evaluation {
                Evaluation::Accepted(accepted) => {
                    info!(
                        iteration,
                        latency_ms = start.elapsed().as_millis(),
                        "Insights accepted"
                    );
                    return Ok(LoopOutcome {
                        insights: accepted,
                        feedback: None,
                        iterations: iteration,
                    });
                }
                Evaluation::Rejected { feedback: text } => {
                    info!(iteration, max_iterations, "Evaluator requested revision");
                    feedback = Some(text);
                    candidate = Some(insights);
                }
                Evaluation::Unparseable { raw } => {
                    warn!(iteration, "Stopping on unexpected evaluator response");
                    return Ok(LoopOutcome {
                        insights,
                        feedback: Some(AnalysisFeedback::Error { raw }),
                        iterations: iteration,
                    });
                }
            }
        }

        let last_feedback = feedback.unwrap_or_default();
        warn!(
            max_iterations,
            last_feedback = %last_feedback,
            latency_ms = start.elapsed().as_millis(),
            "Max feedback loops reached, keeping last candidate"
        );

        Ok(LoopOutcome {
            // The loop body ran at least once and every non-returning path
            // stored its candidate.
            insights: candidate.unwrap_or_else(super::InsightSet::placeholder),
            feedback: Some(AnalysisFeedback::Feedback {
                feedback: last_feedback,
                iterations: max_iterations,
            }),
            iterations: max_iterations,
        })
    }
}
