use serde_json::Value;
use tracing::{debug, warn};

use super::{Evaluation, InsightSet};
use crate::config::InsightConfig;
use crate::error::LlmResult;
use crate::llm::{CompletionModel, CompletionRequest};
use crate::prompts::evaluator_prompt;

/// Ask the model to judge `candidate` against the metrics.
pub async fn evaluate_insights(
    model: &dyn CompletionModel,
    config: &InsightConfig,
    metrics: &Value,
    candidate: &InsightSet,
) -> LlmResult<Evaluation> {
    let prompt = evaluator_prompt(&metrics.to_string(), &candidate.to_json_string());

    let request = CompletionRequest::new(&config.model, prompt)
        .with_max_tokens(config.evaluator_max_tokens)
        .with_temperature(config.temperature);

    let completion = model.complete(&request).await?;
    let evaluation = Evaluation::from_completion(&completion, candidate);

    match &evaluation {
        Evaluation::Accepted(_) => debug!("Evaluator accepted insights"),
        Evaluation::Rejected { feedback } => debug!(feedback = %feedback, "Evaluator requested revision"),
        Evaluation::Unparseable { raw } => warn!(
            preview = %raw.chars().take(100).collect::<String>(),
            "Evaluator returned an unexpected response"
        ),
    }

    Ok(evaluation)
}
