use serde_json::Value;
use tracing::{debug, warn};

use super::{parse_object, InsightSet};
use crate::config::InsightConfig;
use crate::error::LlmResult;
use crate::llm::{CompletionModel, CompletionRequest};
use crate::prompts::generator_prompt;

/// Ask the model for a fresh insight set.
///
/// `feedback` selects the revision prompt; an empty string counts as absent.
/// Transport errors propagate, unusable output does not.
pub async fn generate_insights(
    model: &dyn CompletionModel,
    config: &InsightConfig,
    metrics: &Value,
    feedback: Option<&str>,
) -> LlmResult<InsightSet> {
    let feedback = feedback.filter(|f| !f.trim().is_empty());
    let prompt = generator_prompt(&metrics.to_string(), feedback);

    let request = CompletionRequest::new(&config.model, prompt)
        .with_max_tokens(config.generator_max_tokens)
        .with_temperature(config.temperature);

    debug!(with_feedback = feedback.is_some(), "Generating insights");
    let completion = model.complete(&request).await?;

    if parse_object(&completion).is_none() {
        warn!(
            preview = %completion.chars().take(100).collect::<String>(),
            "Generator returned non-JSON output, using placeholders"
        );
    }

    Ok(InsightSet::from_completion(&completion))
}
