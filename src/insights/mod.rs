//! Natural-language insights produced by a generator/evaluator pair.
//!
//! - [`generate_insights`]: one completion call producing an [`InsightSet`]
//! - [`evaluate_insights`]: one completion call judging a candidate
//! - [`FeedbackLoop`]: alternates the two until acceptance or the cap
//!
//! The generator degrades silently (unparseable output becomes placeholder
//! text) while the evaluator reports unparseable output as
//! [`Evaluation::Unparseable`].

mod evaluator;
mod feedback_loop;
mod generator;

pub use evaluator::*;
pub use feedback_loop::*;
pub use generator::*;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Text used for any insight the model did not return.
pub const PLACEHOLDER_INSIGHT: &str = "AI did not generate this insight.";

/// The four insight keys, in output order.
pub const INSIGHT_KEYS: [&str; 4] = [
    "engagementRateInsight",
    "reachInsight",
    "breakdownInsight",
    "summaryInsight",
];

/// Exactly four insight texts; the struct shape rules out missing or extra
/// keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightSet {
    pub engagement_rate_insight: String,
    pub reach_insight: String,
    pub breakdown_insight: String,
    pub summary_insight: String,
}

impl InsightSet {
    /// All four insights set to [`PLACEHOLDER_INSIGHT`].
    pub fn placeholder() -> Self {
        Self::uniform(PLACEHOLDER_INSIGHT)
    }

    /// All four insights describing a failed analysis.
    pub fn failed(reason: impl fmt::Display) -> Self {
        Self::uniform(&format!("AI agentic analysis failed: {}", reason))
    }

    fn uniform(text: &str) -> Self {
        Self {
            engagement_rate_insight: text.to_string(),
            reach_insight: text.to_string(),
            breakdown_insight: text.to_string(),
            summary_insight: text.to_string(),
        }
    }

    /// Build from a loosely-shaped JSON object: known keys are kept, missing
    /// keys get the placeholder, anything else is dropped.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let take = |key: &str| match object.get(key) {
            None | Some(Value::Null) => PLACEHOLDER_INSIGHT.to_string(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        };

        Self {
            engagement_rate_insight: take(INSIGHT_KEYS[0]),
            reach_insight: take(INSIGHT_KEYS[1]),
            breakdown_insight: take(INSIGHT_KEYS[2]),
            summary_insight: take(INSIGHT_KEYS[3]),
        }
    }

    /// Parse model output. Anything that is not a JSON object yields
    /// [`InsightSet::placeholder`].
    pub fn from_completion(completion: &str) -> Self {
        match parse_object(completion) {
            Some(object) => Self::from_object(&object),
            None => Self::placeholder(),
        }
    }

    /// Compact JSON for embedding in the evaluator prompt.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Verdict of one evaluator call.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// The candidate passed; carries it unchanged.
    Accepted(InsightSet),
    /// The candidate needs another attempt.
    Rejected { feedback: String },
    /// The response was not JSON or had an unknown status.
    Unparseable { raw: String },
}

impl Evaluation {
    /// Interpret evaluator output for `candidate`.
    pub fn from_completion(completion: &str, candidate: &InsightSet) -> Self {
        let Some(object) = parse_object(completion) else {
            return Evaluation::Unparseable {
                raw: completion.to_string(),
            };
        };

        match object.get("status").and_then(Value::as_str) {
            Some("pass") => Evaluation::Accepted(candidate.clone()),
            Some("feedback") => Evaluation::Rejected {
                feedback: match object.get("feedback") {
                    None | Some(Value::Null) => String::new(),
                    Some(Value::String(text)) => text.clone(),
                    Some(other) => other.to_string(),
                },
            },
            _ => Evaluation::Unparseable {
                raw: completion.to_string(),
            },
        }
    }
}

/// Unresolved evaluator feedback attached to a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisFeedback {
    /// The cap was reached while the evaluator was still rejecting.
    Feedback { feedback: String, iterations: usize },
    /// The evaluator answered with something unparseable.
    Error { raw: String },
}

impl fmt::Display for AnalysisFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisFeedback::Feedback { feedback, .. } => {
                write!(f, "Max feedback loops reached. Last feedback: {}", feedback)
            }
            AnalysisFeedback::Error { raw } => write!(f, "{}", raw),
        }
    }
}

/// Result of a feedback loop run.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopOutcome {
    pub insights: InsightSet,
    pub feedback: Option<AnalysisFeedback>,
    /// Generator/evaluator pairs performed.
    pub iterations: usize,
}

/// Parse a completion as a JSON object, tolerating markdown code fences.
fn parse_object(completion: &str) -> Option<Map<String, Value>> {
    let json = extract_json_from_completion(completion).ok()?;
    match serde_json::from_str::<Value>(json).ok()? {
        Value::Object(object) => Some(object),
        _ => None,
    }
}

/// Extract JSON from a completion string, handling markdown code blocks.
///
/// Attempts extraction in this order:
/// 1. Raw JSON (fast path)
/// 2. ```json ... ``` code blocks
/// 3. ``` ... ``` code blocks
pub(crate) fn extract_json_from_completion(completion: &str) -> Result<&str, String> {
    let trimmed = completion.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Ok(trimmed);
    }

    if completion.contains("```json") {
        return completion
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "Found ```json block but content was empty or malformed".to_string());
    }

    if completion.contains("```") {
        return completion
            .split("```")
            .nth(1)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "Found ``` block but content was empty or malformed".to_string());
    }

    Err(format!(
        "No JSON found in response. First 100 chars: '{}'",
        completion.chars().take(100).collect::<String>()
    ))
}
