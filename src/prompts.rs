//! Prompt templates for the insight generator and evaluator.
//!
//! Both prompts are deterministic: the same metrics, feedback and candidate
//! always produce the same text.

/// Shared contract both prompts state about the insight object.
const INSIGHT_SHAPE: &str = "exactly these four keys: engagementRateInsight, reachInsight, breakdownInsight, summaryInsight";

/// Closing instruction asking for bare, double-quoted JSON.
const JSON_ONLY: &str = "Respond ONLY with valid JSON using double quotes for all keys and string values. Do not use single quotes. Do not include any text before or after the JSON.";

/// Generator prompt. The feedback variant is used when the evaluator
/// rejected the previous attempt.
pub fn generator_prompt(metrics_json: &str, feedback: Option<&str>) -> String {
    match feedback {
        Some(feedback) => format!(
            "You are a marketing analyst. Given the following Facebook metrics and evaluator feedback, generate improved, crisp, actionable insights.\n\n\
             You MUST return a valid JSON object with {INSIGHT_SHAPE}.\n\n\
             Metrics: {metrics_json}\n\n\
             Evaluator Feedback: {feedback}\n\n\
             {JSON_ONLY}"
        ),
        None => format!(
            "You are a marketing analyst. Given the following Facebook metrics, generate crisp, actionable insights.\n\n\
             You MUST return a valid JSON object with {INSIGHT_SHAPE}.\n\n\
             Metrics: {metrics_json}\n\n\
             {JSON_ONLY}"
        ),
    }
}

/// Evaluator prompt: judge the candidate, never rewrite it.
pub fn evaluator_prompt(metrics_json: &str, analysis_json: &str) -> String {
    format!(
        "You are a senior marketing strategist. Evaluate the following AI-generated Facebook analytics insights for quality, clarity, actionability, and professional English language. \
         The insights must be in clear, standard English (not Pig Latin or any other code/language). \
         If the analysis is not in clear English, or is otherwise insufficient, provide feedback.\n\n\
         The analysis MUST be a JSON object with {INSIGHT_SHAPE}.\n\n\
         Metrics: {metrics_json}\n\n\
         Analysis: {analysis_json}\n\n\
         If the analysis is sufficient, in clear English, and all four keys are present, respond with {{\"status\": \"pass\", \"final_analysis\": analysis}}.\n\
         If not, provide feedback in the following JSON structure: {{\"status\": \"feedback\", \"feedback\": \"...\"}}. \
         Do NOT revise the analysis yourself. {JSON_ONLY}"
    )
}
