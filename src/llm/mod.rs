//! Chat completion client used by the insight generator and evaluator.
//!
//! [`CompletionModel`] is the seam between the insight functions and the
//! hosted model: production code uses [`OpenAiClient`], tests substitute a
//! scripted implementation.

mod client;
mod types;

pub use client::*;
pub use types::*;

use async_trait::async_trait;

use crate::error::LlmResult;

/// A hosted text-generation model: prompt in, free-form text out.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Run a single-turn completion and return the trimmed response text.
    async fn complete(&self, request: &CompletionRequest) -> LlmResult<String>;
}
