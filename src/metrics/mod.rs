//! Page metrics: raw counters accumulated from the Graph API and the
//! derived marketing ratios computed from them.
//!
//! Both structs serialize with camelCase keys and are flattened into a single
//! JSON object by [`PageMetrics`], which is what the insight prompts embed and
//! what the report file stores.

mod derived;
mod fetcher;

pub use derived::*;
pub use fetcher::*;

use serde::{Deserialize, Serialize};

/// Counters summed across the fetched posts and videos.
///
/// `website_clicks`, `cta_clicks`, `post_saves`, `ad_spend` and
/// `ad_relevance_score` have no upstream source yet and stay zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMetrics {
    pub reach: u64,
    pub impressions: u64,
    pub organic_impressions: u64,
    pub paid_impressions: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub video_views: u64,
    pub ten_second_views: u64,
    pub average_watch_time: f64,
    pub video_retention_rate: f64,
    pub website_clicks: u64,
    pub cta_clicks: u64,
    pub post_saves: u64,
    pub ad_spend: f64,
    pub ad_relevance_score: f64,
    pub total_followers: u64,
}

/// Raw counters plus derived ratios, serialized as one flat object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMetrics {
    #[serde(flatten)]
    pub raw: RawMetrics,
    #[serde(flatten)]
    pub derived: DerivedMetrics,
}

impl PageMetrics {
    /// Compute derived ratios with the default placeholder inputs.
    pub fn from_raw(raw: RawMetrics) -> Self {
        let derived = DerivedMetrics::compute(&raw, &PlaceholderInputs::default());
        Self { raw, derived }
    }

    /// Flat JSON object handed to the insight prompts.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}))
    }
}
