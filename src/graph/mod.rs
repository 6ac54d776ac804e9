//! Facebook Graph API client and response types.

mod client;
mod types;

pub use client::*;
pub use types::*;

/// Engagement edges requested per post.
pub const POST_ENGAGEMENT_FIELDS: &str = "likes.summary(true),comments.summary(true),shares";

/// Reach and impression insights requested per post.
pub const POST_INSIGHT_METRICS: &str =
    "post_impressions,post_impressions_unique,post_impressions_organic,post_impressions_paid";

/// View and retention insights requested per video.
pub const VIDEO_INSIGHT_METRICS: &str =
    "total_video_views,total_video_10s_views,average_watch_time,video_retention";
