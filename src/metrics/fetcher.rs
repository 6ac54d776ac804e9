use std::time::Instant;
use tracing::{debug, info, warn};

use super::RawMetrics;
use crate::config::GraphConfig;
use crate::error::GraphResult;
use crate::graph::{GraphClient, GraphNode, InsightMetric};
use crate::storage::FacebookSettings;

/// Aggregates page, post and video counters from the Graph API.
///
/// Calls run one after another. A failed call contributes zero and is
/// logged; the fetch itself never fails.
#[derive(Clone)]
pub struct MetricsFetcher {
    graph: GraphClient,
    post_limit: u32,
    video_limit: u32,
}

impl MetricsFetcher {
    /// Create a fetcher over an existing Graph client
    pub fn new(graph: GraphClient, config: &GraphConfig) -> Self {
        Self {
            graph,
            post_limit: config.post_limit,
            video_limit: config.video_limit,
        }
    }

    /// Fetch and sum all raw counters for the page.
    pub async fn fetch(&self, settings: &FacebookSettings) -> RawMetrics {
        let start = Instant::now();
        let page_id = settings.page_id.as_str();
        let token = settings.page_access_token.as_str();
        let mut metrics = RawMetrics::default();

        let posts = list_or_empty(
            "posts",
            self.graph.list_posts(page_id, token, self.post_limit).await,
        );
        for post in &posts {
            self.add_post_engagement(&mut metrics, &post.id, token).await;
            self.add_post_insights(&mut metrics, &post.id, token).await;
        }

        let videos = list_or_empty(
            "videos",
            self.graph.list_videos(page_id, token, self.video_limit).await,
        );
        for video in &videos {
            self.add_video_insights(&mut metrics, &video.id, token).await;
        }

        match self.graph.followers_count(page_id, token).await {
            Ok(count) => metrics.total_followers = count,
            Err(e) => warn!(page_id = %page_id, error = %e, "Follower count unavailable"),
        }

        info!(
            page_id = %page_id,
            posts = posts.len(),
            videos = videos.len(),
            reach = metrics.reach,
            latency_ms = start.elapsed().as_millis(),
            "Page metrics fetched"
        );

        metrics
    }

    async fn add_post_engagement(&self, metrics: &mut RawMetrics, post_id: &str, token: &str) {
        match self.graph.post_engagement(post_id, token).await {
            Ok(engagement) => {
                metrics.likes += engagement.likes();
                metrics.comments += engagement.comments();
                metrics.shares += engagement.shares();
            }
            Err(e) => warn!(post_id = %post_id, error = %e, "Post engagement unavailable"),
        }
    }

    async fn add_post_insights(&self, metrics: &mut RawMetrics, post_id: &str, token: &str) {
        match self.graph.post_insights(post_id, token).await {
            Ok(insights) => apply_post_insights(metrics, &insights),
            Err(e) => warn!(post_id = %post_id, error = %e, "Post insights unavailable"),
        }
    }

    async fn add_video_insights(&self, metrics: &mut RawMetrics, video_id: &str, token: &str) {
        match self.graph.video_insights(video_id, token).await {
            Ok(insights) => apply_video_insights(metrics, &insights),
            Err(e) => warn!(video_id = %video_id, error = %e, "Video insights unavailable"),
        }
    }
}

/// Sum per-post reach/impression insights into the counters.
pub fn apply_post_insights(metrics: &mut RawMetrics, insights: &[InsightMetric]) {
    for item in insights {
        let Some(value) = numeric_value(item) else {
            continue;
        };
        match item.name.as_str() {
            "post_impressions_unique" => add_count(&mut metrics.reach, value),
            "post_impressions" => add_count(&mut metrics.impressions, value),
            "post_impressions_organic" => add_count(&mut metrics.organic_impressions, value),
            "post_impressions_paid" => add_count(&mut metrics.paid_impressions, value),
            _ => {}
        }
    }
}

/// Sum per-video view/retention insights into the counters.
pub fn apply_video_insights(metrics: &mut RawMetrics, insights: &[InsightMetric]) {
    for item in insights {
        let Some(value) = numeric_value(item) else {
            continue;
        };
        match item.name.as_str() {
            "total_video_views" => add_count(&mut metrics.video_views, value),
            "total_video_10s_views" => add_count(&mut metrics.ten_second_views, value),
            "average_watch_time" => metrics.average_watch_time += value,
            "video_retention" => metrics.video_retention_rate += value,
            _ => {}
        }
    }
}

fn list_or_empty(kind: &str, result: GraphResult<Vec<GraphNode>>) -> Vec<GraphNode> {
    match result {
        Ok(nodes) => nodes,
        Err(e) => {
            warn!(kind = %kind, error = %e, "Listing failed, counting as empty");
            Vec::new()
        }
    }
}

fn numeric_value(item: &InsightMetric) -> Option<f64> {
    let value = item.first_value();
    if value.is_none() {
        debug!(metric = %item.name, "Insight has no numeric value, counting as zero");
    }
    value
}

fn add_count(target: &mut u64, value: f64) {
    if value > 0.0 {
        *target += value.round() as u64;
    }
}
