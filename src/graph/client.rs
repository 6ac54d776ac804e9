use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::debug;

use super::types::{GraphList, GraphNode, InsightMetric, PageFollowers, PostEngagement};
use super::{POST_ENGAGEMENT_FIELDS, POST_INSIGHT_METRICS, VIDEO_INSIGHT_METRICS};
use crate::config::{GraphConfig, RequestConfig};
use crate::error::{GraphError, GraphResult};

/// Client for the Facebook Graph API.
///
/// Every call is a single GET authenticated by the page access token passed
/// in the query string; no retries are attempted.
#[derive(Clone)]
pub struct GraphClient {
    client: Client,
    base_url: String,
    timeout_ms: u64,
}

impl GraphClient {
    /// Create a new Graph API client
    pub fn new(config: &GraphConfig, request_config: &RequestConfig) -> GraphResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(GraphError::Http)?;

        Ok(Self {
            client,
            base_url: format!(
                "{}/{}",
                config.base_url.trim_end_matches('/'),
                config.api_version.trim_matches('/')
            ),
            timeout_ms: request_config.timeout_ms,
        })
    }

    /// Versioned base URL, e.g. `https://graph.facebook.com/v18.0`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Most recent posts of a page
    pub async fn list_posts(
        &self,
        page_id: &str,
        access_token: &str,
        limit: u32,
    ) -> GraphResult<Vec<GraphNode>> {
        let limit = limit.to_string();
        let list: GraphList<GraphNode> = self
            .get(
                &format!("{}/posts", page_id),
                &[("fields", "id"), ("limit", limit.as_str())],
                access_token,
            )
            .await?;
        Ok(list.data)
    }

    /// Like/comment/share counters of one post
    pub async fn post_engagement(
        &self,
        post_id: &str,
        access_token: &str,
    ) -> GraphResult<PostEngagement> {
        self.get(post_id, &[("fields", POST_ENGAGEMENT_FIELDS)], access_token)
            .await
    }

    /// Reach and impression insights of one post
    pub async fn post_insights(
        &self,
        post_id: &str,
        access_token: &str,
    ) -> GraphResult<Vec<InsightMetric>> {
        let list: GraphList<InsightMetric> = self
            .get(
                &format!("{}/insights", post_id),
                &[("metric", POST_INSIGHT_METRICS)],
                access_token,
            )
            .await?;
        Ok(list.data)
    }

    /// Most recent videos of a page
    pub async fn list_videos(
        &self,
        page_id: &str,
        access_token: &str,
        limit: u32,
    ) -> GraphResult<Vec<GraphNode>> {
        let limit = limit.to_string();
        let list: GraphList<GraphNode> = self
            .get(
                &format!("{}/videos", page_id),
                &[("fields", "id"), ("limit", limit.as_str())],
                access_token,
            )
            .await?;
        Ok(list.data)
    }

    /// View and retention insights of one video
    pub async fn video_insights(
        &self,
        video_id: &str,
        access_token: &str,
    ) -> GraphResult<Vec<InsightMetric>> {
        let list: GraphList<InsightMetric> = self
            .get(
                &format!("{}/insights", video_id),
                &[("metric", VIDEO_INSIGHT_METRICS)],
                access_token,
            )
            .await?;
        Ok(list.data)
    }

    /// Follower count of a page; a page without the field counts as zero.
    pub async fn followers_count(&self, page_id: &str, access_token: &str) -> GraphResult<u64> {
        let page: PageFollowers = self
            .get(page_id, &[("fields", "followers_count")], access_token)
            .await?;
        Ok(page.followers_count.unwrap_or(0))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        access_token: &str,
    ) -> GraphResult<T> {
        let url = format!("{}/{}", self.base_url, path);
        let start = Instant::now();

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("access_token", access_token)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GraphError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    GraphError::Http(e)
                }
            })?;

        let status = response.status();

        debug!(
            path = %path,
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis(),
            "Graph API call completed"
        );

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(GraphError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| GraphError::InvalidResponse {
                message: format!("Failed to parse {} response: {}", path, e),
            })
    }
}
