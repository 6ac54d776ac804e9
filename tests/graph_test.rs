//! Graph API client and metrics fetcher tests
//!
//! Uses wiremock to stand in for graph.facebook.com.

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use common::{mount_page, settings, PAGE_ID, TOKEN};
use page_insights::config::{GraphConfig, RequestConfig};
use page_insights::error::GraphError;
use page_insights::graph::GraphClient;
use page_insights::metrics::{MetricsFetcher, PageMetrics, RawMetrics};

fn graph_config(base_url: &str) -> GraphConfig {
    GraphConfig {
        base_url: base_url.to_string(),
        ..GraphConfig::default()
    }
}

fn request_config() -> RequestConfig {
    RequestConfig {
        timeout_ms: 5000,
        max_retries: 0,
        retry_delay_ms: 10,
    }
}

fn fetcher(base_url: &str) -> MetricsFetcher {
    let config = graph_config(base_url);
    let client = GraphClient::new(&config, &request_config()).expect("Failed to create client");
    MetricsFetcher::new(client, &config)
}

#[cfg(test)]
mod client_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_list_posts_sends_token_and_limit() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v18.0/page-1/posts"))
            .and(query_param("fields", "id"))
            .and(query_param("limit", "10"))
            .and(query_param("access_token", TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "post-1"}],
                "paging": {"cursors": {"before": "a", "after": "b"}}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GraphClient::new(&graph_config(&mock_server.uri()), &request_config()).unwrap();
        let posts = client.list_posts(PAGE_ID, TOKEN, 10).await.unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "post-1");
    }

    #[tokio::test]
    async fn test_post_engagement_missing_edges_count_zero() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v18.0/post-9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "post-9",
                "likes": {"data": [], "summary": {"total_count": 7}}
            })))
            .mount(&mock_server)
            .await;

        let client = GraphClient::new(&graph_config(&mock_server.uri()), &request_config()).unwrap();
        let engagement = client.post_engagement("post-9", TOKEN).await.unwrap();

        assert_eq!(engagement.likes(), 7);
        assert_eq!(engagement.comments(), 0);
        assert_eq!(engagement.shares(), 0);
    }

    #[tokio::test]
    async fn test_api_error_status_is_reported() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v18.0/page-1"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"message": "Invalid OAuth access token.", "code": 190}
            })))
            .mount(&mock_server)
            .await;

        let client = GraphClient::new(&graph_config(&mock_server.uri()), &request_config()).unwrap();
        let result = client.followers_count(PAGE_ID, "bad-token").await;

        match result {
            Err(GraphError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert!(message.contains("Invalid OAuth"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v18.0/post-1/insights"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = GraphClient::new(&graph_config(&mock_server.uri()), &request_config()).unwrap();
        let result = client.post_insights("post-1", TOKEN).await;

        assert!(matches!(result, Err(GraphError::InvalidResponse { .. })));
    }
}

#[cfg(test)]
mod fetcher_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_fetch_sums_posts_and_videos() {
        let mock_server = MockServer::start().await;
        mount_page(&mock_server).await;

        let raw = fetcher(&mock_server.uri()).fetch(&settings()).await;

        assert_eq!(
            raw,
            RawMetrics {
                reach: 10000,
                impressions: 15000,
                organic_impressions: 13000,
                paid_impressions: 2000,
                likes: 300,
                comments: 50,
                shares: 20,
                video_views: 2000,
                ten_second_views: 800,
                average_watch_time: 12.5,
                total_followers: 5000,
                ..RawMetrics::default()
            }
        );

        let metrics = PageMetrics::from_raw(raw);
        assert_eq!(metrics.derived.engagement_total, 370);
        assert_eq!(metrics.derived.engagement_rate, 3.7);
        assert_eq!(metrics.derived.frequency, 1.5);
    }

    #[tokio::test]
    async fn test_failed_calls_contribute_zero() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v18.0/page-1/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "post-1"}]
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v18.0/post-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "post-1",
                "likes": {"summary": {"total_count": 40}},
                "comments": {"summary": {"total_count": 4}},
                "shares": {"count": 2}
            })))
            .mount(&mock_server)
            .await;

        // Insights, videos and followers all fail.
        Mock::given(method("GET"))
            .and(path("/v18.0/post-1/insights"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v18.0/page-1/videos"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v18.0/page-1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let raw = fetcher(&mock_server.uri()).fetch(&settings()).await;

        assert_eq!(raw.likes, 40);
        assert_eq!(raw.comments, 4);
        assert_eq!(raw.shares, 2);
        assert_eq!(raw.reach, 0);
        assert_eq!(raw.video_views, 0);
        assert_eq!(raw.total_followers, 0);
    }

    #[tokio::test]
    async fn test_page_without_data_yields_zeroes() {
        let mock_server = MockServer::start().await;

        let raw = fetcher(&mock_server.uri()).fetch(&settings()).await;
        assert_eq!(raw, RawMetrics::default());

        let metrics = PageMetrics::from_raw(raw);
        assert_eq!(metrics.derived.engagement_rate, 0.0);
        assert!(metrics
            .to_json()
            .as_object()
            .unwrap()
            .values()
            .all(|v| v.as_f64().map(f64::is_finite).unwrap_or(false)));
    }
}
