//! Shared fixtures for integration tests: configuration pointing at mock
//! servers and canned Graph API / chat completion responses.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::path::Path;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use page_insights::config::{
    Config, GraphConfig, InsightConfig, LogFormat, LoggingConfig, OpenAiConfig, RequestConfig,
    ServerConfig, StorageConfig,
};
use page_insights::storage::FacebookSettings;

pub const PAGE_ID: &str = "page-1";
pub const TOKEN: &str = "page-token";

pub fn settings() -> FacebookSettings {
    FacebookSettings {
        page_id: PAGE_ID.to_string(),
        page_access_token: TOKEN.to_string(),
    }
}

/// Configuration with both upstreams on mock servers and files under `dir`.
pub fn test_config(graph_url: &str, openai_url: &str, dir: &Path) -> Config {
    Config {
        openai: OpenAiConfig {
            api_key: "test-api-key".to_string(),
            base_url: openai_url.to_string(),
        },
        graph: GraphConfig {
            base_url: graph_url.to_string(),
            ..GraphConfig::default()
        },
        facebook: Some(settings()),
        insights: InsightConfig::default(),
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            static_dir: dir.join("static"),
            refresh_on_startup: false,
        },
        storage: StorageConfig {
            output_path: dir.join("fb_metrics.json"),
            settings_path: dir.join("facebook_settings.json"),
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        },
        request: RequestConfig {
            timeout_ms: 5000,
            max_retries: 0,
            retry_delay_ms: 10,
        },
    }
}

/// Chat completion response body carrying `content`.
pub fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "model": "gpt-3.5-turbo",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 100, "completion_tokens": 50, "total_tokens": 150}
    })
}

pub fn insight_json() -> String {
    json!({
        "engagementRateInsight": "Engagement is 3.7% of reach.",
        "reachInsight": "Reach was 10,000 people.",
        "breakdownInsight": "Likes make up most engagement.",
        "summaryInsight": "Invite more comments."
    })
    .to_string()
}

fn insight_metric(name: &str, value: Value) -> Value {
    json!({"name": name, "period": "lifetime", "values": [{"value": value}]})
}

/// Mount a page with two posts, one video and 5000 followers.
///
/// Totals: reach 10000, impressions 15000, likes 300, comments 50, shares 20,
/// video views 2000, ten-second views 800.
pub async fn mount_page(server: &MockServer) {
    let base = "/v18.0";

    Mock::given(method("GET"))
        .and(path(format!("{}/{}/posts", base, PAGE_ID)))
        .and(query_param("access_token", TOKEN))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "post-1"}, {"id": "post-2"}]
        })))
        .mount(server)
        .await;

    for (post, likes, comments, shares, reach, impressions) in [
        ("post-1", 200, 30, 15, 6000, 9000),
        ("post-2", 100, 20, 5, 4000, 6000),
    ] {
        Mock::given(method("GET"))
            .and(path(format!("{}/{}", base, post)))
            .and(query_param("access_token", TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": post,
                "likes": {"data": [], "summary": {"total_count": likes}},
                "comments": {"data": [], "summary": {"total_count": comments}},
                "shares": {"count": shares}
            })))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("{}/{}/insights", base, post)))
            .and(query_param("access_token", TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    insight_metric("post_impressions", json!(impressions)),
                    insight_metric("post_impressions_unique", json!(reach)),
                    insight_metric("post_impressions_organic", json!(impressions - 1000)),
                    insight_metric("post_impressions_paid", json!(1000))
                ]
            })))
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(format!("{}/{}/videos", base, PAGE_ID)))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "video-1"}]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/video-1/insights", base)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                insight_metric("total_video_views", json!(2000)),
                insight_metric("total_video_10s_views", json!(800)),
                insight_metric("average_watch_time", json!(12.5)),
                insight_metric("video_retention", json!({"0": 1.0, "15": 0.4}))
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/{}", base, PAGE_ID)))
        .and(query_param("fields", "followers_count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "followers_count": 5000,
            "id": PAGE_ID
        })))
        .mount(server)
        .await;
}
