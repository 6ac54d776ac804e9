use std::env;
use std::path::PathBuf;

use tracing::warn;

use crate::error::AppError;
use crate::storage::FacebookSettings;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub openai: OpenAiConfig,
    pub graph: GraphConfig,
    /// Page credentials; `None` disables the live metrics path.
    pub facebook: Option<FacebookSettings>,
    pub insights: InsightConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub request: RequestConfig,
}

/// Chat completion API configuration
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
}

/// Graph API configuration
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub base_url: String,
    pub api_version: String,
    pub post_limit: u32,
    pub video_limit: u32,
}

/// Generator/evaluator settings
#[derive(Debug, Clone)]
pub struct InsightConfig {
    pub model: String,
    pub max_iterations: usize,
    pub generator_max_tokens: u32,
    pub evaluator_max_tokens: u32,
    pub temperature: f64,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub refresh_on_startup: bool,
}

/// File locations
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub output_path: PathBuf,
    pub settings_path: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

/// Postgres connection settings for the credential loader
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let openai = OpenAiConfig {
            api_key: env::var("OPENAI_API_KEY").map_err(|_| AppError::Config {
                message: "OPENAI_API_KEY is required".to_string(),
            })?,
            base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com"),
        };

        let graph = GraphConfig {
            base_url: env_or("GRAPH_API_BASE_URL", "https://graph.facebook.com"),
            api_version: env_or("GRAPH_API_VERSION", "v18.0"),
            post_limit: env_parse("GRAPH_POST_LIMIT", 10),
            video_limit: env_parse("GRAPH_VIDEO_LIMIT", 5),
        };

        let storage = StorageConfig::from_env();

        let facebook = resolve_facebook_settings(
            env::var("FACEBOOK_PAGE_ID").ok(),
            env::var("FACEBOOK_PAGE_ACCESS_TOKEN").ok(),
            &storage.settings_path,
        );

        let insights = InsightConfig {
            model: env_or("OPENAI_MODEL", "gpt-3.5-turbo"),
            max_iterations: env_parse("INSIGHT_MAX_ITERATIONS", 3),
            ..InsightConfig::default()
        };

        let server = ServerConfig {
            host: env_or("SERVER_HOST", "127.0.0.1"),
            port: env_parse("SERVER_PORT", 8888),
            static_dir: PathBuf::from(env_or("STATIC_DIR", "static")),
            refresh_on_startup: env_parse("REFRESH_ON_STARTUP", true),
        };

        let logging = LoggingConfig::from_env();

        let request = RequestConfig {
            timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 30000),
            max_retries: env_parse("MAX_RETRIES", 0),
            retry_delay_ms: env_parse("RETRY_DELAY_MS", 1000),
        };

        Ok(Config {
            openai,
            graph,
            facebook,
            insights,
            server,
            storage,
            logging,
            request,
        })
    }
}

impl StorageConfig {
    /// Output and settings file locations; needs no credentials.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            output_path: PathBuf::from(env_or("OUTPUT_PATH", "fb_metrics.json")),
            settings_path: PathBuf::from(env_or("FACEBOOK_SETTINGS_PATH", "facebook_settings.json")),
        }
    }
}

impl LoggingConfig {
    /// Log level and format; needs no credentials.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            level: env_or("LOG_LEVEL", "info"),
            format: match env_or("LOG_FORMAT", "pretty").to_lowercase().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        }
    }
}

impl DatabaseConfig {
    /// Load database settings; every variable except `DB_PORT` is required.
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let missing: Vec<&str> = ["DB_HOST", "DB_NAME", "DB_USER", "DB_PASSWORD"]
            .into_iter()
            .filter(|key| env::var(key).map(|v| v.is_empty()).unwrap_or(true))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Config {
                message: format!("missing database variables: {}", missing.join(", ")),
            });
        }

        Ok(Self {
            host: env_or("DB_HOST", ""),
            port: env_parse("DB_PORT", 5432),
            database: env_or("DB_NAME", ""),
            user: env_or("DB_USER", ""),
            password: env_or("DB_PASSWORD", ""),
        })
    }
}

/// When either environment credential is missing, values present in the
/// settings file take precedence over both.
fn resolve_facebook_settings(
    page_id: Option<String>,
    access_token: Option<String>,
    settings_path: &std::path::Path,
) -> Option<FacebookSettings> {
    let mut page_id = page_id.filter(|v| !v.is_empty());
    let mut access_token = access_token.filter(|v| !v.is_empty());

    if page_id.is_none() || access_token.is_none() {
        match FacebookSettings::load(settings_path) {
            Ok(Some(file)) => {
                if !file.page_id.is_empty() {
                    page_id = Some(file.page_id);
                }
                if !file.page_access_token.is_empty() {
                    access_token = Some(file.page_access_token);
                }
            }
            Ok(None) => {
                warn!(
                    path = %settings_path.display(),
                    "Facebook credentials not found in environment or settings file"
                );
            }
            Err(e) => {
                warn!(
                    path = %settings_path.display(),
                    error = %e,
                    "Failed to read Facebook settings file"
                );
            }
        }
    }

    match (page_id, access_token) {
        (Some(page_id), Some(page_access_token)) => Some(FacebookSettings {
            page_id,
            page_access_token,
        }),
        _ => None,
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30000,
            max_retries: 0,
            retry_delay_ms: 1000,
        }
    }
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            max_iterations: 3,
            generator_max_tokens: 500,
            evaluator_max_tokens: 600,
            temperature: 0.7,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: "https://graph.facebook.com".to_string(),
            api_version: "v18.0".to_string(),
            post_limit: 10,
            video_limit: 5,
        }
    }
}
