use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Graph API error: {0}")]
    Graph(#[from] GraphError),

    #[error("Language model error: {0}")]
    Llm(#[from] LlmError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// File and database persistence errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Graph API errors
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Chat completion API errors
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Language model unavailable: {message} (retries: {retries})")]
    Unavailable { message: String, retries: u32 },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for Graph API operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Result type alias for language model operations
pub type LlmResult<T> = Result<T, LlmError>;
