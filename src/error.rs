#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Division by zero: {0}")]
    DivideByZero(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl MarketError {
    /// True when the failure came from the hosted store or identity provider
    /// (unreachable, non-success status, rejected credentials).
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Http(_) | Self::UpstreamUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, MarketError>;
