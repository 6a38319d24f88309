use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upstream returned status {0}")]
    UpstreamStatus(reqwest::StatusCode),

    #[error("Not cached: {0}")]
    NotCached(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),
}
