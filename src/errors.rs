#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("invalid link: no video identifier found")]
    InvalidReference,

    #[error("video details could not be retrieved: {0}")]
    AggregationFailed(String),

    #[error("reqwest error: {0:?}")]
    Reqwest(#[from] reqwest::Error),

    #[error("io error: {0:?}")]
    IO(#[from] std::io::Error),

    #[error("unexpected error: {0:?}")]
    Other(#[from] anyhow::Error),
}
