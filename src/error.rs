use crate::models::{FailureKind, FetchFailure};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubPreviewError {
    #[error("GitHub API error: {0}")]
    ApiError(String),

    #[error("Invalid repository URL: {0}")]
    InvalidRepoUrl(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Font error: {0}")]
    FontError(String),

    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Render task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),
}

impl From<FetchFailure> for GitHubPreviewError {
    fn from(failure: FetchFailure) -> Self {
        match failure.kind {
            FailureKind::HttpError if failure.status == "404" => {
                GitHubPreviewError::NotFound(failure.message)
            }
            FailureKind::HttpError => GitHubPreviewError::ApiError(format!(
                "{} ({})",
                failure.message.trim_end(),
                failure.status
            )),
            FailureKind::NetworkError | FailureKind::DecodeError => {
                GitHubPreviewError::ApiError(failure.message)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, GitHubPreviewError>;
