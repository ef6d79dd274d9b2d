use thiserror::Error;

/// Failures crossing the boundary to the TfL API.
///
/// Per-line failures are isolated by the pipeline; only a failed line-list
/// fetch aborts a refresh cycle.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("response body was not the expected JSON shape: {0}")]
    Decode(#[from] serde_json::Error),
}
