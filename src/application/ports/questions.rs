//! Question source port interface

use async_trait::async_trait;
use thiserror::Error;

/// Question fetch errors. Callers recover by falling back to the
/// built-in question list.
#[derive(Debug, Clone, Error)]
pub enum QuestionFetchError {
    #[error("Failed to fetch questions: {0}")]
    Unavailable(String),

    #[error("Failed to parse question list: {0}")]
    ParseError(String),
}

/// Port for fetching the interview question list
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch the ordered question list, once, at startup.
    async fn fetch(&self) -> Result<Vec<String>, QuestionFetchError>;
}
