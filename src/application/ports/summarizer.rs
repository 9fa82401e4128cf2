//! Summarization port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::analysis::AnalysisResult;

/// Summarization errors. These are always recovered locally: the
/// transcript stays visible and the analysis panel reads as unavailable.
#[derive(Debug, Clone, Error)]
pub enum SummarizationError {
    #[error("Summarization request failed: {0}")]
    RequestFailed(String),

    #[error("Summarization service returned an error: {0}")]
    ServiceFailed(String),

    #[error("Failed to parse summarization response: {0}")]
    ParseError(String),
}

/// Port for transcript summarization
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize a transcript into main points, feedback, and metrics.
    async fn summarize(&self, transcript: &str) -> Result<AnalysisResult, SummarizationError>;
}
