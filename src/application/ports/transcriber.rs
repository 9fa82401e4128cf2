//! Transcription port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::AudioData;

/// Transcription errors
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    /// The backend answered with a non-success status. All of them are
    /// surfaced the same way: the service is busy, try again.
    #[error("Transcription service is busy. Please try again.")]
    ServiceBusy,

    #[error("Transcription request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse transcription response: {0}")]
    ParseError(String),

    #[error("Empty transcript")]
    EmptyTranscript,
}

/// Port for audio transcription
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe one assembled audio object to text.
    async fn transcribe(&self, audio: &AudioData) -> Result<String, TranscriptionError>;
}
