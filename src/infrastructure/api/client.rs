//! HTTP client for the coach backend
//!
//! One adapter covers all three remote operations: audio transcription
//! (multipart upload), transcript summarization, and the question list.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::application::ports::{
    QuestionFetchError, QuestionSource, SummarizationError, Summarizer, Transcriber,
    TranscriptionError,
};
use crate::domain::analysis::AnalysisResult;
use crate::domain::recording::AudioData;

// Response types for the coach backend

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    transcript: String,
}

#[derive(Debug, Deserialize)]
struct SummarizeResponse {
    main_points: Vec<String>,
    feedback: Vec<String>,
    #[serde(default)]
    metrics: Option<HashMap<String, serde_json::Value>>,
}

/// Coach backend API client
pub struct CoachApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl CoachApiClient {
    /// Create a new client for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// The configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }
}

#[async_trait]
impl Transcriber for CoachApiClient {
    async fn transcribe(&self, audio: &AudioData) -> Result<String, TranscriptionError> {
        let part = reqwest::multipart::Part::bytes(audio.data().to_vec())
            .file_name(format!("answer.{}", audio.mime_type().extension()))
            .mime_str(audio.mime_type().as_str())
            .map_err(|e| TranscriptionError::RequestFailed(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        debug!(
            "uploading {} for transcription",
            audio.human_readable_size()
        );
        let response = self
            .client
            .post(self.endpoint("transcribe"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::RequestFailed(e.to_string()))?;

        // Every non-success status reads the same to the caller: busy
        if !response.status().is_success() {
            return Err(TranscriptionError::ServiceBusy);
        }

        let body: TranscribeResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::ParseError(e.to_string()))?;

        let transcript = body.transcript.trim();
        if transcript.is_empty() {
            return Err(TranscriptionError::EmptyTranscript);
        }
        Ok(transcript.to_string())
    }
}

#[async_trait]
impl Summarizer for CoachApiClient {
    async fn summarize(&self, transcript: &str) -> Result<AnalysisResult, SummarizationError> {
        let response = self
            .client
            .post(self.endpoint("summarize"))
            .json(&serde_json::json!({ "transcript": transcript }))
            .send()
            .await
            .map_err(|e| SummarizationError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SummarizationError::ServiceFailed(format!("HTTP {}", status)));
        }

        let body: SummarizeResponse = response
            .json()
            .await
            .map_err(|e| SummarizationError::ParseError(e.to_string()))?;

        Ok(AnalysisResult {
            main_points: body.main_points,
            feedback: body.feedback,
            metrics: body.metrics,
        })
    }
}

#[async_trait]
impl QuestionSource for CoachApiClient {
    async fn fetch(&self) -> Result<Vec<String>, QuestionFetchError> {
        let response = self
            .client
            .get(self.endpoint("get-questions"))
            .send()
            .await
            .map_err(|e| QuestionFetchError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuestionFetchError::Unavailable(format!("HTTP {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| QuestionFetchError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = CoachApiClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn endpoints_follow_api_prefix() {
        let client = CoachApiClient::new("http://localhost:8000");
        assert_eq!(
            client.endpoint("transcribe"),
            "http://localhost:8000/api/transcribe"
        );
        assert_eq!(
            client.endpoint("get-questions"),
            "http://localhost:8000/api/get-questions"
        );
    }

    #[test]
    fn transcribe_response_ignores_extra_fields() {
        let json = r#"{"model": "whisper-lite", "transcript": "hello"}"#;
        let body: TranscribeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.transcript, "hello");
    }

    #[test]
    fn summarize_response_without_metrics() {
        let json = r#"{"main_points": ["a"], "feedback": ["b"]}"#;
        let body: SummarizeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.main_points, vec!["a"]);
        assert!(body.metrics.is_none());
    }
}
