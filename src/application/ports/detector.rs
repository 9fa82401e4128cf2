//! Face-landmark detector port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::face::FaceObservation;
use crate::domain::recording::VideoFrame;

/// Detector errors
#[derive(Debug, Clone, Error)]
pub enum DetectorError {
    #[error("Detector initialization failed: {0}")]
    InitFailed(String),

    #[error("Detector not initialized")]
    NotInitialized,

    #[error("Detection failed: {0}")]
    DetectFailed(String),
}

/// Port for the external face-landmark detector.
///
/// The detector loads its model assets once via [`init`](Self::init);
/// after that, [`detect`](Self::detect) is called per frame and must not
/// keep state across frames beyond the loaded model.
#[async_trait]
pub trait FaceLandmarkDetector: Send + Sync {
    /// One-time asynchronous model load. Idempotent.
    async fn init(&self) -> Result<(), DetectorError>;

    /// Detect the face in one frame. `None` means no face was found.
    fn detect(
        &self,
        frame: &VideoFrame,
        timestamp_ms: u64,
    ) -> Result<Option<FaceObservation>, DetectorError>;
}
