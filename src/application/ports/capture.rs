//! Capture device port interface

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::recording::{AudioData, AudioFragment, VideoFrame};

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Capture already active")]
    AlreadyActive,

    #[error("No capture in progress")]
    NotCapturing,

    #[error("Failed to start capture: {0}")]
    StartFailed(String),

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("Failed to assemble audio: {0}")]
    AssemblyFailed(String),
}

/// What a session asks the device to capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRequest {
    pub audio: bool,
    pub video: bool,
}

impl CaptureRequest {
    /// Microphone only
    pub const fn audio_only() -> Self {
        Self {
            audio: true,
            video: false,
        }
    }

    /// Microphone plus camera frames for the face overlay
    pub const fn audio_and_video() -> Self {
        Self {
            audio: true,
            video: true,
        }
    }
}

/// Port for the exclusive capture device (microphone, optionally camera).
///
/// Fragment delivery contract: the device pushes [`AudioFragment`]s into
/// the sink handed to [`start`](Self::start) at its own chunking cadence.
/// [`stop`](Self::stop) must deliver any buffered tail fragment and only
/// then drop the sink, so a caller that drains the channel to completion
/// after `stop` returns is guaranteed the full recording.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Acquire the device and begin capturing.
    ///
    /// Fails with [`CaptureError::DeviceUnavailable`] when permission is
    /// denied or no hardware exists, and [`CaptureError::AlreadyActive`]
    /// when another capture holds the device.
    async fn start(
        &self,
        request: CaptureRequest,
        sink: mpsc::UnboundedSender<AudioFragment>,
    ) -> Result<(), CaptureError>;

    /// Suspend fragment production without releasing the device.
    async fn pause(&self) -> Result<(), CaptureError>;

    /// Resume fragment production after a pause.
    async fn resume(&self) -> Result<(), CaptureError>;

    /// Stop capturing. Flushes the buffered tail fragment into the sink,
    /// then closes the sink. Returns only after the flush is complete.
    async fn stop(&self) -> Result<(), CaptureError>;

    /// Release the device. Idempotent: safe to call when already released.
    async fn release(&self);

    /// Whether a capture currently holds the device
    fn is_capturing(&self) -> bool;

    /// Wrap concatenated fragment bytes into one uploadable audio object
    fn assemble(&self, bytes: &[u8]) -> Result<AudioData, CaptureError>;

    /// Most recent video frame, when the capture includes video
    fn latest_frame(&self) -> Option<VideoFrame>;
}
