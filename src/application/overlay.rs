//! Per-frame face overlay loop
//!
//! A cancellable task bound to the session's lifetime: it samples the
//! latest capture frame at a fixed cadence, runs the face-landmark
//! detector, and publishes the reduced status on a watch channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::domain::face::{EmotionScoring, FaceStatus};

use super::ports::{CaptureDevice, FaceLandmarkDetector};

/// Default sampling cadence, roughly display refresh rate
pub const DEFAULT_OVERLAY_INTERVAL_MS: u64 = 33;

/// Handle to a running overlay loop.
///
/// Cancellation is explicit via [`stop`](Self::stop) and must happen on
/// every path that leaves the recording states. Dropping the handle
/// aborts the task, so abrupt teardown cannot leak the loop.
pub struct OverlayHandle {
    running: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl OverlayHandle {
    /// Stop the loop and wait for it to finish. Idempotent.
    pub async fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    /// Whether the loop has not been stopped yet
    pub fn is_running(&self) -> bool {
        self.task.is_some() && self.running.load(Ordering::SeqCst)
    }
}

impl Drop for OverlayHandle {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Spawn the overlay loop.
///
/// Each tick is independent: one frame in, one status out, no smoothing
/// across frames. `None` is published when no face is found. The loop
/// ends on `stop`, on handle drop, or when the last status receiver is
/// dropped.
pub fn spawn_overlay<D, F>(
    device: Arc<D>,
    detector: Arc<F>,
    scorer: Arc<dyn EmotionScoring>,
    interval_ms: u64,
) -> (OverlayHandle, watch::Receiver<Option<FaceStatus>>)
where
    D: CaptureDevice + 'static,
    F: FaceLandmarkDetector + 'static,
{
    let (status_tx, status_rx) = watch::channel(None);
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);

    let task = tokio::spawn(async move {
        let started = Instant::now();
        let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
        loop {
            ticker.tick().await;
            if !flag.load(Ordering::SeqCst) {
                break;
            }

            let frame = device.latest_frame().unwrap_or_default();
            let timestamp_ms = started.elapsed().as_millis() as u64;
            let published = match detector.detect(&frame, timestamp_ms) {
                Ok(Some(observation)) => {
                    status_tx.send(Some(FaceStatus::reduce(&observation, scorer.as_ref())))
                }
                Ok(None) => status_tx.send(None),
                Err(e) => {
                    warn!("face detection failed: {e}");
                    continue;
                }
            };
            if published.is_err() {
                break;
            }
        }
    });

    (
        OverlayHandle {
            running,
            task: Some(task),
        },
        status_rx,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{CaptureError, CaptureRequest, DetectorError};
    use crate::domain::face::{BlendShapes, FaceObservation, WeightedEmotionScorer};
    use crate::domain::recording::{AudioData, AudioFragment, AudioMimeType, VideoFrame};
    use async_trait::async_trait;
    use tokio::sync::mpsc;

    struct FrameDevice;

    #[async_trait]
    impl CaptureDevice for FrameDevice {
        async fn start(
            &self,
            _request: CaptureRequest,
            _sink: mpsc::UnboundedSender<AudioFragment>,
        ) -> Result<(), CaptureError> {
            Ok(())
        }

        async fn pause(&self) -> Result<(), CaptureError> {
            Ok(())
        }

        async fn resume(&self) -> Result<(), CaptureError> {
            Ok(())
        }

        async fn stop(&self) -> Result<(), CaptureError> {
            Ok(())
        }

        async fn release(&self) {}

        fn is_capturing(&self) -> bool {
            true
        }

        fn assemble(&self, bytes: &[u8]) -> Result<AudioData, CaptureError> {
            Ok(AudioData::new(bytes.to_vec(), AudioMimeType::Wav))
        }

        fn latest_frame(&self) -> Option<VideoFrame> {
            Some(VideoFrame::new(2, 2, vec![0u8; 16]))
        }
    }

    struct SmilingDetector;

    #[async_trait]
    impl FaceLandmarkDetector for SmilingDetector {
        async fn init(&self) -> Result<(), DetectorError> {
            Ok(())
        }

        fn detect(
            &self,
            _frame: &VideoFrame,
            _timestamp_ms: u64,
        ) -> Result<Option<FaceObservation>, DetectorError> {
            let shapes: BlendShapes =
                [("mouthSmileLeft", 1.0), ("mouthSmileRight", 1.0)].into_iter().collect();
            Ok(Some(FaceObservation::new(vec![], shapes)))
        }
    }

    struct FacelessDetector;

    #[async_trait]
    impl FaceLandmarkDetector for FacelessDetector {
        async fn init(&self) -> Result<(), DetectorError> {
            Ok(())
        }

        fn detect(
            &self,
            _frame: &VideoFrame,
            _timestamp_ms: u64,
        ) -> Result<Option<FaceObservation>, DetectorError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn publishes_statuses_each_tick() {
        let (mut handle, mut rx) = spawn_overlay(
            Arc::new(FrameDevice),
            Arc::new(SmilingDetector),
            Arc::new(WeightedEmotionScorer::new()),
            1,
        );

        rx.changed().await.unwrap();
        let status = rx.borrow().clone().expect("face should be detected");
        assert_eq!(status.emotion, "happy");

        handle.stop().await;
    }

    #[tokio::test]
    async fn publishes_none_when_no_face() {
        let (mut handle, mut rx) = spawn_overlay(
            Arc::new(FrameDevice),
            Arc::new(FacelessDetector),
            Arc::new(WeightedEmotionScorer::new()),
            1,
        );

        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());

        handle.stop().await;
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let (mut handle, _rx) = spawn_overlay(
            Arc::new(FrameDevice),
            Arc::new(SmilingDetector),
            Arc::new(WeightedEmotionScorer::new()),
            1,
        );

        assert!(handle.is_running());
        handle.stop().await;
        assert!(!handle.is_running());
        handle.stop().await;
        assert!(!handle.is_running());
    }

    #[tokio::test]
    async fn loop_ends_when_receiver_dropped() {
        let (mut handle, rx) = spawn_overlay(
            Arc::new(FrameDevice),
            Arc::new(SmilingDetector),
            Arc::new(WeightedEmotionScorer::new()),
            1,
        );
        drop(rx);

        // The next publish fails and the task exits on its own
        if let Some(task) = handle.task.take() {
            tokio::time::timeout(Duration::from_secs(1), task)
                .await
                .expect("loop should end")
                .unwrap();
        }
    }
}
