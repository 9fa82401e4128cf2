//! Replay detector adapter
//!
//! Serves a fixed script of observations in a loop. This is the seam
//! where a real face-landmark backend plugs in; the replay variant backs
//! the overlay demo mode and the tests, where no camera or model assets
//! exist.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::application::ports::{DetectorError, FaceLandmarkDetector};
use crate::domain::face::{FaceObservation, LandmarkPoint};
use crate::domain::recording::VideoFrame;

/// Eye landmark indices in the face-mesh topology: (top lid, bottom lid,
/// outer corner, inner corner) per eye.
const LEFT_EYE: [usize; 4] = [159, 145, 33, 133];
const RIGHT_EYE: [usize; 4] = [386, 374, 263, 362];

/// Detector that replays a fixed observation script, one entry per frame,
/// wrapping around at the end.
pub struct ReplayDetector {
    script: Vec<Option<FaceObservation>>,
    cursor: AtomicUsize,
    initialized: AtomicBool,
}

impl ReplayDetector {
    /// Create a detector over the given script
    pub fn new(script: Vec<Option<FaceObservation>>) -> Self {
        Self {
            script,
            cursor: AtomicUsize::new(0),
            initialized: AtomicBool::new(false),
        }
    }

    /// A small expressive script for the overlay demo: neutral, smiling,
    /// surprised, then one frame with no face.
    pub fn demo() -> Self {
        let neutral = observation(&[], 0.3);
        let happy = observation(&[("mouthSmileLeft", 0.9), ("mouthSmileRight", 0.85)], 0.3);
        let surprised = observation(
            &[
                ("browInnerUp", 0.8),
                ("eyeWideLeft", 0.7),
                ("eyeWideRight", 0.7),
                ("jawOpen", 0.5),
            ],
            0.4,
        );
        Self::new(vec![Some(neutral), Some(happy), Some(surprised), None])
    }
}

/// Build an observation with the given blend-shape scores and an eye
/// vertical/horizontal ratio applied to both eyes.
fn observation(shapes: &[(&str, f32)], eye_ratio: f32) -> FaceObservation {
    let mut landmarks = vec![LandmarkPoint::default(); 400];
    for indices in [LEFT_EYE, RIGHT_EYE] {
        landmarks[indices[0]] = LandmarkPoint::new(0.5, 0.5 - eye_ratio / 2.0);
        landmarks[indices[1]] = LandmarkPoint::new(0.5, 0.5 + eye_ratio / 2.0);
        landmarks[indices[2]] = LandmarkPoint::new(0.0, 0.5);
        landmarks[indices[3]] = LandmarkPoint::new(1.0, 0.5);
    }
    FaceObservation::new(landmarks, shapes.iter().map(|&(n, s)| (n, s)).collect())
}

#[async_trait]
impl FaceLandmarkDetector for ReplayDetector {
    async fn init(&self) -> Result<(), DetectorError> {
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn detect(
        &self,
        _frame: &VideoFrame,
        _timestamp_ms: u64,
    ) -> Result<Option<FaceObservation>, DetectorError> {
        if !self.initialized.load(Ordering::SeqCst) {
            return Err(DetectorError::NotInitialized);
        }
        if self.script.is_empty() {
            return Ok(None);
        }
        let index = self.cursor.fetch_add(1, Ordering::SeqCst) % self.script.len();
        Ok(self.script[index].clone())
    }
}
