//! Per-frame face status reduction

use std::cmp::Ordering;

use super::observation::FaceObservation;
use super::scoring::{EmotionScore, EmotionScoring};

/// Landmark indices for each eye: (top lid, bottom lid, outer corner,
/// inner corner), per the face-mesh topology the detector reports.
const LEFT_EYE: [usize; 4] = [159, 145, 33, 133];
const RIGHT_EYE: [usize; 4] = [386, 374, 263, 362];

/// A fully open eye sits near a 0.3 vertical/horizontal ratio; the scale
/// maps that to roughly 1.0 before clamping.
const EYE_OPENNESS_SCALE: f32 = 3.0;

/// Number of emotions surfaced in the ranked list
const TOP_EMOTION_COUNT: usize = 3;

/// Per-frame face readout. Superseded every frame, never accumulated:
/// there is no temporal smoothing, so the primary label can visibly
/// jitter between adjacent frames.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceStatus {
    /// Primary emotion label (highest score this frame)
    pub emotion: String,
    /// Score of the primary emotion, in [0, 1]
    pub confidence: f32,
    /// Top emotions by descending score
    pub top: Vec<EmotionScore>,
    /// Left-eye openness ratio in [0, 1]
    pub left_eye_openness: f32,
    /// Right-eye openness ratio in [0, 1]
    pub right_eye_openness: f32,
}

impl FaceStatus {
    /// Reduce one detector observation to a status sample.
    ///
    /// Pure and stateless: the output depends only on this frame's
    /// observation and the scoring policy.
    pub fn reduce(observation: &FaceObservation, scorer: &dyn EmotionScoring) -> Self {
        let mut scores = scorer.score(&observation.blend_shapes);
        scores.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.label.cmp(&b.label))
        });
        scores.truncate(TOP_EMOTION_COUNT);

        let (emotion, confidence) = scores
            .first()
            .map(|e| (e.label.clone(), e.score))
            .unwrap_or_else(|| ("neutral".to_string(), 0.0));

        Self {
            emotion,
            confidence,
            left_eye_openness: eye_openness(observation, &LEFT_EYE),
            right_eye_openness: eye_openness(observation, &RIGHT_EYE),
            top: scores,
        }
    }
}

/// Openness of one eye: vertical lid distance over horizontal corner
/// distance, scaled and clamped into [0, 1]. Missing landmarks read as a
/// closed eye.
fn eye_openness(observation: &FaceObservation, indices: &[usize; 4]) -> f32 {
    let points: Vec<_> = indices
        .iter()
        .filter_map(|&i| observation.landmark(i))
        .collect();
    let [top, bottom, outer, inner] = match <[_; 4]>::try_from(points) {
        Ok(points) => points,
        Err(_) => return 0.0,
    };

    let vertical = top.distance(&bottom);
    let horizontal = outer.distance(&inner);
    if horizontal <= f32::EPSILON {
        return 0.0;
    }
    (vertical / horizontal * EYE_OPENNESS_SCALE).clamp(0.0, 1.0)
}
