//! Heuristic emotion scoring from blend-shape intensities

use super::observation::BlendShapes;

/// One named emotion with its heuristic score in [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionScore {
    pub label: String,
    pub score: f32,
}

impl EmotionScore {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Strategy for turning blend-shape scores into emotion scores.
///
/// The default weighted-sum policy is a heuristic, not a calibrated
/// model; swapping in a different policy must not touch the rest of the
/// face pipeline.
pub trait EmotionScoring: Send + Sync {
    /// Score all emotions for one frame. Every returned score must be
    /// in [0, 1] no matter the input.
    fn score(&self, shapes: &BlendShapes) -> Vec<EmotionScore>;
}

/// Fixed weighted linear combinations of blend-shape scores, one row per
/// emotion, each clamped into [0, 1].
const EMOTION_WEIGHTS: &[(&str, &[(&str, f32)])] = &[
    ("happy", &[("mouthSmileLeft", 0.5), ("mouthSmileRight", 0.5)]),
    (
        "surprised",
        &[
            ("browInnerUp", 0.4),
            ("eyeWideLeft", 0.2),
            ("eyeWideRight", 0.2),
            ("jawOpen", 0.2),
        ],
    ),
    (
        "sad",
        &[
            ("mouthFrownLeft", 0.35),
            ("mouthFrownRight", 0.35),
            ("browDownLeft", 0.15),
            ("browDownRight", 0.15),
        ],
    ),
    (
        "angry",
        &[
            ("browDownLeft", 0.4),
            ("browDownRight", 0.4),
            ("noseSneerLeft", 0.1),
            ("noseSneerRight", 0.1),
        ],
    ),
];

/// Default scoring policy: fixed weighted sums plus a derived neutral
/// score that fades as any expression strengthens.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedEmotionScorer;

impl WeightedEmotionScorer {
    pub fn new() -> Self {
        Self
    }
}

impl EmotionScoring for WeightedEmotionScorer {
    fn score(&self, shapes: &BlendShapes) -> Vec<EmotionScore> {
        let mut scores: Vec<EmotionScore> = EMOTION_WEIGHTS
            .iter()
            .map(|(label, weights)| {
                let weighted: f32 = weights
                    .iter()
                    .map(|(shape, weight)| shapes.score(shape) * weight)
                    .sum();
                EmotionScore::new(*label, weighted.clamp(0.0, 1.0))
            })
            .collect();

        let strongest = scores.iter().map(|e| e.score).fold(0.0_f32, f32::max);
        scores.push(EmotionScore::new("neutral", (1.0 - strongest).clamp(0.0, 1.0)));
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores_for(shapes: &BlendShapes) -> Vec<EmotionScore> {
        WeightedEmotionScorer::new().score(shapes)
    }

    fn score_of(scores: &[EmotionScore], label: &str) -> f32 {
        scores.iter().find(|e| e.label == label).unwrap().score
    }

    #[test]
    fn empty_shapes_read_as_neutral() {
        let scores = scores_for(&BlendShapes::new());
        assert_eq!(score_of(&scores, "neutral"), 1.0);
        assert_eq!(score_of(&scores, "happy"), 0.0);
    }

    #[test]
    fn full_smile_scores_happy() {
        let shapes: BlendShapes =
            [("mouthSmileLeft", 1.0), ("mouthSmileRight", 1.0)].into_iter().collect();
        let scores = scores_for(&shapes);
        assert_eq!(score_of(&scores, "happy"), 1.0);
        assert_eq!(score_of(&scores, "neutral"), 0.0);
    }

    #[test]
    fn half_smile_scores_half_happy() {
        let shapes: BlendShapes = [("mouthSmileLeft", 1.0)].into_iter().collect();
        let scores = scores_for(&shapes);
        assert!((score_of(&scores, "happy") - 0.5).abs() < 1e-6);
    }

    #[test]
    fn all_scores_in_range_for_extreme_inputs() {
        // Every shape the policy reads pinned to maximum
        let names = [
            "mouthSmileLeft",
            "mouthSmileRight",
            "browInnerUp",
            "eyeWideLeft",
            "eyeWideRight",
            "jawOpen",
            "mouthFrownLeft",
            "mouthFrownRight",
            "browDownLeft",
            "browDownRight",
            "noseSneerLeft",
            "noseSneerRight",
        ];
        let shapes: BlendShapes = names.iter().map(|n| (*n, 1.0)).collect();
        for emotion in scores_for(&shapes) {
            assert!(
                (0.0..=1.0).contains(&emotion.score),
                "{} out of range: {}",
                emotion.label,
                emotion.score
            );
        }
    }

    #[test]
    fn neutral_fades_with_strongest_expression() {
        let shapes: BlendShapes = [("browDownLeft", 0.5), ("browDownRight", 0.5)]
            .into_iter()
            .collect();
        let scores = scores_for(&shapes);
        let angry = score_of(&scores, "angry");
        assert!((score_of(&scores, "neutral") - (1.0 - angry)).abs() < 1e-6);
    }

    #[test]
    fn policy_always_reports_the_same_labels() {
        let labels: Vec<String> = scores_for(&BlendShapes::new())
            .into_iter()
            .map(|e| e.label)
            .collect();
        assert_eq!(labels, vec!["happy", "surprised", "sad", "angry", "neutral"]);
    }
}
