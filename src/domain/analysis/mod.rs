//! Analysis result value object

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Coaching analysis returned by the remote summarizer.
///
/// `main_points` arrive relevance-ranked and `feedback` ordered; both
/// orders are preserved as-is and never re-sorted locally. `metrics` is an
/// opaque pass-through map with unique keys; no semantic validation is
/// performed on its values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub main_points: Vec<String>,
    pub feedback: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<HashMap<String, serde_json::Value>>,
}

impl AnalysisResult {
    /// Whether the result carries any content at all
    pub fn is_empty(&self) -> bool {
        self.main_points.is_empty() && self.feedback.is_empty() && self.metrics.is_none()
    }
}
