//! CLI presenter for output formatting

use std::io::{self, Write};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::analysis::AnalysisResult;
use crate::domain::face::FaceStatus;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Output text to stdout without newline
    pub fn output_inline(&self, text: &str) {
        print!("{}", text);
        let _ = io::stdout().flush();
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Show the question being practiced
    pub fn question(&self, question: &str) {
        eprintln!();
        eprintln!("{} {}", "Question:".bold(), question.cyan());
        eprintln!();
    }

    /// Explain the recording controls
    pub fn controls_hint(&self) {
        eprintln!(
            "{}",
            "Controls: [Enter]/s stop · p pause · r resume · x discard".dimmed()
        );
    }

    /// One line of live recording status for the spinner
    pub fn format_recording_line(
        elapsed_secs: u64,
        paused: bool,
        face: Option<&FaceStatus>,
    ) -> String {
        let state = if paused { "Paused" } else { "Recording" };
        let mut line = format!("{}... {}s", state, elapsed_secs);
        match face {
            Some(status) => {
                line.push_str(&format!(
                    " · face: {} {:.0}% · eyes L {:.2} R {:.2}",
                    status.emotion,
                    status.confidence * 100.0,
                    status.left_eye_openness,
                    status.right_eye_openness
                ));
            }
            None => line.push_str(" · face: —"),
        }
        line
    }

    /// Print the transcript panel
    pub fn transcript_panel(&self, transcript: &str) {
        println!();
        println!("{}", "Transcript".bold().underline());
        println!("{}", transcript);
    }

    /// Print the analysis panel: ranked main points, feedback, metrics
    pub fn analysis_panel(&self, result: &AnalysisResult) {
        if !result.main_points.is_empty() {
            println!();
            println!("{}", "Main points".bold().underline());
            for (i, point) in result.main_points.iter().enumerate() {
                println!("{:>3}. {}", i + 1, point);
            }
        }

        if !result.feedback.is_empty() {
            println!();
            println!("{}", "Feedback".bold().underline());
            for tip in &result.feedback {
                println!("  {} {}", "•".cyan(), tip);
            }
        }

        if let Some(metrics) = &result.metrics {
            println!();
            println!("{}", "Metrics".bold().underline());
            let mut keys: Vec<_> = metrics.keys().collect();
            keys.sort();
            for key in keys {
                self.key_value(key, &metrics[key].to_string());
            }
        }
    }

    /// Print the placeholder shown when no analysis is available
    pub fn no_analysis_panel(&self) {
        println!();
        println!("{}", "Analysis".bold().underline());
        println!("{}", "No analysis available yet.".dimmed());
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::face::EmotionScore;

    fn sample_status() -> FaceStatus {
        FaceStatus {
            emotion: "happy".to_string(),
            confidence: 0.87,
            top: vec![EmotionScore::new("happy", 0.87)],
            left_eye_openness: 0.91,
            right_eye_openness: 0.88,
        }
    }

    #[test]
    fn recording_line_without_face() {
        let line = Presenter::format_recording_line(12, false, None);
        assert!(line.contains("Recording... 12s"));
        assert!(line.contains("face: —"));
    }

    #[test]
    fn recording_line_with_face() {
        let line = Presenter::format_recording_line(3, false, Some(&sample_status()));
        assert!(line.contains("Recording... 3s"));
        assert!(line.contains("happy 87%"));
        assert!(line.contains("L 0.91"));
        assert!(line.contains("R 0.88"));
    }

    #[test]
    fn recording_line_while_paused() {
        let line = Presenter::format_recording_line(40, true, None);
        assert!(line.starts_with("Paused... 40s"));
    }
}
