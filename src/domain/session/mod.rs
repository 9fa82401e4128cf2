//! Interview session state machine

use std::fmt;
use thiserror::Error;

use crate::domain::analysis::AnalysisResult;
use crate::domain::recording::{AudioFragment, FragmentBuffer};

/// Session lifecycle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Recording,
    Paused,
    Processing,
    Complete,
}

impl SessionPhase {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Paused => "paused",
            Self::Processing => "processing",
            Self::Complete => "complete",
        }
    }

    /// Whether the capture device is held in this phase
    pub const fn holds_device(&self) -> bool {
        matches!(self, Self::Recording | Self::Paused)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid phase transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_phase} state")]
pub struct InvalidStateTransition {
    pub current_phase: SessionPhase,
    pub action: String,
}

/// Outcome slot for the summarization call.
///
/// `Pending` until the call resolves; `Unavailable` when it fails, which is
/// a fully recovered state (the transcript stays visible either way).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnalysisSlot {
    #[default]
    Pending,
    Ready(AnalysisResult),
    Unavailable,
}

impl AnalysisSlot {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn as_ready(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Ready(result) => Some(result),
            _ => None,
        }
    }
}

/// Interview session entity.
/// Manages phase transitions for one practice attempt and owns all data
/// produced by it: the question, the fragment buffer, the transcript, and
/// the analysis slot.
///
/// State machine:
///   IDLE -> RECORDING (begin)
///   RECORDING <-> PAUSED (pause / resume, idempotent)
///   RECORDING | PAUSED -> PROCESSING (stop)
///   PROCESSING -> COMPLETE (complete, transcript set)
///   PROCESSING -> IDLE (fail_processing, buffer discarded)
///   COMPLETE -> RECORDING (begin, supersedes the finished session)
///   any -> IDLE (rerecord, always succeeds)
#[derive(Debug, Default)]
pub struct InterviewSession {
    phase: SessionPhase,
    question: Option<String>,
    fragments: FragmentBuffer,
    transcript: Option<String>,
    analysis: AnalysisSlot,
}

impl InterviewSession {
    /// Create a new session in idle phase
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current phase
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Get the question this session answers
    pub fn question(&self) -> Option<&str> {
        self.question.as_deref()
    }

    /// Get the transcript, if transcription has completed
    pub fn transcript(&self) -> Option<&str> {
        self.transcript.as_deref()
    }

    /// Get the analysis slot
    pub fn analysis(&self) -> &AnalysisSlot {
        &self.analysis
    }

    /// Get the fragment buffer
    pub fn fragments(&self) -> &FragmentBuffer {
        &self.fragments
    }

    /// Check if currently idle
    pub fn is_idle(&self) -> bool {
        self.phase == SessionPhase::Idle
    }

    /// Whether a new recording may begin from the current phase
    pub fn can_begin(&self) -> bool {
        matches!(self.phase, SessionPhase::Idle | SessionPhase::Complete)
    }

    /// Transition to RECORDING, superseding any finished session.
    /// All prior fragments, transcript, and analysis are cleared before
    /// capture starts: a new session never carries partial data over.
    pub fn begin(&mut self, question: String) -> Result<(), InvalidStateTransition> {
        if !self.can_begin() {
            return Err(InvalidStateTransition {
                current_phase: self.phase,
                action: "start recording".to_string(),
            });
        }
        self.fragments.clear();
        self.transcript = None;
        self.analysis = AnalysisSlot::Pending;
        self.question = Some(question);
        self.phase = SessionPhase::Recording;
        Ok(())
    }

    /// Transition RECORDING -> PAUSED.
    ///
    /// Returns `Ok(false)` when already paused, so rapid toggling is
    /// harmless and callers can skip the device call.
    pub fn pause(&mut self) -> Result<bool, InvalidStateTransition> {
        match self.phase {
            SessionPhase::Recording => {
                self.phase = SessionPhase::Paused;
                Ok(true)
            }
            SessionPhase::Paused => Ok(false),
            _ => Err(InvalidStateTransition {
                current_phase: self.phase,
                action: "pause".to_string(),
            }),
        }
    }

    /// Transition PAUSED -> RECORDING. Idempotent like [`pause`](Self::pause).
    pub fn resume(&mut self) -> Result<bool, InvalidStateTransition> {
        match self.phase {
            SessionPhase::Paused => {
                self.phase = SessionPhase::Recording;
                Ok(true)
            }
            SessionPhase::Recording => Ok(false),
            _ => Err(InvalidStateTransition {
                current_phase: self.phase,
                action: "resume".to_string(),
            }),
        }
    }

    /// Transition RECORDING | PAUSED -> PROCESSING
    pub fn stop(&mut self) -> Result<(), InvalidStateTransition> {
        if !self.phase.holds_device() {
            return Err(InvalidStateTransition {
                current_phase: self.phase,
                action: "stop recording".to_string(),
            });
        }
        self.phase = SessionPhase::Processing;
        Ok(())
    }

    /// Append a fragment delivered by the capture device.
    ///
    /// Fragments are accepted while the device is held and during the
    /// PROCESSING tail-flush; anything arriving after a reset is dropped.
    pub fn push_fragment(&mut self, fragment: AudioFragment) {
        match self.phase {
            SessionPhase::Recording | SessionPhase::Paused | SessionPhase::Processing => {
                self.fragments.push(fragment);
            }
            SessionPhase::Idle | SessionPhase::Complete => {}
        }
    }

    /// Transition PROCESSING -> COMPLETE with the transcript set.
    /// The analysis slot stays `Pending` until the summarization call
    /// resolves; it never gates this transition.
    pub fn complete(&mut self, transcript: String) -> Result<(), InvalidStateTransition> {
        if self.phase != SessionPhase::Processing {
            return Err(InvalidStateTransition {
                current_phase: self.phase,
                action: "complete".to_string(),
            });
        }
        self.transcript = Some(transcript);
        self.phase = SessionPhase::Complete;
        Ok(())
    }

    /// Transition PROCESSING -> IDLE after a failed transcription call.
    /// The buffer is discarded: retry means a wholly new recording.
    pub fn fail_processing(&mut self) -> Result<(), InvalidStateTransition> {
        if self.phase != SessionPhase::Processing {
            return Err(InvalidStateTransition {
                current_phase: self.phase,
                action: "fail processing".to_string(),
            });
        }
        self.fragments.clear();
        self.transcript = None;
        self.phase = SessionPhase::Idle;
        Ok(())
    }

    /// Record the summarization outcome. Updates the slot in place
    /// without changing the lifecycle phase.
    pub fn set_analysis(&mut self, result: AnalysisResult) {
        self.analysis = AnalysisSlot::Ready(result);
    }

    /// Mark the analysis as unavailable after a failed summarization call.
    pub fn mark_analysis_unavailable(&mut self) {
        self.analysis = AnalysisSlot::Unavailable;
    }

    /// Reset to IDLE from any phase, discarding everything. Never fails.
    pub fn rerecord(&mut self) {
        self.phase = SessionPhase::Idle;
        self.question = None;
        self.fragments.clear();
        self.transcript = None;
        self.analysis = AnalysisSlot::Pending;
    }
}
