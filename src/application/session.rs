//! Interview session use case
//!
//! Drives the session lifecycle over the capture, transcription, and
//! summarization ports. The capture device pushes fragments into an
//! unbounded channel; a pump task drains them into the session's buffer
//! so the stop path can await the device's tail-fragment flush before
//! assembling the upload.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::session::{
    AnalysisSlot, InterviewSession, InvalidStateTransition, SessionPhase,
};

use super::ports::{
    CaptureDevice, CaptureError, CaptureRequest, Summarizer, Transcriber, TranscriptionError,
};

/// Errors from the session use case
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("Invalid state transition: {0}")]
    InvalidState(#[from] InvalidStateTransition),

    #[error("Nothing was recorded")]
    EmptyRecording,
}

/// Session lifecycle service.
///
/// Owns the single session entity and the exclusive capture device
/// handle. The summarization call runs on a spawned task so the
/// transcript is available to callers before the analysis resolves.
pub struct SessionService<D, T, S>
where
    D: CaptureDevice + 'static,
    T: Transcriber + 'static,
    S: Summarizer + 'static,
{
    device: Arc<D>,
    transcriber: Arc<T>,
    summarizer: Arc<S>,
    request: CaptureRequest,
    session: Arc<Mutex<InterviewSession>>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl<D, T, S> SessionService<D, T, S>
where
    D: CaptureDevice + 'static,
    T: Transcriber + 'static,
    S: Summarizer + 'static,
{
    /// Create a new session service
    pub fn new(
        device: Arc<D>,
        transcriber: Arc<T>,
        summarizer: Arc<S>,
        request: CaptureRequest,
    ) -> Self {
        Self {
            device,
            transcriber,
            summarizer,
            request,
            session: Arc::new(Mutex::new(InterviewSession::new())),
            pump: Mutex::new(None),
        }
    }

    /// Get the current session phase
    pub async fn phase(&self) -> SessionPhase {
        self.session.lock().await.phase()
    }

    /// Get the question the current session answers
    pub async fn question(&self) -> Option<String> {
        self.session.lock().await.question().map(String::from)
    }

    /// Get the transcript, once transcription has completed
    pub async fn transcript(&self) -> Option<String> {
        self.session.lock().await.transcript().map(String::from)
    }

    /// Get the current analysis slot
    pub async fn analysis(&self) -> AnalysisSlot {
        self.session.lock().await.analysis().clone()
    }

    /// Start a new recording for the given question.
    ///
    /// The device is acquired before the session transitions, so a denied
    /// permission or missing hardware leaves the session idle.
    pub async fn start(&self, question: String) -> Result<(), SessionError> {
        {
            let session = self.session.lock().await;
            if !session.can_begin() {
                return Err(InvalidStateTransition {
                    current_phase: session.phase(),
                    action: "start recording".to_string(),
                }
                .into());
            }
        }

        let (sink, mut fragments) = mpsc::unbounded_channel();
        self.device.start(self.request, sink).await?;

        {
            let mut session = self.session.lock().await;
            if let Err(e) = session.begin(question) {
                drop(session);
                self.device.release().await;
                return Err(e.into());
            }
        }

        let session = Arc::clone(&self.session);
        let pump = tokio::spawn(async move {
            while let Some(fragment) = fragments.recv().await {
                session.lock().await.push_fragment(fragment);
            }
        });
        *self.pump.lock().await = Some(pump);

        debug!("recording started");
        Ok(())
    }

    /// Pause capture without releasing the device. Idempotent: repeated
    /// calls reach the device only on an actual phase change.
    pub async fn pause(&self) -> Result<(), SessionError> {
        let changed = self.session.lock().await.pause()?;
        if changed {
            self.device.pause().await?;
        }
        Ok(())
    }

    /// Resume capture after a pause. Idempotent like [`pause`](Self::pause).
    pub async fn resume(&self) -> Result<(), SessionError> {
        let changed = self.session.lock().await.resume()?;
        if changed {
            self.device.resume().await?;
        }
        Ok(())
    }

    /// Stop the recording, transcribe it, and return the transcript.
    ///
    /// The device's tail-fragment flush is awaited (its `stop` returns
    /// only after the final fragment is in the channel, and the pump is
    /// then drained to completion) before the fragments are assembled.
    /// On transcription failure the session returns to idle with its
    /// buffer discarded; retry means a wholly new recording.
    pub async fn stop_and_transcribe(&self) -> Result<String, SessionError> {
        self.session.lock().await.stop()?;

        if let Err(e) = self.device.stop().await {
            self.teardown_capture().await;
            self.session.lock().await.fail_processing()?;
            return Err(e.into());
        }

        // The device has closed the sink; draining the pump to completion
        // guarantees the tail fragment is in the buffer.
        if let Some(pump) = self.pump.lock().await.take() {
            let _ = pump.await;
        }
        self.device.release().await;

        let bytes = self.session.lock().await.fragments().concatenated();
        if bytes.is_empty() {
            self.session.lock().await.fail_processing()?;
            return Err(SessionError::EmptyRecording);
        }

        let audio = match self.device.assemble(&bytes) {
            Ok(audio) => audio,
            Err(e) => {
                self.session.lock().await.fail_processing()?;
                return Err(e.into());
            }
        };
        debug!("assembled recording: {}", audio.human_readable_size());

        match self.transcriber.transcribe(&audio).await {
            Ok(transcript) => {
                self.session.lock().await.complete(transcript.clone())?;
                self.spawn_summarization(transcript.clone());
                Ok(transcript)
            }
            Err(e) => {
                warn!("transcription failed: {e}");
                self.session.lock().await.fail_processing()?;
                Err(e.into())
            }
        }
    }

    /// Discard the session from any phase and return to idle.
    /// Stops capture, releases the device, and clears all session data.
    /// Always succeeds.
    pub async fn rerecord(&self) {
        self.teardown_capture().await;
        self.session.lock().await.rerecord();
        debug!("session discarded");
    }

    /// Abort the fragment pump and release the device. Safe on every
    /// path, including when capture never started.
    async fn teardown_capture(&self) {
        if let Some(pump) = self.pump.lock().await.take() {
            pump.abort();
        }
        self.device.release().await;
    }

    /// Issue the summarization call without blocking the caller. The
    /// result lands in the analysis slot; a failure marks the slot
    /// unavailable and is never escalated.
    fn spawn_summarization(&self, transcript: String) {
        let summarizer = Arc::clone(&self.summarizer);
        let session = Arc::clone(&self.session);
        tokio::spawn(async move {
            let outcome = summarizer.summarize(&transcript).await;
            let mut session = session.lock().await;
            // A rerecord may have superseded this session in the meantime
            if session.phase() != SessionPhase::Complete {
                return;
            }
            match outcome {
                Ok(result) => session.set_analysis(result),
                Err(e) => {
                    warn!("summarization failed: {e}");
                    session.mark_analysis_unavailable();
                }
            }
        });
    }
}
