//! Main app runner for the interactive practice session

use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use crate::application::ports::{CaptureRequest, ConfigStore, FaceLandmarkDetector, QuestionSource};
use crate::application::{
    spawn_overlay, OverlayHandle, SessionError, SessionService, DEFAULT_OVERLAY_INTERVAL_MS,
};
use crate::domain::config::AppConfig;
use crate::domain::face::{FaceStatus, WeightedEmotionScorer};
use crate::domain::question::QuestionSelector;
use crate::domain::session::{AnalysisSlot, SessionPhase};
use crate::infrastructure::{CoachApiClient, CpalCaptureDevice, ReplayDetector, XdgConfigStore};

use super::args::{QuestionChoice, SessionOptions};
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;

/// How long the analysis panel waits for the summarizer before giving up
const ANALYSIS_WAIT: Duration = Duration::from_secs(30);

/// How the recording control loop ended
enum ControlOutcome {
    Stop,
    Discard,
    Interrupted,
}

/// Run an interactive practice session
pub async fn run_session(options: SessionOptions) -> ExitCode {
    let mut presenter = Presenter::new();
    let client = Arc::new(CoachApiClient::new(&options.server_url));

    let question = match resolve_question(client.as_ref(), &options.question, &presenter).await {
        Ok(question) => question,
        Err(message) => {
            presenter.error(&message);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    presenter.question(&question);

    let request = if options.overlay {
        CaptureRequest::audio_and_video()
    } else {
        CaptureRequest::audio_only()
    };
    let device = Arc::new(CpalCaptureDevice::with_fragment_millis(
        options.fragment_millis,
    ));
    let service = SessionService::new(
        Arc::clone(&device),
        Arc::clone(&client),
        Arc::clone(&client),
        request,
    );

    if let Err(e) = service.start(question).await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    let mut overlay = if options.overlay {
        start_overlay(Arc::clone(&device), &presenter).await
    } else {
        None
    };

    presenter.controls_hint();
    presenter.start_spinner("Recording...");

    let outcome = control_loop(&service, &mut presenter, overlay.as_mut().map(|o| &mut o.1)).await;

    // The overlay must be gone on every path out of the recording states
    if let Some((mut handle, _)) = overlay.take() {
        handle.stop().await;
    }

    match outcome {
        ControlOutcome::Discard => {
            presenter.stop_spinner();
            service.rerecord().await;
            presenter.info("Recording discarded.");
            ExitCode::from(EXIT_SUCCESS)
        }
        ControlOutcome::Interrupted => {
            presenter.stop_spinner();
            service.rerecord().await;
            presenter.warn("Interrupted; recording discarded.");
            ExitCode::from(EXIT_ERROR)
        }
        ControlOutcome::Stop => {
            presenter.update_spinner("Transcribing...");
            match service.stop_and_transcribe().await {
                Ok(transcript) => {
                    presenter.spinner_success("Transcription complete");
                    presenter.transcript_panel(&transcript);
                    show_analysis(&service, &mut presenter).await;
                    ExitCode::from(EXIT_SUCCESS)
                }
                Err(SessionError::Transcription(_)) => {
                    presenter.spinner_fail("Transcription failed");
                    presenter
                        .error("The transcription service is busy. Record a new answer to retry.");
                    ExitCode::from(EXIT_ERROR)
                }
                Err(e) => {
                    presenter.spinner_fail("Recording failed");
                    presenter.error(&e.to_string());
                    ExitCode::from(EXIT_ERROR)
                }
            }
        }
    }
}

/// List the available questions
pub async fn run_questions(server_url: &str) -> ExitCode {
    let presenter = Presenter::new();
    let client = CoachApiClient::new(server_url);

    let selector = match client.fetch().await {
        Ok(questions) => QuestionSelector::new(questions),
        Err(e) => {
            presenter.warn(&format!("{} (using the built-in question list)", e));
            QuestionSelector::built_in()
        }
    };

    for (i, question) in selector.all().iter().enumerate() {
        presenter.output(&format!("{:>2}. {}", i, question));
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Load and merge configuration from defaults, file, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Env-backed flags arrive through clap, so: defaults < file < cli
    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// Pick the session's question: explicit text as-is, otherwise the fetched
/// list (falling back to the built-in one) by index or uniform draw.
async fn resolve_question(
    source: &dyn QuestionSource,
    choice: &QuestionChoice,
    presenter: &Presenter,
) -> Result<String, String> {
    if let QuestionChoice::Explicit(text) = choice {
        return Ok(text.clone());
    }

    let mut selector = match source.fetch().await {
        Ok(questions) => QuestionSelector::new(questions),
        Err(e) => {
            presenter.warn(&format!("{} (using the built-in question list)", e));
            QuestionSelector::built_in()
        }
    };

    match choice {
        QuestionChoice::Index(index) => selector
            .select(*index)
            .map(String::from)
            .map_err(|e| e.to_string()),
        _ => Ok(selector.randomize().to_string()),
    }
}

/// Bring up the face overlay; a detector failure downgrades to no overlay
async fn start_overlay(
    device: Arc<CpalCaptureDevice>,
    presenter: &Presenter,
) -> Option<(OverlayHandle, watch::Receiver<Option<FaceStatus>>)> {
    let detector = Arc::new(ReplayDetector::demo());
    if let Err(e) = detector.init().await {
        presenter.warn(&format!("Face overlay unavailable: {}", e));
        return None;
    }
    Some(spawn_overlay(
        device,
        detector,
        Arc::new(WeightedEmotionScorer::new()),
        DEFAULT_OVERLAY_INTERVAL_MS,
    ))
}

/// Line-oriented recording controls: p pause, r resume, s/empty stop,
/// x discard. Ctrl+C tears the session down.
async fn control_loop(
    service: &SessionService<CpalCaptureDevice, CoachApiClient, CoachApiClient>,
    presenter: &mut Presenter,
    mut face_rx: Option<&mut watch::Receiver<Option<FaceStatus>>>,
) -> ControlOutcome {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let started = Instant::now();
    let mut ticker = tokio::time::interval(Duration::from_millis(250));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.unwrap_or(None).as_deref().map(str::trim) {
                    Some("p") => {
                        if let Err(e) = service.pause().await {
                            presenter.warn(&e.to_string());
                        }
                    }
                    Some("r") => {
                        if let Err(e) = service.resume().await {
                            presenter.warn(&e.to_string());
                        }
                    }
                    Some("x") => return ControlOutcome::Discard,
                    Some("") | Some("s") | None => return ControlOutcome::Stop,
                    Some(other) => {
                        presenter.warn(&format!("Unknown command '{}' (p/r/s/x)", other));
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => return ControlOutcome::Interrupted,
            _ = ticker.tick() => {
                let paused = service.phase().await == SessionPhase::Paused;
                let face = face_rx.as_mut().and_then(|rx| rx.borrow_and_update().clone());
                presenter.update_spinner(&Presenter::format_recording_line(
                    started.elapsed().as_secs(),
                    paused,
                    face.as_ref(),
                ));
            }
        }
    }
}

/// Wait for the analysis slot to resolve and render it. The transcript is
/// already on screen; a summarization failure only downgrades this panel.
async fn show_analysis(
    service: &SessionService<CpalCaptureDevice, CoachApiClient, CoachApiClient>,
    presenter: &mut Presenter,
) {
    presenter.start_spinner("Analyzing...");
    let deadline = Instant::now() + ANALYSIS_WAIT;

    let slot = loop {
        let slot = service.analysis().await;
        if !slot.is_pending() || Instant::now() >= deadline {
            break slot;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    };

    match slot {
        AnalysisSlot::Ready(result) => {
            presenter.spinner_success("Analysis ready");
            presenter.analysis_panel(&result);
        }
        AnalysisSlot::Unavailable | AnalysisSlot::Pending => {
            presenter.spinner_fail("No analysis available");
            presenter.no_analysis_panel();
        }
    }
}

/// Build CLI-sourced config overrides, reading nothing from the process
/// environment beyond what clap already resolved
pub fn cli_overrides(
    server_url: Option<String>,
    fragment_millis: Option<u64>,
    overlay: bool,
) -> AppConfig {
    AppConfig {
        server_url,
        fragment_millis,
        overlay: if overlay { Some(true) } else { None },
    }
}

/// Resolve the server URL for subcommands that only need that much.
/// The env-backed flag already arrived through clap.
pub async fn resolve_server_url(cli_server_url: Option<String>) -> String {
    let config = load_merged_config(AppConfig {
        server_url: cli_server_url,
        ..Default::default()
    })
    .await;
    config.server_url_or_default().to_string()
}
