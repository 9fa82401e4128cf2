//! Cross-platform capture device using cpal
//!
//! The microphone stream runs on its own thread (cpal streams are not
//! Send); a chunking loop on that thread drains captured samples into
//! fragments at a fixed interval and pushes them into the session's
//! fragment channel. Stop flushes the buffered tail before closing the
//! channel, so no trailing audio is lost.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration as TokioDuration};
use tracing::{debug, warn};

use crate::application::ports::{CaptureDevice, CaptureError, CaptureRequest};
use crate::domain::config::DEFAULT_FRAGMENT_MILLIS;
use crate::domain::recording::{AudioData, AudioFragment, AudioMimeType, VideoFrame};

use super::encode_wav_mono16;

/// How long `stop` waits for the capture thread to flush and exit
const STOP_TIMEOUT_MS: u64 = 2_000;

/// Shared state between the adapter and its capture thread
struct CaptureShared {
    capturing: AtomicBool,
    paused: AtomicBool,
    stopping: AtomicBool,
    sample_rate: AtomicU32,
    start_error: StdMutex<Option<CaptureError>>,
    /// Mono samples captured since the last fragment was emitted
    buffer: StdMutex<Vec<i16>>,
    sink: StdMutex<Option<mpsc::UnboundedSender<AudioFragment>>>,
}

impl CaptureShared {
    fn new() -> Self {
        Self {
            capturing: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            stopping: AtomicBool::new(false),
            sample_rate: AtomicU32::new(0),
            start_error: StdMutex::new(None),
            buffer: StdMutex::new(Vec::new()),
            sink: StdMutex::new(None),
        }
    }

    fn fail_start(&self, error: CaptureError) {
        *self.start_error.lock().unwrap() = Some(error);
        self.sink.lock().unwrap().take();
        self.capturing.store(false, Ordering::SeqCst);
    }

    /// Drain the sample buffer into one fragment, if anything is buffered
    fn emit_fragment(&self) {
        let samples = {
            let mut buffer = self.buffer.lock().unwrap();
            std::mem::take(&mut *buffer)
        };
        if samples.is_empty() {
            return;
        }
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        if let Some(sink) = self.sink.lock().unwrap().as_ref() {
            let _ = sink.send(AudioFragment::new(bytes));
        }
    }
}

/// Microphone capture adapter.
///
/// Fragments are raw little-endian mono 16-bit PCM at the device sample
/// rate; `assemble` wraps their concatenation in a WAV container. There
/// is no camera backend attached, so `latest_frame` reports no frame and
/// a video-enabled request only logs that fact.
pub struct CpalCaptureDevice {
    fragment_millis: u64,
    shared: Arc<CaptureShared>,
}

impl CpalCaptureDevice {
    /// Create a device with the default fragment interval
    pub fn new() -> Self {
        Self::with_fragment_millis(DEFAULT_FRAGMENT_MILLIS)
    }

    /// Create a device emitting fragments at the given interval
    pub fn with_fragment_millis(fragment_millis: u64) -> Self {
        Self {
            fragment_millis: fragment_millis.max(10),
            shared: Arc::new(CaptureShared::new()),
        }
    }

    /// Mix interleaved multi-channel samples down to mono
    fn mix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels <= 1 {
            return samples.to_vec();
        }
        samples
            .chunks(channels as usize)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }

    fn run_capture_thread(shared: Arc<CaptureShared>, fragment_millis: u64) {
        let host = cpal::default_host();
        let device = match host.default_input_device() {
            Some(device) => device,
            None => {
                shared.fail_start(CaptureError::DeviceUnavailable(
                    "no input device found".into(),
                ));
                return;
            }
        };

        let supported = match device.default_input_config() {
            Ok(config) => config,
            Err(e) => {
                shared.fail_start(CaptureError::DeviceUnavailable(e.to_string()));
                return;
            }
        };
        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();
        let channels = config.channels;
        shared
            .sample_rate
            .store(config.sample_rate.0, Ordering::SeqCst);

        let capture = Arc::clone(&shared);
        let on_error = |e| warn!("audio stream error: {e}");

        let stream = match sample_format {
            SampleFormat::I16 => device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if capture.capturing.load(Ordering::SeqCst)
                        && !capture.paused.load(Ordering::SeqCst)
                    {
                        let mono = CpalCaptureDevice::mix_to_mono(data, channels);
                        if let Ok(mut buffer) = capture.buffer.lock() {
                            buffer.extend_from_slice(&mono);
                        }
                    }
                },
                on_error,
                None,
            ),
            SampleFormat::F32 => device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if capture.capturing.load(Ordering::SeqCst)
                        && !capture.paused.load(Ordering::SeqCst)
                    {
                        let as_i16: Vec<i16> = data.iter().map(|&s| (s * 32767.0) as i16).collect();
                        let mono = CpalCaptureDevice::mix_to_mono(&as_i16, channels);
                        if let Ok(mut buffer) = capture.buffer.lock() {
                            buffer.extend_from_slice(&mono);
                        }
                    }
                },
                on_error,
                None,
            ),
            other => {
                shared.fail_start(CaptureError::StartFailed(format!(
                    "unsupported sample format: {other:?}"
                )));
                return;
            }
        };

        let stream = match stream {
            Ok(stream) => stream,
            Err(e) => {
                shared.fail_start(CaptureError::DeviceUnavailable(e.to_string()));
                return;
            }
        };
        if let Err(e) = stream.play() {
            shared.fail_start(CaptureError::StartFailed(e.to_string()));
            return;
        }

        // Chunking loop: one fragment per interval until told to stop
        while shared.capturing.load(Ordering::SeqCst) && !shared.stopping.load(Ordering::SeqCst) {
            std::thread::sleep(StdDuration::from_millis(fragment_millis));
            shared.emit_fragment();
        }

        // Tail flush: whatever the callback buffered since the last tick
        // goes out before the sink closes
        drop(stream);
        shared.emit_fragment();
        shared.sink.lock().unwrap().take();
        shared.stopping.store(false, Ordering::SeqCst);
        shared.capturing.store(false, Ordering::SeqCst);
    }
}

impl Default for CpalCaptureDevice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptureDevice for CpalCaptureDevice {
    async fn start(
        &self,
        request: CaptureRequest,
        sink: mpsc::UnboundedSender<AudioFragment>,
    ) -> Result<(), CaptureError> {
        if !request.audio {
            return Err(CaptureError::StartFailed(
                "audio capture is required".into(),
            ));
        }
        if self.shared.capturing.swap(true, Ordering::SeqCst) {
            return Err(CaptureError::AlreadyActive);
        }
        if request.video {
            debug!("no camera backend attached; capturing audio only");
        }

        self.shared.paused.store(false, Ordering::SeqCst);
        self.shared.stopping.store(false, Ordering::SeqCst);
        self.shared.start_error.lock().unwrap().take();
        self.shared.buffer.lock().unwrap().clear();
        *self.shared.sink.lock().unwrap() = Some(sink);

        let shared = Arc::clone(&self.shared);
        let fragment_millis = self.fragment_millis;
        std::thread::spawn(move || Self::run_capture_thread(shared, fragment_millis));

        // Give the thread a moment to open the device
        sleep(TokioDuration::from_millis(60)).await;

        if let Some(error) = self.shared.start_error.lock().unwrap().take() {
            return Err(error);
        }
        if !self.shared.capturing.load(Ordering::SeqCst) {
            return Err(CaptureError::StartFailed(
                "capture thread exited early".into(),
            ));
        }
        Ok(())
    }

    async fn pause(&self) -> Result<(), CaptureError> {
        if !self.shared.capturing.load(Ordering::SeqCst) {
            return Err(CaptureError::NotCapturing);
        }
        self.shared.paused.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn resume(&self) -> Result<(), CaptureError> {
        if !self.shared.capturing.load(Ordering::SeqCst) {
            return Err(CaptureError::NotCapturing);
        }
        self.shared.paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<(), CaptureError> {
        if !self.shared.capturing.load(Ordering::SeqCst) {
            return Err(CaptureError::NotCapturing);
        }
        self.shared.stopping.store(true, Ordering::SeqCst);

        // Wait for the thread to flush the tail fragment and close the sink
        let mut waited = 0;
        while self.shared.capturing.load(Ordering::SeqCst) {
            if waited >= STOP_TIMEOUT_MS {
                return Err(CaptureError::CaptureFailed(
                    "capture thread did not stop".into(),
                ));
            }
            sleep(TokioDuration::from_millis(10)).await;
            waited += 10;
        }
        Ok(())
    }

    async fn release(&self) {
        self.shared.stopping.store(true, Ordering::SeqCst);
        self.shared.paused.store(false, Ordering::SeqCst);

        // Let a running thread wind down, then force the flags regardless
        let mut waited = 0;
        while self.shared.capturing.load(Ordering::SeqCst) && waited < 500 {
            sleep(TokioDuration::from_millis(10)).await;
            waited += 10;
        }
        self.shared.capturing.store(false, Ordering::SeqCst);
        self.shared.stopping.store(false, Ordering::SeqCst);
        self.shared.sink.lock().unwrap().take();
        self.shared.buffer.lock().unwrap().clear();
    }

    fn is_capturing(&self) -> bool {
        self.shared.capturing.load(Ordering::SeqCst)
    }

    fn assemble(&self, bytes: &[u8]) -> Result<AudioData, CaptureError> {
        let sample_rate = self.shared.sample_rate.load(Ordering::SeqCst);
        let wav = encode_wav_mono16(bytes, sample_rate)?;
        Ok(AudioData::new(wav, AudioMimeType::Wav))
    }

    fn latest_frame(&self) -> Option<VideoFrame> {
        None
    }
}
