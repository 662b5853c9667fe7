use super::config::SessionConfig;
use super::stats::{SessionState, SessionStats};
use crate::analysis::{AnalysisApi, AnalysisResponse};
use crate::audio::{self, AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioFrame};
use crate::history::{CallHistory, TranscriptRecord};
use crate::insights;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// A recording session controller: one microphone stream at a time, chunk
/// buffering while recording, upload on stop, history append on completion.
///
/// Every failure is absorbed locally (capture problems become status text,
/// upload problems become an error-tagged record) and the state machine
/// always returns to `Idle`.
pub struct SessionController {
    /// Session configuration
    config: SessionConfig,

    /// Client for the transcription/sentiment backend
    analysis: Arc<dyn AnalysisApi>,

    /// Shared call history; one record appended per completed cycle
    history: Arc<CallHistory>,

    /// Lifecycle state, status text and the owned capture resources
    inner: Mutex<Inner>,

    /// Audio chunks buffered by the capture task
    chunks: Arc<Mutex<Vec<AudioFrame>>>,
}

struct Inner {
    state: SessionState,
    status: String,
    started_at: Option<chrono::DateTime<Utc>>,
    backend: Option<Box<dyn AudioBackend>>,
    capture_task: Option<JoinHandle<()>>,
}

impl SessionController {
    pub fn new(
        config: SessionConfig,
        analysis: Arc<dyn AnalysisApi>,
        history: Arc<CallHistory>,
    ) -> Self {
        Self {
            config,
            analysis,
            history,
            inner: Mutex::new(Inner {
                state: SessionState::Idle,
                status: "Stopped".to_string(),
                started_at: None,
                backend: None,
                capture_task: None,
            }),
            chunks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    /// Start recording.
    ///
    /// A no-op unless the session is idle. Capability absence and permission
    /// denial leave the session idle with the failure in the status text.
    pub async fn start(&self) -> SessionStats {
        let mut inner = self.inner.lock().await;

        if inner.state != SessionState::Idle {
            warn!("Start requested while session is {:?}; ignoring", inner.state);
            return self.snapshot(&inner).await;
        }

        let backend_config = AudioBackendConfig {
            target_sample_rate: self.config.sample_rate,
            target_channels: self.config.channels,
            buffer_duration_ms: self.config.buffer_duration_ms,
        };

        let mut backend = match AudioBackendFactory::create(&self.config.source, backend_config) {
            Ok(backend) => backend,
            Err(e) => {
                warn!("Microphone not available: {:#}", e);
                inner.status = format!("Microphone not available: {}", e);
                return self.snapshot(&inner).await;
            }
        };

        let mut frame_rx = match backend.start().await {
            Ok(rx) => rx,
            Err(e) => {
                warn!("Microphone access denied: {:#}", e);
                inner.status = format!("Microphone access denied: {}", e);
                // backend dropped here; nothing was acquired that survives
                return self.snapshot(&inner).await;
            }
        };

        self.chunks.lock().await.clear();

        // Buffer chunks as they arrive; ends when the backend drops its sender
        let chunks = Arc::clone(&self.chunks);
        let capture_task = tokio::spawn(async move {
            while let Some(frame) = frame_rx.recv().await {
                chunks.lock().await.push(frame);
            }
        });

        inner.backend = Some(backend);
        inner.capture_task = Some(capture_task);
        inner.started_at = Some(Utc::now());
        inner.state = SessionState::Recording;
        inner.status = "Listening...".to_string();

        info!("Recording started: {}", self.config.session_id);

        self.snapshot(&inner).await
    }

    /// Stop recording and finalize.
    ///
    /// Valid only while recording (`None` otherwise). Stream resources are
    /// released before the upload starts; the appended record is returned.
    pub async fn stop(&self) -> Option<TranscriptRecord> {
        let (backend, capture_task) = {
            let mut inner = self.inner.lock().await;

            if inner.state != SessionState::Recording {
                warn!("Stop requested while session is {:?}; ignoring", inner.state);
                return None;
            }

            inner.state = SessionState::Processing;
            inner.status = "Processing audio...".to_string();
            (inner.backend.take(), inner.capture_task.take())
        };

        self.release(backend, capture_task).await;

        let frames = std::mem::take(&mut *self.chunks.lock().await);
        let record = self.finalize(frames).await;
        self.history.append(record.clone()).await;

        {
            let mut inner = self.inner.lock().await;
            inner.state = SessionState::Idle;
            inner.started_at = None;
            inner.status = "Stopped".to_string();
        }

        info!("Recording stopped: {}", self.config.session_id);

        Some(record)
    }

    /// Idempotent scoped-resource release: stops any active backend, drops
    /// buffered chunks, resets to idle. Invoked on teardown.
    pub async fn cleanup(&self) {
        let (backend, capture_task) = {
            let mut inner = self.inner.lock().await;
            let taken = (inner.backend.take(), inner.capture_task.take());
            inner.state = SessionState::Idle;
            inner.started_at = None;
            inner.status = "Stopped".to_string();
            taken
        };

        self.release(backend, capture_task).await;
        self.chunks.lock().await.clear();
    }

    /// Current session snapshot.
    pub async fn stats(&self) -> SessionStats {
        let inner = self.inner.lock().await;
        self.snapshot(&inner).await
    }

    async fn snapshot(&self, inner: &Inner) -> SessionStats {
        let chunks_buffered = self.chunks.lock().await.len();
        let duration_secs = inner
            .started_at
            .map(|t| Utc::now().signed_duration_since(t).num_milliseconds() as f64 / 1000.0)
            .unwrap_or(0.0);

        SessionStats {
            state: inner.state,
            status: inner.status.clone(),
            started_at: inner.started_at,
            duration_secs,
            chunks_buffered,
        }
    }

    /// Stop the backend and join the buffering task. After this returns the
    /// stream is fully released.
    async fn release(
        &self,
        mut backend: Option<Box<dyn AudioBackend>>,
        capture_task: Option<JoinHandle<()>>,
    ) {
        if let Some(backend) = backend.as_mut() {
            if let Err(e) = backend.stop().await {
                warn!("Failed to stop capture backend: {:#}", e);
            }
        }
        drop(backend);

        if let Some(task) = capture_task {
            if let Err(e) = task.await {
                error!("Capture task panicked: {}", e);
            }
        }
    }

    /// Turn the buffered capture into exactly one history record.
    async fn finalize(&self, frames: Vec<AudioFrame>) -> TranscriptRecord {
        if frames.is_empty() {
            info!("No audio captured; recording empty result");
            return TranscriptRecord::empty_capture();
        }

        let payload = match audio::wav_payload(&frames) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to encode capture: {:#}", e);
                return TranscriptRecord::error(format!("Failed to encode audio: {}", e));
            }
        };

        if let Some(dir) = &self.config.recordings_path {
            if let Err(e) = audio::archive_payload(dir, &self.config.session_id, &payload) {
                warn!("Failed to archive recording: {:#}", e);
            }
        }

        match self.analysis.analyze_audio(payload).await {
            Ok(response) => {
                let AnalysisResponse {
                    text,
                    sentiment,
                    tone,
                    explanation,
                } = response;

                // The backend guarantees text and sentiment only; fill the
                // rest from the keyword scan
                let hint = insights::tone_hint(&text);
                TranscriptRecord {
                    text,
                    sentiment,
                    tone: tone.unwrap_or(hint.tone),
                    explanation: explanation.unwrap_or(hint.explanation),
                    timestamp: Utc::now(),
                }
            }
            Err(e) => {
                error!("Audio analysis failed: {:#}", e);
                TranscriptRecord::error(format!("Error analyzing audio: {}", e))
            }
        }
    }
}
