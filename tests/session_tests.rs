// Integration tests for the recording session controller
//
// These drive the full start/stop/cleanup lifecycle against a scripted
// capture source and a stubbed analysis backend, and verify the state
// machine and resource-release guarantees.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tempfile::TempDir;

use call_sense::{
    AnalysisApi, AnalysisResponse, AudioFrame, AudioSource, CallHistory, ScriptSource,
    SessionConfig, SessionController, SessionState, SummaryRequest, SummaryResponse,
};

/// Analysis backend stub: canned response, minimal response or hard failure.
#[derive(Clone, Copy)]
enum StubMode {
    Ok,
    /// Text and sentiment only, the way the wire contract guarantees
    Minimal,
    Fail,
}

struct StubAnalysis {
    mode: StubMode,
}

#[async_trait]
impl AnalysisApi for StubAnalysis {
    async fn analyze_audio(&self, _wav: Vec<u8>) -> Result<AnalysisResponse> {
        match self.mode {
            StubMode::Ok => Ok(AnalysisResponse {
                text: "happy to proceed with the order".to_string(),
                sentiment: "Positive".to_string(),
                tone: Some("Friendly".to_string()),
                explanation: Some("Customer sounds pleased.".to_string()),
            }),
            StubMode::Minimal => Ok(AnalysisResponse {
                text: "thank you for the quick help".to_string(),
                sentiment: "Positive".to_string(),
                tone: None,
                explanation: None,
            }),
            StubMode::Fail => anyhow::bail!("analysis backend unreachable"),
        }
    }

    async fn generate_summary(&self, _request: &SummaryRequest) -> Result<SummaryResponse> {
        match self.mode {
            StubMode::Fail => anyhow::bail!("analysis backend unreachable"),
            _ => Ok(SummaryResponse {
                summary: Some("Short positive call.".to_string()),
            }),
        }
    }
}

fn frames(count: usize) -> Vec<AudioFrame> {
    (0..count)
        .map(|i| AudioFrame {
            samples: vec![120i16; 1600],
            sample_rate: 16000,
            channels: 1,
            timestamp_ms: i as u64 * 100,
        })
        .collect()
}

fn controller(source: AudioSource, mode: StubMode) -> (SessionController, Arc<CallHistory>) {
    let history = Arc::new(CallHistory::new());
    let config = SessionConfig {
        session_id: "test-call".to_string(),
        source,
        ..SessionConfig::default()
    };
    let controller =
        SessionController::new(config, Arc::new(StubAnalysis { mode }), Arc::clone(&history));
    (controller, history)
}

#[tokio::test]
async fn test_starting_twice_is_a_noop() {
    let script = ScriptSource::new(frames(3));
    let handle = script.handle();
    let (controller, _history) = controller(AudioSource::Script(script), StubMode::Ok);

    let stats = controller.start().await;
    assert_eq!(stats.state, SessionState::Recording);

    // Second start must not acquire a second stream
    let stats = controller.start().await;
    assert_eq!(stats.state, SessionState::Recording);
    assert_eq!(handle.acquisitions(), 1);

    controller.cleanup().await;
}

#[tokio::test]
async fn test_stop_with_zero_chunks_yields_neutral_record() {
    let script = ScriptSource::new(Vec::new());
    let handle = script.handle();
    let (controller, history) = controller(AudioSource::Script(script), StubMode::Ok);

    controller.start().await;
    let record = controller.stop().await.expect("stop while recording");

    assert_eq!(record.text, "");
    assert_eq!(record.sentiment, "Neutral");
    assert_eq!(record.explanation, "No speech detected.");

    assert_eq!(history.len().await, 1);
    assert!(handle.released());
    assert_eq!(controller.stats().await.state, SessionState::Idle);
}

#[tokio::test]
async fn test_successful_cycle_appends_backend_record() {
    let script = ScriptSource::new(frames(5));
    let handle = script.handle();
    let (controller, history) = controller(AudioSource::Script(script), StubMode::Ok);

    controller.start().await;
    let record = controller.stop().await.expect("stop while recording");

    assert_eq!(record.text, "happy to proceed with the order");
    assert_eq!(record.sentiment, "Positive");
    assert_eq!(record.tone, "Friendly");

    let records = history.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text, record.text);

    // Stream resources released, machine back to idle
    assert!(handle.released());
    let stats = controller.stats().await;
    assert_eq!(stats.state, SessionState::Idle);
    assert_eq!(stats.chunks_buffered, 0);
}

#[tokio::test]
async fn test_tone_hint_fills_minimal_backend_response() {
    let script = ScriptSource::new(frames(2));
    let (controller, _history) = controller(AudioSource::Script(script), StubMode::Minimal);

    controller.start().await;
    let record = controller.stop().await.expect("stop while recording");

    // "thank you" in the transcript drives the keyword scan
    assert_eq!(record.tone, "Friendly");
    assert!(!record.explanation.is_empty());
}

#[tokio::test]
async fn test_upload_failure_appends_exactly_one_error_record() {
    let script = ScriptSource::new(frames(4));
    let handle = script.handle();
    let (controller, history) = controller(AudioSource::Script(script), StubMode::Fail);

    controller.start().await;
    let record = controller.stop().await.expect("stop while recording");

    assert_eq!(record.sentiment, "Error");
    assert_eq!(record.tone, "Error");
    assert!(record.explanation.contains("Error analyzing audio"));

    let records = history.records().await;
    assert_eq!(records.len(), 1, "exactly one error-tagged record");
    assert_eq!(records[0].sentiment, "Error");

    // Resources are released even though the upload failed
    assert!(handle.released());
    assert_eq!(controller.stats().await.state, SessionState::Idle);
}

#[tokio::test]
async fn test_teardown_while_recording_forces_cleanup() {
    let script = ScriptSource::new(frames(3));
    let handle = script.handle();
    let (controller, history) = controller(AudioSource::Script(script), StubMode::Ok);

    controller.start().await;
    controller.cleanup().await;

    assert!(handle.released(), "no dangling stream after teardown");
    let stats = controller.stats().await;
    assert_eq!(stats.state, SessionState::Idle);
    assert_eq!(stats.chunks_buffered, 0);

    // Teardown appends nothing
    assert!(history.is_empty().await);

    // cleanup is idempotent
    controller.cleanup().await;
    assert_eq!(controller.stats().await.state, SessionState::Idle);
}

#[tokio::test]
async fn test_stop_while_idle_is_a_noop() {
    let script = ScriptSource::new(frames(1));
    let (controller, history) = controller(AudioSource::Script(script), StubMode::Ok);

    assert!(controller.stop().await.is_none());
    assert!(history.is_empty().await);
    assert_eq!(controller.stats().await.state, SessionState::Idle);
}

#[tokio::test]
async fn test_permission_denial_is_surfaced_as_status_text() {
    let (controller, history) = controller(AudioSource::Script(ScriptSource::denied()), StubMode::Ok);

    let stats = controller.start().await;
    assert_eq!(stats.state, SessionState::Idle);
    assert!(
        stats.status.contains("access denied"),
        "status was: {}",
        stats.status
    );
    assert!(history.is_empty().await);
}

#[tokio::test]
async fn test_missing_device_is_surfaced_as_status_text() {
    let (controller, history) =
        controller(AudioSource::Script(ScriptSource::unavailable()), StubMode::Ok);

    let stats = controller.start().await;
    assert_eq!(stats.state, SessionState::Idle);
    assert!(
        stats.status.contains("not available"),
        "status was: {}",
        stats.status
    );
    assert!(history.is_empty().await);
}

#[tokio::test]
async fn test_recordings_are_archived_when_configured() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let script = ScriptSource::new(frames(3));

    let history = Arc::new(CallHistory::new());
    let config = SessionConfig {
        session_id: "archive-test".to_string(),
        source: AudioSource::Script(script),
        recordings_path: Some(temp_dir.path().to_path_buf()),
        ..SessionConfig::default()
    };
    let controller = SessionController::new(
        config,
        Arc::new(StubAnalysis { mode: StubMode::Ok }),
        Arc::clone(&history),
    );

    controller.start().await;
    controller.stop().await.expect("stop while recording");

    let entries: Vec<_> = std::fs::read_dir(temp_dir.path())?
        .collect::<std::io::Result<Vec<_>>>()?;
    assert_eq!(entries.len(), 1, "one archived payload per cycle");

    let name = entries[0].file_name();
    let name = name.to_string_lossy();
    assert!(name.starts_with("archive-test-"));
    assert!(name.ends_with(".wav"));

    Ok(())
}

#[tokio::test]
async fn test_repeated_cycles_grow_history_in_order() {
    // One controller per cycle: a scripted source drains on its first run
    let history = Arc::new(CallHistory::new());

    for i in 0..3 {
        let mode = if i == 1 { StubMode::Fail } else { StubMode::Ok };
        let config = SessionConfig {
            session_id: format!("cycle-{}", i),
            source: AudioSource::Script(ScriptSource::new(frames(2))),
            ..SessionConfig::default()
        };
        let controller = SessionController::new(
            config,
            Arc::new(StubAnalysis { mode }),
            Arc::clone(&history),
        );

        controller.start().await;
        controller.stop().await.expect("stop while recording");
    }

    let records = history.records().await;
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].sentiment, "Positive");
    assert_eq!(records[1].sentiment, "Error");
    assert_eq!(records[2].sentiment, "Positive");
}
