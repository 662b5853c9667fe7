use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a recording session.
///
/// `Idle --start--> Recording --stop--> Processing --(upload resolves)--> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Recording,
    Processing,
}

/// UI-facing snapshot of the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Current lifecycle state
    pub state: SessionState,

    /// Human-readable status line; capture failures surface here
    pub status: String,

    /// When the active recording started, if one is running
    pub started_at: Option<DateTime<Utc>>,

    /// Elapsed recording time in seconds (0 when idle)
    pub duration_secs: f64,

    /// Number of audio chunks buffered so far
    pub chunks_buffered: usize,
}
