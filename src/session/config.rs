use std::path::PathBuf;
use uuid::Uuid;

use crate::audio::AudioSource;

/// Configuration for a recording session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Unique session identifier (e.g., "call-7f9c...")
    pub session_id: String,

    /// Sample rate for captured audio (speech backends expect 16kHz)
    pub sample_rate: u32,

    /// Number of audio channels (1 = mono, 2 = stereo)
    pub channels: u16,

    /// Frame duration handed to the capture backend
    pub buffer_duration_ms: u64,

    /// Where audio comes from
    pub source: AudioSource,

    /// When set, recorded payloads are archived here before upload
    pub recordings_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("call-{}", Uuid::new_v4()),
            sample_rate: 16000,
            channels: 1,
            buffer_duration_ms: 100,
            source: AudioSource::Microphone,
            recordings_path: None,
        }
    }
}
