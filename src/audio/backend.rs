use anyhow::Result;
use tokio::sync::mpsc;

use super::microphone::MicrophoneBackend;
use super::scripted::{ScriptSource, ScriptedBackend};

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Configuration for audio backends
#[derive(Debug, Clone)]
pub struct AudioBackendConfig {
    /// Target sample rate (will downsample if needed)
    pub target_sample_rate: u32,
    /// Target channel count (1 = mono, 2 = stereo)
    pub target_channels: u16,
    /// Frame size in milliseconds (affects latency)
    pub buffer_duration_ms: u64,
}

impl Default for AudioBackendConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 16000, // 16kHz for speech transcription
            target_channels: 1,        // Mono
            buffer_duration_ms: 100,   // 100ms frames
        }
    }
}

/// Audio capture backend trait
///
/// Implementations:
/// - Microphone: default input device via cpal
/// - Scripted: replays a fixed frame list (offline runs and tests)
#[async_trait::async_trait]
pub trait AudioBackend: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive audio frames
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>>;

    /// Stop capturing audio and release the device
    async fn stop(&mut self) -> Result<()>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Audio source type
#[derive(Debug, Clone)]
pub enum AudioSource {
    /// Default microphone input
    Microphone,
    /// Replay a fixed set of frames (for testing/offline runs)
    Script(ScriptSource),
}

/// Audio backend factory
pub struct AudioBackendFactory;

impl AudioBackendFactory {
    /// Create an audio backend for the given source.
    ///
    /// Fails when the source has no capture device to offer (capability
    /// absence); permission problems only surface on `start`.
    pub fn create(source: &AudioSource, config: AudioBackendConfig) -> Result<Box<dyn AudioBackend>> {
        match source {
            AudioSource::Microphone => {
                let backend = MicrophoneBackend::new(config)?;
                Ok(Box::new(backend))
            }
            AudioSource::Script(script) => {
                if script.no_device {
                    anyhow::bail!("no audio input device available");
                }
                Ok(Box::new(ScriptedBackend::new(script.clone(), config)))
            }
        }
    }
}
