pub mod backend;
pub mod microphone;
pub mod payload;
pub mod scripted;

pub use backend::{AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioFrame, AudioSource};
pub use microphone::MicrophoneBackend;
pub use payload::{archive_payload, wav_payload};
pub use scripted::{ScriptHandle, ScriptSource, ScriptedBackend};
