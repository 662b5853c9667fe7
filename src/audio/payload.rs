use anyhow::{Context, Result};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use super::backend::AudioFrame;

/// Concatenate buffered frames into a single in-memory WAV payload
/// (16-bit PCM). Format is taken from the first frame.
pub fn wav_payload(frames: &[AudioFrame]) -> Result<Vec<u8>> {
    let first = frames
        .first()
        .ok_or_else(|| anyhow::anyhow!("no audio frames to encode"))?;

    let spec = hound::WavSpec {
        channels: first.channels,
        sample_rate: first.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .context("Failed to initialize WAV writer")?;

        for frame in frames {
            for &sample in &frame.samples {
                writer
                    .write_sample(sample)
                    .context("Failed to write sample to WAV payload")?;
            }
        }

        writer.finalize().context("Failed to finalize WAV payload")?;
    }

    Ok(cursor.into_inner())
}

/// Archive a recorded payload to the recordings directory.
pub fn archive_payload(dir: &Path, session_id: &str, payload: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir).context("Failed to create recordings directory")?;

    let path = dir.join(format!("{}-{}.wav", session_id, Uuid::new_v4()));
    fs::write(&path, payload)
        .with_context(|| format!("Failed to write recording to {}", path.display()))?;

    info!("Archived recording: {}", path.display());

    Ok(path)
}
