use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::backend::{AudioBackend, AudioBackendConfig, AudioFrame};

/// Captures audio from the default input device.
///
/// cpal streams are not `Send`, so the stream lives on a dedicated thread
/// and frames cross back over an mpsc channel.
pub struct MicrophoneBackend {
    config: AudioBackendConfig,
    stop_flag: Option<Arc<AtomicBool>>,
    thread: Option<thread::JoinHandle<()>>,
    capturing: bool,
}

impl MicrophoneBackend {
    /// Fails when no input device is present (capability absence).
    pub fn new(config: AudioBackendConfig) -> Result<Self> {
        let host = cpal::default_host();
        if host.default_input_device().is_none() {
            anyhow::bail!("no audio input device available");
        }

        Ok(Self {
            config,
            stop_flag: None,
            thread: None,
            capturing: false,
        })
    }
}

#[async_trait::async_trait]
impl AudioBackend for MicrophoneBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        let (frame_tx, frame_rx) = mpsc::channel(256);
        let (ready_tx, ready_rx) = oneshot::channel();
        let stop_flag = Arc::new(AtomicBool::new(false));

        let stop = Arc::clone(&stop_flag);
        let config = self.config.clone();
        let handle = thread::Builder::new()
            .name("mic-capture".to_string())
            .spawn(move || capture_thread(config, frame_tx, ready_tx, stop))
            .context("Failed to spawn capture thread")?;

        // The thread reports whether the stream opened; an error here is a
        // permission refusal or a device-level failure.
        ready_rx
            .await
            .context("Capture thread exited before opening the stream")??;

        self.stop_flag = Some(stop_flag);
        self.thread = Some(handle);
        self.capturing = true;

        Ok(frame_rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(flag) = self.stop_flag.take() {
            flag.store(true, Ordering::SeqCst);
        }

        if let Some(handle) = self.thread.take() {
            tokio::task::spawn_blocking(move || handle.join())
                .await
                .context("Failed to join capture thread")?
                .map_err(|_| anyhow!("Capture thread panicked"))?;
        }

        self.capturing = false;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "microphone"
    }
}

/// Owns the cpal stream for its whole lifetime; parks until told to stop.
fn capture_thread(
    config: AudioBackendConfig,
    frame_tx: mpsc::Sender<AudioFrame>,
    ready_tx: oneshot::Sender<Result<()>>,
    stop: Arc<AtomicBool>,
) {
    let stream = match open_stream(&config, frame_tx) {
        Ok(stream) => {
            let _ = ready_tx.send(Ok(()));
            stream
        }
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    while !stop.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(20));
    }

    drop(stream);
    debug!("Capture thread stopped, input stream released");
}

fn open_stream(config: &AudioBackendConfig, frame_tx: mpsc::Sender<AudioFrame>) -> Result<cpal::Stream> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| anyhow!("no audio input device available"))?;

    let supported = device
        .default_input_config()
        .context("Failed to query the default input format")?;
    let sample_format = supported.sample_format();
    let stream_config: cpal::StreamConfig = supported.into();

    let device_rate = stream_config.sample_rate.0;
    let device_channels = stream_config.channels;

    // Decimate to the target rate when the device runs faster; can't upsample
    let ratio = if device_rate > config.target_sample_rate {
        (device_rate / config.target_sample_rate).max(1)
    } else {
        1
    };
    let effective_rate = device_rate / ratio;

    debug!(
        "Opening input stream: {} Hz, {} channels, {:?} (emitting {} Hz mono)",
        device_rate, device_channels, sample_format, effective_rate
    );

    let assembler = FrameAssembler::new(frame_tx, effective_rate, config.buffer_duration_ms);
    let err_fn = |e| warn!("Input stream error: {}", e);

    let stream = match sample_format {
        cpal::SampleFormat::F32 => {
            let mut assembler = assembler;
            device.build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let mono = mono_from_f32(data, device_channels);
                    assembler.push(decimate(mono, ratio));
                },
                err_fn,
                None,
            )
        }
        cpal::SampleFormat::I16 => {
            let mut assembler = assembler;
            device.build_input_stream(
                &stream_config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let mono = mono_from_i16(data, device_channels);
                    assembler.push(decimate(mono, ratio));
                },
                err_fn,
                None,
            )
        }
        other => anyhow::bail!("unsupported input sample format: {:?}", other),
    }
    .context("Failed to open the input stream")?;

    stream.play().context("Failed to start the input stream")?;

    Ok(stream)
}

/// Accumulates converted samples and emits fixed-duration frames.
struct FrameAssembler {
    tx: mpsc::Sender<AudioFrame>,
    buffer: Vec<i16>,
    samples_per_frame: usize,
    sample_rate: u32,
    sample_clock: u64,
}

impl FrameAssembler {
    fn new(tx: mpsc::Sender<AudioFrame>, sample_rate: u32, buffer_duration_ms: u64) -> Self {
        let samples_per_frame = ((sample_rate as u64 * buffer_duration_ms / 1000).max(1)) as usize;
        Self {
            tx,
            buffer: Vec::with_capacity(samples_per_frame * 2),
            samples_per_frame,
            sample_rate,
            sample_clock: 0,
        }
    }

    fn push(&mut self, samples: Vec<i16>) {
        self.buffer.extend(samples);

        while self.buffer.len() >= self.samples_per_frame {
            let chunk: Vec<i16> = self.buffer.drain(..self.samples_per_frame).collect();
            let timestamp_ms = self.sample_clock * 1000 / self.sample_rate as u64;
            self.sample_clock += chunk.len() as u64;

            let frame = AudioFrame {
                samples: chunk,
                sample_rate: self.sample_rate,
                channels: 1,
                timestamp_ms,
            };

            if self.tx.try_send(frame).is_err() {
                warn!("Audio channel full, dropping a frame");
            }
        }
    }
}

fn decimate(samples: Vec<i16>, ratio: u32) -> Vec<i16> {
    if ratio <= 1 {
        return samples;
    }
    samples.into_iter().step_by(ratio as usize).collect()
}

fn mono_from_f32(data: &[f32], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return data.iter().map(|&s| f32_to_i16(s)).collect();
    }
    data.chunks(channels as usize)
        .map(|frame| {
            let sum: f32 = frame.iter().sum();
            f32_to_i16(sum / frame.len() as f32)
        })
        .collect()
}

fn mono_from_i16(data: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return data.to_vec();
    }
    data.chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32).clamp(i16::MIN as i32, i16::MAX as i32) as i16
        })
        .collect()
}

fn f32_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}
