use anyhow::Result;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::backend::{AudioBackend, AudioBackendConfig, AudioFrame};

/// Observes a scripted source from the outside: how often the device was
/// acquired and whether it has been released again.
#[derive(Debug, Clone, Default)]
pub struct ScriptHandle {
    acquisitions: Arc<AtomicUsize>,
    released: Arc<AtomicBool>,
}

impl ScriptHandle {
    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

/// A canned capture source: replays a fixed frame list instead of opening a
/// real device. Used for offline runs and tests.
#[derive(Debug, Clone)]
pub struct ScriptSource {
    pub frames: Vec<AudioFrame>,
    /// Refuse to open the stream (permission denial)
    pub deny_access: bool,
    /// Pretend no capture device exists (capability absence)
    pub no_device: bool,
    handle: ScriptHandle,
}

impl ScriptSource {
    pub fn new(frames: Vec<AudioFrame>) -> Self {
        Self {
            frames,
            deny_access: false,
            no_device: false,
            handle: ScriptHandle::default(),
        }
    }

    pub fn denied() -> Self {
        Self {
            deny_access: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn unavailable() -> Self {
        Self {
            no_device: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn handle(&self) -> ScriptHandle {
        self.handle.clone()
    }
}

/// Backend that drains a `ScriptSource`.
///
/// All frames are buffered into the channel on `start`; the receiver sees
/// end-of-stream once `stop` drops the sender, mirroring how the microphone
/// backend winds down.
pub struct ScriptedBackend {
    frames: Vec<AudioFrame>,
    deny_access: bool,
    handle: ScriptHandle,
    tx: Option<mpsc::Sender<AudioFrame>>,
    capturing: bool,
}

impl ScriptedBackend {
    pub fn new(source: ScriptSource, _config: AudioBackendConfig) -> Self {
        Self {
            frames: source.frames,
            deny_access: source.deny_access,
            handle: source.handle,
            tx: None,
            capturing: false,
        }
    }
}

#[async_trait::async_trait]
impl AudioBackend for ScriptedBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        if self.deny_access {
            anyhow::bail!("microphone access denied");
        }

        let (tx, rx) = mpsc::channel(self.frames.len().max(1));
        for frame in self.frames.clone() {
            // Capacity covers every scripted frame
            let _ = tx.try_send(frame);
        }

        self.handle.acquisitions.fetch_add(1, Ordering::SeqCst);
        self.handle.released.store(false, Ordering::SeqCst);
        self.tx = Some(tx);
        self.capturing = true;

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.tx = None;
        self.capturing = false;
        self.handle.released.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

impl Drop for ScriptedBackend {
    fn drop(&mut self) {
        // Dropping the backend releases the stream even without stop()
        self.handle.released.store(true, Ordering::SeqCst);
    }
}
