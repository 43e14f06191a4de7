//! Audio input device seam.
//!
//! The microphone is a shared exclusive resource: only one recording session
//! may hold it, and acquisition fails rather than queues when it is already
//! held. The [`DeviceHandle`] releases the device on drop so that every exit
//! path from a recording, including error paths, gives it back.
//!
//! Two implementations are provided: a mock for tests and a file-backed
//! device that replays an audio file in fixed-size chunks for development
//! without real hardware.

use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::CaptureError;

/// Service granting exclusive access to an audio input device.
///
/// Implementations decide where the audio bytes come from; the controller
/// only sees ordered chunks.
pub trait AudioDevice: Send + Sync {
    /// Request exclusive access to the device.
    ///
    /// Fails with [`CaptureError::DeviceUnavailable`] if permission is denied,
    /// no device exists, or the device is already held.
    fn acquire(&self) -> impl Future<Output = Result<DeviceHandle, CaptureError>> + Send;
}

/// Exclusive handle to an acquired audio device.
///
/// Dropping the handle releases the device. Chunks produced by the device are
/// drained in arrival order.
#[derive(Debug)]
pub struct DeviceHandle {
    name: String,
    held: Arc<AtomicBool>,
    pending: Vec<Vec<u8>>,
}

impl DeviceHandle {
    fn new(name: impl Into<String>, held: Arc<AtomicBool>, pending: Vec<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            held,
            pending,
        }
    }

    /// The name of the underlying device.
    pub fn device_name(&self) -> &str {
        &self.name
    }

    /// Take all chunks the device has produced so far, in arrival order.
    pub fn drain(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.pending)
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
        tracing::debug!(device = %self.name, "Audio device released");
    }
}

// =============================================================================
// Mock implementation
// =============================================================================

/// Mock audio device for testing.
///
/// Simulates exclusive acquisition without real hardware. Tracks the held
/// state via an atomic boolean so it is fully thread-safe, and can be put
/// into a permission-denied mode.
#[derive(Debug, Clone, Default)]
pub struct MockAudioDevice {
    held: Arc<AtomicBool>,
    deny: bool,
    chunks: Vec<Vec<u8>>,
}

impl MockAudioDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// A device whose acquisition always fails, as when microphone
    /// permission is denied.
    pub fn denied() -> Self {
        Self {
            deny: true,
            ..Self::default()
        }
    }

    /// A device that yields the given chunks once acquired.
    pub fn with_chunks(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            chunks,
            ..Self::default()
        }
    }

    /// Whether the device is currently held by a handle.
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

impl AudioDevice for MockAudioDevice {
    async fn acquire(&self) -> Result<DeviceHandle, CaptureError> {
        if self.deny {
            return Err(CaptureError::DeviceUnavailable(
                "microphone permission denied".to_string(),
            ));
        }
        if self.held.swap(true, Ordering::AcqRel) {
            return Err(CaptureError::DeviceUnavailable(
                "audio device is already held".to_string(),
            ));
        }
        tracing::info!("Mock audio device acquired");
        Ok(DeviceHandle::new(
            "mock-device",
            Arc::clone(&self.held),
            self.chunks.clone(),
        ))
    }
}

// =============================================================================
// File-backed implementation
// =============================================================================

/// Audio device that replays a file in fixed-size chunks.
///
/// The development stand-in for real microphone capture: the file is read at
/// acquisition time and handed to the session as an ordered chunk sequence.
#[derive(Debug, Clone)]
pub struct FileAudioDevice {
    path: PathBuf,
    chunk_size: usize,
    held: Arc<AtomicBool>,
}

impl FileAudioDevice {
    pub fn new(path: impl Into<PathBuf>, chunk_size: usize) -> Self {
        Self {
            path: path.into(),
            chunk_size: chunk_size.max(1),
            held: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl AudioDevice for FileAudioDevice {
    async fn acquire(&self) -> Result<DeviceHandle, CaptureError> {
        if self.held.swap(true, Ordering::AcqRel) {
            return Err(CaptureError::DeviceUnavailable(
                "audio device is already held".to_string(),
            ));
        }

        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                // Acquisition failed; give the device back immediately.
                self.held.store(false, Ordering::Release);
                return Err(CaptureError::DeviceUnavailable(format!(
                    "cannot read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let chunks: Vec<Vec<u8>> = bytes
            .chunks(self.chunk_size)
            .map(|c| c.to_vec())
            .collect();

        tracing::info!(
            path = %self.path.display(),
            chunks = chunks.len(),
            "File audio device acquired"
        );

        Ok(DeviceHandle::new(
            self.path.display().to_string(),
            Arc::clone(&self.held),
            chunks,
        ))
    }
}

// =============================================================================
// Tests
// =============================================================================
