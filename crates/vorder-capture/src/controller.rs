//! Capture controller managing the full recording lifecycle.
//!
//! The `CaptureController` drives recording sessions through the strict state
//! machine, buffering audio chunks in arrival order and assembling them into
//! a single payload on stop. At most one recording session exists at a time,
//! and the audio device is released on every exit path.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::device::{AudioDevice, DeviceHandle};
use crate::error::CaptureError;
use crate::state::{CaptureState, StateMachine};

/// A finalized audio capture: the session's chunks concatenated in arrival
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    pub data: Vec<u8>,
}

impl AudioPayload {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Tracks the data associated with an active recording session.
#[derive(Debug)]
pub struct RecordingSession {
    /// Unique identifier for this session.
    pub id: Uuid,
    /// When the session was started.
    pub started_at: DateTime<Utc>,
    /// Audio chunks in arrival order.
    chunks: Vec<Vec<u8>>,
    /// Exclusive device handle, held for the session's lifetime.
    handle: DeviceHandle,
}

impl RecordingSession {
    fn new(handle: DeviceHandle) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            chunks: Vec::new(),
            handle,
        }
    }

    /// Append one audio chunk to the session buffer.
    fn push_chunk(&mut self, chunk: &[u8]) {
        self.chunks.push(chunk.to_vec());
    }

    /// Number of buffered chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Concatenate all chunks into a single payload, preserving arrival
    /// order. Consumes the session; dropping the handle releases the device.
    fn finalize(mut self) -> AudioPayload {
        // Anything still sitting in the device buffer belongs to this
        // session and arrives after the externally pushed chunks.
        self.chunks.extend(self.handle.drain());
        let data = self.chunks.concat();
        AudioPayload { data }
    }
}

/// Controller owning the recording state machine and the active session.
///
/// Generic over the audio device so tests and the file-backed development
/// device share the same control path as real hardware.
pub struct CaptureController<D: AudioDevice> {
    device: D,
    state_machine: StateMachine,
    session: Mutex<Option<RecordingSession>>,
}

impl<D: AudioDevice> CaptureController<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            state_machine: StateMachine::new(),
            session: Mutex::new(None),
        }
    }

    /// Returns the current capture state.
    pub fn current_state(&self) -> CaptureState {
        self.state_machine.current()
    }

    /// Start a new recording session.
    ///
    /// Rejected with [`CaptureError::AlreadyRecording`] if a session is
    /// active, without altering it. Device acquisition happens before the
    /// state transition, so a [`CaptureError::DeviceUnavailable`] failure
    /// leaves the controller in `Idle`.
    pub async fn start(&self) -> Result<Uuid, CaptureError> {
        if self.state_machine.current() != CaptureState::Idle {
            return Err(CaptureError::AlreadyRecording);
        }

        let handle = self.device.acquire().await?;
        self.state_machine.transition(CaptureState::Recording)?;

        let session = RecordingSession::new(handle);
        let id = session.id;
        tracing::info!(session_id = %id, "Recording session started");

        let mut guard = self.session.lock().expect("session mutex poisoned");
        *guard = Some(session);
        Ok(id)
    }

    /// Buffer one audio chunk. Only valid while `Recording`.
    pub fn push_chunk(&self, chunk: &[u8]) -> Result<(), CaptureError> {
        if self.state_machine.current() != CaptureState::Recording {
            return Err(CaptureError::NoSession);
        }

        let mut guard = self.session.lock().expect("session mutex poisoned");
        match guard.as_mut() {
            Some(session) => {
                session.push_chunk(chunk);
                Ok(())
            }
            None => Err(CaptureError::NoSession),
        }
    }

    /// Stop the current recording and return the assembled payload.
    ///
    /// Calling `stop` while not `Recording` is a no-op returning `Ok(None)`,
    /// so repeated taps are harmless. On success the device has been released
    /// and the controller is back in `Idle`.
    pub fn stop(&self) -> Result<Option<AudioPayload>, CaptureError> {
        if self.state_machine.current() != CaptureState::Recording {
            return Ok(None);
        }

        self.state_machine.transition(CaptureState::Stopping)?;

        let session = {
            let mut guard = self.session.lock().expect("session mutex poisoned");
            guard.take()
        };

        let Some(session) = session else {
            // State said Recording but no session exists. Recover to Idle.
            self.state_machine.reset();
            return Err(CaptureError::NoSession);
        };

        let session_id = session.id;
        let payload = session.finalize(); // drops the handle, releasing the device

        self.state_machine.transition(CaptureState::Idle)?;
        tracing::info!(
            session_id = %session_id,
            payload_bytes = payload.len(),
            "Recording session stopped"
        );

        Ok(Some(payload))
    }

    /// Cancel the current recording, discarding all captured audio.
    ///
    /// Only valid while `Recording`. Returns to `Idle` and releases the
    /// device.
    pub fn cancel(&self) -> Result<(), CaptureError> {
        if self.state_machine.current() != CaptureState::Recording {
            return Err(CaptureError::NoSession);
        }

        self.state_machine.transition(CaptureState::Idle)?;

        let session = {
            let mut guard = self.session.lock().expect("session mutex poisoned");
            guard.take()
        };

        if let Some(session) = session {
            tracing::info!(session_id = %session.id, "Recording session cancelled");
            // Dropping the session drops the handle and releases the device.
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::MockAudioDevice;

    #[tokio::test]
    async fn test_initial_state() {
        let controller = CaptureController::new(MockAudioDevice::new());
        assert_eq!(controller.current_state(), CaptureState::Idle);
    }

    #[tokio::test]
    async fn test_start_transitions_to_recording() {
        let device = MockAudioDevice::new();
        let controller = CaptureController::new(device.clone());

        controller.start().await.unwrap();
        assert_eq!(controller.current_state(), CaptureState::Recording);
        assert!(device.is_held());
    }

    #[tokio::test]
    async fn test_start_device_unavailable_stays_idle() {
        let controller = CaptureController::new(MockAudioDevice::denied());
        let result = controller.start().await;
        assert!(matches!(result, Err(CaptureError::DeviceUnavailable(_))));
        assert_eq!(controller.current_state(), CaptureState::Idle);
    }

    #[tokio::test]
    async fn test_start_while_recording_rejected_without_altering_session() {
        let controller = CaptureController::new(MockAudioDevice::new());
        controller.start().await.unwrap();
        controller.push_chunk(&[1, 2, 3]).unwrap();

        let result = controller.start().await;
        assert!(matches!(result, Err(CaptureError::AlreadyRecording)));
        assert_eq!(controller.current_state(), CaptureState::Recording);

        // The original session and its buffered audio are intact.
        let payload = controller.stop().unwrap().unwrap();
        assert_eq!(payload.data, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_stop_concatenates_chunks_in_arrival_order() {
        let controller = CaptureController::new(MockAudioDevice::new());
        controller.start().await.unwrap();
        controller.push_chunk(&[1, 2]).unwrap();
        controller.push_chunk(&[3]).unwrap();
        controller.push_chunk(&[4, 5]).unwrap();

        let payload = controller.stop().unwrap().unwrap();
        assert_eq!(payload.data, vec![1, 2, 3, 4, 5]);
        assert_eq!(controller.current_state(), CaptureState::Idle);
    }

    #[tokio::test]
    async fn test_stop_includes_device_buffered_chunks() {
        let device = MockAudioDevice::with_chunks(vec![vec![9], vec![8]]);
        let controller = CaptureController::new(device);
        controller.start().await.unwrap();
        controller.push_chunk(&[1]).unwrap();

        let payload = controller.stop().unwrap().unwrap();
        assert_eq!(payload.data, vec![1, 9, 8]);
    }

    #[tokio::test]
    async fn test_stop_when_idle_is_noop() {
        let controller = CaptureController::new(MockAudioDevice::new());
        assert!(controller.stop().unwrap().is_none());
        assert_eq!(controller.current_state(), CaptureState::Idle);
    }

    #[tokio::test]
    async fn test_double_stop_second_is_noop() {
        let controller = CaptureController::new(MockAudioDevice::new());
        controller.start().await.unwrap();
        controller.push_chunk(&[1]).unwrap();
        assert!(controller.stop().unwrap().is_some());
        assert!(controller.stop().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stop_releases_device() {
        let device = MockAudioDevice::new();
        let controller = CaptureController::new(device.clone());
        controller.start().await.unwrap();
        assert!(device.is_held());

        controller.stop().unwrap();
        assert!(!device.is_held());

        // The device is re-acquirable for the next session.
        controller.start().await.unwrap();
        assert!(device.is_held());
    }

    #[tokio::test]
    async fn test_cancel_discards_audio_and_releases_device() {
        let device = MockAudioDevice::new();
        let controller = CaptureController::new(device.clone());
        controller.start().await.unwrap();
        controller.push_chunk(&[1, 2, 3]).unwrap();

        controller.cancel().unwrap();
        assert_eq!(controller.current_state(), CaptureState::Idle);
        assert!(!device.is_held());

        // Nothing to stop afterwards.
        assert!(controller.stop().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cancel_when_idle_fails() {
        let controller = CaptureController::new(MockAudioDevice::new());
        assert!(controller.cancel().is_err());
    }

    #[tokio::test]
    async fn test_push_chunk_when_not_recording_fails() {
        let controller = CaptureController::new(MockAudioDevice::new());
        assert!(matches!(
            controller.push_chunk(&[1]),
            Err(CaptureError::NoSession)
        ));
    }

    #[tokio::test]
    async fn test_stop_without_audio_returns_empty_payload() {
        let controller = CaptureController::new(MockAudioDevice::new());
        controller.start().await.unwrap();
        let payload = controller.stop().unwrap().unwrap();
        assert!(payload.is_empty());
    }

    #[tokio::test]
    async fn test_full_cycle_then_restart() {
        let controller = CaptureController::new(MockAudioDevice::new());

        controller.start().await.unwrap();
        controller.push_chunk(&[1]).unwrap();
        let first = controller.stop().unwrap().unwrap();
        assert_eq!(first.data, vec![1]);

        let id = controller.start().await.unwrap();
        assert!(!id.is_nil());
        controller.push_chunk(&[2, 3]).unwrap();
        let second = controller.stop().unwrap().unwrap();
        assert_eq!(second.data, vec![2, 3]);
    }
}
