//! Voice capture crate - recording state machine, session buffering, and the
//! audio device seam.
//!
//! Provides the capture controller that manages the lifecycle of a recording
//! session through a strict state machine: Idle -> Recording -> Stopping ->
//! Idle. Thread-safe state management is handled via `Arc<Mutex<>>`. The
//! audio input device is abstracted behind a trait with a mock and a
//! file-backed implementation for development without real hardware.

pub mod controller;
pub mod device;
pub mod error;
pub mod state;

pub use controller::{AudioPayload, CaptureController, RecordingSession};
pub use device::{AudioDevice, DeviceHandle, FileAudioDevice, MockAudioDevice};
pub use error::CaptureError;
pub use state::{CaptureState, StateMachine};
