//! Recording state machine with thread-safe transitions.
//!
//! Enforces valid state transitions for the capture lifecycle:
//! - Idle -> Recording (start recording)
//! - Recording -> Stopping (stop requested, finalizing the chunk buffer)
//! - Stopping -> Idle (payload handed off, device released)
//! - Recording -> Idle (cancel recording)
//!
//! There is no resting error state: every failure path resets to Idle so the
//! controller is always ready for the next attempt.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::error::CaptureError;

/// Operational state of the capture controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureState {
    /// No recording in progress. Ready to start.
    Idle,
    /// Holding the audio device and buffering chunks as they arrive.
    Recording,
    /// Finalizing the chunk sequence into a single payload.
    Stopping,
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureState::Idle => write!(f, "Idle"),
            CaptureState::Recording => write!(f, "Recording"),
            CaptureState::Stopping => write!(f, "Stopping"),
        }
    }
}

impl CaptureState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &CaptureState) -> bool {
        matches!(
            (self, target),
            (CaptureState::Idle, CaptureState::Recording)
                | (CaptureState::Recording, CaptureState::Stopping)
                | (CaptureState::Stopping, CaptureState::Idle)
                // Cancel transition
                | (CaptureState::Recording, CaptureState::Idle)
        )
    }
}

/// Thread-safe state machine for capture state transitions.
///
/// Wraps `CaptureState` in an `Arc<Mutex<>>` to allow safe concurrent access.
/// All transitions are validated before being applied, returning an error
/// if the requested transition is not permitted.
#[derive(Debug, Clone)]
pub struct StateMachine {
    state: Arc<Mutex<CaptureState>>,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Create a new state machine initialized to `Idle`.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(CaptureState::Idle)),
        }
    }

    /// Returns the current state.
    pub fn current(&self) -> CaptureState {
        *self.state.lock().expect("state mutex poisoned")
    }

    /// Attempt to transition to the target state.
    ///
    /// Returns `Ok(())` if the transition is valid, or
    /// `CaptureError::InvalidTransition` if it is not allowed from the
    /// current state.
    pub fn transition(&self, target: CaptureState) -> Result<(), CaptureError> {
        let mut state = self.state.lock().expect("state mutex poisoned");
        if state.can_transition_to(&target) {
            tracing::debug!("Capture state: {} -> {}", *state, target);
            *state = target;
            Ok(())
        } else {
            Err(CaptureError::InvalidTransition {
                from: *state,
                to: target,
            })
        }
    }

    /// Force the state machine back to Idle (used for error recovery).
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("state mutex poisoned");
        tracing::warn!("Capture state machine reset to Idle from {}", *state);
        *state = CaptureState::Idle;
    }
}

// =============================================================================
// Tests
// =============================================================================
