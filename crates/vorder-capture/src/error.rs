//! Error types for voice capture.

use vorder_core::error::VorderError;

use crate::state::CaptureState;

/// Errors from the capture controller and audio device layer.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Audio device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("A recording is already in progress")]
    AlreadyRecording,
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition {
        from: CaptureState,
        to: CaptureState,
    },
    #[error("No active recording session")]
    NoSession,
}

impl From<CaptureError> for VorderError {
    fn from(err: CaptureError) -> Self {
        VorderError::Capture(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CaptureError::DeviceUnavailable("permission denied".to_string());
        assert_eq!(
            err.to_string(),
            "Audio device unavailable: permission denied"
        );

        let err = CaptureError::AlreadyRecording;
        assert_eq!(err.to_string(), "A recording is already in progress");

        let err = CaptureError::InvalidTransition {
            from: CaptureState::Idle,
            to: CaptureState::Stopping,
        };
        assert_eq!(err.to_string(), "Invalid state transition: Idle -> Stopping");
    }

    #[test]
    fn test_conversion_to_vorder_error() {
        let err: VorderError = CaptureError::AlreadyRecording.into();
        assert!(matches!(err, VorderError::Capture(_)));
        assert!(err.to_string().contains("already in progress"));
    }
}
