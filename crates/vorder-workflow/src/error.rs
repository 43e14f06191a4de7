//! Error types for the submission coordinator, with their user-facing
//! notices.

use vorder_core::error::VorderError;
use vorder_order::ValidationError;

/// Errors from the order workflow.
///
/// Validation failures are user-correctable (speak again, more clearly);
/// transport failures keep local state intact so the user can retry without
/// re-entering anything; `EmptyOrder` and `RequestInProgress` are pre-flight
/// guards that never reach the network.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Draft generation failed: {0}")]
    OrderProcessingFailed(String),
    #[error("Order submission failed: {0}")]
    OrderSubmissionFailed(String),
    #[error("The order has no items")]
    EmptyOrder,
    #[error("Another request is already in progress")]
    RequestInProgress,
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl WorkflowError {
    /// Whether re-recording (rather than retrying the network call) is the
    /// fix.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, WorkflowError::Validation(_) | WorkflowError::EmptyOrder)
    }

    /// Human-readable title/message pair for the notification subsystem.
    pub fn notice(&self) -> (String, String) {
        match self {
            WorkflowError::OrderProcessingFailed(_) => (
                "Could not process your order".to_string(),
                "Something went wrong while processing the recording. Please try again."
                    .to_string(),
            ),
            WorkflowError::OrderSubmissionFailed(_) => (
                "Could not place your order".to_string(),
                "The order was kept as-is. Check your connection and confirm again.".to_string(),
            ),
            WorkflowError::EmptyOrder => (
                "Nothing to order".to_string(),
                "All items were removed. Record a new order to continue.".to_string(),
            ),
            WorkflowError::RequestInProgress => (
                "Hold on".to_string(),
                "A request is still in progress.".to_string(),
            ),
            WorkflowError::Validation(ValidationError::EmptyTranscript) => (
                "Nothing was heard".to_string(),
                "The recording contained no speech. Please speak clearly and try again."
                    .to_string(),
            ),
            WorkflowError::Validation(ValidationError::NoItemsDetected) => (
                "No items recognized".to_string(),
                "No products could be identified. Please name the items and quantities clearly."
                    .to_string(),
            ),
            WorkflowError::Validation(ValidationError::InvalidLineItems(items)) => (
                "Some items could not be understood".to_string(),
                format!(
                    "{} item(s) were unusable. Please repeat the order clearly.",
                    items.len()
                ),
            ),
        }
    }
}

impl From<WorkflowError> for VorderError {
    fn from(err: WorkflowError) -> Self {
        VorderError::Workflow(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vorder_order::{InvalidItem, ItemFault};

    #[test]
    fn test_error_display() {
        let err = WorkflowError::OrderProcessingFailed("server returned 500".to_string());
        assert_eq!(
            err.to_string(),
            "Draft generation failed: server returned 500"
        );

        assert_eq!(
            WorkflowError::EmptyOrder.to_string(),
            "The order has no items"
        );
        assert_eq!(
            WorkflowError::RequestInProgress.to_string(),
            "Another request is already in progress"
        );
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let err: WorkflowError = ValidationError::EmptyTranscript.into();
        assert_eq!(err.to_string(), "Transcript is empty");
    }

    #[test]
    fn test_user_correctable_classification() {
        assert!(WorkflowError::Validation(ValidationError::EmptyTranscript).is_user_correctable());
        assert!(WorkflowError::EmptyOrder.is_user_correctable());
        assert!(!WorkflowError::OrderProcessingFailed("x".to_string()).is_user_correctable());
        assert!(!WorkflowError::OrderSubmissionFailed("x".to_string()).is_user_correctable());
        assert!(!WorkflowError::RequestInProgress.is_user_correctable());
    }

    #[test]
    fn test_every_error_kind_has_a_notice() {
        let errors = vec![
            WorkflowError::OrderProcessingFailed("x".to_string()),
            WorkflowError::OrderSubmissionFailed("x".to_string()),
            WorkflowError::EmptyOrder,
            WorkflowError::RequestInProgress,
            WorkflowError::Validation(ValidationError::EmptyTranscript),
            WorkflowError::Validation(ValidationError::NoItemsDetected),
            WorkflowError::Validation(ValidationError::InvalidLineItems(vec![InvalidItem {
                index: 0,
                name: None,
                faults: vec![ItemFault::EmptyName],
            }])),
        ];

        for err in errors {
            let (title, message) = err.notice();
            assert!(!title.is_empty());
            assert!(!message.is_empty());
        }
    }

    #[test]
    fn test_validation_notices_advise_re_recording() {
        let (_, message) =
            WorkflowError::Validation(ValidationError::EmptyTranscript).notice();
        assert!(message.contains("speak clearly"));

        let (_, message) = WorkflowError::OrderSubmissionFailed("x".to_string()).notice();
        assert!(message.contains("confirm again"));
    }

    #[test]
    fn test_conversion_to_vorder_error() {
        let err: VorderError = WorkflowError::EmptyOrder.into();
        assert!(matches!(err, VorderError::Workflow(_)));
    }
}
