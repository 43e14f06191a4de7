//! Submission coordination for the voice order workflow.
//!
//! Sequences the two-phase protocol: draft generation from a captured audio
//! payload, user edits on the resulting draft, and final confirmation.
//! Enforces a single-flight discipline per workflow instance and discards
//! stale responses from abandoned instances.

pub mod coordinator;
pub mod error;

pub use coordinator::{ConfirmOutcome, DraftOutcome, OrderWorkflow};
pub use error::WorkflowError;
