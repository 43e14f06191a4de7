//! User notification subsystem.
//!
//! Process-local toast and modal state with an explicit enqueue/dismiss API.
//! Transient toasts self-dismiss after a fixed interval; a modal blocks until
//! explicitly closed. Nothing here is global: the owner decides where the
//! center lives and who renders it.

pub mod center;

pub use center::{Modal, NotificationCenter, Toast, ToastKind};
