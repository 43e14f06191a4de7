//! Draft order normalization and editing.
//!
//! Converts the raw draft extracted by the remote service into a validated
//! [`vorder_core::DraftOrder`], and provides the editor that mutates it while
//! preserving the total-price invariant. Normalization is a pure function;
//! the editor owns the draft from creation until submission or discard.

pub mod editor;
pub mod error;
pub mod normalize;

pub use editor::DraftEditor;
pub use error::{InvalidItem, ItemFault, ValidationError};
pub use normalize::normalize;
