//! Validation errors for draft normalization.

use std::fmt;

use vorder_core::error::VorderError;

/// One way a raw line item can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemFault {
    MissingProductId,
    NonPositiveProductId,
    EmptyName,
    NonPositiveQuantity,
    QuantityOutOfRange,
    NonPositivePrice,
}

impl fmt::Display for ItemFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemFault::MissingProductId => write!(f, "missing product id"),
            ItemFault::NonPositiveProductId => write!(f, "product id must be positive"),
            ItemFault::EmptyName => write!(f, "name must not be empty"),
            ItemFault::NonPositiveQuantity => write!(f, "quantity must be at least 1"),
            ItemFault::QuantityOutOfRange => write!(f, "quantity is out of range"),
            ItemFault::NonPositivePrice => write!(f, "unit price must be positive"),
        }
    }
}

/// A raw line item that failed validation, with every fault it exhibits.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidItem {
    /// Position of the item in the raw draft.
    pub index: usize,
    /// Item name as received, if any.
    pub name: Option<String>,
    pub faults: Vec<ItemFault>,
}

impl fmt::Display for InvalidItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or("<unnamed>");
        let faults: Vec<String> = self.faults.iter().map(|p| p.to_string()).collect();
        write!(f, "item {} ({}): {}", self.index, name, faults.join(", "))
    }
}

/// Errors from draft normalization.
///
/// Validation failures are user-correctable: the caller turns them into
/// guidance to re-record more clearly, never into a network retry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Transcript is empty")]
    EmptyTranscript,
    #[error("No items detected in the draft")]
    NoItemsDetected,
    #[error("Invalid line items: {}", format_invalid_items(.0))]
    InvalidLineItems(Vec<InvalidItem>),
}

fn format_invalid_items(items: &[InvalidItem]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ValidationError> for VorderError {
    fn from(err: ValidationError) -> Self {
        VorderError::Validation(err.to_string())
    }
}
