//! Core order types shared across the workspace.
//!
//! Defines the draft order model, the permissive wire shapes received from
//! the order service, and the read-only submission projection sent back at
//! confirmation time.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// The kind of transaction a draft order represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Goods sold to a customer (the default; the service currently tags
    /// every transaction as a sale).
    #[default]
    Sale,
    /// Goods bought from a supplier.
    Purchase,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Sale => write!(f, "sale"),
            TransactionType::Purchase => write!(f, "purchase"),
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sale" => Ok(TransactionType::Sale),
            "purchase" => Ok(TransactionType::Purchase),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

// =============================================================================
// Draft order model
// =============================================================================

/// One product entry within a draft order.
///
/// A validated line item always has a positive product id, a non-empty name,
/// a quantity of at least one, and a positive unit price. Entries whose
/// quantity drops to zero during editing are removed, never retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: i64,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl LineItem {
    /// The contribution of this entry to the order total.
    pub fn line_total(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}

/// A normalized, locally editable draft order.
///
/// Produced by draft normalization and owned by the editor until the order
/// is submitted or discarded. `total` is always derived from the items;
/// callers must go through [`DraftOrder::recompute_total`] after mutating
/// `items` directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftOrder {
    pub umkm_id: i64,
    pub transaction_type: TransactionType,
    pub supplier_id: Option<i64>,
    /// Ordered item entries. Product ids need not be unique across entries.
    pub items: Vec<LineItem>,
    /// The transcript the draft was extracted from, verbatim.
    pub transcript: String,
    /// Derived sum of `unit_price * quantity` over all items.
    pub total: f64,
}

impl DraftOrder {
    /// Sum of `unit_price * quantity` over all items.
    pub fn computed_total(&self) -> f64 {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Restore the `total == computed_total()` invariant.
    pub fn recompute_total(&mut self) {
        self.total = self.computed_total();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Wire shapes
// =============================================================================

/// Raw draft transaction as extracted by the remote service.
///
/// Every field is optional: the extraction step may omit or garble any of
/// them, and normalization is responsible for rejecting what it cannot use.
/// A server-supplied `total` is never trusted; the normalizer recomputes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDraft {
    #[serde(default)]
    pub umkm_id: Option<i64>,
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub supplier_id: Option<i64>,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<RawLineItem>>,
    #[serde(default)]
    pub total: Option<f64>,
}

/// One unvalidated item entry from the raw draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLineItem {
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub unit_price: Option<f64>,
}

// =============================================================================
// Submission projection
// =============================================================================

/// One item entry as sent at confirmation time. No name: the server keys on
/// the product id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionItem {
    pub product_id: i64,
    pub quantity: u32,
    pub unit_price: f64,
}

/// Read-only projection of a [`DraftOrder`] sent over the wire to confirm it.
///
/// Deliberately carries no total: the server is the source of truth for
/// pricing at confirmation time and recomputes it from the items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub umkm_id: i64,
    pub transaction_type: TransactionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<i64>,
    pub transcript: String,
    pub items: Vec<SubmissionItem>,
}

impl From<&DraftOrder> for SubmissionRequest {
    fn from(order: &DraftOrder) -> Self {
        Self {
            umkm_id: order.umkm_id,
            transaction_type: order.transaction_type,
            supplier_id: order.supplier_id,
            transcript: order.transcript.clone(),
            items: order
                .items
                .iter()
                .map(|i| SubmissionItem {
                    product_id: i.product_id,
                    quantity: i.quantity,
                    unit_price: i.unit_price,
                })
                .collect(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
