//! In-place draft editing with total recomputation.
//!
//! The editor owns a normalized [`DraftOrder`] and applies the user's
//! corrections. After every mutation the total is recomputed from scratch
//! rather than patched incrementally, which eliminates drift between the
//! items and the displayed total; callers never observe the order with a
//! stale total.

use vorder_core::types::{DraftOrder, LineItem, SubmissionRequest};

/// Editor holding exclusive ownership of a draft order between
/// normalization and submission (or discard).
#[derive(Debug, Clone, PartialEq)]
pub struct DraftEditor {
    order: DraftOrder,
}

impl DraftEditor {
    /// Take ownership of a normalized draft order.
    pub fn new(mut order: DraftOrder) -> Self {
        // Establish the invariant regardless of what the caller hands in.
        order.recompute_total();
        Self { order }
    }

    /// Set the quantity of every entry matching `product_id`.
    ///
    /// Negative quantities clamp to zero, and zero removes the matching
    /// entries entirely; a zero-quantity row is never retained. Values above
    /// `u32::MAX` saturate. An id with no
    /// matching entry is a no-op, so repeated taps on a removed row are
    /// harmless.
    pub fn set_quantity(&mut self, product_id: i64, quantity: i64) {
        // Negative values clamp to 0 (remove), oversized values to u32::MAX.
        let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);

        if !self.order.items.iter().any(|i| i.product_id == product_id) {
            return;
        }

        if quantity == 0 {
            self.order.items.retain(|i| i.product_id != product_id);
        } else {
            for item in self
                .order
                .items
                .iter_mut()
                .filter(|i| i.product_id == product_id)
            {
                item.quantity = quantity;
            }
        }
        self.order.recompute_total();
        tracing::debug!(product_id, quantity, total = self.order.total, "Quantity updated");
    }

    /// Remove every entry matching `product_id` and recompute the total.
    pub fn remove_item(&mut self, product_id: i64) {
        self.order.items.retain(|i| i.product_id != product_id);
        self.order.recompute_total();
        tracing::debug!(product_id, total = self.order.total, "Item removed");
    }

    /// The current draft order.
    pub fn order(&self) -> &DraftOrder {
        &self.order
    }

    /// The current item entries.
    pub fn items(&self) -> &[LineItem] {
        &self.order.items
    }

    /// The derived order total.
    pub fn total(&self) -> f64 {
        self.order.total
    }

    pub fn is_empty(&self) -> bool {
        self.order.items.is_empty()
    }

    /// Project the draft into the wire form sent at confirmation.
    pub fn submission(&self) -> SubmissionRequest {
        SubmissionRequest::from(&self.order)
    }

    /// Consume the editor, yielding the draft order.
    pub fn into_order(self) -> DraftOrder {
        self.order
    }
}

// =============================================================================
// Tests
// =============================================================================
