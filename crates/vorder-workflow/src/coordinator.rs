//! The order workflow coordinator.
//!
//! Owns the draft between generation and confirmation and sequences the
//! two-phase submission protocol. Network calls are single-flight: a new
//! request while one is pending is rejected, never queued or raced. Each
//! generation attempt starts a new workflow instance identified by a
//! generation tag; responses belonging to an abandoned instance are
//! discarded instead of being applied to a newer draft.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use vorder_capture::AudioPayload;
use vorder_client::{ConfirmReceipt, OrderService};
use vorder_core::config::AccountConfig;
use vorder_core::types::DraftOrder;
use vorder_order::{normalize, DraftEditor};

use crate::error::WorkflowError;

/// Outcome of a draft-generation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftOutcome {
    /// The draft was validated and installed for editing.
    Ready(DraftOrder),
    /// The workflow instance was abandoned while the request was in flight;
    /// the response was discarded.
    Superseded,
}

/// Outcome of a confirmation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    /// The order was accepted; the local draft has been consumed.
    Submitted(ConfirmReceipt),
    /// The server accepted an order from an abandoned instance; the result
    /// was discarded and the current draft (if any) left untouched.
    Superseded,
}

/// Releases the single-flight latch on every exit path.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Coordinator for the capture -> draft -> edit -> confirm workflow.
///
/// Stateless between attempts beyond the retained draft: there is no
/// automatic retry, and failed attempts leave the draft exactly as it was.
pub struct OrderWorkflow<S: OrderService> {
    service: S,
    account: AccountConfig,
    draft: Mutex<Option<DraftEditor>>,
    /// Identifier of the current workflow instance.
    generation: AtomicU64,
    in_flight: AtomicBool,
}

impl<S: OrderService> OrderWorkflow<S> {
    pub fn new(service: S, account: AccountConfig) -> Self {
        Self {
            service,
            account,
            draft: Mutex::new(None),
            generation: AtomicU64::new(0),
            in_flight: AtomicBool::new(false),
        }
    }

    fn begin_flight(&self) -> Result<FlightGuard<'_>, WorkflowError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(WorkflowError::RequestInProgress);
        }
        Ok(FlightGuard(&self.in_flight))
    }

    /// Phase 1: generate a draft from a captured audio payload.
    ///
    /// Starts a new workflow instance. Transport or server failure maps to
    /// [`WorkflowError::OrderProcessingFailed`] and leaves any prior draft
    /// unchanged; validation failures propagate distinctly so the user is
    /// told to re-record rather than to retry the network.
    pub async fn generate_draft(
        &self,
        audio: AudioPayload,
    ) -> Result<DraftOutcome, WorkflowError> {
        let _flight = self.begin_flight()?;
        let instance = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tracing::info!(
            instance,
            payload_bytes = audio.len(),
            "Draft generation started"
        );

        let response = self
            .service
            .generate_draft(&audio, self.account.umkm_id)
            .await
            .map_err(|e| {
                tracing::warn!(instance, error = %e, "Draft generation failed");
                WorkflowError::OrderProcessingFailed(e.to_string())
            })?;

        let mut order = normalize(response.transcript.as_deref(), &response.draft_transaction)?;
        // The configured account identity is authoritative, not the echo
        // from the service.
        order.umkm_id = self.account.umkm_id;
        if order.supplier_id.is_none() {
            order.supplier_id = self.account.supplier_id;
        }

        if self.generation.load(Ordering::SeqCst) != instance {
            tracing::info!(instance, "Stale draft response discarded");
            return Ok(DraftOutcome::Superseded);
        }

        tracing::info!(
            instance,
            items = order.items.len(),
            total = order.total,
            "Draft ready for editing"
        );
        let mut guard = self.draft.lock().expect("draft mutex poisoned");
        *guard = Some(DraftEditor::new(order.clone()));
        Ok(DraftOutcome::Ready(order))
    }

    /// Phase 2: confirm the current (possibly edited) draft.
    ///
    /// Fails fast with [`WorkflowError::EmptyOrder`] if no items remain —
    /// an empty order is never sent. On transport or server failure the
    /// draft is retained unmodified so the user can confirm again without
    /// re-recording. On success the draft is consumed.
    pub async fn confirm(&self) -> Result<ConfirmOutcome, WorkflowError> {
        let _flight = self.begin_flight()?;
        let instance = self.generation.load(Ordering::SeqCst);

        let request = {
            let guard = self.draft.lock().expect("draft mutex poisoned");
            match guard.as_ref() {
                Some(editor) if !editor.is_empty() => editor.submission(),
                _ => return Err(WorkflowError::EmptyOrder),
            }
        };

        tracing::info!(instance, items = request.items.len(), "Confirmation started");

        let receipt = self.service.confirm(&request).await.map_err(|e| {
            tracing::warn!(instance, error = %e, "Confirmation failed, draft retained");
            WorkflowError::OrderSubmissionFailed(e.to_string())
        })?;

        if self.generation.load(Ordering::SeqCst) != instance {
            tracing::info!(instance, "Stale confirmation response discarded");
            return Ok(ConfirmOutcome::Superseded);
        }

        let mut guard = self.draft.lock().expect("draft mutex poisoned");
        *guard = None;
        tracing::info!(instance, message = %receipt.message, "Order submitted");
        Ok(ConfirmOutcome::Submitted(receipt))
    }

    /// Set the quantity of a line item in the current draft. Removing the
    /// last unit removes the entry. A no-op when there is no draft or no
    /// matching item.
    pub fn set_quantity(&self, product_id: i64, quantity: i64) {
        let mut guard = self.draft.lock().expect("draft mutex poisoned");
        match guard.as_mut() {
            Some(editor) => editor.set_quantity(product_id, quantity),
            None => tracing::debug!(product_id, "set_quantity ignored: no active draft"),
        }
    }

    /// Remove every entry matching `product_id` from the current draft.
    /// A no-op when there is no draft.
    pub fn remove_item(&self, product_id: i64) {
        let mut guard = self.draft.lock().expect("draft mutex poisoned");
        match guard.as_mut() {
            Some(editor) => editor.remove_item(product_id),
            None => tracing::debug!(product_id, "remove_item ignored: no active draft"),
        }
    }

    /// A snapshot of the current draft, if one is active.
    pub fn current_draft(&self) -> Option<DraftOrder> {
        let guard = self.draft.lock().expect("draft mutex poisoned");
        guard.as_ref().map(|editor| editor.order().clone())
    }

    /// Abandon the current workflow instance and drop the draft.
    ///
    /// Any response still in flight for the abandoned instance will be
    /// discarded when it lands. Returns `true` if a draft was dropped.
    pub fn discard_draft(&self) -> bool {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut guard = self.draft.lock().expect("draft mutex poisoned");
        let had_draft = guard.take().is_some();
        if had_draft {
            tracing::info!("Draft discarded");
        }
        had_draft
    }
}

// =============================================================================
// Tests
// =============================================================================
