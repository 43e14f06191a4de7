//! Scriptable mock order service for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use vorder_capture::AudioPayload;
use vorder_core::types::{RawDraft, RawLineItem, SubmissionRequest};

use crate::error::ClientError;
use crate::service::{ConfirmReceipt, DraftResponse, OrderService};

/// Mock order service with scripted responses.
///
/// Responses are queued per call kind and popped in order; when the queue is
/// empty a canned success is returned. An optional gate (a zero-permit
/// semaphore) holds calls in flight until the test releases them, which is
/// how single-flight behavior is exercised deterministically.
#[derive(Clone, Default)]
pub struct MockOrderService {
    draft_responses: Arc<Mutex<VecDeque<Result<DraftResponse, ClientError>>>>,
    confirm_responses: Arc<Mutex<VecDeque<Result<ConfirmReceipt, ClientError>>>>,
    draft_calls: Arc<AtomicUsize>,
    confirm_calls: Arc<AtomicUsize>,
    gate: Option<Arc<Semaphore>>,
    last_submission: Arc<Mutex<Option<SubmissionRequest>>>,
}

impl MockOrderService {
    pub fn new() -> Self {
        Self::default()
    }

    /// A service whose calls block until [`MockOrderService::release`] grants
    /// them a permit.
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::default()
        }
    }

    /// Release `n` gated calls.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Queue the next draft-generation response.
    pub fn push_draft_response(&self, response: Result<DraftResponse, ClientError>) {
        self.draft_responses.lock().unwrap().push_back(response);
    }

    /// Queue the next confirmation response.
    pub fn push_confirm_response(&self, response: Result<ConfirmReceipt, ClientError>) {
        self.confirm_responses.lock().unwrap().push_back(response);
    }

    pub fn draft_calls(&self) -> usize {
        self.draft_calls.load(Ordering::SeqCst)
    }

    pub fn confirm_calls(&self) -> usize {
        self.confirm_calls.load(Ordering::SeqCst)
    }

    /// The most recent submission request received by `confirm`.
    pub fn last_submission(&self) -> Option<SubmissionRequest> {
        self.last_submission.lock().unwrap().clone()
    }

    /// A well-formed single-item draft response, for tests that only need
    /// "some valid draft".
    pub fn canned_draft() -> DraftResponse {
        DraftResponse {
            message: "Draft transaction generated successfully".to_string(),
            transcript: Some("two rice".to_string()),
            draft_transaction: RawDraft {
                umkm_id: Some(1),
                transaction_type: Some("sale".to_string()),
                supplier_id: None,
                transcript: Some("two rice".to_string()),
                items: Some(vec![RawLineItem {
                    product_id: Some(1),
                    name: Some("Rice".to_string()),
                    quantity: Some(2),
                    unit_price: Some(10000.0),
                }]),
                total: None,
            },
        }
    }

    async fn wait_gate(&self) {
        if let Some(gate) = &self.gate {
            let permit = gate.acquire().await.expect("gate semaphore closed");
            permit.forget();
        }
    }
}

#[async_trait]
impl OrderService for MockOrderService {
    async fn generate_draft(
        &self,
        _audio: &AudioPayload,
        _umkm_id: i64,
    ) -> Result<DraftResponse, ClientError> {
        self.draft_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_gate().await;
        match self.draft_responses.lock().unwrap().pop_front() {
            Some(response) => response,
            None => Ok(Self::canned_draft()),
        }
    }

    async fn confirm(&self, request: &SubmissionRequest) -> Result<ConfirmReceipt, ClientError> {
        self.confirm_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_gate().await;
        *self.last_submission.lock().unwrap() = Some(request.clone());
        match self.confirm_responses.lock().unwrap().pop_front() {
            Some(response) => response,
            None => Ok(ConfirmReceipt {
                message: "Sale transaction created".to_string(),
                sale_id: Some(1),
                purchase_id: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_responses_pop_in_order() {
        let mock = MockOrderService::new();
        mock.push_draft_response(Err(ClientError::Transport("down".to_string())));
        mock.push_draft_response(Ok(MockOrderService::canned_draft()));

        let audio = AudioPayload { data: vec![1, 2] };
        assert!(mock.generate_draft(&audio, 1).await.is_err());
        assert!(mock.generate_draft(&audio, 1).await.is_ok());
        assert_eq!(mock.draft_calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_script_returns_canned_success() {
        let mock = MockOrderService::new();
        let audio = AudioPayload { data: vec![] };
        let draft = mock.generate_draft(&audio, 1).await.unwrap();
        assert_eq!(draft.transcript.as_deref(), Some("two rice"));
    }

    #[tokio::test]
    async fn test_confirm_records_last_submission() {
        let mock = MockOrderService::new();
        let request = SubmissionRequest {
            umkm_id: 5,
            transaction_type: vorder_core::types::TransactionType::Sale,
            supplier_id: None,
            transcript: "two rice".to_string(),
            items: vec![],
        };
        mock.confirm(&request).await.unwrap();
        assert_eq!(mock.last_submission().unwrap().umkm_id, 5);
        assert_eq!(mock.confirm_calls(), 1);
    }

    #[tokio::test]
    async fn test_gated_call_waits_for_release() {
        let mock = MockOrderService::gated();
        let audio = AudioPayload { data: vec![] };

        let task = {
            let mock = mock.clone();
            tokio::spawn(async move { mock.generate_draft(&audio, 1).await })
        };
        tokio::task::yield_now().await;
        assert_eq!(mock.draft_calls(), 1);
        assert!(!task.is_finished());

        mock.release(1);
        let result = task.await.unwrap();
        assert!(result.is_ok());
    }
}
