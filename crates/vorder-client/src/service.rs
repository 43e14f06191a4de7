//! The order service seam and its wire types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use vorder_capture::AudioPayload;
use vorder_core::types::{RawDraft, SubmissionRequest};

use crate::error::ClientError;

/// Response to a draft-generation request.
///
/// Mirrors the backend's `/generate-draft` JSON: a status message, the
/// transcript the speech service heard, and the raw extracted draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub draft_transaction: RawDraft,
}

/// Response to a confirmation request.
///
/// The backend reports the created row id under a field named for the
/// transaction kind; any non-error response counts as success.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfirmReceipt {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub sale_id: Option<i64>,
    #[serde(default)]
    pub purchase_id: Option<i64>,
}

/// Remote transcription/extraction and order-processing service.
///
/// The workflow only ever talks to this trait; the HTTP implementation and
/// the test mock are interchangeable behind it.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Submit an audio payload for transcription and draft extraction.
    async fn generate_draft(
        &self,
        audio: &AudioPayload,
        umkm_id: i64,
    ) -> Result<DraftResponse, ClientError>;

    /// Submit a finalized order for confirmation.
    async fn confirm(&self, request: &SubmissionRequest) -> Result<ConfirmReceipt, ClientError>;
}
