//! HTTP implementation of the order service.
//!
//! Talks to the backend's `/api/v1/transactions/generate-draft` (multipart
//! audio upload) and `/api/v1/transactions/confirm` (JSON) endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;

use vorder_capture::AudioPayload;
use vorder_core::config::ServiceConfig;
use vorder_core::types::SubmissionRequest;

use crate::error::ClientError;
use crate::service::{ConfirmReceipt, DraftResponse, OrderService};

/// Order service client backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpOrderService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOrderService {
    /// Build a client from the service configuration.
    pub fn new(config: &ServiceConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/transactions/{}", self.base_url, path)
    }

    /// Extract the error detail from a non-success response body, falling
    /// back to the raw body when it is not the backend's `{"detail": ...}`
    /// shape.
    async fn status_error(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
            .unwrap_or(body);
        ClientError::Status { status, detail }
    }
}

#[async_trait]
impl OrderService for HttpOrderService {
    async fn generate_draft(
        &self,
        audio: &AudioPayload,
        umkm_id: i64,
    ) -> Result<DraftResponse, ClientError> {
        let part = multipart::Part::bytes(audio.data.clone())
            .file_name("voice.wav")
            .mime_str("audio/wav")
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let form = multipart::Form::new().part("audio", part);

        tracing::info!(
            umkm_id,
            payload_bytes = audio.len(),
            "Sending draft generation request"
        );

        let response = self
            .client
            .post(self.url("generate-draft"))
            .query(&[("umkm_id", umkm_id)])
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let draft: DraftResponse = response.json().await?;
        tracing::debug!(message = %draft.message, "Draft generation response received");
        Ok(draft)
    }

    async fn confirm(&self, request: &SubmissionRequest) -> Result<ConfirmReceipt, ClientError> {
        tracing::info!(
            umkm_id = request.umkm_id,
            items = request.items.len(),
            transaction_type = %request.transaction_type,
            "Sending confirmation request"
        );

        let response = self
            .client
            .post(self.url("confirm"))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let receipt: ConfirmReceipt = response.json().await?;
        tracing::debug!(message = %receipt.message, "Confirmation response received");
        Ok(receipt)
    }
}
