//! Error types for the order service client.

use vorder_core::error::VorderError;

/// Errors from talking to the remote order service.
///
/// The client does not distinguish user-correctable conditions; it reports
/// what the transport and the server said, and the workflow layer decides how
/// to surface it.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Server returned {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<ClientError> for VorderError {
    fn from(err: ClientError) -> Self {
        VorderError::Transport(err.to_string())
    }
}
