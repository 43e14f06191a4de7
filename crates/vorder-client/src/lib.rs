//! Order service client.
//!
//! Defines the [`OrderService`] seam between the workflow and the remote
//! transcription/extraction backend, the wire types for both calls, and two
//! implementations: an HTTP client (reqwest) and a scriptable mock for tests.

pub mod error;
pub mod http;
pub mod mock;
pub mod service;

pub use error::ClientError;
pub use http::HttpOrderService;
pub use mock::MockOrderService;
pub use service::{ConfirmReceipt, DraftResponse, OrderService};
