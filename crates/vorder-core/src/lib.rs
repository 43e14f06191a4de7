pub mod config;
pub mod error;
pub mod types;

pub use config::VorderConfig;
pub use error::{Result, VorderError};
pub use types::*;
