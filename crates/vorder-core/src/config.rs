use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, VorderError};

/// Top-level configuration for the vorder client.
///
/// Loaded from `~/.vorder/config.toml` by default. Each section corresponds
/// to a bounded context or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VorderConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub account: AccountConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

/// Connection settings for the remote order service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the order service, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout in seconds for both draft generation and
    /// confirmation calls.
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Identity of the shop placing orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Account identifier sent with every request.
    pub umkm_id: i64,
    /// Default transaction type when the service does not tag the draft.
    pub transaction_type: crate::types::TransactionType,
    /// Supplier identifier for purchase transactions.
    pub supplier_id: Option<i64>,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            umkm_id: 1,
            transaction_type: crate::types::TransactionType::Sale,
            supplier_id: None,
        }
    }
}

/// Notification display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Seconds after which a toast self-dismisses.
    pub toast_dismiss_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            toast_dismiss_secs: 5,
        }
    }
}

impl VorderConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: VorderConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| VorderError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionType;

    #[test]
    fn test_default_config() {
        let config = VorderConfig::default();
        assert_eq!(config.service.base_url, "http://localhost:8000");
        assert_eq!(config.service.request_timeout_secs, 30);
        assert_eq!(config.account.umkm_id, 1);
        assert_eq!(config.account.transaction_type, TransactionType::Sale);
        assert!(config.account.supplier_id.is_none());
        assert_eq!(config.notify.toast_dismiss_secs, 5);
    }

    #[test]
    fn test_load_missing_file_falls_back_to_default() {
        let config = VorderConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.account.umkm_id, 1);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = VorderConfig::default();
        config.service.base_url = "https://orders.example.com".to_string();
        config.account.umkm_id = 42;
        config.account.transaction_type = TransactionType::Purchase;
        config.account.supplier_id = Some(3);

        config.save(&path).unwrap();
        let loaded = VorderConfig::load(&path).unwrap();
        assert_eq!(loaded.service.base_url, "https://orders.example.com");
        assert_eq!(loaded.account.umkm_id, 42);
        assert_eq!(loaded.account.transaction_type, TransactionType::Purchase);
        assert_eq!(loaded.account.supplier_id, Some(3));
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[account]\numkm_id = 9\ntransaction_type = \"sale\"\n").unwrap();

        let config = VorderConfig::load(&path).unwrap();
        assert_eq!(config.account.umkm_id, 9);
        // Missing sections fall back to defaults.
        assert_eq!(config.service.request_timeout_secs, 30);
        assert_eq!(config.notify.toast_dismiss_secs, 5);
    }

    #[test]
    fn test_load_invalid_toml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "service = [[[").unwrap();
        assert!(VorderConfig::load(&path).is_err());
    }
}
