//! CLI argument definitions for the vorder application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use vorder_core::config::VorderConfig;

/// vorder — record a voice purchase order, review the draft, confirm it.
#[derive(Parser, Debug)]
#[command(name = "vorder", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Base URL of the order service (overrides the config file).
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// Audio file replayed as the microphone source.
    #[arg(short = 'a', long = "audio", default_value = "order.wav")]
    pub audio: PathBuf,

    /// Account identifier sent with every request (overrides the config file).
    #[arg(long = "umkm-id")]
    pub umkm_id: Option<i64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > VORDER_CONFIG env var > ~/.vorder/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("VORDER_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Apply CLI overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut VorderConfig) {
        if let Some(ref url) = self.base_url {
            config.service.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(id) = self.umkm_id {
            config.account.umkm_id = id;
        }
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > RUST_LOG env > "info".
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".vorder").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".vorder").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_config_values() {
        let args = CliArgs::parse_from([
            "vorder",
            "--base-url",
            "https://orders.example.com/",
            "--umkm-id",
            "7",
        ]);

        let mut config = VorderConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.service.base_url, "https://orders.example.com");
        assert_eq!(config.account.umkm_id, 7);
    }

    #[test]
    fn test_no_overrides_leave_config_untouched() {
        let args = CliArgs::parse_from(["vorder"]);
        let mut config = VorderConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.service.base_url, "http://localhost:8000");
        assert_eq!(config.account.umkm_id, 1);
        assert_eq!(args.audio, PathBuf::from("order.wav"));
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let args = CliArgs::parse_from(["vorder", "-c", "/tmp/custom.toml"]);
        assert_eq!(
            args.resolve_config_path(),
            PathBuf::from("/tmp/custom.toml")
        );
    }
}
