//! # Settlement Configuration
//!
//! Configuration management for the settlement service.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BILLSPLIT_ROUNDING_BIAS=floor                                      │
//! │     BILLSPLIT_MAX_ITEMS=200                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/billsplit/settlement.toml (Linux)                        │
//! │     ~/Library/Application Support/com.billsplit.billsplit/... (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     ceiling bias, 500 items, 100 shares per item, 100 payments         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # settlement.toml
//! [rounding]
//! bias = "ceiling"  # ceiling | floor
//!
//! [limits]
//! max_items = 500
//! max_shares_per_item = 100
//! max_payments = 100
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use billsplit_core::{RoundingBias, SettlementOptions};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Rounding Configuration
// =============================================================================

/// How invoice totals are reconciled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingConfig {
    /// Which way the reconciliation target is rounded.
    #[serde(default)]
    pub bias: RoundingBias,
}

// =============================================================================
// Limits Configuration
// =============================================================================

/// Upper bounds on a single bill.
///
/// Settlement cost grows with the number of participants and shares; these
/// keep one request from monopolizing a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    #[serde(default = "default_max_shares_per_item")]
    pub max_shares_per_item: usize,

    #[serde(default = "default_max_payments")]
    pub max_payments: usize,
}

fn default_max_items() -> usize {
    500
}

fn default_max_shares_per_item() -> usize {
    100
}

fn default_max_payments() -> usize {
    100
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_items: default_max_items(),
            max_shares_per_item: default_max_shares_per_item(),
            max_payments: default_max_payments(),
        }
    }
}

// =============================================================================
// Complete Configuration
// =============================================================================

/// Complete settlement service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementConfig {
    #[serde(default)]
    pub rounding: RoundingConfig,

    #[serde(default)]
    pub limits: LimitsConfig,
}

impl SettlementConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Load from TOML file if it exists
    /// 3. Override with environment variables
    /// 4. Validate
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading settlement config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load settlement config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let limits = [
            ("max_items", self.limits.max_items),
            ("max_shares_per_item", self.limits.max_shares_per_item),
            ("max_payments", self.limits.max_payments),
        ];

        for (name, value) in limits {
            if value == 0 {
                return Err(ConfigError::InvalidValue(format!(
                    "{} must be greater than 0",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Engine options derived from this configuration.
    pub fn settlement_options(&self) -> SettlementOptions {
        SettlementOptions::with_bias(self.rounding.bias)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup. Unparseable values are logged
    /// and ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bias) = lookup("BILLSPLIT_ROUNDING_BIAS") {
            match bias.parse() {
                Ok(parsed) => {
                    debug!(bias = %bias, "Overriding rounding bias from environment");
                    self.rounding.bias = parsed;
                }
                Err(e) => warn!(error = %e, "Ignoring rounding bias from environment"),
            }
        }

        let limits = [
            ("BILLSPLIT_MAX_ITEMS", &mut self.limits.max_items),
            ("BILLSPLIT_MAX_SHARES_PER_ITEM", &mut self.limits.max_shares_per_item),
            ("BILLSPLIT_MAX_PAYMENTS", &mut self.limits.max_payments),
        ];

        for (key, slot) in limits {
            if let Some(value) = lookup(key) {
                match value.parse::<usize>() {
                    Ok(parsed) => {
                        debug!(key, value = parsed, "Overriding limit from environment");
                        *slot = parsed;
                    }
                    Err(_) => warn!(key, value = %value, "Ignoring non-numeric limit"),
                }
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "billsplit", "billsplit")
            .map(|dirs| dirs.config_dir().join("settlement.toml"))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SettlementConfig::default();
        assert_eq!(config.rounding.bias, RoundingBias::Ceiling);
        assert_eq!(config.limits.max_items, 500);
        assert_eq!(config.limits.max_shares_per_item, 100);
        assert_eq!(config.limits.max_payments, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = SettlementConfig::default();
        config.limits.max_payments = 0;

        match config.validate() {
            Err(ConfigError::InvalidValue(message)) => assert!(message.contains("max_payments")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SettlementConfig = toml::from_str(
            r#"
            [rounding]
            bias = "floor"
            "#,
        )
        .unwrap();

        assert_eq!(config.rounding.bias, RoundingBias::Floor);
        assert_eq!(config.limits, LimitsConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[limits]\nmax_items = 10\nmax_shares_per_item = 4\nmax_payments = 3"
        )
        .unwrap();

        let config = SettlementConfig::load(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.limits.max_items, 10);
        assert_eq!(config.limits.max_shares_per_item, 4);
        assert_eq!(config.limits.max_payments, 3);
    }

    #[test]
    fn test_load_rejects_bad_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[limits]\nmax_items = \"many\"").unwrap();
        assert!(matches!(
            SettlementConfig::load(Some(file.path().to_path_buf())),
            Err(ConfigError::Parse(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[limits]\nmax_items = 0").unwrap();
        assert!(matches!(
            SettlementConfig::load(Some(file.path().to_path_buf())),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SettlementConfig::load_or_default(Some(dir.path().join("absent.toml")));
        assert_eq!(config.limits, LimitsConfig::default());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("BILLSPLIT_ROUNDING_BIAS", "floor"),
            ("BILLSPLIT_MAX_ITEMS", "42"),
            ("BILLSPLIT_MAX_PAYMENTS", "lots"),
        ]);

        let mut config = SettlementConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|value| value.to_string()));

        assert_eq!(config.rounding.bias, RoundingBias::Floor);
        assert_eq!(config.limits.max_items, 42);
        assert_eq!(config.limits.max_payments, 100); // unparseable, ignored
        assert_eq!(config.settlement_options().bias, RoundingBias::Floor);
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&SettlementConfig::default()).unwrap();
        assert!(toml_str.contains("[rounding]"));
        assert!(toml_str.contains("[limits]"));
        assert!(toml_str.contains("bias = \"ceiling\""));
    }
}
