//! Guard configuration.
//!
//! Owned by the caller and passed by reference into each guard call, so the
//! trading engine can mutate limits at runtime without the guards holding
//! hidden global state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading configuration from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Runtime-tunable settings read by the risk manager and the news filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Magnitude of the allowed daily loss in account currency.
    /// Zero disables the stop-loss check.
    #[serde(default)]
    pub daily_stop_loss: Decimal,

    /// Whether the economic-news blackout filter is consulted.
    #[serde(default)]
    pub news_filter_on: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            daily_stop_loss: Decimal::ZERO,
            news_filter_on: false,
        }
    }
}

impl GuardConfig {
    /// Load configuration from a JSON file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed. Fields absent
    /// from the file take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Load configuration, falling back to defaults if the file is missing
    /// or corrupted. A missing config means "no limits enforced".
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Stop-loss limit with malformed values normalized.
    ///
    /// A negative limit is treated the same as zero (check disabled) so the
    /// trading engine always receives a well-formed admission decision.
    #[must_use]
    pub fn effective_stop_loss(&self) -> Decimal {
        if self.daily_stop_loss > Decimal::ZERO {
            self.daily_stop_loss
        } else {
            Decimal::ZERO
        }
    }
}
