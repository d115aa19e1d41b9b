//! Configuration loading and validation for the `siv` command.
//!
//! Values are read from `SIV_`-prefixed environment variables. Key material
//! never comes from the command line, where it would land in shell history
//! and process listings.

use std::fmt;
use std::fs;

use anyhow::{Context, Result};
use serde::Deserialize;
use zeroize::Zeroizing;

/// Validated `siv` configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Hex-encoded 256, 384 or 512-bit key (`SIV_KEY`).
    #[serde(default)]
    pub key: Option<String>,

    /// Path to a file holding the hex-encoded key (`SIV_KEY_FILE`).
    #[serde(default)]
    pub key_file: Option<String>,

    /// Tracing log level (e.g. `"warn"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be read, or if not exactly
    /// one of `SIV_KEY` / `SIV_KEY_FILE` is set.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("SIV"))
            .build()
            .context("failed to build siv configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise siv configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        match (&self.key, &self.key_file) {
            (Some(_), Some(_)) => anyhow::bail!("set only one of SIV_KEY and SIV_KEY_FILE"),
            (None, None) => anyhow::bail!("one of SIV_KEY or SIV_KEY_FILE is required"),
            (Some(key), None) => ensure_non_empty(key, "SIV_KEY")?,
            (None, Some(path)) => ensure_non_empty(path, "SIV_KEY_FILE")?,
        }
        ensure_non_empty(&self.log_level, "SIV_LOG_LEVEL")
    }

    /// Resolve and hex-decode the configured key.
    ///
    /// Length is not checked here; `siv::setup` owns that rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the key file cannot be read or the key is not hex.
    pub fn key_bytes(&self) -> Result<Zeroizing<Vec<u8>>> {
        let encoded = match (&self.key, &self.key_file) {
            (Some(key), _) => Zeroizing::new(key.clone()),
            (None, Some(path)) => Zeroizing::new(
                fs::read_to_string(path)
                    .with_context(|| format!("failed to read SIV_KEY_FILE at {path}"))?,
            ),
            (None, None) => anyhow::bail!("one of SIV_KEY or SIV_KEY_FILE is required"),
        };
        let bytes = hex::decode(encoded.trim()).context("key must be hex-encoded")?;
        Ok(Zeroizing::new(bytes))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .field("key_file", &self.key_file)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} must not be empty");
    }
    Ok(())
}
