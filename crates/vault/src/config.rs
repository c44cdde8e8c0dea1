//! Configuration loading and validation for the vault binary.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is present but invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated vault configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory the embedding store keeps sealed tokens in.
    #[serde(default = "default_embeddings_dir")]
    pub embeddings_dir: String,

    /// Path to a file holding the hex-encoded sealing key. Used only when the
    /// `VAULT_KEY` environment variable is unset.
    #[serde(default)]
    pub key_file: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_embeddings_dir() -> String {
    "embeddings".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.embeddings_dir.trim().is_empty() {
            anyhow::bail!("EMBEDDINGS_DIR must not be empty");
        }
        if let Some(path) = &self.key_file {
            if path.trim().is_empty() {
                anyhow::bail!("KEY_FILE must not be empty when set");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_embeddings_dir(), "embeddings");
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_accepts_defaults() {
        let cfg = Config {
            embeddings_dir: default_embeddings_dir(),
            key_file: None,
            log_level: default_log_level(),
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_embeddings_dir() {
        let cfg = Config {
            embeddings_dir: "  ".into(),
            key_file: None,
            log_level: default_log_level(),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_key_file() {
        let cfg = Config {
            embeddings_dir: default_embeddings_dir(),
            key_file: Some("".into()),
            log_level: default_log_level(),
        };
        assert!(cfg.validate().is_err());
    }
}
