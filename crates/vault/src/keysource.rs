//! Key acquisition: resolve the sealing key from the environment or a key file.
//!
//! The key is resolved once at startup and passed explicitly into every codec
//! call — there is no cached process-wide key and no interactive prompt. The
//! codec itself never sees where the key came from.
//!
//! # Security invariants
//!
//! - Key material is **never** written to disk, logged, or included in errors.
//! - The decoded bytes are zeroed when the [`KeyBytes`] buffer is dropped.

use std::fmt;

use thiserror::Error;
use tokio::fs;

/// Environment variable consulted first for the hex-encoded key.
pub const KEY_ENV_VAR: &str = "VAULT_KEY";

/// Errors produced while resolving the sealing key.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Neither the environment variable nor a key file supplied a key.
    #[error("no key available: set {KEY_ENV_VAR} or configure KEY_FILE")]
    Missing,

    /// The key material is not valid hex.
    #[error("key is not valid hex")]
    InvalidHex,

    /// The decoded key has an unsupported length.
    #[error("key has invalid length: {0} bytes (expected 16, 24, or 32)")]
    InvalidLength(usize),

    /// The key file could not be read.
    #[error("failed to read key file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Decoded key bytes.
///
/// When this type is dropped, the memory is overwritten with zeroes to
/// minimise the window during which plaintext key material lives in RAM.
pub struct KeyBytes(Vec<u8>);

impl KeyBytes {
    /// Decode a hex string into key bytes, enforcing the supported lengths.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidHex`] on malformed hex and
    /// [`KeyError::InvalidLength`] if the decoded value is not 16, 24, or 32
    /// bytes.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let mut bytes = hex::decode(hex_str.trim()).map_err(|_| KeyError::InvalidHex)?;
        match bytes.len() {
            16 | 24 | 32 => Ok(Self(bytes)),
            n => {
                bytes.iter_mut().for_each(|b| *b = 0);
                Err(KeyError::InvalidLength(n))
            }
        }
    }

    /// Borrow the raw key bytes for a codec call.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Drop for KeyBytes {
    fn drop(&mut self) {
        // Zero the key material on drop.
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl fmt::Debug for KeyBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("KeyBytes([REDACTED])")
    }
}

/// Resolve the sealing key: `VAULT_KEY` first, then the configured key file.
///
/// # Errors
///
/// Returns [`KeyError::Missing`] when neither source is available, or the
/// decode errors from [`KeyBytes::from_hex`].
pub async fn resolve(key_file: Option<&str>) -> Result<KeyBytes, KeyError> {
    resolve_from(std::env::var(KEY_ENV_VAR).ok(), key_file).await
}

/// [`resolve`] with the environment lookup made explicit, for tests.
async fn resolve_from(env_value: Option<String>, key_file: Option<&str>) -> Result<KeyBytes, KeyError> {
    if let Some(hex_str) = env_value {
        return KeyBytes::from_hex(&hex_str);
    }

    let Some(path) = key_file else {
        return Err(KeyError::Missing);
    };
    let contents = fs::read_to_string(path).await.map_err(|source| KeyError::Io {
        path: path.to_owned(),
        source,
    })?;
    KeyBytes::from_hex(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn decodes_all_supported_lengths() {
        for len in [16, 24, 32] {
            let hex_str = "ab".repeat(len);
            let key = KeyBytes::from_hex(&hex_str).unwrap();
            assert_eq!(key.as_slice().len(), len);
            assert!(key.as_slice().iter().all(|&b| b == 0xAB));
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let hex_str = format!("  {}\n", "01".repeat(32));
        let key = KeyBytes::from_hex(&hex_str).unwrap();
        assert_eq!(key.as_slice(), &[0x01u8; 32][..]);
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(matches!(
            KeyBytes::from_hex("not hex at all"),
            Err(KeyError::InvalidHex)
        ));
    }

    #[test]
    fn rejects_unsupported_length() {
        assert!(matches!(
            KeyBytes::from_hex(&"ff".repeat(15)),
            Err(KeyError::InvalidLength(15))
        ));
    }

    #[test]
    fn key_bytes_redacted_in_debug() {
        let key = KeyBytes::from_hex(&"ff".repeat(16)).unwrap();
        assert_eq!(format!("{key:?}"), "KeyBytes([REDACTED])");
    }

    #[tokio::test]
    async fn env_value_wins_over_key_file() {
        let env_value = Some("02".repeat(32));
        let key = resolve_from(env_value, Some("/nonexistent/key"))
            .await
            .unwrap();
        assert_eq!(key.as_slice(), &[0x02u8; 32][..]);
    }

    #[tokio::test]
    async fn falls_back_to_key_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", "03".repeat(24)).unwrap();

        let key = resolve_from(None, Some(file.path().to_str().unwrap()))
            .await
            .unwrap();
        assert_eq!(key.as_slice(), &[0x03u8; 24][..]);
    }

    #[tokio::test]
    async fn missing_everywhere_is_an_error() {
        assert!(matches!(
            resolve_from(None, None).await,
            Err(KeyError::Missing)
        ));
    }

    #[tokio::test]
    async fn unreadable_key_file_names_the_path() {
        let err = resolve_from(None, Some("/nonexistent/key"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/key"));
    }
}
