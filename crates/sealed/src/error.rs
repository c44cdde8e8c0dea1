//! Error taxonomy for the sealed-record codec.

use thiserror::Error;

use crate::codec::MIN_TOKEN_LEN;

/// Errors produced by [`seal`](crate::seal) and [`open`](crate::open).
///
/// All three variants are terminal for the call that produced them; none is
/// worth retrying with the same inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SealedError {
    /// The key is not one of the supported AES key sizes.
    #[error("invalid key length: {0} bytes (expected 16, 24, or 32)")]
    InvalidKeyLength(usize),

    /// The token is too short to contain a nonce and an authentication tag.
    #[error("malformed token: {0} bytes (minimum {MIN_TOKEN_LEN})")]
    MalformedToken(usize),

    /// Authenticated decryption failed.
    ///
    /// Covers a wrong key, a corrupted or truncated token, tampering, and
    /// data produced under a different scheme. These cases are deliberately
    /// indistinguishable — the message names no cause, so callers cannot be
    /// used as a decryption oracle.
    #[error("authentication failed")]
    AuthenticationFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_lengths_but_not_causes() {
        let e = SealedError::InvalidKeyLength(15);
        assert!(e.to_string().contains("15"));

        let e = SealedError::MalformedToken(20);
        assert!(e.to_string().contains("20"));
        assert!(e.to_string().contains("28"));

        // The auth failure must stay opaque.
        assert_eq!(
            SealedError::AuthenticationFailed.to_string(),
            "authentication failed"
        );
    }
}
