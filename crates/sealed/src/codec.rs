//! AES-GCM seal/open over the raw `[nonce][ciphertext][tag]` envelope.
//!
//! This module is intentionally free of I/O and runtime dependencies. It
//! provides the low-level operations used by the vault binary and any future
//! record store.
//!
//! **Do NOT reuse a nonce under the same key.** GCM nonce reuse is
//! catastrophic — it breaks both confidentiality and authentication. [`seal`]
//! draws a fresh random nonce from the OS CSPRNG on every call; [`seal_with`]
//! exists so tests can substitute a deterministic source, not so callers can
//! fix the nonce.

use aes_gcm::{
    aead::{consts::U12, Aead, KeyInit},
    aes::Aes192,
    Aes128Gcm, Aes256Gcm, AesGcm, Nonce,
};

use crate::error::SealedError;
use crate::nonce::{NonceSource, OsNonceSource};

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Minimum length of a well-formed token: nonce plus tag over an empty payload.
pub const MIN_TOKEN_LEN: usize = NONCE_LEN + TAG_LEN;

/// AES-192-GCM, which the `aes-gcm` crate does not alias itself.
type Aes192Gcm = AesGcm<Aes192, U12>;

/// AES-GCM instance selected by key length.
enum Cipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl Cipher {
    /// Build the cipher matching `key`'s length.
    ///
    /// The key is used for this one instance and not retained anywhere else.
    fn for_key(key: &[u8]) -> Result<Self, SealedError> {
        match key.len() {
            16 => Aes128Gcm::new_from_slice(key).map(Cipher::Aes128),
            24 => Aes192Gcm::new_from_slice(key).map(Cipher::Aes192),
            32 => Aes256Gcm::new_from_slice(key).map(Cipher::Aes256),
            _ => return Err(SealedError::InvalidKeyLength(key.len())),
        }
        .map_err(|_| SealedError::InvalidKeyLength(key.len()))
    }

    fn encrypt(&self, nonce: &Nonce<U12>, plaintext: &[u8]) -> Result<Vec<u8>, aes_gcm::Error> {
        match self {
            Cipher::Aes128(c) => c.encrypt(nonce, plaintext),
            Cipher::Aes192(c) => c.encrypt(nonce, plaintext),
            Cipher::Aes256(c) => c.encrypt(nonce, plaintext),
        }
    }

    fn decrypt(&self, nonce: &Nonce<U12>, ciphertext: &[u8]) -> Result<Vec<u8>, aes_gcm::Error> {
        match self {
            Cipher::Aes128(c) => c.decrypt(nonce, ciphertext),
            Cipher::Aes192(c) => c.decrypt(nonce, ciphertext),
            Cipher::Aes256(c) => c.decrypt(nonce, ciphertext),
        }
    }
}

/// Seal `payload` under `key` into a self-contained token.
///
/// A fresh 96-bit nonce is drawn from the OS CSPRNG per call, so sealing the
/// same payload twice under the same key yields two different tokens. The
/// result is exactly `12 + payload.len() + 16` bytes and uses no associated
/// data.
///
/// # Errors
///
/// Returns [`SealedError::InvalidKeyLength`] if `key` is not 16, 24, or 32
/// bytes. No cryptographic work happens before that check passes.
pub fn seal(key: &[u8], payload: &[u8]) -> Result<Vec<u8>, SealedError> {
    seal_with(key, payload, &OsNonceSource)
}

/// [`seal`] with an explicit [`NonceSource`].
///
/// # Errors
///
/// Same as [`seal`].
pub fn seal_with(
    key: &[u8],
    payload: &[u8],
    nonces: &dyn NonceSource,
) -> Result<Vec<u8>, SealedError> {
    let cipher = Cipher::for_key(key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    nonces.fill(&mut nonce_bytes);
    let nonce = Nonce::<U12>::from_slice(&nonce_bytes);

    // Encryption over an in-memory buffer cannot fail with a valid key and
    // nonce; surface the generic aead failure rather than panic if it does.
    let ciphertext = cipher
        .encrypt(nonce, payload)
        .map_err(|_| SealedError::AuthenticationFailed)?;

    let mut token = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    token.extend_from_slice(&nonce_bytes);
    token.extend_from_slice(&ciphertext);
    Ok(token)
}

/// Open a token produced by [`seal`], recovering the exact original payload.
///
/// # Errors
///
/// Returns [`SealedError::InvalidKeyLength`] if `key` is not 16, 24, or 32
/// bytes, [`SealedError::MalformedToken`] if `token` is shorter than
/// [`MIN_TOKEN_LEN`], and [`SealedError::AuthenticationFailed`] if the tag
/// does not verify — a wrong key, a flipped bit, a truncated token, or
/// foreign data all land here, indistinguishably. There is no partial or
/// best-effort decryption path.
pub fn open(key: &[u8], token: &[u8]) -> Result<Vec<u8>, SealedError> {
    let cipher = Cipher::for_key(key)?;

    if token.len() < MIN_TOKEN_LEN {
        return Err(SealedError::MalformedToken(token.len()));
    }

    let (nonce_bytes, ciphertext) = token.split_at(NONCE_LEN);
    let nonce = Nonce::<U12>::from_slice(nonce_bytes);
    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| SealedError::AuthenticationFailed)
}
