//! Nonce generation behind a capability interface.
//!
//! Production code uses [`OsNonceSource`], which draws from the OS CSPRNG.
//! Tests inject a deterministic source to assert the exact token byte layout.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;

#[cfg(test)]
use mockall::automock;

use crate::codec::NONCE_LEN;

/// Supplier of fresh 96-bit nonces for [`seal_with`](crate::seal_with).
///
/// Implementations must never repeat a nonce for the same key. The production
/// source satisfies this probabilistically by drawing uniformly at random
/// from the full 12-byte space on every call.
#[cfg_attr(test, automock)]
pub trait NonceSource {
    /// Fill `out` with the next nonce.
    fn fill(&self, out: &mut [u8; NONCE_LEN]);
}

/// [`NonceSource`] backed by the operating system's CSPRNG.
///
/// `OsRng` is safe for concurrent use — each call reads fresh entropy with
/// no shared mutable state.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn fill(&self, out: &mut [u8; NONCE_LEN]) {
        OsRng.fill_bytes(out);
    }
}
