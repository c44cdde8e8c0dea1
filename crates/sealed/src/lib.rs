//! Sealed-record codec: a symmetric authenticated-encryption envelope.
//!
//! [`seal`] turns a secret key and an arbitrary byte payload into a single
//! opaque token; [`open`] recovers the exact payload with the same key, or
//! fails if the token or key has changed in any way.
//!
//! # Token format
//!
//! ```text
//! [nonce: 12 bytes][ciphertext: payload length][tag: 16 bytes]
//! ```
//!
//! Raw concatenation, no framing. The token is self-contained: nothing
//! besides the key is needed to attempt decryption. It reveals the payload
//! length but nothing about its content.
//!
//! Every call is independent — the codec holds no state between calls and
//! retains no copy of the key, so it is safe to use concurrently from any
//! number of threads.

pub mod codec;
pub mod error;
pub mod nonce;

pub use codec::{open, seal, seal_with, MIN_TOKEN_LEN, NONCE_LEN, TAG_LEN};
pub use error::SealedError;
pub use nonce::{NonceSource, OsNonceSource};
