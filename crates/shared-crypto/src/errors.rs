//! Crypto error types.

use crate::keys::KeyRole;
use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed (tampered ciphertext, wrong key pair, corrupt framing)
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Invalid signature format
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// Public key text could not be decoded
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Seed text could not be decoded
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    /// Operation needs the private half but the pair was built from a public key
    #[error("Key pair has no private key")]
    PublicKeyOnly,

    /// Key has a different role than the operation requires
    #[error("Unexpected key role: expected {expected}, got {actual}")]
    UnexpectedRole {
        /// Role the caller asked for
        expected: KeyRole,
        /// Role encoded in the key
        actual: KeyRole,
    },

    /// Key agreement produced a non-contributory shared secret
    #[error("Key agreement rejected: non-contributory shared secret")]
    WeakKeyAgreement,
}
