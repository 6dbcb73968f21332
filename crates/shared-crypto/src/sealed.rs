//! # Sealed Messages
//!
//! Mutually authenticated encryption between two key pairs.
//!
//! ```text
//! shared  = X25519(local secret, remote public)
//! key     = HKDF-SHA256(shared, info = LABEL || sender pub || recipient pub)
//! sealed  = version[1] || nonce[24] || XChaCha20-Poly1305(key, nonce, plaintext, aad = version)
//! ```
//!
//! Both identities are bound into the key, so a message only opens for the
//! exact (recipient, sender) pair it was sealed for, and any modification of
//! the framing or ciphertext is detected.

use crate::{CryptoError, KeyPair};
use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    XChaCha20Poly1305, XNonce,
};
use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Current framing version.
pub const SEAL_VERSION: u8 = 1;

/// XChaCha20 nonce length.
pub const NONCE_LEN: usize = 24;

/// Poly1305 tag length.
pub const TAG_LEN: usize = 16;

const KDF_LABEL: &[u8] = b"registrar/sealed/v1";

#[derive(Zeroize, ZeroizeOnDrop)]
struct SessionKey([u8; 32]);

/// Seal `plaintext` from `sender` (private key required) to `recipient`.
///
/// # Errors
///
/// - `CryptoError::PublicKeyOnly` if `sender` has no private key
/// - `CryptoError::WeakKeyAgreement` if the recipient key is degenerate
/// - `CryptoError::EncryptionFailed` if the AEAD fails
pub fn seal(sender: &KeyPair, recipient: &KeyPair, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let key = session_key(sender, recipient, sender, recipient)?;
    let cipher = XChaCha20Poly1305::new((&key.0).into());

    let mut nonce = [0u8; NONCE_LEN];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut nonce);

    let ciphertext = cipher
        .encrypt(
            XNonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad: &[SEAL_VERSION],
            },
        )
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut sealed = Vec::with_capacity(1 + NONCE_LEN + ciphertext.len());
    sealed.push(SEAL_VERSION);
    sealed.extend_from_slice(&nonce);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Open a message sealed by `sender` for `recipient` (private key required).
///
/// # Errors
///
/// - `CryptoError::PublicKeyOnly` if `recipient` has no private key
/// - `CryptoError::DecryptionFailed` on bad framing, wrong keys or tampering
pub fn open(recipient: &KeyPair, sender: &KeyPair, sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() < 1 + NONCE_LEN + TAG_LEN {
        return Err(CryptoError::DecryptionFailed("sealed message too short".into()));
    }
    if sealed[0] != SEAL_VERSION {
        return Err(CryptoError::DecryptionFailed(format!(
            "unsupported sealed version {}",
            sealed[0]
        )));
    }

    let key = session_key(recipient, sender, sender, recipient)?;
    let cipher = XChaCha20Poly1305::new((&key.0).into());
    let (nonce, ciphertext) = sealed[1..].split_at(NONCE_LEN);

    cipher
        .decrypt(
            XNonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad: &[SEAL_VERSION],
            },
        )
        .map_err(|_| CryptoError::DecryptionFailed("authentication failed".into()))
}

/// Derive the directional session key. `local` must hold a private key.
fn session_key(
    local: &KeyPair,
    remote: &KeyPair,
    sender: &KeyPair,
    recipient: &KeyPair,
) -> Result<SessionKey, CryptoError> {
    let secret = local.x25519_secret()?;
    let shared = secret.diffie_hellman(&remote.x25519_public());
    if !shared.was_contributory() {
        return Err(CryptoError::WeakKeyAgreement);
    }

    let mut info = Vec::with_capacity(KDF_LABEL.len() + 64);
    info.extend_from_slice(KDF_LABEL);
    info.extend_from_slice(&sender.public_bytes());
    info.extend_from_slice(&recipient.public_bytes());

    let mut okm = [0u8; 32];
    Hkdf::<Sha256>::new(None, shared.as_bytes())
        .expand(&info, &mut okm)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let key = SessionKey(okm);
    okm.zeroize();
    Ok(key)
}
