//! # Key Pairs
//!
//! Ed25519 key pairs tagged with the role they play in the registration flow.
//!
//! ## Text Encoding
//!
//! ```text
//! public key:  <role char><base64url(key[32] || checksum[2])>
//! seed:        S<role char><base64url(seed[32] || checksum[2])>
//! ```
//!
//! The checksum is the first two bytes of SHA-256 over the text prefix and the
//! raw key bytes, so a key of one role never decodes as another role.

use crate::CryptoError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};
use std::fmt;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::Zeroize;

/// Raw key length in bytes.
pub const KEY_LEN: usize = 32;

/// Checksum length appended to encoded keys.
const CHECKSUM_LEN: usize = 2;

/// Prefix character of every encoded seed.
const SEED_PREFIX: char = 'S';

/// The role a key plays. Encoded as the first character of its public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRole {
    /// Authenticates publications to the resolver.
    Operator,
    /// Signs user claims.
    Account,
    /// A registering client.
    User,
    /// The registration service itself.
    Server,
}

impl KeyRole {
    /// Prefix character used in the text encoding.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::Operator => 'O',
            Self::Account => 'A',
            Self::User => 'U',
            Self::Server => 'N',
        }
    }

    fn from_prefix(c: char) -> Option<Self> {
        match c {
            'O' => Some(Self::Operator),
            'A' => Some(Self::Account),
            'U' => Some(Self::User),
            'N' => Some(Self::Server),
            _ => None,
        }
    }
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Operator => "operator",
            Self::Account => "account",
            Self::User => "user",
            Self::Server => "server",
        };
        f.write_str(name)
    }
}

/// An Ed25519 key pair, or just its public half.
///
/// Built with [`KeyPair::generate`], [`KeyPair::from_seed`] or
/// [`KeyPair::from_public_key`]. The last one has no private key; signing,
/// exporting the seed or acting as the local side of key agreement fails with
/// [`CryptoError::PublicKeyOnly`].
#[derive(Clone)]
pub struct KeyPair {
    role: KeyRole,
    verifying_key: VerifyingKey,
    signing_key: Option<SigningKey>,
}

impl KeyPair {
    /// Generate a fresh random key pair for `role`.
    #[must_use]
    pub fn generate(role: KeyRole) -> Self {
        let signing_key = SigningKey::generate(&mut rand::thread_rng());
        Self {
            role,
            verifying_key: signing_key.verifying_key(),
            signing_key: Some(signing_key),
        }
    }

    /// Restore a key pair from its encoded seed.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidSeed` on a bad prefix, encoding, length or
    /// checksum.
    pub fn from_seed(seed: &str) -> Result<Self, CryptoError> {
        let mut chars = seed.chars();
        if chars.next() != Some(SEED_PREFIX) {
            return Err(CryptoError::InvalidSeed("missing seed prefix".into()));
        }
        let role = chars
            .next()
            .and_then(KeyRole::from_prefix)
            .ok_or_else(|| CryptoError::InvalidSeed("unknown key role".into()))?;

        let tag = seed_tag(role);
        let mut raw = decode_body(&seed[2..], &tag).map_err(CryptoError::InvalidSeed)?;
        let signing_key = SigningKey::from_bytes(&raw);
        raw.zeroize();

        Ok(Self {
            role,
            verifying_key: signing_key.verifying_key(),
            signing_key: Some(signing_key),
        })
    }

    /// Build a public-only handle from an encoded public key.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidPublicKey` when the text does not decode to
    /// a valid, non-weak Ed25519 point of a known role.
    pub fn from_public_key(public_key: &str) -> Result<Self, CryptoError> {
        let role = public_key
            .chars()
            .next()
            .and_then(KeyRole::from_prefix)
            .ok_or_else(|| CryptoError::InvalidPublicKey("unknown key role".into()))?;

        let tag = public_tag(role);
        let raw = decode_body(&public_key[1..], &tag).map_err(CryptoError::InvalidPublicKey)?;
        let verifying_key = VerifyingKey::from_bytes(&raw)
            .map_err(|_| CryptoError::InvalidPublicKey("not a curve point".into()))?;
        if verifying_key.is_weak() {
            return Err(CryptoError::InvalidPublicKey("small-order point".into()));
        }

        Ok(Self {
            role,
            verifying_key,
            signing_key: None,
        })
    }

    /// Like [`KeyPair::from_public_key`] but also requires `role`.
    ///
    /// # Errors
    ///
    /// Decoding errors, or `CryptoError::UnexpectedRole`.
    pub fn from_public_key_with_role(public_key: &str, role: KeyRole) -> Result<Self, CryptoError> {
        let key = Self::from_public_key(public_key)?;
        key.require_role(role)?;
        Ok(key)
    }

    /// The role this key was created for.
    #[must_use]
    pub fn role(&self) -> KeyRole {
        self.role
    }

    /// Whether the private half is present.
    #[must_use]
    pub fn has_private_key(&self) -> bool {
        self.signing_key.is_some()
    }

    /// Fail unless this key has the given role.
    ///
    /// # Errors
    ///
    /// `CryptoError::UnexpectedRole` on mismatch.
    pub fn require_role(&self, expected: KeyRole) -> Result<(), CryptoError> {
        if self.role == expected {
            Ok(())
        } else {
            Err(CryptoError::UnexpectedRole {
                expected,
                actual: self.role,
            })
        }
    }

    /// Encoded public key, e.g. `U...` for a user.
    #[must_use]
    pub fn public_key(&self) -> String {
        let tag = public_tag(self.role);
        encode_body(&tag, self.verifying_key.as_bytes())
    }

    /// Encoded seed, e.g. `SA...` for an account.
    ///
    /// # Errors
    ///
    /// `CryptoError::PublicKeyOnly` when the private half is absent.
    pub fn seed(&self) -> Result<String, CryptoError> {
        let signing_key = self.signing_key()?;
        let tag = seed_tag(self.role);
        let mut raw = signing_key.to_bytes();
        let encoded = encode_body(&tag, &raw);
        raw.zeroize();
        Ok(encoded)
    }

    /// Sign a message (deterministic).
    ///
    /// # Errors
    ///
    /// `CryptoError::PublicKeyOnly` when the private half is absent.
    pub fn sign(&self, message: &[u8]) -> Result<[u8; 64], CryptoError> {
        Ok(self.signing_key()?.sign(message).to_bytes())
    }

    /// Verify a signature made by this key.
    ///
    /// # Errors
    ///
    /// `InvalidSignatureFormat` for a wrong-length signature,
    /// `SignatureVerificationFailed` otherwise.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let signature =
            Signature::from_slice(signature).map_err(|_| CryptoError::InvalidSignatureFormat)?;
        self.verifying_key
            .verify_strict(message, &signature)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }

    /// Raw Ed25519 public key bytes.
    #[must_use]
    pub fn public_bytes(&self) -> [u8; KEY_LEN] {
        self.verifying_key.to_bytes()
    }

    /// X25519 secret derived from the Ed25519 signing scalar.
    pub(crate) fn x25519_secret(&self) -> Result<StaticSecret, CryptoError> {
        let mut scalar = self.signing_key()?.to_scalar_bytes();
        let secret = StaticSecret::from(scalar);
        scalar.zeroize();
        Ok(secret)
    }

    /// X25519 public key (Montgomery form of the Ed25519 point).
    pub(crate) fn x25519_public(&self) -> X25519PublicKey {
        X25519PublicKey::from(self.verifying_key.to_montgomery().to_bytes())
    }

    fn signing_key(&self) -> Result<&SigningKey, CryptoError> {
        self.signing_key.as_ref().ok_or(CryptoError::PublicKeyOnly)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("role", &self.role)
            .field("public_key", &self.public_key())
            .field("has_private_key", &self.has_private_key())
            .finish()
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.role == other.role && self.verifying_key == other.verifying_key
    }
}

impl Eq for KeyPair {}

fn public_tag(role: KeyRole) -> String {
    role.prefix().to_string()
}

fn seed_tag(role: KeyRole) -> String {
    format!("{SEED_PREFIX}{}", role.prefix())
}

fn checksum(tag: &str, raw: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha256::new()
        .chain_update(tag.as_bytes())
        .chain_update(raw)
        .finalize();
    [digest[0], digest[1]]
}

fn encode_body(tag: &str, raw: &[u8; KEY_LEN]) -> String {
    let mut buf = Vec::with_capacity(KEY_LEN + CHECKSUM_LEN);
    buf.extend_from_slice(raw);
    buf.extend_from_slice(&checksum(tag, raw));
    let encoded = format!("{tag}{}", URL_SAFE_NO_PAD.encode(&buf));
    buf.zeroize();
    encoded
}

fn decode_body(body: &str, tag: &str) -> Result<[u8; KEY_LEN], String> {
    let mut buf = URL_SAFE_NO_PAD
        .decode(body)
        .map_err(|e| format!("bad encoding: {e}"))?;
    if buf.len() != KEY_LEN + CHECKSUM_LEN {
        let len = buf.len();
        buf.zeroize();
        return Err(format!("expected {} bytes, got {len}", KEY_LEN + CHECKSUM_LEN));
    }

    let mut raw = [0u8; KEY_LEN];
    raw.copy_from_slice(&buf[..KEY_LEN]);
    let valid = checksum(tag, &raw) == buf[KEY_LEN..];
    buf.zeroize();
    if !valid {
        raw.zeroize();
        return Err("checksum mismatch".into());
    }
    Ok(raw)
}
