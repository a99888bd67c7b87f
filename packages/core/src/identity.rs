//! Who a document is attributed to, and the key it is signed with.
//!
//! The two are separate: an [`AuthorIdentity`] is a stable identifier (an
//! ORCID, typically) plus a display name, and is what provenance and pubinfo
//! attribute the document to. A [`SigningIdentity`] is an Ed25519 key pair.
//! The library does no I/O; the host persists the seed and passes it back on
//! later runs.
//!
//! ```text
//! First run:
//!   key  = SigningIdentity::generate()
//!   seed = key.seed()            // persist this, 32 raw bytes
//!
//! Subsequent runs:
//!   key  = SigningIdentity::from_seed(&seed)
//! ```

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

/// The author a session attributes its documents to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorIdentity {
    /// Identity IRI, e.g. `https://orcid.org/0000-0002-1784-2920`.
    pub id: String,
    pub name: String,
}

impl AuthorIdentity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// An Ed25519 key pair used by [`LocalSigner`](crate::LocalSigner).
#[derive(Clone)]
pub struct SigningIdentity {
    signing_key: SigningKey,
}

impl SigningIdentity {
    /// Generate a fresh key using OS randomness.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Restore a key from a previously saved 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// The raw 32-byte seed. **Keep this secret.**
    pub fn seed(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// The public key in multibase form: `z` + base58btc of the Ed25519
    /// multicodec prefix `[0xed, 0x01]` followed by the key bytes.
    pub fn public_key_multibase(&self) -> String {
        multibase_from_verifying_key(self.signing_key.verifying_key())
    }

    /// Sign `message`, returning the raw 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        use ed25519_dalek::Signer;
        self.signing_key.sign(message).to_bytes().to_vec()
    }
}

impl std::fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("public_key", &self.public_key_multibase())
            .finish_non_exhaustive()
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn multibase_from_verifying_key(vk: VerifyingKey) -> String {
    // Multicodec prefix for Ed25519 public key: 0xed 0x01
    let mut prefixed = vec![0xed, 0x01];
    prefixed.extend_from_slice(vk.as_bytes());
    format!("z{}", bs58::encode(prefixed).into_string())
}

/// Decode a key produced by [`SigningIdentity::public_key_multibase`].
pub(crate) fn verifying_key_from_multibase(multibase: &str) -> Result<VerifyingKey, String> {
    let data = multibase
        .strip_prefix('z')
        .ok_or_else(|| "multibase must start with 'z'".to_string())?;
    let decoded = bs58::decode(data)
        .into_vec()
        .map_err(|e| format!("base58 decode failed: {e}"))?;
    if decoded.len() < 2 || decoded[0] != 0xed || decoded[1] != 0x01 {
        return Err("missing ed25519 multicodec prefix [0xed, 0x01]".into());
    }
    let key_bytes: [u8; 32] = decoded[2..]
        .try_into()
        .map_err(|_| "key must be 32 bytes".to_string())?;
    VerifyingKey::from_bytes(&key_bytes).map_err(|e| format!("invalid Ed25519 key: {e}"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_from_seed() {
        let id = SigningIdentity::generate();
        let restored = SigningIdentity::from_seed(&id.seed());
        assert_eq!(id.public_key_multibase(), restored.public_key_multibase());
    }

    #[test]
    fn public_key_multibase_roundtrip() {
        let id = SigningIdentity::generate();
        let mb = id.public_key_multibase();
        assert!(mb.starts_with("z6Mk"), "got: {mb}");
        let vk = verifying_key_from_multibase(&mb).unwrap();
        assert_eq!(vk, id.signing_key.verifying_key());
    }

    #[test]
    fn rejects_non_multibase_key() {
        assert!(verifying_key_from_multibase("6MkNoPrefix").is_err());
        assert!(verifying_key_from_multibase("z111").is_err());
    }

    #[test]
    fn sign_returns_64_bytes() {
        let id = SigningIdentity::generate();
        assert_eq!(id.sign(b"hello nanopub").len(), 64);
    }

    #[test]
    fn debug_hides_the_seed() {
        let id = SigningIdentity::from_seed(&[7u8; 32]);
        let shown = format!("{id:?}");
        assert!(shown.contains(&id.public_key_multibase()));
        assert!(!shown.contains("signing_key"));
    }
}
