//! The signing and persistence gateway.
//!
//! [`Gateway`] is the seam between the engine and whatever assigns final
//! identifiers: it takes a finished [`Document`] and returns a
//! [`SignedDocument`], atomically, or an error. [`LocalSigner`] is the
//! built-in implementation:
//!
//! 1. signature metadata (algorithm, public key, target, signer) is added to
//!    pubinfo on `<doc>sig`;
//! 2. the quads, still in the temporary namespace, are sorted and
//!    canonicalized with JCS (RFC 8785);
//! 3. the payload is signed with Ed25519 and the signature encoded as
//!    `z` + base58btc;
//! 4. the artifact code is `RA` + base64url(SHA-256(payload ‖ signature)),
//!    and every temporary IRI is rewritten under
//!    `https://w3id.org/np/<code>`;
//! 5. `npx:hasSignature` is added last.
//!
//! [`verify_signature`] undoes step 4 and checks the signature and the code.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use ed25519_dalek::Verifier;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;

use crate::document::Document;
use crate::error::ExchangeError;
use crate::identity::{verifying_key_from_multibase, SigningIdentity};
use crate::rdf::{Node, Quad, Triple};
use crate::serializer::Format;
use crate::vocab;

/// Errors returned by a [`Gateway`].
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("document {0} is already signed")]
    AlreadySigned(String),
    #[error("canonicalization failed: {0}")]
    Canonicalization(String),
    #[error("signing failed: {0}")]
    Signing(String),
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors returned by [`verify_signature`].
#[derive(Debug, Error, PartialEq)]
pub enum ProofError {
    #[error("document has no signature")]
    SignatureMissing,
    #[error("document has no public key")]
    PublicKeyMissing,
    #[error("public key is not a valid multibase Ed25519 key: {0}")]
    InvalidKey(String),
    #[error("signature decoding failed: {0}")]
    DecodingFailed(String),
    #[error("signature verification failed")]
    VerificationFailed,
    #[error("artifact code mismatch: the IRI says {found}, the content hashes to {expected}")]
    ArtifactMismatch { expected: String, found: String },
    #[error("canonicalization failed: {0}")]
    Canonicalization(String),
}

/// Turns finished documents into signed, globally addressable ones.
///
/// Implementations never retry and never sign partially; the unsigned
/// document is borrowed and stays intact whatever happens.
pub trait Gateway {
    fn sign(&self, document: &Document) -> Result<SignedDocument, GatewayError>;

    /// Write a signed document to `destination`.
    fn serialize(
        &self,
        signed: &SignedDocument,
        format: Format,
        destination: &Path,
    ) -> Result<(), GatewayError> {
        std::fs::write(destination, signed.to_string_in(format)).map_err(|source| {
            GatewayError::Io {
                path: destination.to_path_buf(),
                source,
            }
        })
    }
}

/// A document with its final IRI, artifact code, and signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedDocument {
    document: Document,
    artifact_code: String,
    signature: String,
}

impl SignedDocument {
    /// The final document IRI, `https://w3id.org/np/RA...`.
    pub fn iri(&self) -> &str {
        self.document.iri()
    }

    /// The final IRI of the concept the document introduces, if any.
    pub fn concept_iri(&self) -> Option<&str> {
        self.document.introduces()
    }

    pub fn artifact_code(&self) -> &str {
        &self.artifact_code
    }

    /// The `z`-prefixed base58btc Ed25519 signature.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// The signed content; every IRI is final.
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn quads(&self) -> Vec<Quad> {
        self.document.quads()
    }

    pub fn to_string_in(&self, format: Format) -> String {
        let prefixes = [("sub".to_string(), format!("{}/", self.iri()))];
        format.write(&self.quads(), &prefixes)
    }

    /// Rebuild a signed document from its quads (e.g. parsed N-Quads).
    pub fn from_quads(quads: &[Quad]) -> Result<SignedDocument, ExchangeError> {
        let iri = quads
            .iter()
            .find(|q| {
                q.predicate == vocab::RDF_TYPE
                    && q.object.as_iri() == Some(vocab::NP_NANOPUBLICATION)
            })
            .map(|q| q.subject.clone())
            .ok_or_else(|| ExchangeError::NotADocument("no np:Nanopublication".into()))?;
        let artifact_code = iri
            .strip_prefix(vocab::FINAL_BASE)
            .filter(|code| code.starts_with("RA"))
            .ok_or_else(|| ExchangeError::NotADocument(format!("{iri} is not a final IRI")))?
            .to_string();

        let graph_of = |predicate: &str| -> Result<String, ExchangeError> {
            quads
                .iter()
                .find(|q| q.subject == iri && q.predicate == predicate)
                .and_then(|q| q.object.as_iri())
                .map(str::to_string)
                .ok_or_else(|| ExchangeError::NotADocument(format!("missing <{predicate}>")))
        };
        let segment = |graph: &str| -> Vec<Triple> {
            quads
                .iter()
                .filter(|q| q.graph == graph)
                .map(Quad::triple)
                .collect()
        };
        let assertion = segment(&graph_of(vocab::NP_HAS_ASSERTION)?);
        let provenance = segment(&graph_of(vocab::NP_HAS_PROVENANCE)?);
        let pubinfo = segment(&graph_of(vocab::NP_HAS_PUBINFO)?);

        let signature = pubinfo
            .iter()
            .find(|t| t.predicate == vocab::NPX_HAS_SIGNATURE)
            .map(|t| t.object.value().to_string())
            .ok_or_else(|| ExchangeError::NotADocument("no npx:hasSignature".into()))?;
        let introduces = pubinfo
            .iter()
            .find(|t| t.subject == iri && t.predicate == vocab::NPX_INTRODUCES)
            .and_then(|t| t.object.as_iri())
            .map(str::to_string);

        Ok(SignedDocument {
            document: Document {
                iri,
                assertion,
                provenance,
                pubinfo,
                introduces,
            },
            artifact_code,
            signature,
        })
    }
}

/// Signs with a local Ed25519 key.
#[derive(Debug, Clone)]
pub struct LocalSigner {
    key: SigningIdentity,
    signed_by: String,
}

impl LocalSigner {
    /// `signed_by` is the identity IRI recorded as `npx:signedBy`.
    pub fn new(key: SigningIdentity, signed_by: impl Into<String>) -> Self {
        Self {
            key,
            signed_by: signed_by.into(),
        }
    }

    pub fn public_key_multibase(&self) -> String {
        self.key.public_key_multibase()
    }
}

impl Gateway for LocalSigner {
    fn sign(&self, document: &Document) -> Result<SignedDocument, GatewayError> {
        if document.iri() != vocab::TEMP_NS {
            return Err(GatewayError::AlreadySigned(document.iri().to_string()));
        }

        let mut unsigned = document.clone();
        let sig_node = format!("{}sig", vocab::TEMP_NS);
        unsigned.pubinfo.extend([
            Triple::new(&sig_node, vocab::NPX_HAS_ALGORITHM, Node::literal("Ed25519")),
            Triple::new(
                &sig_node,
                vocab::NPX_HAS_PUBLIC_KEY,
                Node::literal(self.key.public_key_multibase()),
            ),
            Triple::new(&sig_node, vocab::NPX_HAS_SIGNATURE_TARGET, Node::iri(vocab::TEMP_NS)),
            Triple::new(&sig_node, vocab::NPX_SIGNED_BY, Node::iri(&self.signed_by)),
        ]);

        let payload = canonical_payload(&unsigned).map_err(GatewayError::Canonicalization)?;
        let sig_bytes = self.key.sign(&payload);
        if sig_bytes.len() != 64 {
            return Err(GatewayError::Signing(format!(
                "expected a 64-byte signature, got {}",
                sig_bytes.len()
            )));
        }
        let signature = format!("z{}", bs58::encode(&sig_bytes).into_string());
        let artifact_code = artifact_code(&payload, &sig_bytes);

        let final_iri = format!("{}{artifact_code}", vocab::FINAL_BASE);
        let mut document = rewrite(&unsigned, vocab::TEMP_NS, |rest| {
            if rest.is_empty() {
                final_iri.clone()
            } else {
                format!("{final_iri}/{rest}")
            }
        });
        document.pubinfo.push(Triple::new(
            format!("{final_iri}/sig"),
            vocab::NPX_HAS_SIGNATURE,
            Node::literal(&signature),
        ));

        info!(
            iri = %final_iri,
            concept = document.introduces().unwrap_or("-"),
            "document signed"
        );

        Ok(SignedDocument {
            document,
            artifact_code,
            signature,
        })
    }
}

/// Verify the signature and the artifact code of a signed document.
///
/// No network calls: the public key is read from the document itself.
pub fn verify_signature(signed: &SignedDocument) -> Result<(), ProofError> {
    let doc = signed.document();
    let final_iri = doc.iri();
    let sig_node = format!("{final_iri}/sig");

    let signature = doc
        .pubinfo()
        .iter()
        .find(|t| t.subject == sig_node && t.predicate == vocab::NPX_HAS_SIGNATURE)
        .map(|t| t.object.value().to_string())
        .ok_or(ProofError::SignatureMissing)?;
    let public_key = doc
        .pubinfo()
        .iter()
        .find(|t| t.subject == sig_node && t.predicate == vocab::NPX_HAS_PUBLIC_KEY)
        .map(|t| t.object.value().to_string())
        .ok_or(ProofError::PublicKeyMissing)?;
    let verifying_key = verifying_key_from_multibase(&public_key).map_err(ProofError::InvalidKey)?;

    // Back to the temporary namespace, without the signature itself.
    let mut unsigned = doc.clone();
    unsigned
        .pubinfo
        .retain(|t| t.predicate != vocab::NPX_HAS_SIGNATURE);
    let unsigned = rewrite(&unsigned, final_iri, |rest| {
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        format!("{}{rest}", vocab::TEMP_NS)
    });

    let payload = canonical_payload(&unsigned).map_err(ProofError::Canonicalization)?;

    let sig_data = signature
        .strip_prefix('z')
        .ok_or_else(|| ProofError::DecodingFailed("signature must start with 'z'".into()))?;
    let sig_bytes = bs58::decode(sig_data)
        .into_vec()
        .map_err(|e| ProofError::DecodingFailed(format!("bs58 decode failed: {e}")))?;
    let sig_array: [u8; 64] = sig_bytes
        .as_slice()
        .try_into()
        .map_err(|_| ProofError::DecodingFailed("signature must be exactly 64 bytes".into()))?;

    verifying_key
        .verify(&payload, &ed25519_dalek::Signature::from_bytes(&sig_array))
        .map_err(|_| ProofError::VerificationFailed)?;

    let expected = artifact_code(&payload, &sig_bytes);
    if expected != signed.artifact_code() {
        return Err(ProofError::ArtifactMismatch {
            expected,
            found: signed.artifact_code().to_string(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// JCS canonical bytes of the document's quads, sorted.
fn canonical_payload(document: &Document) -> Result<Vec<u8>, String> {
    let mut quads = document.quads();
    quads.sort();
    let value =
        serde_json::to_value(&quads).map_err(|e| format!("serialization failed: {e}"))?;
    serde_jcs::to_vec(&value).map_err(|e| format!("JCS canonicalization failed: {e}"))
}

fn artifact_code(payload: &[u8], signature: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    hasher.update(signature);
    format!("RA{}", URL_SAFE_NO_PAD.encode(hasher.finalize()))
}

/// Rewrite every IRI equal to or under `from`. `map` receives the rest of
/// the IRI after `from`.
fn rewrite(document: &Document, from: &str, map: impl Fn(&str) -> String) -> Document {
    let iri = |s: &str| match s.strip_prefix(from) {
        Some(rest) => map(rest),
        None => s.to_string(),
    };
    let node = |n: &Node| match n {
        Node::Iri { value } => Node::iri(iri(value)),
        literal => literal.clone(),
    };
    let triples = |ts: &[Triple]| -> Vec<Triple> {
        ts.iter()
            .map(|t| Triple::new(iri(&t.subject), iri(&t.predicate), node(&t.object)))
            .collect()
    };
    Document {
        iri: iri(&document.iri),
        assertion: triples(&document.assertion),
        provenance: triples(&document.provenance),
        pubinfo: triples(&document.pubinfo),
        introduces: document.introduces.as_deref().map(iri),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
