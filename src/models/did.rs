// src/models/did.rs
//! Decentralized Identifier (DID) data model implementation.
//!
//! Defines the core structures for W3C-shaped DID Documents following the
//! [DID Core Specification](https://www.w3.org/TR/did-core/).

use std::collections::BTreeMap;

use ark_ed_on_bn254::EdwardsAffine;
use serde::{Deserialize, Serialize};

use crate::models::credential::VerifiableCredential;

/// JSON-LD context for DID documents.
pub const DID_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

/// A registered decentralized identity.
///
/// Besides the document, the registry keeps the public key in two forms:
/// the compressed bytes that the identifier is derived from, and the affine
/// curve point needed for witness assignment when proofs reference this DID.
///
/// # DID Format
/// The `id` field follows DID syntax:
/// ```text
/// did:example:<hex of compressed public key>
/// ```
/// so the identifier uniquely determines the public key.
#[derive(Debug, Clone)]
pub struct Did {
    /// The complete DID string identifier
    pub id: String,
    /// Compressed 32-byte Baby Jubjub public key
    pub public_key_bytes: [u8; 32],
    /// The same key as an affine point, for proof witnesses
    pub public_key: EdwardsAffine,
    /// The resolvable DID document
    pub document: DidDocument,
}

/// A DID Document containing cryptographic material and issued credentials.
///
/// The `controller` is always the document's own `id`, and
/// `authentication[0]` always references the key the identifier was derived
/// from.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DidDocument {
    /// JSON-LD context URIs
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// The complete DID string identifier
    pub id: String,

    /// DID of the controlling identity (equal to `id`)
    pub controller: String,

    /// Authentication methods; the first entry is the registration key
    pub authentication: Vec<AuthenticationMethod>,

    /// Credentials issued to this identity
    pub credentials: Vec<VerifiableCredential>,
}

/// A single authentication method of a DID document.
///
/// The `method_type` label is informational; the key material itself is a
/// Baby Jubjub point carried in `public_key_jwk`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthenticationMethod {
    /// Fragment identifier, e.g. `did:example:abc#keys-1`
    pub id: String,

    /// Verification method type label
    #[serde(rename = "type")]
    pub method_type: String,

    /// DID of the controlling identity
    pub controller: String,

    /// Key parameters as an ordered map of short strings
    #[serde(rename = "publicKeyJwk")]
    pub public_key_jwk: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> DidDocument {
        let id = "did:example:00ff".to_string();
        DidDocument {
            context: vec![DID_CONTEXT.to_string()],
            id: id.clone(),
            controller: id.clone(),
            authentication: vec![AuthenticationMethod {
                id: format!("{}#keys-1", id),
                method_type: "Ed25519VerificationKey2020".to_string(),
                controller: id,
                public_key_jwk: BTreeMap::from([
                    ("kty".to_string(), "OKP".to_string()),
                    ("x".to_string(), "00ff".to_string()),
                ]),
            }],
            credentials: vec![],
        }
    }

    #[test]
    fn test_document_serializes_with_w3c_field_names() {
        let json = serde_json::to_string(&sample_document()).unwrap();
        assert!(json.contains("\"@context\""));
        assert!(json.contains("\"publicKeyJwk\""));
        assert!(json.contains("\"type\":\"Ed25519VerificationKey2020\""));
    }

    #[test]
    fn test_document_json_roundtrip() {
        let document = sample_document();
        let json = serde_json::to_string(&document).unwrap();
        let parsed: DidDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, document.id);
        assert_eq!(parsed.controller, parsed.id);
        assert_eq!(parsed.authentication.len(), 1);
    }
}
