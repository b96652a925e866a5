// src/models/credential.rs
//! Verifiable Credential data model implementation.
//!
//! Defines the structure for W3C-shaped Verifiable Credentials carrying an
//! age commitment, following the
//! [W3C Verifiable Credentials Data Model](https://www.w3.org/TR/vc-data-model/).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// JSON-LD contexts for verifiable credentials.
pub const CREDENTIAL_CONTEXTS: [&str; 2] = [
    "https://www.w3.org/2018/credentials/v1",
    "https://www.w3.org/2018/credentials/examples/v1",
];

/// A credential asserting a hidden attribute about a DID subject.
///
/// The attribute itself never appears: `claims["ageCommitment"]` and
/// `commitment_id` both carry the hex of `MiMC(age, salt)`, and only someone
/// holding the issuance salt can later open it inside an age proof.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VerifiableCredential {
    /// JSON-LD context URIs
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// Credential identifier, e.g. `did:example:abc#credential-1`
    pub id: String,

    /// Credential type labels
    #[serde(rename = "type")]
    pub credential_type: Vec<String>,

    /// DID of the issuing entity
    pub issuer: String,

    /// DID of the credential subject
    pub subject: String,

    /// Credential claims as an ordered map of short strings
    pub claims: BTreeMap<String, String>,

    /// Issuer proof metadata (placeholder structure, not a live artifact)
    pub proof: CredentialProof,

    /// Hex of the MiMC commitment this credential binds to
    #[serde(rename = "commitmentId")]
    pub commitment_id: String,
}

/// Proof metadata attached to a credential.
///
/// This service does not sign credentials; the structure mirrors the wire
/// shape so consumers see a complete document.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CredentialProof {
    /// Proof type label
    #[serde(rename = "type")]
    pub proof_type: String,

    /// Creation timestamp string
    pub created: String,

    /// Verification method reference
    #[serde(rename = "verificationMethod")]
    pub verification_method: String,

    /// Proof payload
    #[serde(rename = "proofValue")]
    pub proof_value: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_json_roundtrip() {
        let credential = VerifiableCredential {
            context: CREDENTIAL_CONTEXTS.iter().map(|s| s.to_string()).collect(),
            id: "did:example:00ff#credential-1".to_string(),
            credential_type: vec![
                "VerifiableCredential".to_string(),
                "AgeCredential".to_string(),
            ],
            issuer: "did:example:issuer".to_string(),
            subject: "did:example:00ff".to_string(),
            claims: BTreeMap::from([("ageCommitment".to_string(), "aabb".to_string())]),
            proof: CredentialProof {
                proof_type: "Ed25519Signature2020".to_string(),
                created: "2023-01-01T00:00:00Z".to_string(),
                verification_method: "did:example:issuer#keys-1".to_string(),
                proof_value: b"example-signature".to_vec(),
            },
            commitment_id: "aabb".to_string(),
        };

        let json = serde_json::to_string(&credential).unwrap();
        assert!(json.contains("\"commitmentId\":\"aabb\""));
        assert!(json.contains("\"ageCommitment\":\"aabb\""));

        let parsed: VerifiableCredential = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, credential.id);
        assert_eq!(parsed.claims["ageCommitment"], "aabb");
    }
}
