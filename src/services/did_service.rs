// src/services/did_service.rs
//! DID Service
//!
//! Owns the compiled forms of both zero-knowledge circuits, the Groth16
//! proving/verifying keys produced at startup, and the in-memory DID
//! registry. Exposes the full operation surface: DID creation and
//! resolution, credential issuance, and the prove/verify pairs for
//! authentication and age proofs.
//!
//! # Concurrency
//! The registry is the only mutable state, guarded by a reader-writer lock
//! held strictly across map operations and never across proof generation or
//! verification. The keys are immutable after construction and safe for
//! concurrent reads.
//!
//! # Security Considerations
//! `new`/`with_rng` run a single-party Groth16 setup in-process, which is
//! cryptographically unsafe: whoever observes the setup randomness can forge
//! proofs. Production deployments must construct the service with
//! [`DidService::from_keys`] and keys produced by a proper ceremony.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use ark_bn254::{Bn254, Fr};
use ark_ff::{BigInteger, PrimeField, UniformRand};
use ark_groth16::{Groth16, Proof, ProvingKey, VerifyingKey};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::{CircuitSpecificSetupSNARK, SNARK};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::crypto::eddsa::{PublicKey, SecretScalar, Signature, SigningKey};
use crate::crypto::mimc::Mimc;
use crate::error::{DidError, Result};
use crate::models::credential::{CredentialProof, VerifiableCredential, CREDENTIAL_CONTEXTS};
use crate::models::did::{AuthenticationMethod, Did, DidDocument, DID_CONTEXT};
use crate::utils::codec;
use crate::zkp::age_circuit::{AgeCircuit, ATTRIBUTE_BITS};
use crate::zkp::auth_circuit::AuthCircuit;

/// DID of the credential issuer referenced on issued credentials.
const ISSUER_DID: &str = "did:example:issuer";

/// A fresh per-credential blinding scalar.
///
/// Returned to the caller exactly once at issuance and never stored: losing
/// it renders the credential unprovable, which is the intended contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Salt(Fr);

impl Salt {
    /// Wraps a field element as a salt.
    pub fn from_field(value: Fr) -> Self {
        Self(value)
    }

    /// The underlying field element.
    pub fn as_field(&self) -> Fr {
        self.0
    }
}

/// The Groth16 key pair for one circuit.
///
/// Exposed as plain values so deployments can persist keys from a trusted
/// ceremony and load them via [`DidService::from_keys`] instead of relying
/// on the unsafe in-process setup.
#[derive(Clone)]
pub struct CircuitKeys {
    /// Proving key, consumed by the prover
    pub proving_key: ProvingKey<Bn254>,
    /// Verifying key, consumed by the verifier
    pub verifying_key: VerifyingKey<Bn254>,
}

impl CircuitKeys {
    /// Canonical compressed encoding of the verifying key.
    pub fn verifying_key_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.verifying_key
            .serialize_compressed(&mut bytes)
            .map_err(|e| DidError::Internal(format!("verifying key serialization: {}", e)))?;
        Ok(bytes)
    }
}

/// The DID service: registry plus the compiled circuits' key material.
pub struct DidService {
    registry: RwLock<HashMap<String, Did>>,
    auth_keys: CircuitKeys,
    age_keys: CircuitKeys,
}

impl DidService {
    /// Compiles both circuits and runs Groth16 setup with the system RNG.
    ///
    /// # Errors
    /// `SetupFailed` if either setup fails; the service is single-shot
    /// initialized and such a failure is fatal.
    pub fn new() -> Result<Self> {
        Self::with_rng(&mut OsRng)
    }

    /// Like [`DidService::new`] but with a caller-supplied RNG, so seeded
    /// setups are reproducible.
    pub fn with_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        let (auth_pk, auth_vk) = Groth16::<Bn254>::setup(AuthCircuit::blank(), rng)
            .map_err(|e| DidError::SetupFailed(format!("authentication circuit: {}", e)))?;
        log::info!("authentication circuit compiled, parameters set up");

        let (age_pk, age_vk) = Groth16::<Bn254>::setup(AgeCircuit::blank(), rng)
            .map_err(|e| DidError::SetupFailed(format!("age circuit: {}", e)))?;
        log::info!("age circuit compiled, parameters set up");

        Ok(Self::from_keys(
            CircuitKeys {
                proving_key: auth_pk,
                verifying_key: auth_vk,
            },
            CircuitKeys {
                proving_key: age_pk,
                verifying_key: age_vk,
            },
        ))
    }

    /// Constructs the service from externally generated circuit keys.
    pub fn from_keys(auth_keys: CircuitKeys, age_keys: CircuitKeys) -> Self {
        Self {
            registry: RwLock::new(HashMap::new()),
            auth_keys,
            age_keys,
        }
    }

    /// The authentication circuit's key pair.
    pub fn auth_keys(&self) -> &CircuitKeys {
        &self.auth_keys
    }

    /// The age circuit's key pair.
    pub fn age_keys(&self) -> &CircuitKeys {
        &self.age_keys
    }

    /// Creates a new DID from fresh randomness.
    ///
    /// Draws a random secret scalar, derives the EdDSA keypair from its
    /// 32-byte seed encoding, and registers a document whose first
    /// authentication entry references the derived public key.
    ///
    /// Returns the DID and the raw secret; the service does **not** store
    /// the secret.
    pub fn create_did(&self) -> Result<(Did, SecretScalar)> {
        let secret = SecretScalar::rand(&mut OsRng);
        let key = SigningKey::from_secret(&secret)?;
        let public_key_bytes = key.public_key().to_bytes()?;
        let id = codec::did_identifier(&public_key_bytes);

        let document = DidDocument {
            context: vec![DID_CONTEXT.to_string()],
            id: id.clone(),
            controller: id.clone(),
            authentication: vec![AuthenticationMethod {
                id: format!("{}#keys-1", id),
                method_type: "Ed25519VerificationKey2020".to_string(),
                controller: id.clone(),
                public_key_jwk: BTreeMap::from([
                    ("kty".to_string(), "OKP".to_string()),
                    ("crv".to_string(), "Ed25519".to_string()),
                    ("x".to_string(), codec::encode_hex(&public_key_bytes)),
                ]),
            }],
            credentials: Vec::new(),
        };

        let did = Did {
            id: id.clone(),
            public_key_bytes,
            public_key: key.public_key().point(),
            document,
        };

        let mut registry = self.write_registry()?;
        if registry.contains_key(&id) {
            return Err(DidError::Internal(format!("duplicate DID id: {}", id)));
        }
        registry.insert(id.clone(), did.clone());
        drop(registry);

        log::info!("created DID {}", id);
        Ok((did, secret))
    }

    /// Looks up a registered DID.
    pub fn resolve_did(&self, did_id: &str) -> Result<Did> {
        self.lookup(did_id)
    }

    /// Issues an age credential to a DID.
    ///
    /// Draws a fresh salt, commits to the age as
    /// `MiMC(minimal-BE(age) ‖ minimal-BE(salt))`, and appends a credential
    /// carrying the commitment hex to the DID document.
    ///
    /// Returns the credential and the salt. The salt is handed out exactly
    /// once; the registry keeps only the commitment.
    pub fn issue_age_credential(
        &self,
        did_id: &str,
        age: u64,
    ) -> Result<(VerifiableCredential, Salt)> {
        ensure_attribute_width(age, "age")?;
        let salt = Salt(Fr::rand(&mut OsRng));
        let commitment_hex = codec::encode_hex(&age_commitment(age, &salt));

        let mut registry = self.write_registry()?;
        let did = registry
            .get_mut(did_id)
            .ok_or_else(|| DidError::NotFound(format!("DID does not exist: {}", did_id)))?;

        let credential = VerifiableCredential {
            context: CREDENTIAL_CONTEXTS.iter().map(|s| s.to_string()).collect(),
            id: format!("{}#credential-{}", did_id, did.document.credentials.len() + 1),
            credential_type: vec![
                "VerifiableCredential".to_string(),
                "AgeCredential".to_string(),
            ],
            issuer: ISSUER_DID.to_string(),
            subject: did_id.to_string(),
            claims: BTreeMap::from([("ageCommitment".to_string(), commitment_hex.clone())]),
            proof: CredentialProof {
                proof_type: "Ed25519Signature2020".to_string(),
                created: "2023-01-01T00:00:00Z".to_string(),
                verification_method: format!("{}#keys-1", ISSUER_DID),
                proof_value: b"example-signature".to_vec(),
            },
            commitment_id: commitment_hex,
        };
        did.document.credentials.push(credential.clone());
        drop(registry);

        log::info!("issued age credential {} to {}", credential.id, did_id);
        Ok((credential, salt))
    }

    /// Authenticates a DID against a challenge.
    ///
    /// Reconstructs the keypair from the secret, deterministically signs the
    /// challenge, and proves in zero knowledge that the signature verifies
    /// under the *registered* public key. Returns the serialized proof and
    /// the 64-byte signature.
    ///
    /// # Errors
    /// `NotFound` for an unknown DID, `CircuitFailed` if the witness does
    /// not satisfy the circuit (e.g. the secret does not match the
    /// registered key).
    pub fn authenticate_did(
        &self,
        did_id: &str,
        secret: &SecretScalar,
        challenge: &[u8],
    ) -> Result<(Vec<u8>, Vec<u8>)> {
        let did = self.lookup(did_id)?;
        log::info!("authenticating DID {}", did_id);

        let key = SigningKey::from_secret(secret)?;
        let message = codec::challenge_to_field(challenge);
        let signature = key.sign(message);

        let registered = PublicKey::from_point(did.public_key);
        let circuit = AuthCircuit::new(&registered, &signature, message);
        let proof_bytes = prove_with_key(circuit, &self.auth_keys.proving_key, "authentication")?;

        Ok((proof_bytes, signature.to_bytes()?.to_vec()))
    }

    /// Verifies an authentication proof for a DID and challenge.
    ///
    /// The public witness is `[pk.x, pk.y, R.x, R.y, S, message]` with the
    /// public key taken from the registry and the message reduced from the
    /// challenge, so the proof is bound to this DID, this signature and this
    /// challenge.
    ///
    /// Returns `Ok(false)` when the proof does not check out; errors are
    /// reserved for unknown DIDs and malformed inputs.
    pub fn verify_authentication(
        &self,
        did_id: &str,
        proof_bytes: &[u8],
        signature_bytes: &[u8],
        challenge: &[u8],
    ) -> Result<bool> {
        let did = self.lookup(did_id)?;
        let signature = Signature::from_bytes(signature_bytes)?;
        let proof = Proof::<Bn254>::deserialize_compressed(proof_bytes)?;
        let message = codec::challenge_to_field(challenge);

        let public_inputs =
            AuthCircuit::public_inputs(&PublicKey::from_point(did.public_key), &signature, message);
        let valid = Groth16::<Bn254>::verify(&self.auth_keys.verifying_key, &public_inputs, &proof)
            .map_err(|e| DidError::Internal(format!("proof verification did not complete: {}", e)))?;

        log::debug!("authentication proof for {} valid: {}", did_id, valid);
        Ok(valid)
    }

    /// Proves that the age committed on a credential meets a threshold.
    ///
    /// The commitment is retrieved from the stored credential; the caller
    /// supplies the age and the salt returned at issuance.
    ///
    /// # Errors
    /// `NotFound` for unknown DID or credential, `InvalidInput` for
    /// out-of-width values, `CircuitFailed` when the witness is
    /// unsatisfiable (threshold above age, or wrong salt).
    pub fn create_age_proof(
        &self,
        did_id: &str,
        credential_id: &str,
        threshold: u64,
        actual_age: u64,
        salt: &Salt,
    ) -> Result<Vec<u8>> {
        ensure_attribute_width(threshold, "threshold")?;
        ensure_attribute_width(actual_age, "age")?;
        let commitment = self.lookup_commitment(did_id, credential_id)?;

        let circuit = AgeCircuit::new(threshold, commitment, actual_age, salt.as_field());
        prove_with_key(circuit, &self.age_keys.proving_key, "age")
    }

    /// Verifies an age proof against a stored credential and a threshold.
    ///
    /// Returns `Ok(false)` when the proof does not check out; errors are
    /// reserved for unknown ids and malformed inputs.
    pub fn verify_age_proof(
        &self,
        did_id: &str,
        credential_id: &str,
        threshold: u64,
        proof_bytes: &[u8],
    ) -> Result<bool> {
        ensure_attribute_width(threshold, "threshold")?;
        let commitment = self.lookup_commitment(did_id, credential_id)?;
        let proof = Proof::<Bn254>::deserialize_compressed(proof_bytes)?;

        let public_inputs = AgeCircuit::public_inputs(threshold, commitment);
        let valid = Groth16::<Bn254>::verify(&self.age_keys.verifying_key, &public_inputs, &proof)
            .map_err(|e| DidError::Internal(format!("proof verification did not complete: {}", e)))?;

        log::debug!(
            "age proof for {} / {} at threshold {} valid: {}",
            did_id,
            credential_id,
            threshold,
            valid
        );
        Ok(valid)
    }

    fn lookup(&self, did_id: &str) -> Result<Did> {
        let registry = self
            .registry
            .read()
            .map_err(|_| DidError::Internal("registry lock poisoned".to_string()))?;
        registry
            .get(did_id)
            .cloned()
            .ok_or_else(|| DidError::NotFound(format!("DID does not exist: {}", did_id)))
    }

    fn lookup_commitment(&self, did_id: &str, credential_id: &str) -> Result<Fr> {
        let did = self.lookup(did_id)?;
        let credential = did
            .document
            .credentials
            .iter()
            .find(|c| c.id == credential_id)
            .ok_or_else(|| {
                DidError::NotFound(format!("credential does not exist: {}", credential_id))
            })?;
        codec::field_from_hex(&credential.commitment_id)
    }

    fn write_registry(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, Did>>> {
        self.registry
            .write()
            .map_err(|_| DidError::Internal("registry lock poisoned".to_string()))
    }
}

/// Computes the age commitment exactly as issuance does: both arguments are
/// absorbed as their minimal big-endian encodings.
pub fn age_commitment(age: u64, salt: &Salt) -> [u8; 32] {
    let mut hasher = Mimc::new();
    hasher.write_bytes(minimal_be(&age.to_be_bytes()));
    hasher.write_bytes(minimal_be(&salt.as_field().into_bigint().to_bytes_be()));
    hasher.sum()
}

/// Checks an unsatisfied witness before proving: `ark-groth16` happily
/// produces an unverifiable proof from one, while callers need a
/// `CircuitFailed` error.
fn prove_with_key<C>(circuit: C, proving_key: &ProvingKey<Bn254>, what: &str) -> Result<Vec<u8>>
where
    C: ConstraintSynthesizer<Fr> + Clone,
{
    let cs = ConstraintSystem::<Fr>::new_ref();
    circuit
        .clone()
        .generate_constraints(cs.clone())
        .map_err(|e| DidError::CircuitFailed(format!("{} witness assignment: {}", what, e)))?;
    let satisfied = cs
        .is_satisfied()
        .map_err(|e| DidError::Internal(format!("constraint check: {}", e)))?;
    if !satisfied {
        return Err(DidError::CircuitFailed(format!(
            "{} witness does not satisfy the circuit",
            what
        )));
    }

    let start = std::time::Instant::now();
    let proof = Groth16::<Bn254>::prove(proving_key, circuit, &mut OsRng)
        .map_err(|e| DidError::CircuitFailed(format!("{} proof generation: {}", what, e)))?;
    log::info!("{} proof generated in {:.2?}", what, start.elapsed());

    let mut bytes = Vec::new();
    proof
        .serialize_compressed(&mut bytes)
        .map_err(|e| DidError::Internal(format!("proof serialization: {}", e)))?;
    Ok(bytes)
}

fn ensure_attribute_width(value: u64, name: &str) -> Result<()> {
    if value >> ATTRIBUTE_BITS != 0 {
        return Err(DidError::InvalidInput(format!(
            "{} does not fit in {} bits: {}",
            name, ATTRIBUTE_BITS, value
        )));
    }
    Ok(())
}

/// Strips leading zero bytes, keeping a single `0x00` for zero so that an
/// absorbed zero still contributes one field element.
fn minimal_be(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(bytes.len() - 1);
    &bytes[start..]
}

/// Externally generated verifying-key bytes can be checked for shape by
/// deserializing through this helper.
pub fn verifying_key_from_bytes(bytes: &[u8]) -> Result<VerifyingKey<Bn254>> {
    VerifyingKey::<Bn254>::deserialize_compressed(bytes).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::mimc::hash_fields;

    #[test]
    fn test_attribute_width_bounds() {
        assert!(ensure_attribute_width(0, "age").is_ok());
        assert!(ensure_attribute_width(u32::MAX as u64, "age").is_ok());
        assert!(matches!(
            ensure_attribute_width(1u64 << 32, "age"),
            Err(DidError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_minimal_be_strips_leading_zeros() {
        assert_eq!(minimal_be(&[0, 0, 25]), &[25]);
        assert_eq!(minimal_be(&[1, 0]), &[1, 0]);
        assert_eq!(minimal_be(&[0, 0, 0]), &[0]);
    }

    #[test]
    fn test_age_commitment_matches_field_absorption() {
        // The byte-level commitment and the circuit's field-level hash must
        // agree, for zero ages included.
        for age in [0u64, 25, u32::MAX as u64] {
            let salt = Salt::from_field(Fr::from(0x0202u64));
            let byte_level = Fr::from_be_bytes_mod_order(&age_commitment(age, &salt));
            let field_level = hash_fields(&[Fr::from(age), salt.as_field()]);
            assert_eq!(byte_level, field_level);
        }
    }
}
