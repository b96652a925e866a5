// src/zkp/auth_circuit.rs
//! DID authentication circuit.
//!
//! Proves knowledge of a valid EdDSA signature over a challenge under the
//! DID's registered public key, with the verification running entirely
//! inside the constraint system.
//!
//! Public inputs, in allocation order: `pk.x, pk.y, R.x, R.y, S, message`.
//! The message is deliberately public: with it outside the public witness a
//! proof for one challenge would verify against every other challenge, so
//! the verifier could never tell a fresh authentication from a replay.

use ark_bn254::Fr;
use ark_ed_on_bn254::constraints::EdwardsVar;
use ark_ed_on_bn254::EdwardsAffine;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::crypto::eddsa::{PublicKey, Signature};
use crate::zkp::eddsa_gadget::enforce_signature_verifies;

/// Circuit asserting that an EdDSA signature verifies a message under a
/// public key.
///
/// All fields are `None` for the blank instance fed to Groth16 setup.
#[derive(Clone, Default)]
pub struct AuthCircuit {
    /// The DID's registered public key (public input)
    pub public_key: Option<EdwardsAffine>,
    /// Signature point R (public input)
    pub signature_r: Option<EdwardsAffine>,
    /// Signature scalar S, embedded in the circuit field (public input)
    pub signature_s: Option<Fr>,
    /// Challenge reduced to one field element (public input)
    pub message: Option<Fr>,
}

impl AuthCircuit {
    /// Builds the witness for proving.
    pub fn new(public_key: &PublicKey, signature: &Signature, message: Fr) -> Self {
        Self {
            public_key: Some(public_key.point()),
            signature_r: Some(signature.r),
            signature_s: Some(signature.s_in_base_field()),
            message: Some(message),
        }
    }

    /// The blank instance used for circuit compilation and setup.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Assembles the public input vector in the circuit's allocation order.
    pub fn public_inputs(public_key: &PublicKey, signature: &Signature, message: Fr) -> Vec<Fr> {
        let (pk_x, pk_y) = public_key.coordinates();
        vec![
            pk_x,
            pk_y,
            signature.r.x,
            signature.r.y,
            signature.s_in_base_field(),
            message,
        ]
    }
}

impl ConstraintSynthesizer<Fr> for AuthCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let pk_x = FpVar::new_input(cs.clone(), || {
            self.public_key
                .map(|p| p.x)
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let pk_y = FpVar::new_input(cs.clone(), || {
            self.public_key
                .map(|p| p.y)
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let r_x = FpVar::new_input(cs.clone(), || {
            self.signature_r
                .map(|p| p.x)
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let r_y = FpVar::new_input(cs.clone(), || {
            self.signature_r
                .map(|p| p.y)
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let s = FpVar::new_input(cs.clone(), || {
            self.signature_s.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let message = FpVar::new_input(cs.clone(), || {
            self.message.ok_or(SynthesisError::AssignmentMissing)
        })?;

        let public_key = EdwardsVar::new(pk_x, pk_y);
        let signature_r = EdwardsVar::new(r_x, r_y);
        enforce_signature_verifies(&public_key, &signature_r, &s, &message)
    }
}
