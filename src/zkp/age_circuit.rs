// src/zkp/age_circuit.rs
//! Age-threshold circuit.
//!
//! Proves `threshold <= actual_age` and `MiMC(actual_age, salt) = commitment`
//! without revealing the age or the salt.
//!
//! The comparison is a proper unsigned check over fixed-width integers: age,
//! threshold and their difference are each constrained to 32 bits, so a
//! prover cannot satisfy the circuit by letting `age - threshold` wrap
//! around the field.

use ark_bn254::Fr;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::boolean::Boolean;
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::ToBitsGadget;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::zkp::mimc_gadget::MimcGadget;

/// Bit width of ages and thresholds. Values at or above `2^32` are rejected
/// before they ever reach the prover.
pub const ATTRIBUTE_BITS: usize = 32;

/// Circuit asserting a committed age meets a public threshold.
///
/// Public inputs, in allocation order: `threshold, commitment`.
/// Private inputs: `actual_age, salt`.
#[derive(Clone, Default)]
pub struct AgeCircuit {
    /// Minimum age being proven (public input)
    pub threshold: Option<u64>,
    /// MiMC commitment stored on the credential (public input)
    pub commitment: Option<Fr>,
    /// The subject's actual age (private witness)
    pub actual_age: Option<u64>,
    /// Salt returned at issuance (private witness)
    pub salt: Option<Fr>,
}

impl AgeCircuit {
    /// Builds the witness for proving.
    pub fn new(threshold: u64, commitment: Fr, actual_age: u64, salt: Fr) -> Self {
        Self {
            threshold: Some(threshold),
            commitment: Some(commitment),
            actual_age: Some(actual_age),
            salt: Some(salt),
        }
    }

    /// The blank instance used for circuit compilation and setup.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Assembles the public input vector in the circuit's allocation order.
    pub fn public_inputs(threshold: u64, commitment: Fr) -> Vec<Fr> {
        vec![Fr::from(threshold), commitment]
    }
}

/// Constrains `value` to fit in `bits` bits by forcing the high bits of its
/// canonical decomposition to zero.
fn enforce_fits_in_bits(value: &FpVar<Fr>, bits: usize) -> Result<(), SynthesisError> {
    let decomposition = value.to_bits_le()?;
    for bit in decomposition.iter().skip(bits) {
        bit.enforce_equal(&Boolean::constant(false))?;
    }
    Ok(())
}

impl ConstraintSynthesizer<Fr> for AgeCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let threshold = FpVar::new_input(cs.clone(), || {
            self.threshold
                .map(Fr::from)
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let commitment = FpVar::new_input(cs.clone(), || {
            self.commitment.ok_or(SynthesisError::AssignmentMissing)
        })?;

        let actual_age = FpVar::new_witness(cs.clone(), || {
            self.actual_age
                .map(Fr::from)
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let salt = FpVar::new_witness(cs.clone(), || {
            self.salt.ok_or(SynthesisError::AssignmentMissing)
        })?;

        // threshold <= actual_age over 32-bit integers.
        enforce_fits_in_bits(&actual_age, ATTRIBUTE_BITS)?;
        enforce_fits_in_bits(&threshold, ATTRIBUTE_BITS)?;
        let headroom = &actual_age - &threshold;
        enforce_fits_in_bits(&headroom, ATTRIBUTE_BITS)?;

        // MiMC(actual_age, salt) = commitment.
        let mut hasher = MimcGadget::new();
        hasher.write(&actual_age);
        hasher.write(&salt);
        let computed = hasher.sum()?;
        computed.enforce_equal(&commitment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::mimc::hash_fields;
    use ark_relations::r1cs::ConstraintSystem;

    fn commitment_for(age: u64, salt: Fr) -> Fr {
        hash_fields(&[Fr::from(age), salt])
    }

    fn satisfied(circuit: AgeCircuit) -> bool {
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        cs.is_satisfied().unwrap()
    }

    #[test]
    fn test_age_above_threshold_satisfies() {
        let salt = Fr::from(0x0202u64);
        let circuit = AgeCircuit::new(18, commitment_for(25, salt), 25, salt);
        assert!(satisfied(circuit));
    }

    #[test]
    fn test_age_equal_to_threshold_satisfies() {
        let salt = Fr::from(9u64);
        let circuit = AgeCircuit::new(25, commitment_for(25, salt), 25, salt);
        assert!(satisfied(circuit));
    }

    #[test]
    fn test_age_below_threshold_fails() {
        let salt = Fr::from(9u64);
        let circuit = AgeCircuit::new(18, commitment_for(17, salt), 17, salt);
        assert!(!satisfied(circuit));
    }

    #[test]
    fn test_wrong_salt_fails() {
        let salt = Fr::from(9u64);
        let circuit = AgeCircuit::new(18, commitment_for(25, salt), 25, Fr::from(10u64));
        assert!(!satisfied(circuit));
    }

    #[test]
    fn test_wrong_commitment_fails() {
        let salt = Fr::from(9u64);
        let circuit = AgeCircuit::new(18, commitment_for(30, salt), 25, salt);
        assert!(!satisfied(circuit));
    }

    #[test]
    fn test_oversized_age_fails_range_check() {
        // An age of 2^32 has a set bit outside the permitted width even when
        // the hash side is consistent.
        let salt = Fr::from(9u64);
        let age = 1u64 << 32;
        let circuit = AgeCircuit::new(18, commitment_for(age, salt), age, salt);
        assert!(!satisfied(circuit));
    }

    #[test]
    fn test_public_inputs_match_allocation_order() {
        let salt = Fr::from(9u64);
        let commitment = commitment_for(25, salt);
        let circuit = AgeCircuit::new(18, commitment, 25, salt);
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();

        let assignment = cs.borrow().unwrap().instance_assignment.clone();
        assert_eq!(assignment[1..], AgeCircuit::public_inputs(18, commitment)[..]);
    }
}
