// src/zkp/eddsa_gadget.rs
//! In-circuit EdDSA signature verification on Baby Jubjub.
//!
//! Enforces the same equation the native verifier checks:
//! `S·G = R + c·A` with `c = MiMC(R.x, R.y, A.x, A.y, M)`. Point arithmetic
//! comes from `ark-ed-on-bn254`'s constraint types; only the wiring and the
//! challenge hash are ours.

use ark_bn254::Fr;
use ark_ec::twisted_edwards::TECurveConfig;
use ark_ec::Group;
use ark_ed_on_bn254::constraints::EdwardsVar;
use ark_ed_on_bn254::{EdwardsConfig, EdwardsProjective};
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::fields::FieldVar;
use ark_r1cs_std::groups::CurveVar;
use ark_r1cs_std::ToBitsGadget;
use ark_relations::r1cs::SynthesisError;

use crate::zkp::mimc_gadget::MimcGadget;

/// Enforces `a·x² + y² = 1 + d·x²·y²`, the twisted Edwards curve equation.
///
/// Coordinates arriving as public inputs are untrusted, so both the public
/// key and R are pinned to the curve before they feed the group equation.
pub fn enforce_on_curve(x: &FpVar<Fr>, y: &FpVar<Fr>) -> Result<(), SynthesisError> {
    let x_squared = x.square()?;
    let y_squared = y.square()?;
    let a = FpVar::constant(EdwardsConfig::COEFF_A);
    let d = FpVar::constant(EdwardsConfig::COEFF_D);
    let lhs = &a * &x_squared + &y_squared;
    let rhs = FpVar::one() + &d * &x_squared * &y_squared;
    lhs.enforce_equal(&rhs)
}

/// Enforces that `(R, S)` is a valid signature on `message` under
/// `public_key`.
pub fn enforce_signature_verifies(
    public_key: &EdwardsVar,
    signature_r: &EdwardsVar,
    signature_s: &FpVar<Fr>,
    message: &FpVar<Fr>,
) -> Result<(), SynthesisError> {
    enforce_on_curve(&public_key.x, &public_key.y)?;
    enforce_on_curve(&signature_r.x, &signature_r.y)?;

    let mut hasher = MimcGadget::new();
    hasher.write(&signature_r.x);
    hasher.write(&signature_r.y);
    hasher.write(&public_key.x);
    hasher.write(&public_key.y);
    hasher.write(message);
    let challenge = hasher.sum()?;

    let s_bits = signature_s.to_bits_le()?;
    let challenge_bits = challenge.to_bits_le()?;

    let generator = EdwardsVar::constant(EdwardsProjective::generator());
    let lhs = generator.scalar_mul_le(s_bits.iter())?;
    let rhs = signature_r.clone() + public_key.scalar_mul_le(challenge_bits.iter())?;
    lhs.enforce_equal(&rhs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::eddsa::SigningKey;
    use ark_ec::AffineRepr;
    use ark_ed_on_bn254::EdwardsAffine;
    use ark_r1cs_std::alloc::AllocVar;
    use ark_relations::r1cs::ConstraintSystem;

    fn allocate_point(
        cs: ark_relations::r1cs::ConstraintSystemRef<Fr>,
        point: EdwardsAffine,
    ) -> EdwardsVar {
        let x = FpVar::new_witness(cs.clone(), || Ok(point.x)).unwrap();
        let y = FpVar::new_witness(cs, || Ok(point.y)).unwrap();
        EdwardsVar::new(x, y)
    }

    #[test]
    fn test_on_curve_accepts_generator() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let generator = EdwardsAffine::generator();
        let x = FpVar::new_witness(cs.clone(), || Ok(generator.x)).unwrap();
        let y = FpVar::new_witness(cs.clone(), || Ok(generator.y)).unwrap();
        enforce_on_curve(&x, &y).unwrap();
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_on_curve_rejects_arbitrary_coordinates() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let x = FpVar::new_witness(cs.clone(), || Ok(Fr::from(3u64))).unwrap();
        let y = FpVar::new_witness(cs.clone(), || Ok(Fr::from(4u64))).unwrap();
        enforce_on_curve(&x, &y).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_valid_signature_satisfies_constraints() {
        let key = SigningKey::from_seed(&[0x05; 32]).unwrap();
        let message = Fr::from(77u64);
        let signature = key.sign(message);

        let cs = ConstraintSystem::<Fr>::new_ref();
        let public_key = allocate_point(cs.clone(), key.public_key().point());
        let signature_r = allocate_point(cs.clone(), signature.r);
        let s = FpVar::new_witness(cs.clone(), || Ok(signature.s_in_base_field())).unwrap();
        let message_var = FpVar::new_witness(cs.clone(), || Ok(message)).unwrap();

        enforce_signature_verifies(&public_key, &signature_r, &s, &message_var).unwrap();
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_signature_on_other_message_violates_constraints() {
        let key = SigningKey::from_seed(&[0x05; 32]).unwrap();
        let signature = key.sign(Fr::from(77u64));

        let cs = ConstraintSystem::<Fr>::new_ref();
        let public_key = allocate_point(cs.clone(), key.public_key().point());
        let signature_r = allocate_point(cs.clone(), signature.r);
        let s = FpVar::new_witness(cs.clone(), || Ok(signature.s_in_base_field())).unwrap();
        let message_var = FpVar::new_witness(cs.clone(), || Ok(Fr::from(78u64))).unwrap();

        enforce_signature_verifies(&public_key, &signature_r, &s, &message_var).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }
}
