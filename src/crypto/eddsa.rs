// src/crypto/eddsa.rs
//! EdDSA over Baby Jubjub with MiMC as the in-scheme hash.
//!
//! The signature scheme must match the in-circuit verifier exactly: the same
//! twisted Edwards curve (`ark-ed-on-bn254`), the same challenge hash
//! (`crate::crypto::mimc`), the same verification equation
//! `S·G = R + c·A` with `c = MiMC(R.x, R.y, A.x, A.y, M)`. SHA-512, the
//! usual EdDSA hash, would be ruinously expensive inside an R1CS, which is
//! why the whole scheme runs on the algebraic hash.
//!
//! Signing is deterministic: the nonce derives from a per-key nonce key and
//! the message, so the same (key, message) pair always yields the same
//! signature.

use ark_bn254::Fr;
use ark_ec::{AffineRepr, CurveGroup, Group};
use ark_ed_on_bn254::{EdwardsAffine, EdwardsProjective, Fr as EdwardsScalar};
use ark_ff::{BigInteger, PrimeField, UniformRand, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::{CryptoRng, RngCore};

use crate::crypto::mimc::hash_fields;
use crate::error::{DidError, Result};

/// Length of a compressed public key in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;
/// Length of a serialized signature in bytes: compressed R followed by S.
pub const SIGNATURE_LENGTH: usize = 64;

/// Domain separator mixed into nonce-key derivation.
const NONCE_DOMAIN: &[u8] = b"zk-did.eddsa.nonce";

/// The raw key material behind a DID: a nonzero element of the circuit
/// field, drawn once at DID creation and handed to the caller. Its 32-byte
/// big-endian encoding is the EdDSA seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SecretScalar(Fr);

impl SecretScalar {
    /// Draws a uniformly random nonzero scalar.
    pub fn rand<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        loop {
            let candidate = Fr::rand(rng);
            if !candidate.is_zero() {
                return Self(candidate);
            }
        }
    }

    /// Reconstructs a secret from its field value.
    ///
    /// # Errors
    /// Returns `InvalidInput` for zero, which has no usable keypair.
    pub fn from_field(value: Fr) -> Result<Self> {
        if value.is_zero() {
            return Err(DidError::InvalidInput(
                "secret scalar must be nonzero".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// The 32-byte big-endian seed encoding, left-padded with zeros.
    pub fn to_seed(&self) -> [u8; 32] {
        let bytes = self.0.into_bigint().to_bytes_be();
        let mut seed = [0u8; 32];
        seed[32 - bytes.len()..].copy_from_slice(&bytes);
        seed
    }
}

/// A Baby Jubjub public key, usable both as transport bytes and as a pair
/// of coordinates for witness assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey {
    point: EdwardsAffine,
}

impl PublicKey {
    /// Wraps an affine point, e.g. one retrieved from the registry.
    pub fn from_point(point: EdwardsAffine) -> Self {
        Self { point }
    }

    /// The affine point.
    pub fn point(&self) -> EdwardsAffine {
        self.point
    }

    /// The (x, y) coordinates as circuit-field elements.
    pub fn coordinates(&self) -> (Fr, Fr) {
        (self.point.x, self.point.y)
    }

    /// Compressed 32-byte encoding.
    pub fn to_bytes(&self) -> Result<[u8; PUBLIC_KEY_LENGTH]> {
        let mut bytes = Vec::with_capacity(PUBLIC_KEY_LENGTH);
        self.point
            .serialize_compressed(&mut bytes)
            .map_err(|e| DidError::Internal(format!("public key serialization: {}", e)))?;
        let mut out = [0u8; PUBLIC_KEY_LENGTH];
        out.copy_from_slice(&bytes);
        Ok(out)
    }

    /// Parses a compressed public key, validating curve and subgroup
    /// membership.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(DidError::InvalidInput(format!(
                "public key must be {} bytes, got {}",
                PUBLIC_KEY_LENGTH,
                bytes.len()
            )));
        }
        let point = EdwardsAffine::deserialize_compressed(bytes)?;
        Ok(Self { point })
    }
}

/// An EdDSA signature: a curve point R and a scalar S.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    pub r: EdwardsAffine,
    pub s: EdwardsScalar,
}

impl Signature {
    /// Serializes as `R compressed (32) ‖ S big-endian (32)`.
    pub fn to_bytes(&self) -> Result<[u8; SIGNATURE_LENGTH]> {
        let mut out = [0u8; SIGNATURE_LENGTH];
        let mut r_bytes = Vec::with_capacity(32);
        self.r
            .serialize_compressed(&mut r_bytes)
            .map_err(|e| DidError::Internal(format!("signature serialization: {}", e)))?;
        out[..32].copy_from_slice(&r_bytes);
        out[32..].copy_from_slice(&self.s.into_bigint().to_bytes_be());
        Ok(out)
    }

    /// Parses a 64-byte signature.
    ///
    /// # Errors
    /// `InvalidInput` on wrong length, a malformed or off-subgroup R, or an
    /// S at or above the subgroup order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(DidError::InvalidInput(format!(
                "signature must be {} bytes, got {}",
                SIGNATURE_LENGTH,
                bytes.len()
            )));
        }
        let r = EdwardsAffine::deserialize_compressed(&bytes[..32])?;
        let s_bytes = &bytes[32..];
        let modulus = EdwardsScalar::MODULUS.to_bytes_be();
        if s_bytes >= modulus.as_slice() {
            return Err(DidError::InvalidInput(
                "signature scalar out of range".to_string(),
            ));
        }
        let s = EdwardsScalar::from_be_bytes_mod_order(s_bytes);
        Ok(Self { r, s })
    }

    /// S embedded into the circuit field (exact, since the subgroup order is
    /// smaller than the field modulus).
    pub fn s_in_base_field(&self) -> Fr {
        scalar_to_base_field(self.s)
    }
}

/// An expanded signing key: signing scalar, nonce key, public key.
#[derive(Clone, Debug)]
pub struct SigningKey {
    scalar: EdwardsScalar,
    nonce_key: Fr,
    public: PublicKey,
}

impl SigningKey {
    /// Expands a 32-byte seed into a signing key.
    ///
    /// The signing scalar is the seed reduced big-endian modulo the Baby
    /// Jubjub subgroup order; the nonce key is `MiMC(domain, seed)`.
    pub fn from_seed(seed: &[u8; 32]) -> Result<Self> {
        let scalar = EdwardsScalar::from_be_bytes_mod_order(seed);
        if scalar.is_zero() {
            return Err(DidError::InvalidInput(
                "seed reduces to the zero scalar".to_string(),
            ));
        }
        let nonce_key = hash_fields(&[
            Fr::from_be_bytes_mod_order(NONCE_DOMAIN),
            Fr::from_be_bytes_mod_order(seed),
        ]);
        let point = (EdwardsProjective::generator() * scalar).into_affine();
        Ok(Self {
            scalar,
            nonce_key,
            public: PublicKey { point },
        })
    }

    /// Expands a secret scalar via its seed encoding.
    pub fn from_secret(secret: &SecretScalar) -> Result<Self> {
        Self::from_seed(&secret.to_seed())
    }

    /// The derived public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Deterministically signs a message field element.
    pub fn sign(&self, message: Fr) -> Signature {
        let nonce = base_field_to_scalar(hash_fields(&[self.nonce_key, message]));
        let r = (EdwardsProjective::generator() * nonce).into_affine();
        let challenge = challenge_scalar(&r, &self.public.point, message);
        let s = nonce + challenge * self.scalar;
        Signature { r, s }
    }
}

/// Verifies `S·G = R + c·A` natively.
pub fn verify(public: &PublicKey, message: Fr, signature: &Signature) -> bool {
    let challenge = challenge_scalar(&signature.r, &public.point, message);
    let lhs = EdwardsProjective::generator() * signature.s;
    let rhs = signature.r.into_group() + public.point.into_group() * challenge;
    lhs == rhs
}

/// The challenge hash `c = MiMC(R.x, R.y, A.x, A.y, M)`, reduced to a
/// subgroup scalar. The circuit computes the same hash over the same inputs.
fn challenge_scalar(r: &EdwardsAffine, public: &EdwardsAffine, message: Fr) -> EdwardsScalar {
    base_field_to_scalar(hash_fields(&[r.x, r.y, public.x, public.y, message]))
}

fn base_field_to_scalar(value: Fr) -> EdwardsScalar {
    EdwardsScalar::from_be_bytes_mod_order(&value.into_bigint().to_bytes_be())
}

fn scalar_to_base_field(value: EdwardsScalar) -> Fr {
    Fr::from_be_bytes_mod_order(&value.into_bigint().to_bytes_be())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    fn test_key() -> SigningKey {
        SigningKey::from_seed(&[0x01; 32]).unwrap()
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let key = test_key();
        let message = Fr::from(123456789u64);
        let signature = key.sign(message);
        assert!(verify(key.public_key(), message, &signature));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let key = test_key();
        let message = Fr::from(42u64);
        assert_eq!(key.sign(message), key.sign(message));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let key = test_key();
        let other = SigningKey::from_seed(&[0x02; 32]).unwrap();
        let message = Fr::from(42u64);
        let signature = other.sign(message);
        assert!(!verify(key.public_key(), message, &signature));
    }

    #[test]
    fn test_wrong_message_rejected() {
        let key = test_key();
        let signature = key.sign(Fr::from(1u64));
        assert!(!verify(key.public_key(), Fr::from(2u64), &signature));
    }

    #[test]
    fn test_signature_byte_roundtrip() {
        let key = test_key();
        let signature = key.sign(Fr::from(7u64));
        let bytes = signature.to_bytes().unwrap();
        let parsed = Signature::from_bytes(&bytes).unwrap();
        assert_eq!(signature, parsed);
    }

    #[test]
    fn test_signature_rejects_out_of_range_scalar() {
        let key = test_key();
        let mut bytes = key.sign(Fr::from(7u64)).to_bytes().unwrap();
        // Overwrite S with the subgroup order itself (not a canonical value).
        bytes[32..].copy_from_slice(&EdwardsScalar::MODULUS.to_bytes_be());
        assert!(matches!(
            Signature::from_bytes(&bytes),
            Err(DidError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_signature_rejects_wrong_length() {
        assert!(Signature::from_bytes(&[0u8; 63]).is_err());
    }

    #[test]
    fn test_public_key_rejects_garbage() {
        assert!(PublicKey::from_bytes(&[0xff; 32]).is_err());
    }

    #[test]
    fn test_public_key_byte_roundtrip() {
        let key = test_key();
        let bytes = key.public_key().to_bytes().unwrap();
        let parsed = PublicKey::from_bytes(&bytes).unwrap();
        assert_eq!(*key.public_key(), parsed);
    }

    #[test]
    fn test_secret_scalar_seed_is_padded() {
        let secret = SecretScalar::from_field(Fr::from(1u64)).unwrap();
        let seed = secret.to_seed();
        assert_eq!(seed[..31], [0u8; 31]);
        assert_eq!(seed[31], 1);
    }

    #[test]
    fn test_random_secrets_yield_distinct_keys() {
        let mut rng = OsRng;
        let a = SigningKey::from_secret(&SecretScalar::rand(&mut rng)).unwrap();
        let b = SigningKey::from_secret(&SecretScalar::rand(&mut rng)).unwrap();
        assert_ne!(a.public_key(), b.public_key());
    }
}
