// src/crypto/mimc.rs
//! MiMC sponge hash over the BN254 scalar field.
//!
//! This is the algebraic hash used everywhere a value crosses the circuit
//! boundary: age commitments, EdDSA challenge hashing, and nonce derivation.
//! The in-circuit gadget (`crate::zkp::mimc_gadget`) evaluates the identical
//! permutation over the identical round-constant table; the table lives here
//! and is the only copy, so native and in-circuit digests cannot diverge.
//!
//! Construction: MiMC-2n/n in Miyaguchi-Preneel mode with an x^5 S-box and
//! 110 rounds. Round constants are a Keccak256 chain over a fixed seed, each
//! digest reduced big-endian into the field.

use ark_bn254::Fr;
use ark_ff::{BigInteger, Field, PrimeField};
use once_cell::sync::Lazy;
use sha3::{Digest, Keccak256};

/// Number of rounds of the MiMC permutation.
pub const MIMC_ROUNDS: usize = 110;

/// Seed of the round-constant chain. Changing this re-keys the whole system.
const MIMC_SEED: &[u8] = b"zk-did.mimc.bn254";

/// Round constants, computed once per process.
///
/// `c[0] = Keccak256(seed)`, `c[i+1] = Keccak256(c[i])`, each reduced
/// big-endian mod |F|.
static ROUND_CONSTANTS: Lazy<[Fr; MIMC_ROUNDS]> = Lazy::new(|| {
    let mut constants = [Fr::ZERO; MIMC_ROUNDS];
    let mut digest = Keccak256::digest(MIMC_SEED);
    for constant in constants.iter_mut() {
        *constant = Fr::from_be_bytes_mod_order(&digest);
        digest = Keccak256::digest(digest);
    }
    constants
});

/// Returns the shared round-constant table.
pub fn round_constants() -> &'static [Fr; MIMC_ROUNDS] {
    &ROUND_CONSTANTS
}

/// The keyed MiMC permutation: 110 rounds of `x <- (x + k + c_i)^5`,
/// followed by a final key addition.
fn permute(input: Fr, key: Fr) -> Fr {
    let mut x = input;
    for constant in ROUND_CONSTANTS.iter() {
        let t = x + key + constant;
        x = t.square().square() * t;
    }
    x + key
}

/// A MiMC sponge: absorb field elements or byte strings, squeeze one digest.
///
/// Byte inputs are interpreted as big-endian integers mod |F|, in 32-byte
/// chunks left-to-right. An input strictly smaller than |F| therefore hashes
/// to the same digest as its native field encoding; larger inputs reduce.
#[derive(Clone, Debug, Default)]
pub struct Mimc {
    state: Fr,
    data: Vec<Fr>,
}

impl Mimc {
    /// Creates an empty sponge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorbs one field element.
    pub fn write_field(&mut self, element: Fr) {
        self.data.push(element);
    }

    /// Absorbs a byte string as big-endian field elements.
    ///
    /// Inputs up to 32 bytes become a single element; longer inputs are
    /// split into 32-byte chunks from the left, the final chunk possibly
    /// shorter. Absorbing an empty slice is a no-op.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for chunk in bytes.chunks(32) {
            self.data.push(Fr::from_be_bytes_mod_order(chunk));
        }
    }

    /// Squeezes the digest as a field element, consuming the absorbed queue.
    ///
    /// Each element m updates the state as `h <- permute(m, h) + h + m`
    /// (Miyaguchi-Preneel). Calling `sum_field` again without further writes
    /// returns the same digest.
    pub fn sum_field(&mut self) -> Fr {
        for element in self.data.drain(..) {
            self.state = permute(element, self.state) + self.state + element;
        }
        self.state
    }

    /// Squeezes the digest as its 32-byte big-endian encoding.
    pub fn sum(&mut self) -> [u8; 32] {
        let digest = self.sum_field();
        let bytes = digest.into_bigint().to_bytes_be();
        let mut out = [0u8; 32];
        out[32 - bytes.len()..].copy_from_slice(&bytes);
        out
    }
}

/// One-shot hash of a sequence of field elements.
pub fn hash_fields(elements: &[Fr]) -> Fr {
    let mut hasher = Mimc::new();
    for element in elements {
        hasher.write_field(*element);
    }
    hasher.sum_field()
}
