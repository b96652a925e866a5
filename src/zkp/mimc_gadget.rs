// src/zkp/mimc_gadget.rs
//! In-circuit MiMC sponge.
//!
//! Twin of [`crate::crypto::mimc`]: the same Miyaguchi-Preneel mode, the
//! same x^5 S-box, and crucially the same round-constant table. The gadget
//! reads [`crate::crypto::mimc::round_constants`] rather than carrying its
//! own copy, so a native digest and an in-circuit digest of the same
//! elements are equal field elements.

use ark_bn254::Fr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::fields::FieldVar;
use ark_relations::r1cs::SynthesisError;

use crate::crypto::mimc::round_constants;

/// The keyed permutation over circuit variables.
fn permute(input: &FpVar<Fr>, key: &FpVar<Fr>) -> Result<FpVar<Fr>, SynthesisError> {
    let mut x = input.clone();
    for constant in round_constants().iter() {
        let t = &x + key + FpVar::constant(*constant);
        x = t.square()?.square()? * &t;
    }
    Ok(x + key)
}

/// A MiMC sponge over `FpVar`s, mirroring the native `Mimc` interface.
#[derive(Clone)]
pub struct MimcGadget {
    state: FpVar<Fr>,
    data: Vec<FpVar<Fr>>,
}

impl MimcGadget {
    /// Creates an empty sponge.
    pub fn new() -> Self {
        Self {
            state: FpVar::zero(),
            data: Vec::new(),
        }
    }

    /// Absorbs one circuit variable.
    pub fn write(&mut self, element: &FpVar<Fr>) {
        self.data.push(element.clone());
    }

    /// Squeezes the digest, consuming the absorbed queue.
    pub fn sum(&mut self) -> Result<FpVar<Fr>, SynthesisError> {
        let elements = std::mem::take(&mut self.data);
        for element in elements {
            let permuted = permute(&element, &self.state)?;
            self.state = permuted + &self.state + &element;
        }
        Ok(self.state.clone())
    }
}

impl Default for MimcGadget {
    fn default() -> Self {
        Self::new()
    }
}
