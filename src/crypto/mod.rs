// src/crypto/mod.rs
//! Native cryptographic primitives: the MiMC sponge and EdDSA over Baby
//! Jubjub. Both are mirrored constraint-for-constraint by the gadgets in
//! [`crate::zkp`].

pub mod eddsa;
pub mod mimc;
