// src/zkp/mod.rs
//! Zero-knowledge circuits and gadgets.
//!
//! Two circuits are compiled at service startup: [`auth_circuit::AuthCircuit`]
//! verifies an EdDSA signature inside the constraint system, and
//! [`age_circuit::AgeCircuit`] proves a committed age meets a threshold.

pub mod age_circuit;
pub mod auth_circuit;
pub mod eddsa_gadget;
pub mod mimc_gadget;
