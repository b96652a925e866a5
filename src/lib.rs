// src/lib.rs
//! # zk-did
//!
//! A decentralized-identity service built around two Groth16 circuits that
//! are compiled once at startup and reused for every proof:
//!
//! 1. **Authentication**: proves possession of the EdDSA key registered for
//!    a DID by verifying a signature over a challenge *inside* the circuit,
//!    on the Baby Jubjub curve with MiMC as the scheme hash.
//! 2. **Age threshold**: proves that an age committed on a credential meets
//!    a public threshold, without revealing the age or the blinding salt.
//!
//! The crate is the synchronous core of such a service: an in-memory DID
//! registry, a credential issuer, the circuits, and prover/verifier
//! operations. Transport, storage and session handling are left to the
//! host.
//!
//! # Security
//!
//! The default constructors run the Groth16 trusted setup in-process with a
//! local RNG. That setup is **single-party and cryptographically unsafe**:
//! anyone who learns its randomness can forge proofs. Production
//! deployments must generate keys in a proper ceremony and construct the
//! service with [`services::did_service::DidService::from_keys`].

pub mod crypto;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod zkp;

pub use error::{DidError, Result};
pub use services::did_service::DidService;
