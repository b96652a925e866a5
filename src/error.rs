// src/error.rs
//! Error types for the DID service core.

use thiserror::Error;

/// Result type alias for DID service operations
pub type Result<T> = std::result::Result<T, DidError>;

/// Error types that can occur during DID service operations.
///
/// Verification operations never surface a failed proof check as an error:
/// "the proof is invalid" is `Ok(false)`, while these variants mean the
/// operation could not reach a verdict at all.
#[derive(Error, Debug)]
pub enum DidError {
    /// DID or credential id is unknown
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed hex or bytes, scalar out of range, age or threshold out of
    /// the supported width
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The prover was handed an unsatisfiable witness
    #[error("circuit constraints not satisfied: {0}")]
    CircuitFailed(String),

    /// RNG failure, serialization failure, broken invariant
    #[error("internal error: {0}")]
    Internal(String),

    /// Circuit compilation or Groth16 setup failed at construction; fatal
    #[error("setup failed: {0}")]
    SetupFailed(String),
}

impl From<hex::FromHexError> for DidError {
    fn from(err: hex::FromHexError) -> Self {
        DidError::InvalidInput(format!("malformed hex: {}", err))
    }
}

impl From<ark_serialize::SerializationError> for DidError {
    fn from(err: ark_serialize::SerializationError) -> Self {
        DidError::InvalidInput(format!("malformed encoding: {}", err))
    }
}
