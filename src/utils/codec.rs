// src/utils/codec.rs
//! Wire codecs for the DID system.
//!
//! Every transport payload is lowercase hex without a `0x` prefix. Field
//! elements are fixed-width (64 hex chars); proofs, keys and signatures use
//! their canonical compressed encodings from `ark-serialize`.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};

use crate::error::{DidError, Result};

/// Prefix shared by every identifier this service mints.
pub const DID_METHOD_PREFIX: &str = "did:example:";

/// Encodes bytes as lowercase hex without a prefix.
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decodes a lowercase hex string into bytes.
///
/// # Errors
/// Returns `InvalidInput` on odd length or non-hex characters.
pub fn decode_hex(data: &str) -> Result<Vec<u8>> {
    hex::decode(data).map_err(Into::into)
}

/// Derives the DID identifier from compressed public key bytes.
///
/// The identifier is `did:example:` followed by the lowercase hex of the
/// 32-byte compressed Baby Jubjub public key. The hex uniquely determines
/// the public key, so the registry can reject duplicates by id alone.
pub fn did_identifier(public_key_bytes: &[u8]) -> String {
    format!("{}{}", DID_METHOD_PREFIX, hex::encode(public_key_bytes))
}

/// Reduces challenge bytes to a single field element, big-endian.
///
/// This is the one message convention of the system: the signer, the prover
/// witness and the verifier's public witness all pass the challenge through
/// this function, so a proof is bound to exactly the bytes that were signed.
pub fn challenge_to_field(challenge: &[u8]) -> Fr {
    Fr::from_be_bytes_mod_order(challenge)
}

/// Encodes a field element as fixed-width (64 char) lowercase hex.
pub fn field_to_hex(element: &Fr) -> String {
    hex::encode(element.into_bigint().to_bytes_be())
}

/// Decodes a field element from hex produced by [`field_to_hex`].
///
/// # Errors
/// Returns `InvalidInput` on malformed hex or a value outside the field.
pub fn field_from_hex(data: &str) -> Result<Fr> {
    let bytes = decode_hex(data)?;
    if bytes.len() > 32 {
        return Err(DidError::InvalidInput(format!(
            "field element encoding too long: {} bytes",
            bytes.len()
        )));
    }
    Ok(Fr::from_be_bytes_mod_order(&bytes))
}
