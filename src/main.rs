// src/main.rs
//! Demo walking the full DID lifecycle against an in-process service:
//! create, authenticate, verify, issue an age credential, prove and verify
//! the age threshold.

use zk_did::services::did_service::DidService;
use zk_did::DidError;

fn main() -> Result<(), DidError> {
    env_logger::init();

    println!("Compiling circuits and running setup (unsafe, in-process)...");
    let service = DidService::new()?;

    // Create an identity. The secret stays with the caller.
    let (did, secret) = service.create_did()?;
    println!("Created DID: {}", did.id);

    // Authenticate against a challenge and verify the resulting proof.
    let challenge = b"demo-challenge-001";
    let (proof, signature) = service.authenticate_did(&did.id, &secret, challenge)?;
    println!(
        "Authentication proof: {} bytes, signature: {} bytes",
        proof.len(),
        signature.len()
    );
    let valid = service.verify_authentication(&did.id, &proof, &signature, challenge)?;
    println!("Authentication verified: {}", valid);

    // Issue an age credential and prove the threshold predicate.
    let (credential, salt) = service.issue_age_credential(&did.id, 25)?;
    println!(
        "Issued credential {} with commitment {}",
        credential.id, credential.commitment_id
    );

    let age_proof = service.create_age_proof(&did.id, &credential.id, 18, 25, &salt)?;
    let over_18 = service.verify_age_proof(&did.id, &credential.id, 18, &age_proof)?;
    println!("Age >= 18 verified: {}", over_18);

    let over_30 = service.verify_age_proof(&did.id, &credential.id, 30, &age_proof)?;
    println!("Same proof against threshold 30: {}", over_30);

    Ok(())
}
