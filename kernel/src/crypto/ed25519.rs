//! Ed25519 signature verification — thin wrapper around ed25519-dalek.
//!
//! Stands in for the abstract post-quantum signing primitive the
//! specification treats as an external collaborator: any
//! deterministic-verification scheme with fixed-length public keys is a
//! valid `SignatureScheme`, and this one is a concrete, audited choice
//! rather than original cryptographic code.
//!
//! AUDIT SURFACE:
//!   ed25519-dalek 2.1.1 — MIT/Apache-2.0 — most widely used Ed25519 in Rust.
//!   `verify_strict` enforces cofactored verification, canonical S and R
//!   encoding checks, and small-order public key rejection.
//!
//! PINNED: ed25519-dalek = "=2.1.1", default-features = false

use crate::crypto::scheme::SignatureScheme;

/// A `SignatureScheme` backed by Ed25519. `pubkey` must be exactly 32 bytes
/// and `signature` exactly 64 bytes (`R || s`); any other length is simply
/// treated as a failed verification.
pub struct Ed25519Scheme;

impl SignatureScheme for Ed25519Scheme {
    fn verify(&self, pubkey: &[u8], message: &[u8], signature: &[u8]) -> bool {
        use ed25519_dalek::{Signature, VerifyingKey};

        let Ok(pubkey): Result<[u8; 32], _> = pubkey.try_into() else {
            return false;
        };
        let Ok(signature): Result<[u8; 64], _> = signature.try_into() else {
            return false;
        };

        let Ok(vk) = VerifyingKey::from_bytes(&pubkey) else {
            return false;
        };
        let sig = Signature::from_bytes(&signature);

        vk.verify_strict(message, &sig).is_ok()
    }
}
