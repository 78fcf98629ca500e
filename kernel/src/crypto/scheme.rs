//! The signature-scheme abstraction.
//!
//! A single capability — `verify(pk, msg, sig) -> bool` — replaces concrete
//! signer types. `Builder` and `Verifier` take `&dyn SignatureScheme` rather
//! than being generic over it: the scheme is a runtime-supplied collaborator,
//! not a compile-time parameter of the certificate format itself. The
//! specific algorithm (post-quantum Schnorr, Dilithium, Ed25519, ...) is
//! opaque to everything in this crate outside this trait's implementor.

/// A deterministic-verification signature scheme with fixed-length public
/// keys. Signing is intentionally not part of this trait: the kernel never
/// signs on anyone's behalf, it only verifies signatures supplied to it.
pub trait SignatureScheme {
    /// Verify `signature` over `message` under `pubkey`. Any malformed key
    /// or signature encoding is simply a failed verification, not a
    /// distinguishable error — callers cannot act differently on "malformed"
    /// versus "well-formed but wrong."
    fn verify(&self, pubkey: &[u8], message: &[u8], signature: &[u8]) -> bool;
}
