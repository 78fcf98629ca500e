//! Compact Certificate Kernel — deterministic builder/verifier core for
//! weighted threshold-signature certificates.
//!
//! A single-threaded, synchronous core. No networking, no I/O, no async, no
//! threading — every operation is a pure function of its arguments.
//!
//! INVARIANTS:
//! 1. All arithmetic uses checked_* variants. Overflow surfaces as
//!    `CertError::MalformedCertificate`, never a silent wrap.
//! 2. BTreeMap is used wherever iteration order matters: iteration order is
//!    deterministic (sorted by key).
//! 3. HashMap is forbidden on any path that feeds a hash or a comparison — a
//!    random seed there would make certificates non-reproducible.
//! 4. Feature flags that alter certificate-construction semantics are not
//!    offered.
//! 5. Floating-point arithmetic is forbidden; every quantity here is an
//!    integer weight, position, or digest.

pub mod compat;
pub mod hash;
pub mod crypto;
pub mod model;
pub mod weighted_index;
pub mod coin;
pub mod builder;
pub mod certificate;
pub mod verifier;

/// The canonical error type for every certificate-construction or
/// certificate-verification failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertError {
    /// `add_signature` referenced a position outside `0..N`.
    InvalidPosition,
    /// `add_signature` targeted a slot that already holds a signature.
    DuplicateSignature,
    /// A signature failed verification, either at `add_signature` or during `verify`.
    InvalidSignature,
    /// `Builder::build` was called with `signed_weight < proven_weight`.
    InsufficientWeight,
    /// `Verifier::verify` found `certificate.signed_weight < proven_weight`.
    WeightBelowThreshold,
    /// A revealed slot carries no signature.
    MissingSignature,
    /// A Merkle multi-proof failed to reconstruct the expected root.
    BadProof,
    /// A recomputed coin maps to a position outside the revealed set, or to a
    /// different position than the certificate claims.
    CoinMismatch,
    /// Certificate decoding or internal-consistency checks failed: length
    /// mismatches, unsorted positions, zero-weight participants, arithmetic
    /// overflow while validating a certificate's own fields.
    MalformedCertificate,
}
