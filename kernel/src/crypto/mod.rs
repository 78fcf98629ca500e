//! The external signing capability. The core certificate logic is oblivious
//! to the concrete signature algorithm; it only ever calls `verify`.
pub mod ed25519;
pub mod scheme;

pub use scheme::SignatureScheme;
