//! Certificate parameters: the attested message, the public threshold, and
//! the number of coin flips to derive. Immutable for the lifetime of a
//! build/verify pair.

use crate::compat::Vec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params {
    pub msg: Vec<u8>,
    pub proven_weight: u64,
    pub sec_kq: u32,
}

impl Params {
    pub fn new(msg: Vec<u8>, proven_weight: u64, sec_kq: u32) -> Self {
        Params { msg, proven_weight, sec_kq }
    }
}
