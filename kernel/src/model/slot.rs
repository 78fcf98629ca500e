//! The per-participant signature record. Holds an optional signature and
//! the cumulative weight of signing slots strictly preceding this one.

use crate::compat::Vec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureSlot {
    pub sig: Option<Vec<u8>>,
    /// Cumulative weight of *signing* slots strictly preceding this one.
    /// Unspecified when `sig` is `None`; always serialized as implicitly 0
    /// since the absent encoding carries no `l` field at all.
    pub l: u64,
}

impl SignatureSlot {
    pub fn empty() -> Self {
        SignatureSlot { sig: None, l: 0 }
    }

    /// `0x00` when absent; `0x01 || u32 len(sig) || sig || u64 l` when present.
    pub fn encode(&self) -> Vec<u8> {
        match &self.sig {
            None => crate::compat::vec![0x00],
            Some(sig) => {
                let mut out = Vec::with_capacity(1 + 4 + sig.len() + 8);
                out.push(0x01);
                out.extend_from_slice(&(sig.len() as u32).to_be_bytes());
                out.extend_from_slice(sig);
                out.extend_from_slice(&self.l.to_be_bytes());
                out
            }
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), crate::CertError> {
        match bytes.first() {
            Some(0x00) => Ok((SignatureSlot::empty(), 1)),
            Some(0x01) => {
                if bytes.len() < 5 {
                    return Err(crate::CertError::MalformedCertificate);
                }
                let sig_len = u32::from_be_bytes(bytes[1..5].try_into().unwrap()) as usize;
                let sig_end = 5 + sig_len;
                if bytes.len() < sig_end + 8 {
                    return Err(crate::CertError::MalformedCertificate);
                }
                let sig = bytes[5..sig_end].to_vec();
                let l = u64::from_be_bytes(bytes[sig_end..sig_end + 8].try_into().unwrap());
                Ok((SignatureSlot { sig: Some(sig), l }, sig_end + 8))
            }
            _ => Err(crate::CertError::MalformedCertificate),
        }
    }
}
