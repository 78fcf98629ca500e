//! The self-contained attestation produced by `Builder::build` and consumed
//! by `verifier::verify`. Immutable once constructed; owns its proofs.

use crate::compat::{BTreeMap, Vec};
use crate::hash::keccak::Digest;
use crate::model::{Participant, SignatureSlot};
use crate::CertError;

/// A single revealed participant: the position's signing record and its
/// roster entry, exposed together so a verifier can re-hash both leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    pub slot: SignatureSlot,
    pub party: Participant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub sig_commit: Digest,
    pub signed_weight: u64,
    /// Keyed by position; `BTreeMap` gives the ascending-position iteration
    /// order the Verifier's monotonicity check relies on.
    pub reveals: BTreeMap<usize, Reveal>,
    pub sig_proofs: Vec<Digest>,
    pub party_proofs: Vec<Digest>,
    /// Revealed positions in coin order (duplicates retained).
    pub reveal_positions: Vec<usize>,
    /// Coin index that produced each entry of `reveal_positions`; same length.
    pub reveal_indices: Vec<u64>,
}

impl Certificate {
    /// `sig_commit(32) || signed_weight(8) || K(4) || K*(coin_index(8),
    /// position(8)) || |P|(4) || |P|*(position(8), SignatureSlot, Participant)
    /// || sig_proof: count(4) + count*32 || party_proof: count(4) + count*32`
    ///
    /// `party_commit` is deliberately not carried on the wire: a verifier
    /// must already possess the roster commitment out-of-band, so embedding
    /// a second, self-asserted copy would be redundant data a malicious
    /// encoder could set inconsistently with no verification consequence.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.sig_commit);
        out.extend_from_slice(&self.signed_weight.to_be_bytes());

        let k = self.reveal_indices.len() as u32;
        out.extend_from_slice(&k.to_be_bytes());
        for i in 0..self.reveal_indices.len() {
            out.extend_from_slice(&self.reveal_indices[i].to_be_bytes());
            out.extend_from_slice(&(self.reveal_positions[i] as u64).to_be_bytes());
        }

        out.extend_from_slice(&(self.reveals.len() as u32).to_be_bytes());
        for (&pos, reveal) in &self.reveals {
            out.extend_from_slice(&(pos as u64).to_be_bytes());
            out.extend_from_slice(&reveal.slot.encode());
            out.extend_from_slice(&reveal.party.encode());
        }

        encode_proof(&mut out, &self.sig_proofs);
        encode_proof(&mut out, &self.party_proofs);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CertError> {
        let mut cursor = 0usize;
        let sig_commit = read_digest(bytes, &mut cursor)?;
        let signed_weight = read_u64(bytes, &mut cursor)?;

        let k = read_u32(bytes, &mut cursor)? as usize;
        let mut reveal_indices = Vec::with_capacity(k);
        let mut reveal_positions = Vec::with_capacity(k);
        for _ in 0..k {
            reveal_indices.push(read_u64(bytes, &mut cursor)?);
            reveal_positions.push(read_u64(bytes, &mut cursor)? as usize);
        }

        let reveal_count = read_u32(bytes, &mut cursor)? as usize;
        let mut reveals = BTreeMap::new();
        for _ in 0..reveal_count {
            let pos = read_u64(bytes, &mut cursor)? as usize;
            let (slot, slot_len) = SignatureSlot::decode(&bytes[cursor..])?;
            cursor += slot_len;
            let (party, party_len) = Participant::decode(&bytes[cursor..])?;
            cursor += party_len;
            if reveals.insert(pos, Reveal { slot, party }).is_some() {
                return Err(CertError::MalformedCertificate);
            }
        }

        let sig_proofs = decode_proof(bytes, &mut cursor)?;
        let party_proofs = decode_proof(bytes, &mut cursor)?;

        if cursor != bytes.len() {
            return Err(CertError::MalformedCertificate);
        }

        Ok(Certificate {
            sig_commit,
            signed_weight,
            reveals,
            sig_proofs,
            party_proofs,
            reveal_positions,
            reveal_indices,
        })
    }
}

fn encode_proof(out: &mut Vec<u8>, proof: &[Digest]) {
    out.extend_from_slice(&(proof.len() as u32).to_be_bytes());
    for digest in proof {
        out.extend_from_slice(digest);
    }
}

fn decode_proof(bytes: &[u8], cursor: &mut usize) -> Result<Vec<Digest>, CertError> {
    let count = read_u32(bytes, cursor)? as usize;
    let mut proof = Vec::with_capacity(count);
    for _ in 0..count {
        proof.push(read_digest(bytes, cursor)?);
    }
    Ok(proof)
}

fn read_digest(bytes: &[u8], cursor: &mut usize) -> Result<Digest, CertError> {
    if bytes.len() < *cursor + 32 {
        return Err(CertError::MalformedCertificate);
    }
    let digest: Digest = bytes[*cursor..*cursor + 32]
        .try_into()
        .map_err(|_| CertError::MalformedCertificate)?;
    *cursor += 32;
    Ok(digest)
}

fn read_u64(bytes: &[u8], cursor: &mut usize) -> Result<u64, CertError> {
    if bytes.len() < *cursor + 8 {
        return Err(CertError::MalformedCertificate);
    }
    let v = u64::from_be_bytes(bytes[*cursor..*cursor + 8].try_into().unwrap());
    *cursor += 8;
    Ok(v)
}

fn read_u32(bytes: &[u8], cursor: &mut usize) -> Result<u32, CertError> {
    if bytes.len() < *cursor + 4 {
        return Err(CertError::MalformedCertificate);
    }
    let v = u32::from_be_bytes(bytes[*cursor..*cursor + 4].try_into().unwrap());
    *cursor += 4;
    Ok(v)
}
