//! Certificate verification: recompute every commitment, signature, and
//! coin the Builder derived, and accept only if they all agree.
//!
//! Deliberately stateless and side-effect free: `verify` takes everything it
//! needs as arguments and returns `Ok(())` or the first `CertError` it hits.
//! There is no partial-success result — a certificate either fully checks
//! out or it is rejected.

use crate::certificate::Certificate;
use crate::coin::derive_coin;
use crate::compat::{BTreeSet, Vec};
use crate::hash::keccak::{keccak256, Digest};
use crate::hash::merkle::MerkleTree;
use crate::model::Params;
use crate::weighted_index::find_in_intervals;
use crate::crypto::scheme::SignatureScheme;
use crate::CertError;

/// `party_commit` and `total_participants` describe the roster the verifier
/// already trusts out-of-band; they are not carried on the certificate's
/// wire format (see `Certificate::to_bytes`).
pub fn verify(
    params: &Params,
    party_commit: Digest,
    total_participants: usize,
    certificate: &Certificate,
    scheme: &dyn SignatureScheme,
) -> Result<(), CertError> {
    if certificate.signed_weight < params.proven_weight || certificate.signed_weight == 0 {
        return Err(CertError::WeightBelowThreshold);
    }
    if certificate.reveal_indices.len() != params.sec_kq as usize
        || certificate.reveal_positions.len() != certificate.reveal_indices.len()
    {
        return Err(CertError::MalformedCertificate);
    }
    for (j, &idx) in certificate.reveal_indices.iter().enumerate() {
        if idx != j as u64 {
            return Err(CertError::MalformedCertificate);
        }
    }
    let revealed_position_set: BTreeSet<usize> =
        certificate.reveal_positions.iter().copied().collect();
    for &pos in &certificate.reveal_positions {
        if !certificate.reveals.contains_key(&pos) {
            return Err(CertError::MissingSignature);
        }
    }
    for &pos in certificate.reveals.keys() {
        if !revealed_position_set.contains(&pos) {
            return Err(CertError::MalformedCertificate);
        }
    }

    // Ascending-position iteration (BTreeMap) only gives a lower bound on
    // l_p: the true l_p also counts weight from signers that precede this
    // position but were never revealed, which the verifier cannot see. So
    // this only checks that revealed l values never go backwards and that
    // each claimed range stays inside the signed weight — not that they sum
    // exactly across revealed entries alone.
    let mut sig_leaves = Vec::with_capacity(certificate.reveals.len());
    let mut party_leaves = Vec::with_capacity(certificate.reveals.len());
    let mut intervals = Vec::with_capacity(certificate.reveals.len());
    let mut running_floor = 0u64;
    for (&pos, reveal) in &certificate.reveals {
        let sig = reveal.slot.sig.as_ref().ok_or(CertError::MissingSignature)?;
        if !scheme.verify(&reveal.party.pk, &params.msg, sig) {
            return Err(CertError::InvalidSignature);
        }
        if reveal.slot.l < running_floor {
            return Err(CertError::MalformedCertificate);
        }
        let l_plus_weight = reveal
            .slot
            .l
            .checked_add(reveal.party.weight)
            .ok_or(CertError::MalformedCertificate)?;
        if l_plus_weight > certificate.signed_weight {
            return Err(CertError::MalformedCertificate);
        }
        running_floor = l_plus_weight;

        sig_leaves.push((pos, keccak256(&reveal.slot.encode())));
        party_leaves.push((pos, keccak256(&reveal.party.encode())));
        intervals.push((pos, reveal.slot.l, reveal.party.weight));
    }

    let sig_ok = MerkleTree::verify(
        certificate.sig_commit,
        total_participants,
        &sig_leaves,
        &certificate.sig_proofs,
    )?;
    if !sig_ok {
        return Err(CertError::BadProof);
    }
    let party_ok = MerkleTree::verify(
        party_commit,
        total_participants,
        &party_leaves,
        &certificate.party_proofs,
    )?;
    if !party_ok {
        return Err(CertError::BadProof);
    }

    for j in 0..certificate.reveal_indices.len() {
        let coin = derive_coin(
            certificate.reveal_indices[j],
            certificate.signed_weight,
            params.proven_weight,
            &certificate.sig_commit,
            &party_commit,
            &params.msg,
        );
        let resolved = find_in_intervals(&intervals, coin).ok_or(CertError::CoinMismatch)?;
        if resolved != certificate.reveal_positions[j] {
            return Err(CertError::CoinMismatch);
        }
    }

    Ok(())
}
