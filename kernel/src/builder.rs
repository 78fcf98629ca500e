//! Signature aggregation and certificate assembly: `Open -> Sealed`.
//!
//! `add_signature` is accepted any number of times while the `Builder` is
//! alive. `build()` consumes `self` by value — once called, the builder is
//! moved and the compiler rejects further calls, which is the idiomatic
//! Rust reading of "further calls are rejected" rather than a runtime flag.

use crate::certificate::{Certificate, Reveal};
use crate::coin::derive_coin;
use crate::compat::{BTreeMap, Vec};
use crate::crypto::scheme::SignatureScheme;
use crate::hash::keccak::{keccak256, Digest};
use crate::hash::merkle::MerkleTree;
use crate::model::{Participant, Params, SignatureSlot};
use crate::weighted_index::WeightedIndex;
use crate::CertError;

pub struct Builder<'a> {
    params: Params,
    participants: Vec<Participant>,
    party_tree: MerkleTree,
    scheme: &'a dyn SignatureScheme,
    slots: Vec<SignatureSlot>,
    signed_weight: u64,
}

impl<'a> Builder<'a> {
    /// `party_tree` must already be built over `H(encode(participants[i]))`
    /// for every `i`, in the same order as `participants`.
    pub fn new(
        params: Params,
        participants: Vec<Participant>,
        party_tree: MerkleTree,
        scheme: &'a dyn SignatureScheme,
    ) -> Result<Self, CertError> {
        if participants.is_empty() {
            return Err(CertError::MalformedCertificate);
        }
        if participants.iter().any(|p| p.weight == 0) {
            return Err(CertError::MalformedCertificate);
        }
        if party_tree.total_leaves() != participants.len() {
            return Err(CertError::MalformedCertificate);
        }

        let slots = participants.iter().map(|_| SignatureSlot::empty()).collect();
        Ok(Builder {
            params,
            participants,
            party_tree,
            scheme,
            slots,
            signed_weight: 0,
        })
    }

    /// Verifies `sig` against `participants[pos].pk` over `params.msg`
    /// before accepting it; `signed_weight` only grows on success.
    pub fn add_signature(&mut self, pos: usize, sig: Vec<u8>) -> Result<(), CertError> {
        if pos >= self.participants.len() {
            return Err(CertError::InvalidPosition);
        }
        if self.slots[pos].sig.is_some() {
            return Err(CertError::DuplicateSignature);
        }

        let participant = &self.participants[pos];
        if !self.scheme.verify(&participant.pk, &self.params.msg, &sig) {
            return Err(CertError::InvalidSignature);
        }

        self.slots[pos].sig = Some(sig);
        self.signed_weight = self
            .signed_weight
            .checked_add(participant.weight)
            .ok_or(CertError::MalformedCertificate)?;
        Ok(())
    }

    pub fn build(mut self) -> Result<Certificate, CertError> {
        if self.signed_weight < self.params.proven_weight || self.signed_weight == 0 {
            return Err(CertError::InsufficientWeight);
        }

        // Step 2: l_i is the cumulative weight of signing slots strictly
        // preceding slot i (running sum over signers only).
        let mut running = 0u64;
        let mut signing_entries: Vec<(usize, u64)> = Vec::new();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.sig.is_some() {
                slot.l = running;
                let weight = self.participants[i].weight;
                signing_entries.push((i, weight));
                running = running
                    .checked_add(weight)
                    .ok_or(CertError::MalformedCertificate)?;
            }
        }

        // Step 3: signature tree, one leaf per slot (signer or canonical
        // empty slot).
        let sig_leaves: Vec<Digest> = self.slots.iter().map(|s| keccak256(&s.encode())).collect();
        let sig_tree = MerkleTree::build(&sig_leaves)?;
        let sig_commit = sig_tree.root();

        // Step 4: the roster commitment was built by the caller.
        let party_commit = self.party_tree.root();

        // Step 5: derive K coins against the dense signing-weight index.
        let signing_index = WeightedIndex::new(&signing_entries)?;
        let k = self.params.sec_kq as u64;
        let mut reveal_positions = Vec::with_capacity(k as usize);
        let mut reveal_indices = Vec::with_capacity(k as usize);
        for j in 0..k {
            let coin = derive_coin(
                j,
                self.signed_weight,
                self.params.proven_weight,
                &sig_commit,
                &party_commit,
                &self.params.msg,
            );
            let pos = signing_index.find_position(coin)?;
            reveal_positions.push(pos);
            reveal_indices.push(j);
        }

        // Step 6: P = sorted unique positions; extract multi-proofs.
        let mut revealed_positions_sorted: Vec<usize> = reveal_positions.clone();
        revealed_positions_sorted.sort_unstable();
        revealed_positions_sorted.dedup();
        let sig_proofs = sig_tree.prove(&revealed_positions_sorted)?;
        let party_proofs = self.party_tree.prove(&revealed_positions_sorted)?;

        // Step 7: build the reveals map.
        let mut reveals = BTreeMap::new();
        for &pos in &revealed_positions_sorted {
            reveals.insert(
                pos,
                Reveal {
                    slot: self.slots[pos].clone(),
                    party: self.participants[pos].clone(),
                },
            );
        }

        Ok(Certificate {
            sig_commit,
            signed_weight: self.signed_weight,
            reveals,
            sig_proofs,
            party_proofs,
            reveal_positions,
            reveal_indices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::ed25519::Ed25519Scheme;
    use ed25519_dalek::{Signer, SigningKey};

    fn roster(weights: &[u64]) -> (Vec<Participant>, Vec<SigningKey>) {
        let keys: Vec<SigningKey> = (0..weights.len())
            .map(|i| SigningKey::from_bytes(&[i as u8 + 1; 32]))
            .collect();
        let participants = weights
            .iter()
            .zip(&keys)
            .map(|(&w, sk)| Participant::new(sk.verifying_key().to_bytes().to_vec(), w))
            .collect();
        (participants, keys)
    }

    fn party_tree(participants: &[Participant]) -> MerkleTree {
        let leaves: Vec<Digest> = participants.iter().map(|p| keccak256(&p.encode())).collect();
        MerkleTree::build(&leaves).unwrap()
    }

    #[test]
    fn basic_success_all_sign() {
        let weights = [10u64, 20, 30, 40, 50, 60, 70, 80, 90, 100];
        let (participants, keys) = roster(&weights);
        let tree = party_tree(&participants);
        let params = Params::new(b"attest this".to_vec(), 275, 64);
        let scheme = Ed25519Scheme;

        let mut builder = Builder::new(params, participants, tree, &scheme).unwrap();
        for (i, sk) in keys.iter().enumerate() {
            let sig = sk.sign(b"attest this").to_bytes().to_vec();
            builder.add_signature(i, sig).unwrap();
        }

        let cert = builder.build().unwrap();
        assert_eq!(cert.signed_weight, 550);
    }

    #[test]
    fn insufficient_weight_fails_build() {
        let weights = [10u64, 20, 30, 40, 50, 60, 70, 80, 90, 100];
        let (participants, keys) = roster(&weights);
        let tree = party_tree(&participants);
        let params = Params::new(b"attest this".to_vec(), 275, 64);
        let scheme = Ed25519Scheme;

        let mut builder = Builder::new(params, participants, tree, &scheme).unwrap();
        for i in 0..4 {
            let sig = keys[i].sign(b"attest this").to_bytes().to_vec();
            builder.add_signature(i, sig).unwrap();
        }

        assert_eq!(builder.build().unwrap_err(), CertError::InsufficientWeight);
    }

    #[test]
    fn duplicate_signature_is_rejected() {
        let weights = [10u64, 20, 30];
        let (participants, keys) = roster(&weights);
        let tree = party_tree(&participants);
        let params = Params::new(b"m".to_vec(), 5, 4);
        let scheme = Ed25519Scheme;

        let mut builder = Builder::new(params, participants, tree, &scheme).unwrap();
        let sig_a = keys[0].sign(b"m").to_bytes().to_vec();
        let sig_b = keys[0].sign(b"m").to_bytes().to_vec();
        builder.add_signature(0, sig_a).unwrap();
        assert_eq!(builder.add_signature(0, sig_b).unwrap_err(), CertError::DuplicateSignature);
    }

    #[test]
    fn invalid_position_is_rejected() {
        let weights = [10u64, 20, 30];
        let (participants, keys) = roster(&weights);
        let tree = party_tree(&participants);
        let params = Params::new(b"m".to_vec(), 5, 4);
        let scheme = Ed25519Scheme;

        let mut builder = Builder::new(params, participants, tree, &scheme).unwrap();
        let sig = keys[0].sign(b"m").to_bytes().to_vec();
        assert_eq!(builder.add_signature(10, sig).unwrap_err(), CertError::InvalidPosition);
    }

    #[test]
    fn wrong_signature_is_rejected_at_add() {
        let weights = [10u64, 20, 30];
        let (participants, keys) = roster(&weights);
        let tree = party_tree(&participants);
        let params = Params::new(b"m".to_vec(), 5, 4);
        let scheme = Ed25519Scheme;

        let mut builder = Builder::new(params, participants, tree, &scheme).unwrap();
        let wrong_sig = keys[1].sign(b"m").to_bytes().to_vec();
        assert_eq!(builder.add_signature(0, wrong_sig).unwrap_err(), CertError::InvalidSignature);
    }

    #[test]
    fn zero_weight_participant_is_rejected_at_construction() {
        let weights = [10u64, 0, 30];
        let (participants, _keys) = roster(&weights);
        let tree = party_tree(&participants);
        let params = Params::new(b"m".to_vec(), 5, 4);
        let scheme = Ed25519Scheme;
        assert_eq!(
            Builder::new(params, participants, tree, &scheme).unwrap_err(),
            CertError::MalformedCertificate
        );
    }

    #[test]
    fn full_reveal_proofs_are_empty() {
        // A tiny roster with a low threshold and high K makes it very
        // likely every position gets revealed at least once.
        let weights = [5u64, 5, 5];
        let (participants, keys) = roster(&weights);
        let tree = party_tree(&participants);
        let params = Params::new(b"m".to_vec(), 5, 256);
        let scheme = Ed25519Scheme;

        let mut builder = Builder::new(params, participants, tree, &scheme).unwrap();
        for (i, sk) in keys.iter().enumerate() {
            let sig = sk.sign(b"m").to_bytes().to_vec();
            builder.add_signature(i, sig).unwrap();
        }
        let cert = builder.build().unwrap();
        assert_eq!(cert.reveals.len(), 3);
        assert!(cert.sig_proofs.is_empty());
        assert!(cert.party_proofs.is_empty());
    }
}
