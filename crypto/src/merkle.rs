//! Merkle payout trees for compensation claims.
//!
//! A compensation root commits to a set of `(recipient, amount)` leaves computed
//! off-chain. Each recipient later proves membership of their own leaf with a
//! list of sibling hashes.
//!
//! Construction:
//! - leaf = `Blake2b-256(LEAF_TAG || recipient || amount_be128)`
//! - node = `Blake2b-256(NODE_TAG || min(a, b) || max(a, b))`
//!
//! Pairs are hashed in sorted order, so a proof carries no left/right flags.
//! Leaves and nodes use distinct tags, so an inner node can never be passed
//! off as a leaf. An unpaired node at the end of a level is promoted as-is.

use crate::error::CryptoError;
use crate::hash::blake2b_256_multi;
use serde::{Deserialize, Serialize};
use tribunal_types::Address;

const LEAF_TAG: &[u8] = b"tribunal/compensation-leaf/v1";
const NODE_TAG: &[u8] = b"tribunal/compensation-node/v1";

/// Hash of the `(recipient, amount)` leaf a compensation claim proves.
pub fn compensation_leaf(recipient: &Address, amount: u128) -> [u8; 32] {
    blake2b_256_multi(&[LEAF_TAG, recipient.as_bytes(), &amount.to_be_bytes()])
}

fn hash_pair(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    blake2b_256_multi(&[NODE_TAG, lo, hi])
}

/// Sibling path from a leaf up to the root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    pub siblings: Vec<[u8; 32]>,
}

/// Check that `leaf` is committed under `root`.
pub fn verify_proof(root: &[u8; 32], leaf: &[u8; 32], proof: &MerkleProof) -> bool {
    let computed = proof
        .siblings
        .iter()
        .fold(*leaf, |current, sibling| hash_pair(&current, sibling));
    computed == *root
}

/// A fully materialised tree, kept by whoever publishes a root so proofs can
/// be handed out to recipients.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    /// `levels[0]` are the leaves, the last level holds the root alone.
    levels: Vec<Vec<[u8; 32]>>,
}

impl MerkleTree {
    pub fn from_leaves(leaves: Vec<[u8; 32]>) -> Result<Self, CryptoError> {
        if leaves.is_empty() {
            return Err(CryptoError::EmptyTree);
        }
        let mut levels = vec![leaves];
        while levels.last().map_or(0, Vec::len) > 1 {
            let current = &levels[levels.len() - 1];
            let next: Vec<[u8; 32]> = current
                .chunks(2)
                .map(|pair| match pair {
                    [a, b] => hash_pair(a, b),
                    [single] => *single,
                    _ => unreachable!("chunks(2) yields one or two items"),
                })
                .collect();
            levels.push(next);
        }
        Ok(Self { levels })
    }

    /// Build the tree for a payout table.
    pub fn from_payouts(payouts: &[(Address, u128)]) -> Result<Self, CryptoError> {
        Self::from_leaves(
            payouts
                .iter()
                .map(|(recipient, amount)| compensation_leaf(recipient, *amount))
                .collect(),
        )
    }

    pub fn root(&self) -> [u8; 32] {
        // Construction guarantees a final single-element level.
        self.levels[self.levels.len() - 1][0]
    }

    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Proof for the leaf at `index` (in insertion order).
    pub fn proof(&self, index: usize) -> Result<MerkleProof, CryptoError> {
        if index >= self.leaf_count() {
            return Err(CryptoError::LeafOutOfRange {
                index,
                leaves: self.leaf_count(),
            });
        }
        let mut siblings = Vec::new();
        let mut position = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = position ^ 1;
            if let Some(hash) = level.get(sibling) {
                siblings.push(*hash);
            }
            position /= 2;
        }
        Ok(MerkleProof { siblings })
    }
}
