//! Merkle-proof compensation claims for fraud-confirmed disputes.
//!
//! The council admin commits to a set of `(recipient, amount)` leaves by
//! publishing their root once. Each recipient may then claim exactly once,
//! and the sum of claims is capped by what settlement left in the pool.

use crate::error::ArbitrationError;
use crate::settlement::Verdict;
use crate::state::{CompensationPool, Dispute, DisputeStatus};
use tribunal_crypto::{compensation_leaf, verify_proof, MerkleProof};
use tribunal_types::{Address, ClaimId};

/// Fail unless `dispute` was resolved as fraud.
///
/// Uses the verdict frozen at resolution, so later threshold changes never
/// reclassify a dispute.
pub fn ensure_fraud_confirmed(dispute: &Dispute) -> Result<(), ArbitrationError> {
    dispute.require_status(DisputeStatus::Resolved)?;
    match dispute.verdict {
        Some(Verdict::FraudConfirmed) => Ok(()),
        _ => Err(ArbitrationError::NotFraudConfirmed(dispute.claim_id)),
    }
}

impl CompensationPool {
    pub(crate) fn new(remaining: u128) -> Self {
        Self {
            remaining,
            ..Default::default()
        }
    }

    /// Fail unless `root` may be published for `claim`.
    pub(crate) fn check_publish(
        &self,
        claim: &ClaimId,
        root: &[u8; 32],
    ) -> Result<(), ArbitrationError> {
        if self.root.is_some() {
            return Err(ArbitrationError::CompensationRootAlreadySet(*claim));
        }
        if root.iter().all(|b| *b == 0) {
            return Err(ArbitrationError::ZeroCompensationRoot);
        }
        Ok(())
    }

    /// Fail unless `recipient` may claim `amount` with `proof`.
    pub(crate) fn check_claim(
        &self,
        claim: &ClaimId,
        recipient: &Address,
        amount: u128,
        proof: &MerkleProof,
    ) -> Result<(), ArbitrationError> {
        let root = self
            .root
            .ok_or(ArbitrationError::CompensationRootNotSet(*claim))?;
        if self.claimed.contains(recipient) {
            return Err(ArbitrationError::AlreadyClaimed {
                claim: *claim,
                recipient: *recipient,
            });
        }
        let leaf = compensation_leaf(recipient, amount);
        if !verify_proof(&root, &leaf, proof) {
            return Err(ArbitrationError::InvalidMerkleProof);
        }
        if amount > self.remaining {
            return Err(ArbitrationError::InsufficientCompensationPool {
                requested: amount,
                available: self.remaining,
            });
        }
        Ok(())
    }

    /// Mark `recipient` paid. Call only after `check_claim` succeeded.
    pub(crate) fn record_claim(&mut self, recipient: Address, amount: u128) {
        self.claimed.insert(recipient);
        self.remaining -= amount;
    }

    pub fn is_claimed(&self, recipient: &Address) -> bool {
        self.claimed.contains(recipient)
    }
}
