//! Commit-reveal randomness among a fixed set of representatives.
//!
//! Each representative commits `H(tag || representative || value)`, then
//! reveals `value`. Once every committed representative has revealed, the
//! values are combined into one seed. Output for a context is
//! `H(seed || context)`.
//!
//! A representative who commits but never reveals blocks the seed (the
//! last-revealer problem); slashing the non-revealer is left to the caller.

use crate::{RandomOutput, VrfError, VrfProvider};
use tribunal_crypto::blake2b_256_multi;
use tribunal_types::Address;

const COMMIT_TAG: &[u8] = b"tribunal/commit/v1";
const COMBINE_TAG: &[u8] = b"tribunal/combine/v1";

/// The commitment a representative publishes for `value`.
///
/// Binding the representative into the hash stops one party from copying
/// another's commitment and revealing the same value.
pub fn commitment_for(representative: &Address, value: &[u8; 32]) -> [u8; 32] {
    blake2b_256_multi(&[COMMIT_TAG, representative.as_bytes(), value])
}

/// A commitment from a representative.
#[derive(Clone, Debug)]
pub struct Commitment {
    pub representative: Address,
    pub hash: [u8; 32],
}

/// A reveal from a representative.
#[derive(Clone, Debug)]
pub struct Reveal {
    pub representative: Address,
    pub value: [u8; 32],
}

/// Commit-reveal VRF provider.
#[derive(Default)]
pub struct CommitRevealVrf {
    commitments: Vec<Commitment>,
    reveals: Vec<Reveal>,
}

impl CommitRevealVrf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a commitment. Each representative commits once.
    pub fn record_commitment(&mut self, commitment: Commitment) -> Result<(), VrfError> {
        if self
            .commitments
            .iter()
            .any(|c| c.representative == commitment.representative)
        {
            return Err(VrfError::CommitReveal(format!(
                "representative {} already committed",
                commitment.representative
            )));
        }
        self.commitments.push(commitment);
        Ok(())
    }

    /// Record a reveal after checking it opens the representative's commitment.
    pub fn record_reveal(&mut self, reveal: Reveal) -> Result<(), VrfError> {
        let commitment = self
            .commitments
            .iter()
            .find(|c| c.representative == reveal.representative)
            .ok_or_else(|| {
                VrfError::CommitReveal(format!(
                    "no commitment from representative {}",
                    reveal.representative
                ))
            })?;
        if self
            .reveals
            .iter()
            .any(|r| r.representative == reveal.representative)
        {
            return Err(VrfError::CommitReveal(format!(
                "representative {} already revealed",
                reveal.representative
            )));
        }
        if commitment_for(&reveal.representative, &reveal.value) != commitment.hash {
            return Err(VrfError::CommitReveal(format!(
                "reveal from {} does not match its commitment",
                reveal.representative
            )));
        }
        self.reveals.push(reveal);
        Ok(())
    }

    /// Combine all reveals, in commitment order, into a single seed.
    pub fn combine_reveals(&self) -> Result<[u8; 32], VrfError> {
        if self.commitments.is_empty() {
            return Err(VrfError::CommitReveal("no commitments recorded".into()));
        }
        let mut parts: Vec<&[u8]> = Vec::with_capacity(self.commitments.len() + 1);
        parts.push(COMBINE_TAG);
        for commitment in &self.commitments {
            let reveal = self
                .reveals
                .iter()
                .find(|r| r.representative == commitment.representative)
                .ok_or_else(|| {
                    VrfError::CommitReveal(format!(
                        "representative {} has not revealed",
                        commitment.representative
                    ))
                })?;
            parts.push(&reveal.value);
        }
        Ok(blake2b_256_multi(&parts))
    }
}

impl VrfProvider for CommitRevealVrf {
    fn get_randomness(&self, context: &[u8]) -> Result<RandomOutput, VrfError> {
        let seed = self.combine_reveals()?;
        Ok(RandomOutput {
            value: blake2b_256_multi(&[&seed, context]),
            proof: seed.to_vec(),
            round: self.reveals.len() as u64,
        })
    }

    fn verify(&self, context: &[u8], output: &RandomOutput) -> Result<bool, VrfError> {
        let seed = self.combine_reveals()?;
        Ok(output.proof == seed && output.value == blake2b_256_multi(&[&seed, context]))
    }

    fn name(&self) -> &str {
        "commit-reveal"
    }
}
