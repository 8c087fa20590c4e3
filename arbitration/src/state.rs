//! Dispute records and their state machine.

use crate::error::ArbitrationError;
use crate::settlement::{Payout, Verdict};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tribunal_types::{Address, ClaimId, Timestamp};

/// Phase of a dispute. Only ever moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisputeStatus {
    /// No dispute exists for the claim.
    None,
    /// Challenge accepted; waiting for the randomness callback.
    AwaitingRandomness,
    /// Council selected; votes are being collected.
    Voting,
    /// Outcome computed and settled. Terminal.
    Resolved,
    /// Randomness never arrived; challenger refunded. Terminal.
    Expired,
}

impl DisputeStatus {
    /// Whether `self → next` is a legal transition.
    pub fn can_advance_to(self, next: DisputeStatus) -> bool {
        matches!(
            (self, next),
            (DisputeStatus::None, DisputeStatus::AwaitingRandomness)
                | (DisputeStatus::AwaitingRandomness, DisputeStatus::Voting)
                | (DisputeStatus::AwaitingRandomness, DisputeStatus::Expired)
                | (DisputeStatus::Voting, DisputeStatus::Resolved)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, DisputeStatus::Resolved | DisputeStatus::Expired)
    }
}

/// A council member's recorded vote. The weight is frozen at cast time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedVote {
    pub value: u64,
    pub weight: u64,
    pub cast_at: Timestamp,
}

/// One dispute per challenged claim. Never deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispute {
    pub claim_id: ClaimId,
    pub challenger: Address,
    /// The verifying entity whose decision is challenged.
    pub defendant: Address,
    /// Stake taken into custody when the challenge was raised.
    pub challenger_stake: u128,
    pub status: DisputeStatus,
    /// Set exactly once, when randomness is fulfilled.
    pub council_members: Vec<Address>,
    pub votes: BTreeMap<Address, RecordedVote>,
    /// Σ value × weight.
    pub total_weighted_votes: u128,
    /// Σ weight.
    pub total_reputation_weight: u128,
    /// Weighted average, set once at resolution.
    pub quantitative_outcome: Option<u64>,
    /// Classification of the outcome, frozen at resolution.
    pub verdict: Option<Verdict>,
    pub created_at: Timestamp,
    pub voting_deadline: Option<Timestamp>,
}

impl Dispute {
    pub(crate) fn new(
        claim_id: ClaimId,
        challenger: Address,
        defendant: Address,
        challenger_stake: u128,
        now: Timestamp,
    ) -> Self {
        Self {
            claim_id,
            challenger,
            defendant,
            challenger_stake,
            status: DisputeStatus::None,
            council_members: Vec::new(),
            votes: BTreeMap::new(),
            total_weighted_votes: 0,
            total_reputation_weight: 0,
            quantitative_outcome: None,
            verdict: None,
            created_at: now,
            voting_deadline: None,
        }
    }

    /// Move to `next`, refusing any backward or skipping transition.
    pub(crate) fn advance(&mut self, next: DisputeStatus) -> Result<(), ArbitrationError> {
        if !self.status.can_advance_to(next) {
            return Err(ArbitrationError::InvalidDisputeStatus {
                claim: self.claim_id,
                expected: previous_phase(next),
                actual: self.status,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Fail unless the dispute is currently in `expected`.
    pub(crate) fn require_status(&self, expected: DisputeStatus) -> Result<(), ArbitrationError> {
        if self.status != expected {
            return Err(ArbitrationError::InvalidDisputeStatus {
                claim: self.claim_id,
                expected,
                actual: self.status,
            });
        }
        Ok(())
    }

    /// The voting deadline. Every dispute past selection has one.
    pub fn deadline(&self) -> Result<Timestamp, ArbitrationError> {
        self.voting_deadline
            .ok_or(ArbitrationError::MissingVotingDeadline(self.claim_id))
    }

    pub fn is_council_member(&self, juror: &Address) -> bool {
        self.council_members.contains(juror)
    }

    pub fn has_voted(&self, juror: &Address) -> bool {
        self.votes.contains_key(juror)
    }

    pub fn vote_of(&self, juror: &Address) -> Option<u64> {
        self.votes.get(juror).map(|v| v.value)
    }
}

fn previous_phase(next: DisputeStatus) -> DisputeStatus {
    match next {
        DisputeStatus::None | DisputeStatus::AwaitingRandomness => DisputeStatus::None,
        DisputeStatus::Voting | DisputeStatus::Expired => DisputeStatus::AwaitingRandomness,
        DisputeStatus::Resolved => DisputeStatus::Voting,
    }
}

/// Correlates an outstanding randomness request with its dispute.
///
/// Created on challenge, deleted when consumed by fulfilment or expiry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRandomnessRequest {
    pub claim_id: ClaimId,
    pub challenger: Address,
    pub defendant: Address,
    /// Council size pinned when the request was made.
    pub council_size: u32,
}

/// Compensation funds and claims for one fraud-confirmed dispute.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationPool {
    /// Slashed funds left after bounties, not yet claimed.
    pub remaining: u128,
    /// Merkle root of `(recipient, amount)` leaves; set at most once.
    pub root: Option<[u8; 32]>,
    pub claimed: BTreeSet<Address>,
}

/// Settlement steps of a resolved dispute that have not happened yet.
///
/// Written together with the resolution, before any payout, and shrunk as
/// each step succeeds. A step is never performed twice.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingSettlement {
    /// Transfers out of the engine account, in execution order.
    pub payouts: Vec<Payout>,
    /// The defendant has not been told the outcome yet.
    pub notify_outcome: Option<u64>,
}

impl OutstandingSettlement {
    pub fn is_complete(&self) -> bool {
        self.payouts.is_empty() && self.notify_outcome.is_none()
    }

    /// Sum still owed by the engine account.
    pub fn amount_owed(&self) -> u128 {
        self.payouts.iter().map(|p| p.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispute() -> Dispute {
        Dispute::new(
            ClaimId::new([1u8; 32]),
            Address::new([2u8; 32]),
            Address::new([3u8; 32]),
            100,
            Timestamp::new(1_000),
        )
    }

    #[test]
    fn forward_path_is_allowed() {
        let mut d = dispute();
        d.advance(DisputeStatus::AwaitingRandomness).unwrap();
        d.advance(DisputeStatus::Voting).unwrap();
        d.advance(DisputeStatus::Resolved).unwrap();
        assert!(d.status.is_terminal());
    }

    #[test]
    fn expiry_only_from_awaiting_randomness() {
        let mut d = dispute();
        d.advance(DisputeStatus::AwaitingRandomness).unwrap();
        d.advance(DisputeStatus::Expired).unwrap();

        let mut voting = dispute();
        voting.advance(DisputeStatus::AwaitingRandomness).unwrap();
        voting.advance(DisputeStatus::Voting).unwrap();
        assert!(voting.advance(DisputeStatus::Expired).is_err());
    }

    #[test]
    fn skipping_a_phase_is_rejected() {
        let mut d = dispute();
        d.advance(DisputeStatus::AwaitingRandomness).unwrap();
        let err = d.advance(DisputeStatus::Resolved).unwrap_err();
        assert!(matches!(
            err,
            ArbitrationError::InvalidDisputeStatus {
                expected: DisputeStatus::Voting,
                actual: DisputeStatus::AwaitingRandomness,
                ..
            }
        ));
        assert_eq!(d.status, DisputeStatus::AwaitingRandomness);
    }

    #[test]
    fn voting_without_deadline_is_an_error() {
        let mut d = dispute();
        d.advance(DisputeStatus::AwaitingRandomness).unwrap();
        d.advance(DisputeStatus::Voting).unwrap();
        assert!(matches!(
            d.deadline(),
            Err(ArbitrationError::MissingVotingDeadline(_))
        ));
        d.voting_deadline = Some(Timestamp::new(5));
        assert_eq!(d.deadline().unwrap(), Timestamp::new(5));
    }

    #[test]
    fn terminal_states_never_move() {
        let all = [
            DisputeStatus::None,
            DisputeStatus::AwaitingRandomness,
            DisputeStatus::Voting,
            DisputeStatus::Resolved,
            DisputeStatus::Expired,
        ];
        for terminal in [DisputeStatus::Resolved, DisputeStatus::Expired] {
            for next in all {
                assert!(!terminal.can_advance_to(next));
            }
        }
    }

    #[test]
    fn no_transition_goes_backward() {
        let order = |s: DisputeStatus| match s {
            DisputeStatus::None => 0,
            DisputeStatus::AwaitingRandomness => 1,
            DisputeStatus::Voting => 2,
            DisputeStatus::Resolved | DisputeStatus::Expired => 3,
        };
        let all = [
            DisputeStatus::None,
            DisputeStatus::AwaitingRandomness,
            DisputeStatus::Voting,
            DisputeStatus::Resolved,
            DisputeStatus::Expired,
        ];
        for from in all {
            for to in all {
                if from.can_advance_to(to) {
                    assert_eq!(order(to), order(from) + 1, "{from:?} -> {to:?}");
                }
            }
        }
    }
}
