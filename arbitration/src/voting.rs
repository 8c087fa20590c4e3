//! Reputation-weighted quantitative voting.

use crate::error::ArbitrationError;
use crate::state::{Dispute, DisputeStatus, RecordedVote};
use tribunal_types::{Address, Timestamp};

/// Checks and records council votes on a dispute.
pub struct VotingEngine;

impl VotingEngine {
    /// Fail unless `juror` may vote on `dispute` at `now`.
    ///
    /// Checks run in order: phase, deadline (inclusive), membership, then
    /// whether the juror already voted.
    pub fn ensure_can_vote(
        &self,
        dispute: &Dispute,
        juror: &Address,
        now: Timestamp,
    ) -> Result<(), ArbitrationError> {
        dispute.require_status(DisputeStatus::Voting)?;
        let deadline = dispute.deadline()?;
        if now > deadline {
            return Err(ArbitrationError::VotingPeriodOver {
                claim: dispute.claim_id,
                deadline,
            });
        }
        if !dispute.is_council_member(juror) {
            return Err(ArbitrationError::NotCouncilMember(*juror));
        }
        if dispute.has_voted(juror) {
            return Err(ArbitrationError::AlreadyVoted(*juror));
        }
        Ok(())
    }

    /// Record a vote with its weight frozen at `weight`.
    ///
    /// Both accumulators are updated with checked arithmetic before anything
    /// is written, so an overflow leaves the dispute untouched.
    pub fn record_vote(
        &self,
        dispute: &mut Dispute,
        juror: Address,
        value: u64,
        weight: u64,
        now: Timestamp,
    ) -> Result<(), ArbitrationError> {
        self.ensure_can_vote(dispute, &juror, now)?;

        let weighted = u128::from(value) * u128::from(weight);
        let total_weighted = dispute
            .total_weighted_votes
            .checked_add(weighted)
            .ok_or(ArbitrationError::Overflow("total weighted votes"))?;
        let total_weight = dispute
            .total_reputation_weight
            .checked_add(u128::from(weight))
            .ok_or(ArbitrationError::Overflow("total reputation weight"))?;

        dispute.votes.insert(
            juror,
            RecordedVote {
                value,
                weight,
                cast_at: now,
            },
        );
        dispute.total_weighted_votes = total_weighted;
        dispute.total_reputation_weight = total_weight;
        Ok(())
    }

    /// The outcome of a dispute's votes so far.
    pub fn outcome(&self, dispute: &Dispute) -> u64 {
        weighted_average(dispute.total_weighted_votes, dispute.total_reputation_weight)
    }
}

/// `floor(Σ value·weight / Σ weight)`, or `0` when no weight was cast.
///
/// The average of `u64` values cannot exceed `u64::MAX`; the saturating
/// conversion is unreachable in practice.
pub fn weighted_average(total_weighted: u128, total_weight: u128) -> u64 {
    if total_weight == 0 {
        return 0;
    }
    u64::try_from(total_weighted / total_weight).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tribunal_types::ClaimId;

    fn addr(b: u8) -> Address {
        Address::new([b; 32])
    }

    fn voting_dispute(council: &[Address], deadline: u64) -> Dispute {
        let mut d = Dispute::new(
            ClaimId::new([1u8; 32]),
            addr(100),
            addr(101),
            100,
            Timestamp::new(0),
        );
        d.advance(DisputeStatus::AwaitingRandomness).unwrap();
        d.advance(DisputeStatus::Voting).unwrap();
        d.council_members = council.to_vec();
        d.voting_deadline = Some(Timestamp::new(deadline));
        d
    }

    #[test]
    fn weighted_outcome_of_three_votes() {
        let council = [addr(1), addr(2), addr(3)];
        let mut d = voting_dispute(&council, 1_000);
        let now = Timestamp::new(10);
        VotingEngine.record_vote(&mut d, addr(1), 40, 1, now).unwrap();
        VotingEngine.record_vote(&mut d, addr(2), 60, 2, now).unwrap();
        VotingEngine.record_vote(&mut d, addr(3), 80, 1, now).unwrap();

        assert_eq!(d.total_weighted_votes, 240);
        assert_eq!(d.total_reputation_weight, 4);
        assert_eq!(VotingEngine.outcome(&d), 60);
    }

    #[test]
    fn second_vote_is_rejected() {
        let mut d = voting_dispute(&[addr(1)], 1_000);
        VotingEngine
            .record_vote(&mut d, addr(1), 10, 3, Timestamp::new(1))
            .unwrap();
        let err = VotingEngine
            .record_vote(&mut d, addr(1), 90, 3, Timestamp::new(2))
            .unwrap_err();
        assert!(matches!(err, ArbitrationError::AlreadyVoted(_)));
        assert_eq!(d.vote_of(&addr(1)), Some(10));
        assert_eq!(d.total_reputation_weight, 3);
    }

    #[test]
    fn outsiders_cannot_vote() {
        let mut d = voting_dispute(&[addr(1)], 1_000);
        let err = VotingEngine
            .record_vote(&mut d, addr(9), 10, 1, Timestamp::new(1))
            .unwrap_err();
        assert!(matches!(err, ArbitrationError::NotCouncilMember(_)));
    }

    #[test]
    fn deadline_is_inclusive() {
        let mut d = voting_dispute(&[addr(1), addr(2)], 100);
        VotingEngine
            .record_vote(&mut d, addr(1), 10, 1, Timestamp::new(100))
            .unwrap();
        let err = VotingEngine
            .record_vote(&mut d, addr(2), 10, 1, Timestamp::new(101))
            .unwrap_err();
        assert!(matches!(err, ArbitrationError::VotingPeriodOver { .. }));
    }

    #[test]
    fn missing_deadline_refuses_votes() {
        let mut d = voting_dispute(&[addr(1)], 1_000);
        d.voting_deadline = None;
        let err = VotingEngine
            .record_vote(&mut d, addr(1), 10, 1, Timestamp::new(1))
            .unwrap_err();
        assert!(matches!(err, ArbitrationError::MissingVotingDeadline(_)));
        assert!(!d.has_voted(&addr(1)));
    }

    #[test]
    fn voting_requires_voting_phase() {
        let mut d = Dispute::new(
            ClaimId::new([1u8; 32]),
            addr(100),
            addr(101),
            100,
            Timestamp::new(0),
        );
        d.advance(DisputeStatus::AwaitingRandomness).unwrap();
        d.council_members = vec![addr(1)];
        let err = VotingEngine
            .record_vote(&mut d, addr(1), 10, 1, Timestamp::new(1))
            .unwrap_err();
        assert!(matches!(
            err,
            ArbitrationError::InvalidDisputeStatus {
                expected: DisputeStatus::Voting,
                ..
            }
        ));
    }

    #[test]
    fn zero_weight_yields_zero_outcome() {
        assert_eq!(weighted_average(0, 0), 0);
        assert_eq!(weighted_average(500, 0), 0);
        let mut d = voting_dispute(&[addr(1)], 1_000);
        VotingEngine
            .record_vote(&mut d, addr(1), 90, 0, Timestamp::new(1))
            .unwrap();
        assert_eq!(VotingEngine.outcome(&d), 0);
    }

    #[test]
    fn average_truncates() {
        assert_eq!(weighted_average(10, 3), 3);
        assert_eq!(weighted_average(u128::from(u64::MAX) * 2, 2), u64::MAX);
    }
}
