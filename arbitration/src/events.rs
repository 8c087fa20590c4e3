//! Events emitted by the engine for the host to process.

use crate::config::ParameterUpdate;
use crate::settlement::{PayoutKind, Verdict};
use serde::{Deserialize, Serialize};
use tribunal_types::{Address, ClaimId};
use tribunal_vrf::RequestId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArbitrationEvent {
    /// A challenge was accepted and its stake taken into custody.
    DisputeCreated {
        claim: ClaimId,
        challenger: Address,
        defendant: Address,
        stake: u128,
    },
    RandomnessRequested {
        claim: ClaimId,
        request: RequestId,
        num_words: u32,
    },
    /// Randomness arrived and the council was drawn.
    CouncilSelected {
        claim: ClaimId,
        council: Vec<Address>,
        voting_deadline: u64,
    },
    VoteCast {
        claim: ClaimId,
        juror: Address,
        value: u64,
        weight: u64,
    },
    DisputeResolved {
        claim: ClaimId,
        outcome: u64,
        verdict: Verdict,
        keeper: Address,
    },
    /// One value movement performed by settlement or a compensation claim.
    PayoutMade {
        claim: ClaimId,
        kind: PayoutKind,
        recipient: Address,
        amount: u128,
    },
    /// Some settlement steps failed and are kept for
    /// `complete_settlement`.
    SettlementDeferred {
        claim: ClaimId,
        outstanding_payouts: usize,
        notification_pending: bool,
        reason: String,
    },
    /// Every payout was made and the defendant was notified.
    SettlementCompleted { claim: ClaimId },
    /// Randomness never arrived; the challenger was refunded.
    DisputeExpired { claim: ClaimId, refunded: u128 },
    CompensationRootPublished { claim: ClaimId, root: [u8; 32] },
    CompensationClaimed {
        claim: ClaimId,
        recipient: Address,
        amount: u128,
    },
    ParameterUpdated { update: ParameterUpdate },
}
