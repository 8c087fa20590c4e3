use crate::interfaces::CollaboratorError;
use crate::state::DisputeStatus;
use thiserror::Error;
use tribunal_types::{Address, ClaimId, Timestamp};
use tribunal_vrf::{RequestId, VrfError};

#[derive(Debug, Error)]
pub enum ArbitrationError {
    // ── Identity / validation ───────────────────────────────────────────
    #[error("{0} must not be the zero address")]
    ZeroAddress(&'static str),

    #[error("challenge authorisation signature is invalid")]
    InvalidSignature,

    #[error("caller {0} is not the council admin")]
    Unauthorized(Address),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── State machine ───────────────────────────────────────────────────
    #[error("a dispute for claim {0} already exists")]
    DisputeAlreadyExists(ClaimId),

    #[error("no dispute for claim {0}")]
    DisputeNotFound(ClaimId),

    #[error("dispute {claim} is {actual:?}, operation requires {expected:?}")]
    InvalidDisputeStatus {
        claim: ClaimId,
        expected: DisputeStatus,
        actual: DisputeStatus,
    },

    #[error("voting on claim {claim} closed at {deadline}")]
    VotingPeriodOver { claim: ClaimId, deadline: Timestamp },

    #[error("voting on claim {claim} is open until {deadline}")]
    VotingPeriodNotOver { claim: ClaimId, deadline: Timestamp },

    #[error("randomness for claim {claim} may still arrive until {expires_at}")]
    RandomnessNotExpired { claim: ClaimId, expires_at: Timestamp },

    #[error("dispute {0} is in voting but has no deadline")]
    MissingVotingDeadline(ClaimId),

    #[error("dispute {0} has no outstanding settlement")]
    NoOutstandingSettlement(ClaimId),

    #[error("juror {0} is not on the council")]
    NotCouncilMember(Address),

    #[error("juror {0} has already voted")]
    AlreadyVoted(Address),

    // ── Resource insufficiency ──────────────────────────────────────────
    #[error("insufficient stake: needed {needed}, available {available}")]
    InsufficientStake { needed: u128, available: u128 },

    #[error("insufficient allowance: needed {needed}, approved {available}")]
    InsufficientAllowance { needed: u128, available: u128 },

    #[error("insufficient funds for bounties: required {required}, available {available}")]
    InsufficientFundsForBounties { required: u128, available: u128 },

    #[error("not enough eligible verifiers: need {needed}, have {available}")]
    NotEnoughVerifiers { needed: usize, available: usize },

    #[error("compensation pool exhausted: requested {requested}, remaining {available}")]
    InsufficientCompensationPool { requested: u128, available: u128 },

    // ── Integrity ───────────────────────────────────────────────────────
    #[error("no pending randomness request {0}")]
    RequestNotFound(RequestId),

    #[error("{0} is not the configured randomness provider")]
    OnlyRandomnessProvider(Address),

    #[error("randomness batch too short: need {needed} words, got {got}")]
    RandomnessBatchTooShort { needed: usize, got: usize },

    #[error("dispute {0} was not resolved as fraud")]
    NotFraudConfirmed(ClaimId),

    #[error("compensation root for claim {0} is already set")]
    CompensationRootAlreadySet(ClaimId),

    #[error("compensation root must not be zero")]
    ZeroCompensationRoot,

    #[error("no compensation root published for claim {0}")]
    CompensationRootNotSet(ClaimId),

    #[error("Merkle proof does not match the compensation root")]
    InvalidMerkleProof,

    #[error("{recipient} already claimed compensation for claim {claim}")]
    AlreadyClaimed { claim: ClaimId, recipient: Address },

    // ── Collaborators / plumbing ────────────────────────────────────────
    #[error("token transfer failed: {0}")]
    Token(CollaboratorError),

    #[error("verifier directory failed: {0}")]
    Directory(CollaboratorError),

    #[error("outcome notification failed: {0}")]
    Notifier(CollaboratorError),

    #[error("randomness source failed: {0}")]
    Randomness(#[from] VrfError),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),
}
