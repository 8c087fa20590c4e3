//! Narrow interfaces to the systems the engine does not own.
//!
//! Each external concern is its own trait; the engine never dispatches
//! arbitrary calls. Randomness lives in [`tribunal_vrf::RandomnessSource`].

use std::fmt;
use tribunal_types::{Address, ChainId, ClaimId, Timestamp};

/// Failure reported by an external collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollaboratorError(pub String);

impl fmt::Display for CollaboratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for CollaboratorError {}

impl From<String> for CollaboratorError {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CollaboratorError {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The registry of verifiers: juror pool, reputation, and slashable stake.
///
/// Owned and mutated elsewhere; the engine only reads it and calls `slash`.
pub trait VerifierDirectory: Send + Sync {
    /// The current pool of eligible jurors.
    fn eligible_jurors(&self) -> Result<Vec<Address>, CollaboratorError>;

    /// Current reputation weight of `juror`.
    fn reputation_of(&self, juror: &Address) -> Result<u64, CollaboratorError>;

    /// Slashable stake currently held for `verifier`.
    fn stake_of(&self, verifier: &Address) -> Result<u128, CollaboratorError>;

    /// Move the verifier's full stake to `recipient`; returns the amount moved.
    fn slash(&self, verifier: &Address, recipient: &Address) -> Result<u128, CollaboratorError>;
}

/// Fungible balance ledger used for stake custody and payouts.
pub trait ValueTransfer: Send + Sync {
    fn balance_of(&self, account: &Address) -> Result<u128, CollaboratorError>;

    /// Amount `spender` may move out of `owner`'s balance.
    fn allowance(&self, owner: &Address, spender: &Address) -> Result<u128, CollaboratorError>;

    /// Move `amount` from `from` (the engine's own account) to `to`.
    fn transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), CollaboratorError>;

    /// Move `amount` from `owner` to `to`, spending `spender`'s allowance.
    fn transfer_from(
        &self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), CollaboratorError>;
}

/// Informs the defendant's verification module of the final outcome.
pub trait OutcomeNotifier: Send + Sync {
    fn notify_outcome(
        &self,
        defendant: &Address,
        claim: &ClaimId,
        outcome: u64,
    ) -> Result<(), CollaboratorError>;
}

/// Execution context: current time and chain identity.
pub trait Environment: Send + Sync {
    fn now(&self) -> Timestamp;
    fn chain_id(&self) -> ChainId;
}

/// Wall-clock environment on a fixed chain.
#[derive(Clone, Copy, Debug)]
pub struct SystemEnvironment {
    pub chain_id: ChainId,
}

impl Environment for SystemEnvironment {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    fn chain_id(&self) -> ChainId {
        self.chain_id
    }
}
