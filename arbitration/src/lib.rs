//! Dispute arbitration for impact-claim verification outcomes.
//!
//! Lifecycle of one disputed claim:
//! 1. **Challenge**: a signed authorisation binds the challenger; their stake
//!    moves into custody and randomness is requested.
//! 2. **Selection**: when the randomness arrives, a partial Fisher–Yates
//!    shuffle draws a council from the eligible jurors, excluding both parties.
//! 3. **Voting**: council members cast quantitative votes weighted by their
//!    reputation at the moment of casting.
//! 4. **Resolution**: after the deadline any keeper settles the dispute. A
//!    weighted average below the fraud threshold slashes the defendant and
//!    pays bounties; otherwise the challenger's stake is forfeited.
//! 5. **Compensation**: for fraud-confirmed disputes the council admin
//!    publishes a Merkle root and affected parties claim against it once.
//!
//! Collaborators (randomness, verifier directory, token ledger, defendant
//! notification, environment) are traits in [`interfaces`] and
//! [`tribunal_vrf`].

pub mod compensation;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod identity;
pub mod interfaces;
pub mod selection;
pub mod settlement;
pub mod snapshot;
pub mod state;
pub mod voting;

pub use config::{ArbitrationConfig, ParameterUpdate};
pub use engine::{ArbitrationEngine, Collaborators};
pub use error::ArbitrationError;
pub use events::ArbitrationEvent;
pub use identity::{ChallengeAuthorization, DomainSeparator};
pub use interfaces::{
    CollaboratorError, Environment, OutcomeNotifier, SystemEnvironment, ValueTransfer,
    VerifierDirectory,
};
pub use selection::JurorSelector;
pub use settlement::{Payout, PayoutKind, SettlementPlan, Verdict};
pub use snapshot::{EngineSnapshot, CURRENT_SCHEMA_VERSION};
pub use state::{
    CompensationPool, Dispute, DisputeStatus, OutstandingSettlement, PendingRandomnessRequest,
};
pub use voting::VotingEngine;
