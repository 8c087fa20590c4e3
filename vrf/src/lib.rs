//! Verifiable randomness for fair juror selection.
//!
//! Two layers:
//! - [`VrfProvider`]: produces a random value (with proof) for a context.
//!   [`CommitRevealVrf`] is the self-sovereign implementation.
//! - [`RandomnessSource`] / [`RandomnessConsumer`]: the asynchronous
//!   request/fulfil protocol the arbitration engine speaks. A request returns
//!   a handle immediately; the words arrive later through the consumer
//!   callback. [`VrfRandomnessSource`] bridges any `VrfProvider` onto it.

pub mod commit_reveal;
pub mod error;
pub mod request;
pub mod source;

pub use commit_reveal::{commitment_for, Commitment, CommitRevealVrf, Reveal};
pub use error::VrfError;
pub use request::{RandomnessConsumer, RandomnessSource, RequestId};
pub use source::{expand_words, Delivery, VrfRandomnessSource};

/// Trait for providing verifiable randomness.
pub trait VrfProvider: Send + Sync {
    /// Get randomness for a given context (e.g. a randomness request id).
    fn get_randomness(&self, context: &[u8]) -> Result<RandomOutput, VrfError>;

    /// Verify that a randomness output was correctly generated.
    fn verify(&self, context: &[u8], output: &RandomOutput) -> Result<bool, VrfError>;

    /// Human-readable name of this VRF provider.
    fn name(&self) -> &str;
}

/// The output of a VRF: a random value with its proof.
#[derive(Clone, Debug)]
pub struct RandomOutput {
    /// The random bytes (32 bytes).
    pub value: [u8; 32],
    /// Proof that the value was correctly generated.
    pub proof: Vec<u8>,
    /// Round number or epoch.
    pub round: u64,
}
