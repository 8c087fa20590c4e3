//! Nullable infrastructure for deterministic testing.
//!
//! Every collaborator the arbitration engine talks to is a trait. This crate
//! provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Record what the engine asked of them
//! - Never touch the filesystem or network
//!
//! Each nullable is a cheap handle onto shared state: clone it, hand one
//! clone to the engine, and keep another for assertions.

pub mod clock;
pub mod directory;
pub mod notifier;
pub mod random;
pub mod token;

pub use clock::NullEnvironment;
pub use directory::NullVerifierDirectory;
pub use notifier::{NullOutcomeNotifier, Notification};
pub use random::{NullRandom, NullRandomnessSource, RecordedRequest};
pub use token::{NullTokenLedger, Transfer};
