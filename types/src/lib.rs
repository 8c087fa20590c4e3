//! Fundamental types for the Tribunal arbitration engine.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! party addresses, claim identifiers, chain identity, timestamps, and key material.

pub mod address;
pub mod chain;
pub mod claim;
pub mod error;
pub mod keys;
pub mod time;

pub use address::Address;
pub use chain::ChainId;
pub use claim::ClaimId;
pub use error::TypesError;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use time::Timestamp;
