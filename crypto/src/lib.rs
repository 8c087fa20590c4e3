//! Cryptographic primitives for Tribunal.
//!
//! - **Ed25519** for challenge authorisations
//! - **Blake2b** for every digest (domain separators, leaves, VRF word expansion)
//! - **Merkle payout trees** committing compensation `(recipient, amount)` leaves

pub mod error;
pub mod hash;
pub mod keys;
pub mod merkle;
pub mod sign;

pub use error::CryptoError;
pub use hash::{blake2b_256, blake2b_256_multi};
pub use keys::{generate_keypair, keypair_from_seed, public_from_private};
pub use merkle::{compensation_leaf, verify_proof, MerkleProof, MerkleTree};
pub use sign::{sign_message, verify_signature};
