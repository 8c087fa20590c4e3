//! Chain identity of the execution environment.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the ledger the engine is executing on.
///
/// Signatures are domain-separated by chain id so a challenge authorised on
/// one chain cannot be replayed on a fork that changed its identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Local development chain.
    pub const DEV: Self = Self(31_337);

    pub fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
