//! Nullable environment: deterministic time and chain identity.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tribunal_arbitration::Environment;
use tribunal_types::{ChainId, Timestamp};

/// A deterministic environment for testing.
///
/// Time only advances when you tell it to.
#[derive(Clone)]
pub struct NullEnvironment {
    current: Arc<AtomicU64>,
    chain: Arc<AtomicU64>,
}

impl NullEnvironment {
    pub fn new(initial_secs: u64, chain: ChainId) -> Self {
        Self {
            current: Arc::new(AtomicU64::new(initial_secs)),
            chain: Arc::new(AtomicU64::new(chain.0)),
        }
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: u64) {
        self.current.fetch_add(secs, Ordering::SeqCst);
    }

    /// Set the time to a specific value.
    pub fn set(&self, secs: u64) {
        self.current.store(secs, Ordering::SeqCst);
    }

    /// Simulate a fork that changes chain identity.
    pub fn set_chain(&self, chain: ChainId) {
        self.chain.store(chain.0, Ordering::SeqCst);
    }
}

impl Default for NullEnvironment {
    fn default() -> Self {
        Self::new(1_000_000, ChainId::DEV)
    }
}

impl Environment for NullEnvironment {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.current.load(Ordering::SeqCst))
    }

    fn chain_id(&self) -> ChainId {
        ChainId(self.chain.load(Ordering::SeqCst))
    }
}
