//! Versioned engine snapshots.
//!
//! A snapshot is a bincode envelope carrying a schema version and the encoded
//! state. Decoding runs sequential migrations from the stored version up to
//! [`CURRENT_SCHEMA_VERSION`] and refuses snapshots written by newer code.

use crate::config::ArbitrationConfig;
use crate::error::ArbitrationError;
use crate::state::{CompensationPool, Dispute, OutstandingSettlement, PendingRandomnessRequest};
use serde::{Deserialize, Serialize};
use tribunal_types::ClaimId;
use tribunal_vrf::RequestId;

/// The schema version that the current code writes.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// All persistent engine state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub config: ArbitrationConfig,
    pub disputes: Vec<Dispute>,
    pub pending_requests: Vec<(RequestId, PendingRandomnessRequest)>,
    pub compensation: Vec<(ClaimId, CompensationPool)>,
    /// Settlement steps of resolved disputes not yet performed.
    pub outstanding: Vec<(ClaimId, OutstandingSettlement)>,
}

/// Body layout of schema versions 0 and 1, before outstanding settlements.
#[derive(Serialize, Deserialize)]
struct EngineSnapshotV1 {
    config: ArbitrationConfig,
    disputes: Vec<Dispute>,
    pending_requests: Vec<(RequestId, PendingRandomnessRequest)>,
    compensation: Vec<(ClaimId, CompensationPool)>,
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    schema_version: u32,
    body: Vec<u8>,
}

impl EngineSnapshot {
    /// Encode at the current schema version.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ArbitrationError> {
        let body = bincode::serialize(self).map_err(|e| ArbitrationError::Snapshot(e.to_string()))?;
        bincode::serialize(&Envelope {
            schema_version: CURRENT_SCHEMA_VERSION,
            body,
        })
        .map_err(|e| ArbitrationError::Snapshot(e.to_string()))
    }

    /// Decode a snapshot, migrating it forward if it is older.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArbitrationError> {
        let envelope: Envelope =
            bincode::deserialize(bytes).map_err(|e| ArbitrationError::Snapshot(e.to_string()))?;
        let stored = envelope.schema_version;

        if stored > CURRENT_SCHEMA_VERSION {
            return Err(ArbitrationError::Snapshot(format!(
                "snapshot schema version {} is newer than supported version {}",
                stored, CURRENT_SCHEMA_VERSION
            )));
        }

        let mut body = envelope.body;
        for version in stored..CURRENT_SCHEMA_VERSION {
            tracing::info!(from = version, to = version + 1, "migrating snapshot");
            body = run_migration(version, version + 1, body)?;
        }

        bincode::deserialize(&body).map_err(|e| ArbitrationError::Snapshot(e.to_string()))
    }
}

fn run_migration(from: u32, to: u32, body: Vec<u8>) -> Result<Vec<u8>, ArbitrationError> {
    match (from, to) {
        // Version 0 envelopes were written before versioning and share the v1 body.
        (0, 1) => Ok(body),
        (1, 2) => {
            let v1: EngineSnapshotV1 =
                bincode::deserialize(&body).map_err(|e| ArbitrationError::Snapshot(e.to_string()))?;
            bincode::serialize(&EngineSnapshot {
                config: v1.config,
                disputes: v1.disputes,
                pending_requests: v1.pending_requests,
                compensation: v1.compensation,
                outstanding: Vec::new(),
            })
            .map_err(|e| ArbitrationError::Snapshot(e.to_string()))
        }
        _ => Err(ArbitrationError::Snapshot(format!(
            "unknown migration: {} -> {}",
            from, to
        ))),
    }
}
