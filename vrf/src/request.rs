//! The asynchronous randomness protocol.
//!
//! A consumer asks a [`RandomnessSource`] for words and gets a [`RequestId`]
//! back immediately. Later, the source calls
//! [`RandomnessConsumer::fulfill_randomness`] with that id. The source holds
//! only a reference to the consumer trait; the consumer decides whether the
//! caller is the source it trusts.

use crate::VrfError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tribunal_types::Address;

/// Handle correlating a randomness request with its later fulfilment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req#{}", self.0)
    }
}

/// Supplies unpredictable words on request, asynchronously.
pub trait RandomnessSource: Send + Sync {
    /// The identity this source presents when it calls back.
    fn provider_id(&self) -> Address;

    /// Queue a request for `num_words` words bound to `context`.
    fn request_randomness(&self, context: &[u8], num_words: u32) -> Result<RequestId, VrfError>;
}

/// Receives fulfilled randomness.
pub trait RandomnessConsumer {
    type Error;

    /// Deliver the words for `request`. `provider` is the caller's identity.
    fn fulfill_randomness(
        &mut self,
        provider: &Address,
        request: RequestId,
        words: &[u64],
    ) -> Result<(), Self::Error>;

    /// Whether a source should keep `request` and deliver it again after
    /// the consumer rejected it with `error`. Rejections are final unless
    /// the consumer says otherwise.
    fn should_retry(&self, _request: RequestId, _error: &Self::Error) -> bool {
        false
    }
}
