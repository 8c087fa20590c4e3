//! Nullable randomness: deterministic VRF outputs and a hand-driven
//! randomness source.

use parking_lot::Mutex;
use std::sync::Arc;
use tribunal_types::Address;
use tribunal_vrf::{
    RandomOutput, RandomnessConsumer, RandomnessSource, RequestId, VrfError, VrfProvider,
};

/// A deterministic VRF provider for testing.
///
/// Returns pre-configured values in order, wrapping around.
pub struct NullRandom {
    outputs: Vec<[u8; 32]>,
    index: Mutex<usize>,
}

impl NullRandom {
    /// Create with a sequence of deterministic random values.
    pub fn new(outputs: Vec<[u8; 32]>) -> Self {
        Self {
            outputs,
            index: Mutex::new(0),
        }
    }

    /// Create with a single value that will be returned for every call.
    pub fn constant(value: [u8; 32]) -> Self {
        Self::new(vec![value])
    }
}

impl VrfProvider for NullRandom {
    fn get_randomness(&self, _context: &[u8]) -> Result<RandomOutput, VrfError> {
        if self.outputs.is_empty() {
            return Err(VrfError::Unavailable("no outputs configured".into()));
        }
        let mut idx = self.index.lock();
        let current = *idx % self.outputs.len();
        *idx += 1;
        Ok(RandomOutput {
            value: self.outputs[current],
            proof: Vec::new(),
            round: current as u64,
        })
    }

    fn verify(&self, _context: &[u8], _output: &RandomOutput) -> Result<bool, VrfError> {
        Ok(true) // Always valid in test mode
    }

    fn name(&self) -> &str {
        "null-random"
    }
}

/// A request the engine made of a [`NullRandomnessSource`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub id: RequestId,
    pub context: Vec<u8>,
    pub num_words: u32,
}

#[derive(Default)]
struct SourceState {
    next_id: u64,
    requests: Vec<RecordedRequest>,
    fail_next: bool,
}

/// A randomness source that records requests and is fulfilled by hand.
#[derive(Clone)]
pub struct NullRandomnessSource {
    id: Address,
    state: Arc<Mutex<SourceState>>,
}

impl NullRandomnessSource {
    pub fn new(id: Address) -> Self {
        Self {
            id,
            state: Arc::new(Mutex::new(SourceState::default())),
        }
    }

    /// All requests made so far (for assertions).
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    pub fn last_request(&self) -> Option<RequestId> {
        self.state.lock().requests.last().map(|r| r.id)
    }

    /// Make the next request fail with `Unavailable`.
    pub fn fail_next_request(&self) {
        self.state.lock().fail_next = true;
    }

    /// Deliver `words` for `request` to `consumer`, as this source.
    pub fn fulfill<C: RandomnessConsumer>(
        &self,
        consumer: &mut C,
        request: RequestId,
        words: &[u64],
    ) -> Result<(), C::Error> {
        consumer.fulfill_randomness(&self.id, request, words)
    }
}

impl RandomnessSource for NullRandomnessSource {
    fn provider_id(&self) -> Address {
        self.id
    }

    fn request_randomness(&self, context: &[u8], num_words: u32) -> Result<RequestId, VrfError> {
        let mut state = self.state.lock();
        if state.fail_next {
            state.fail_next = false;
            return Err(VrfError::Unavailable("null source told to fail".into()));
        }
        state.next_id += 1;
        let id = RequestId(state.next_id);
        state.requests.push(RecordedRequest {
            id,
            context: context.to_vec(),
            num_words,
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outputs_cycle() {
        let vrf = NullRandom::new(vec![[1u8; 32], [2u8; 32]]);
        assert_eq!(vrf.get_randomness(b"a").unwrap().value, [1u8; 32]);
        assert_eq!(vrf.get_randomness(b"b").unwrap().value, [2u8; 32]);
        assert_eq!(vrf.get_randomness(b"c").unwrap().value, [1u8; 32]);
    }

    #[test]
    fn source_records_requests() {
        let source = NullRandomnessSource::new(Address::new([9u8; 32]));
        let a = source.request_randomness(b"claim-a", 3).unwrap();
        let b = source.request_randomness(b"claim-b", 5).unwrap();
        assert_ne!(a, b);
        assert_eq!(source.last_request(), Some(b));
        assert_eq!(source.requests()[0].num_words, 3);

        source.fail_next_request();
        assert!(source.request_randomness(b"claim-c", 1).is_err());
        assert!(source.request_randomness(b"claim-c", 1).is_ok());
    }
}
