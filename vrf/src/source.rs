//! Bridges a [`VrfProvider`] onto the asynchronous request/fulfil protocol.

use crate::request::{RandomnessConsumer, RandomnessSource, RequestId};
use crate::{VrfError, VrfProvider};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tribunal_crypto::blake2b_256_multi;
use tribunal_types::Address;

const WORD_TAG: &[u8] = b"tribunal/vrf-word/v1";

/// Expand a 32-byte seed into `count` 64-bit words.
///
/// `word[i] = first 8 bytes (BE) of Blake2b-256(tag || seed || request || i)`.
pub fn expand_words(seed: &[u8; 32], request: RequestId, count: u32) -> Vec<u64> {
    (0..count)
        .map(|i| {
            let digest = blake2b_256_multi(&[
                WORD_TAG,
                seed,
                &request.0.to_be_bytes(),
                &i.to_be_bytes(),
            ]);
            let mut word = [0u8; 8];
            word.copy_from_slice(&digest[..8]);
            u64::from_be_bytes(word)
        })
        .collect()
}

#[derive(Clone, Debug)]
struct QueuedRequest {
    id: RequestId,
    context: Vec<u8>,
    num_words: u32,
}

#[derive(Default)]
struct Queue {
    next_id: u64,
    pending: VecDeque<QueuedRequest>,
}

/// Result of delivering one queued request.
#[derive(Debug)]
pub enum Delivery<E> {
    /// The consumer accepted the words.
    Delivered(RequestId),
    /// The consumer rejected the words for good; the request is consumed.
    Rejected(RequestId, E),
    /// The consumer rejected the words but asked for another delivery; the
    /// request stays queued.
    Requeued(RequestId, E),
    /// The provider could not produce randomness; the request stays queued.
    Deferred(RequestId, VrfError),
}

/// A randomness source backed by a VRF provider.
///
/// Cloning yields another handle onto the same queue, so the consumer can
/// hold one handle for requests while the host holds another and drives
/// [`VrfRandomnessSource::fulfill_pending`].
pub struct VrfRandomnessSource<P: VrfProvider> {
    id: Address,
    provider: Arc<P>,
    queue: Arc<Mutex<Queue>>,
}

impl<P: VrfProvider> Clone for VrfRandomnessSource<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            provider: Arc::clone(&self.provider),
            queue: Arc::clone(&self.queue),
        }
    }
}

impl<P: VrfProvider> VrfRandomnessSource<P> {
    pub fn new(id: Address, provider: P) -> Self {
        Self {
            id,
            provider: Arc::new(provider),
            queue: Arc::new(Mutex::new(Queue::default())),
        }
    }

    pub fn pending_count(&self) -> usize {
        self.queue.lock().pending.len()
    }

    /// Fulfil every queued request against `consumer`.
    ///
    /// The queue lock is released before each callback. Deferred and
    /// requeued requests go back to the front of the queue in their
    /// original order.
    pub fn fulfill_pending<C: RandomnessConsumer>(
        &self,
        consumer: &mut C,
    ) -> Vec<Delivery<C::Error>> {
        let drained: Vec<QueuedRequest> = self.queue.lock().pending.drain(..).collect();
        let mut deliveries = Vec::with_capacity(drained.len());
        let mut retained = Vec::new();

        for request in drained {
            let mut context = request.context.clone();
            context.extend_from_slice(&request.id.0.to_be_bytes());
            let output = match self.provider.get_randomness(&context) {
                Ok(output) => output,
                Err(e) => {
                    tracing::warn!(
                        request = %request.id,
                        provider = self.provider.name(),
                        error = %e,
                        "randomness unavailable, deferring request"
                    );
                    deliveries.push(Delivery::Deferred(request.id, e));
                    retained.push(request);
                    continue;
                }
            };
            let words = expand_words(&output.value, request.id, request.num_words);
            match consumer.fulfill_randomness(&self.id, request.id, &words) {
                Ok(()) => deliveries.push(Delivery::Delivered(request.id)),
                Err(e) if consumer.should_retry(request.id, &e) => {
                    tracing::debug!(request = %request.id, "delivery rejected, requeueing");
                    deliveries.push(Delivery::Requeued(request.id, e));
                    retained.push(request);
                }
                Err(e) => deliveries.push(Delivery::Rejected(request.id, e)),
            }
        }

        if !retained.is_empty() {
            let mut queue = self.queue.lock();
            for request in retained.into_iter().rev() {
                queue.pending.push_front(request);
            }
        }
        deliveries
    }
}

impl<P: VrfProvider> RandomnessSource for VrfRandomnessSource<P> {
    fn provider_id(&self) -> Address {
        self.id
    }

    fn request_randomness(&self, context: &[u8], num_words: u32) -> Result<RequestId, VrfError> {
        if num_words == 0 {
            return Err(VrfError::RequestRejected("zero words requested".into()));
        }
        let mut queue = self.queue.lock();
        queue.next_id += 1;
        let id = RequestId(queue.next_id);
        queue.pending.push_back(QueuedRequest {
            id,
            context: context.to_vec(),
            num_words,
        });
        tracing::debug!(request = %id, num_words, "randomness requested");
        Ok(id)
    }
}
