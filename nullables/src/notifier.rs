//! Nullable outcome notifier: records notifications instead of delivering
//! them.

use parking_lot::Mutex;
use std::sync::Arc;
use tribunal_arbitration::{CollaboratorError, OutcomeNotifier};
use tribunal_types::{Address, ClaimId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub defendant: Address,
    pub claim: ClaimId,
    pub outcome: u64,
}

#[derive(Clone, Default)]
pub struct NullOutcomeNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
    fail: Arc<Mutex<bool>>,
}

impl NullOutcomeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications delivered so far (for assertions).
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().clone()
    }

    /// Make every subsequent notification fail.
    pub fn fail(&self, fail: bool) {
        *self.fail.lock() = fail;
    }
}

impl OutcomeNotifier for NullOutcomeNotifier {
    fn notify_outcome(
        &self,
        defendant: &Address,
        claim: &ClaimId,
        outcome: u64,
    ) -> Result<(), CollaboratorError> {
        if *self.fail.lock() {
            return Err("defendant rejected the notification".into());
        }
        self.sent.lock().push(Notification {
            defendant: *defendant,
            claim: *claim,
            outcome,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_until_told_to_fail() {
        let notifier = NullOutcomeNotifier::new();
        let defendant = Address::new([1u8; 32]);
        let claim = ClaimId::new([2u8; 32]);

        notifier.notify_outcome(&defendant, &claim, 42).unwrap();
        notifier.fail(true);
        assert!(notifier.notify_outcome(&defendant, &claim, 7).is_err());

        assert_eq!(
            notifier.sent(),
            vec![Notification {
                defendant,
                claim,
                outcome: 42
            }]
        );
    }
}
