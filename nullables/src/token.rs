//! Nullable token ledger: in-memory balances and allowances.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tribunal_arbitration::{CollaboratorError, ValueTransfer};
use tribunal_types::Address;

/// One executed value movement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: Address,
    pub to: Address,
    pub amount: u128,
}

#[derive(Default)]
struct LedgerState {
    balances: HashMap<Address, u128>,
    allowances: HashMap<(Address, Address), u128>,
    transfers: Vec<Transfer>,
    fail_transfers: bool,
    frozen: HashSet<Address>,
}

/// An in-memory fungible ledger.
#[derive(Clone, Default)]
pub struct NullTokenLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl NullTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `amount` out of thin air in `account`.
    pub fn mint(&self, account: Address, amount: u128) {
        *self.state.lock().balances.entry(account).or_default() += amount;
    }

    /// Let `spender` move up to `amount` from `owner`.
    pub fn approve(&self, owner: Address, spender: Address, amount: u128) {
        self.state.lock().allowances.insert((owner, spender), amount);
    }

    pub fn balance(&self, account: &Address) -> u128 {
        self.state
            .lock()
            .balances
            .get(account)
            .copied()
            .unwrap_or(0)
    }

    /// Sum of all balances.
    pub fn total_supply(&self) -> u128 {
        self.state.lock().balances.values().sum()
    }

    /// All transfers executed so far (for assertions).
    pub fn transfers(&self) -> Vec<Transfer> {
        self.state.lock().transfers.clone()
    }

    /// Make every subsequent movement fail.
    pub fn fail_transfers(&self, fail: bool) {
        self.state.lock().fail_transfers = fail;
    }

    /// Make movements out of `account` fail while `frozen` is set.
    pub fn freeze(&self, account: Address, frozen: bool) {
        let mut state = self.state.lock();
        if frozen {
            state.frozen.insert(account);
        } else {
            state.frozen.remove(&account);
        }
    }

    pub(crate) fn move_funds(
        &self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), CollaboratorError> {
        let mut state = self.state.lock();
        if state.fail_transfers {
            return Err("null ledger told to fail".into());
        }
        if state.frozen.contains(from) {
            return Err(format!("{from} is frozen").into());
        }
        let available = state.balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(format!("{from} holds {available}, cannot move {amount}").into());
        }
        state.balances.insert(*from, available - amount);
        *state.balances.entry(*to).or_default() += amount;
        state.transfers.push(Transfer {
            from: *from,
            to: *to,
            amount,
        });
        Ok(())
    }
}

impl ValueTransfer for NullTokenLedger {
    fn balance_of(&self, account: &Address) -> Result<u128, CollaboratorError> {
        Ok(self.balance(account))
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Result<u128, CollaboratorError> {
        Ok(self
            .state
            .lock()
            .allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0))
    }

    fn transfer(&self, from: &Address, to: &Address, amount: u128) -> Result<(), CollaboratorError> {
        self.move_funds(from, to, amount)
    }

    fn transfer_from(
        &self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), CollaboratorError> {
        let key = (*owner, *spender);
        let approved = self.state.lock().allowances.get(&key).copied().unwrap_or(0);
        if approved < amount {
            return Err(format!("allowance {approved} below {amount}").into());
        }
        self.move_funds(owner, to, amount)?;
        self.state.lock().allowances.insert(key, approved - amount);
        Ok(())
    }
}
