//! Nullable verifier directory: an in-memory juror pool with stakes held in
//! a vault account on a [`NullTokenLedger`].

use crate::token::NullTokenLedger;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tribunal_arbitration::{CollaboratorError, VerifierDirectory};
use tribunal_types::Address;

#[derive(Default)]
struct DirectoryState {
    jurors: Vec<Address>,
    reputation: HashMap<Address, u64>,
    stakes: HashMap<Address, u128>,
    slashes: Vec<(Address, Address, u128)>,
    shortfall: u128,
}

#[derive(Clone)]
pub struct NullVerifierDirectory {
    ledger: NullTokenLedger,
    vault: Address,
    state: Arc<Mutex<DirectoryState>>,
}

impl NullVerifierDirectory {
    /// Stakes are held by `vault` on `ledger`.
    pub fn new(ledger: NullTokenLedger, vault: Address) -> Self {
        Self {
            ledger,
            vault,
            state: Arc::new(Mutex::new(DirectoryState::default())),
        }
    }

    /// Add an eligible juror with the given reputation.
    pub fn add_juror(&self, juror: Address, reputation: u64) {
        let mut state = self.state.lock();
        state.jurors.push(juror);
        state.reputation.insert(juror, reputation);
    }

    pub fn set_reputation(&self, juror: Address, reputation: u64) {
        self.state.lock().reputation.insert(juror, reputation);
    }

    /// Deposit `amount` of stake for `verifier` into the vault.
    pub fn deposit_stake(&self, verifier: Address, amount: u128) {
        self.ledger.mint(self.vault, amount);
        *self.state.lock().stakes.entry(verifier).or_default() += amount;
    }

    pub fn stake(&self, verifier: &Address) -> u128 {
        self.state.lock().stakes.get(verifier).copied().unwrap_or(0)
    }

    /// Make subsequent slashes move `amount` less than the reported stake.
    pub fn set_slash_shortfall(&self, amount: u128) {
        self.state.lock().shortfall = amount;
    }

    /// Every `(verifier, recipient, amount)` slash so far.
    pub fn slashes(&self) -> Vec<(Address, Address, u128)> {
        self.state.lock().slashes.clone()
    }
}

impl VerifierDirectory for NullVerifierDirectory {
    fn eligible_jurors(&self) -> Result<Vec<Address>, CollaboratorError> {
        Ok(self.state.lock().jurors.clone())
    }

    fn reputation_of(&self, juror: &Address) -> Result<u64, CollaboratorError> {
        Ok(self.state.lock().reputation.get(juror).copied().unwrap_or(0))
    }

    fn stake_of(&self, verifier: &Address) -> Result<u128, CollaboratorError> {
        Ok(self.stake(verifier))
    }

    fn slash(&self, verifier: &Address, recipient: &Address) -> Result<u128, CollaboratorError> {
        let amount = {
            let mut state = self.state.lock();
            let staked = state.stakes.remove(verifier).unwrap_or(0);
            let moved = staked.saturating_sub(state.shortfall);
            state.slashes.push((*verifier, *recipient, moved));
            moved
        };
        self.ledger.move_funds(&self.vault, recipient, amount)?;
        Ok(amount)
    }
}
