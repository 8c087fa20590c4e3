//! Settlement economics: classification of an outcome and the payouts it
//! triggers.
//!
//! Planning is pure. The engine computes a [`SettlementPlan`] from amounts it
//! has already verified, then executes the payouts in order. A plan that
//! would pay more than the funds backing it is never produced.

use crate::config::BPS_DENOMINATOR;
use crate::error::ArbitrationError;
use serde::{Deserialize, Serialize};
use tribunal_types::Address;

/// How a resolved dispute was classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Outcome below the fraud threshold: the challenge succeeded.
    FraudConfirmed,
    /// Outcome at or above the threshold: the defendant is upheld.
    ChallengeRejected,
}

/// Classify a weighted-average outcome against the fraud threshold.
pub fn classify(outcome: u64, fraud_threshold: u64) -> Verdict {
    if outcome < fraud_threshold {
        Verdict::FraudConfirmed
    } else {
        Verdict::ChallengeRejected
    }
}

/// Every kind of value movement settlement can perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayoutKind {
    ChallengerStakeReturn,
    ChallengerBounty,
    KeeperBounty,
    DefendantRemainder,
    Compensation,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub kind: PayoutKind,
    pub recipient: Address,
    pub amount: u128,
}

/// The full set of transfers for one resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPlan {
    pub verdict: Verdict,
    pub outcome: u64,
    /// Transfers out of the engine account, in execution order.
    pub payouts: Vec<Payout>,
    /// Slashed funds retained for compensation claims.
    pub compensation_pool: u128,
}

impl SettlementPlan {
    pub fn total_paid(&self) -> u128 {
        self.payouts.iter().map(|p| p.amount).sum()
    }

    pub fn paid_to(&self, recipient: &Address) -> u128 {
        self.payouts
            .iter()
            .filter(|p| p.recipient == *recipient)
            .map(|p| p.amount)
            .sum()
    }

    fn push(&mut self, kind: PayoutKind, recipient: Address, amount: u128) {
        if amount > 0 {
            self.payouts.push(Payout {
                kind,
                recipient,
                amount,
            });
        }
    }
}

/// `amount × bps / 10_000`, truncated.
pub fn bounty_share(amount: u128, bps: u32) -> Result<u128, ArbitrationError> {
    amount
        .checked_mul(u128::from(bps))
        .map(|v| v / BPS_DENOMINATOR)
        .ok_or(ArbitrationError::Overflow("challenger bounty"))
}

/// Plan a fraud-confirmed settlement.
///
/// The challenger's stake comes back in full; both bounties are paid out of
/// `slashed`, and whatever is left becomes the compensation pool.
pub fn plan_fraud_settlement(
    outcome: u64,
    challenger: Address,
    keeper: Address,
    challenger_stake: u128,
    slashed: u128,
    challenger_bounty_bps: u32,
    keeper_bounty: u128,
) -> Result<SettlementPlan, ArbitrationError> {
    let challenger_bounty = bounty_share(slashed, challenger_bounty_bps)?;
    let required = challenger_bounty
        .checked_add(keeper_bounty)
        .ok_or(ArbitrationError::Overflow("bounty total"))?;
    if slashed < required {
        return Err(ArbitrationError::InsufficientFundsForBounties {
            required,
            available: slashed,
        });
    }

    let mut plan = SettlementPlan {
        verdict: Verdict::FraudConfirmed,
        outcome,
        payouts: Vec::with_capacity(3),
        compensation_pool: slashed - required,
    };
    plan.push(PayoutKind::ChallengerStakeReturn, challenger, challenger_stake);
    plan.push(PayoutKind::ChallengerBounty, challenger, challenger_bounty);
    plan.push(PayoutKind::KeeperBounty, keeper, keeper_bounty);
    Ok(plan)
}

/// Plan a fraud-confirmed settlement for funds already slashed.
///
/// Never fails. When `slashed` cannot cover both bounties, none is paid: the
/// challenger still gets their stake back and the whole slash becomes the
/// compensation pool.
pub fn plan_slashed_settlement(
    outcome: u64,
    challenger: Address,
    keeper: Address,
    challenger_stake: u128,
    slashed: u128,
    challenger_bounty_bps: u32,
    keeper_bounty: u128,
) -> SettlementPlan {
    match plan_fraud_settlement(
        outcome,
        challenger,
        keeper,
        challenger_stake,
        slashed,
        challenger_bounty_bps,
        keeper_bounty,
    ) {
        Ok(plan) => plan,
        Err(e) => {
            tracing::warn!(slashed, error = %e, "slash cannot fund bounties, settling without them");
            let mut plan = SettlementPlan {
                verdict: Verdict::FraudConfirmed,
                outcome,
                payouts: Vec::with_capacity(1),
                compensation_pool: slashed,
            };
            plan.push(PayoutKind::ChallengerStakeReturn, challenger, challenger_stake);
            plan
        }
    }
}

/// Plan a rejected-challenge settlement.
///
/// The challenger's stake is forfeited: the keeper bounty comes out of it and
/// the remainder goes to the defendant.
pub fn plan_rejected_settlement(
    outcome: u64,
    keeper: Address,
    defendant: Address,
    challenger_stake: u128,
    keeper_bounty: u128,
) -> Result<SettlementPlan, ArbitrationError> {
    if challenger_stake < keeper_bounty {
        return Err(ArbitrationError::InsufficientFundsForBounties {
            required: keeper_bounty,
            available: challenger_stake,
        });
    }

    let mut plan = SettlementPlan {
        verdict: Verdict::ChallengeRejected,
        outcome,
        payouts: Vec::with_capacity(2),
        compensation_pool: 0,
    };
    plan.push(PayoutKind::KeeperBounty, keeper, keeper_bounty);
    plan.push(
        PayoutKind::DefendantRemainder,
        defendant,
        challenger_stake - keeper_bounty,
    );
    Ok(plan)
}
