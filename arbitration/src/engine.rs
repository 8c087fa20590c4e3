//! The arbitration engine: owns every dispute and drives it through its
//! lifecycle.
//!
//! Every operation takes `&mut self`, so operations are strictly sequential
//! and none can re-enter another. Each operation checks everything it can
//! before touching a collaborator and records its own state change before
//! the first value movement. A failure before that point leaves the engine
//! exactly as it was; settlement steps that fail after it are kept as an
//! [`OutstandingSettlement`] and are never performed twice.

use std::collections::BTreeMap;

use tribunal_crypto::MerkleProof;
use tribunal_types::{Address, ClaimId};
use tribunal_vrf::{RandomnessConsumer, RandomnessSource, RequestId};

use crate::compensation::ensure_fraud_confirmed;
use crate::config::{ArbitrationConfig, ParameterUpdate};
use crate::error::ArbitrationError;
use crate::events::ArbitrationEvent;
use crate::identity::{recover_challenger, ChallengeAuthorization, DomainSeparator};
use crate::interfaces::{Environment, OutcomeNotifier, ValueTransfer, VerifierDirectory};
use crate::selection::JurorSelector;
use crate::settlement::{
    classify, plan_fraud_settlement, plan_rejected_settlement, plan_slashed_settlement,
    PayoutKind, SettlementPlan, Verdict,
};
use crate::snapshot::EngineSnapshot;
use crate::state::{
    CompensationPool, Dispute, DisputeStatus, OutstandingSettlement, PendingRandomnessRequest,
};
use crate::voting::VotingEngine;

/// The external systems the engine talks to.
pub struct Collaborators {
    pub randomness: Box<dyn RandomnessSource>,
    pub directory: Box<dyn VerifierDirectory>,
    pub token: Box<dyn ValueTransfer>,
    pub notifier: Box<dyn OutcomeNotifier>,
    pub environment: Box<dyn Environment>,
}

pub struct ArbitrationEngine {
    config: ArbitrationConfig,
    domain: DomainSeparator,
    collaborators: Collaborators,
    disputes: BTreeMap<ClaimId, Dispute>,
    pending_requests: BTreeMap<RequestId, PendingRandomnessRequest>,
    compensation: BTreeMap<ClaimId, CompensationPool>,
    outstanding: BTreeMap<ClaimId, OutstandingSettlement>,
    /// Pending events for the host to process.
    pending_events: Vec<ArbitrationEvent>,
}

impl ArbitrationEngine {
    pub fn new(
        config: ArbitrationConfig,
        collaborators: Collaborators,
    ) -> Result<Self, ArbitrationError> {
        config.validate()?;
        let domain = DomainSeparator::new(
            &config.domain_name,
            &config.domain_version,
            config.engine_account,
            collaborators.environment.chain_id(),
        );
        Ok(Self {
            config,
            domain,
            collaborators,
            disputes: BTreeMap::new(),
            pending_requests: BTreeMap::new(),
            compensation: BTreeMap::new(),
            outstanding: BTreeMap::new(),
            pending_events: Vec::new(),
        })
    }

    // ── Challenge ───────────────────────────────────────────────────────

    /// Open a dispute over `claim_id` against `defendant`.
    ///
    /// The challenger is whoever signed `auth`. Their stake moves into the
    /// engine's custody and randomness for council selection is requested;
    /// the returned handle is what the randomness source will call back with.
    pub fn create_dispute(
        &mut self,
        claim_id: ClaimId,
        defendant: Address,
        auth: &ChallengeAuthorization,
    ) -> Result<RequestId, ArbitrationError> {
        let chain = self.collaborators.environment.chain_id();
        if self.domain.refresh(chain) {
            tracing::info!(chain = %chain, "chain identity changed, domain separator recomputed");
        }
        let separator = self.domain.for_chain(chain);
        let challenger = recover_challenger(&separator, &claim_id, &defendant, auth)?;

        if challenger.is_zero() {
            return Err(ArbitrationError::ZeroAddress("challenger"));
        }
        if defendant.is_zero() {
            return Err(ArbitrationError::ZeroAddress("defendant"));
        }
        if self.disputes.contains_key(&claim_id) {
            return Err(ArbitrationError::DisputeAlreadyExists(claim_id));
        }

        let stake = self.config.challenge_stake;
        let engine = self.config.engine_account;
        let token = &self.collaborators.token;
        let balance = token
            .balance_of(&challenger)
            .map_err(ArbitrationError::Token)?;
        if balance < stake {
            return Err(ArbitrationError::InsufficientStake {
                needed: stake,
                available: balance,
            });
        }
        let allowance = token
            .allowance(&challenger, &engine)
            .map_err(ArbitrationError::Token)?;
        if allowance < stake {
            return Err(ArbitrationError::InsufficientAllowance {
                needed: stake,
                available: allowance,
            });
        }

        // The claim is locked before any collaborator is mutated.
        let now = self.collaborators.environment.now();
        let mut dispute = Dispute::new(claim_id, challenger, defendant, stake, now);
        dispute.advance(DisputeStatus::AwaitingRandomness)?;
        self.disputes.insert(claim_id, dispute);

        if let Err(e) = self
            .collaborators
            .token
            .transfer_from(&engine, &challenger, &engine, stake)
        {
            self.disputes.remove(&claim_id);
            return Err(ArbitrationError::Token(e));
        }

        let council_size = self.config.council_size;
        let request = match self
            .collaborators
            .randomness
            .request_randomness(claim_id.as_bytes(), council_size)
        {
            Ok(request) => request,
            Err(e) => {
                self.abort_challenge(&claim_id, &challenger, stake);
                return Err(e.into());
            }
        };

        self.pending_requests.insert(
            request,
            PendingRandomnessRequest {
                claim_id,
                challenger,
                defendant,
                council_size,
            },
        );

        tracing::info!(
            claim = %claim_id,
            challenger = %challenger,
            defendant = %defendant,
            stake,
            request = %request,
            "dispute created, awaiting randomness"
        );
        self.pending_events.push(ArbitrationEvent::DisputeCreated {
            claim: claim_id,
            challenger,
            defendant,
            stake,
        });
        self.pending_events.push(ArbitrationEvent::RandomnessRequested {
            claim: claim_id,
            request,
            num_words: council_size,
        });
        Ok(request)
    }

    /// Undo a challenge whose randomness request failed. If the refund fails
    /// too, the dispute stays `AwaitingRandomness` without a request so that
    /// `expire_dispute` can return the stake once the timeout passes.
    fn abort_challenge(&mut self, claim_id: &ClaimId, challenger: &Address, stake: u128) {
        let engine = self.config.engine_account;
        match self.collaborators.token.transfer(&engine, challenger, stake) {
            Ok(()) => {
                self.disputes.remove(claim_id);
            }
            Err(e) => {
                tracing::error!(
                    claim = %claim_id,
                    challenger = %challenger,
                    stake,
                    error = %e,
                    "failed to return stake of aborted challenge, left for expiry"
                );
            }
        }
    }

    // ── Voting ──────────────────────────────────────────────────────────

    /// Record `juror`'s vote. The weight is the juror's reputation right now.
    pub fn cast_vote(
        &mut self,
        claim_id: ClaimId,
        juror: Address,
        value: u64,
    ) -> Result<(), ArbitrationError> {
        let now = self.collaborators.environment.now();
        let dispute = self
            .disputes
            .get_mut(&claim_id)
            .ok_or(ArbitrationError::DisputeNotFound(claim_id))?;
        VotingEngine.ensure_can_vote(dispute, &juror, now)?;

        let weight = self
            .collaborators
            .directory
            .reputation_of(&juror)
            .map_err(ArbitrationError::Directory)?;
        VotingEngine.record_vote(dispute, juror, value, weight, now)?;

        tracing::info!(claim = %claim_id, juror = %juror, value, weight, "vote cast");
        self.pending_events.push(ArbitrationEvent::VoteCast {
            claim: claim_id,
            juror,
            value,
            weight,
        });
        Ok(())
    }

    // ── Resolution ──────────────────────────────────────────────────────

    /// Close voting on `claim_id` and settle it. Anyone may call this once
    /// the deadline has passed; `keeper` receives the keeper bounty.
    ///
    /// Every check runs before value moves. The dispute is then marked
    /// `Resolved`; for fraud the defendant's slash is the commit point and a
    /// failed slash restores the dispute. From there on the call succeeds:
    /// payouts and the defendant notification are recorded as outstanding and
    /// performed in order, and any step that fails is left for
    /// [`ArbitrationEngine::complete_settlement`].
    pub fn resolve_dispute(
        &mut self,
        claim_id: ClaimId,
        keeper: Address,
    ) -> Result<SettlementPlan, ArbitrationError> {
        if keeper.is_zero() {
            return Err(ArbitrationError::ZeroAddress("keeper"));
        }
        let now = self.collaborators.environment.now();
        let dispute = self
            .disputes
            .get(&claim_id)
            .ok_or(ArbitrationError::DisputeNotFound(claim_id))?;
        dispute.require_status(DisputeStatus::Voting)?;
        let deadline = dispute.deadline()?;
        if now <= deadline {
            return Err(ArbitrationError::VotingPeriodNotOver {
                claim: claim_id,
                deadline,
            });
        }

        let outcome = VotingEngine.outcome(dispute);
        let verdict = classify(outcome, self.config.fraud_threshold);
        let mut resolved = dispute.clone();
        resolved.advance(DisputeStatus::Resolved)?;
        resolved.quantitative_outcome = Some(outcome);
        resolved.verdict = Some(verdict);

        let rejected_plan = match verdict {
            Verdict::FraudConfirmed => {
                self.check_fraud_settlement(&resolved, keeper, outcome)?;
                None
            }
            Verdict::ChallengeRejected => {
                let plan = plan_rejected_settlement(
                    outcome,
                    keeper,
                    resolved.defendant,
                    resolved.challenger_stake,
                    self.config.keeper_bounty,
                )?;
                self.ensure_engine_holds(plan.total_paid())?;
                Some(plan)
            }
        };

        let previous = self.disputes.insert(claim_id, resolved.clone());
        let plan = match rejected_plan {
            Some(plan) => plan,
            None => {
                let engine = self.config.engine_account;
                match self.collaborators.directory.slash(&resolved.defendant, &engine) {
                    Ok(slashed) => plan_slashed_settlement(
                        outcome,
                        resolved.challenger,
                        keeper,
                        resolved.challenger_stake,
                        slashed,
                        self.config.challenger_bounty_bps,
                        self.config.keeper_bounty,
                    ),
                    Err(e) => {
                        if let Some(previous) = previous {
                            self.disputes.insert(claim_id, previous);
                        }
                        return Err(ArbitrationError::Directory(e));
                    }
                }
            }
        };

        if verdict == Verdict::FraudConfirmed {
            self.compensation
                .insert(claim_id, CompensationPool::new(plan.compensation_pool));
        }
        self.outstanding.insert(
            claim_id,
            OutstandingSettlement {
                payouts: plan.payouts.clone(),
                notify_outcome: Some(outcome),
            },
        );

        tracing::info!(
            claim = %claim_id,
            outcome,
            verdict = ?verdict,
            keeper = %keeper,
            paid = plan.total_paid(),
            compensation_pool = plan.compensation_pool,
            "dispute resolved"
        );
        self.pending_events.push(ArbitrationEvent::DisputeResolved {
            claim: claim_id,
            outcome,
            verdict,
            keeper,
        });

        // A failure here is recorded as outstanding and reported by event.
        let _ = self.drive_settlement(claim_id);
        Ok(plan)
    }

    /// Retry the outstanding settlement steps of a resolved dispute. Anyone
    /// may call this; steps already performed are not repeated.
    pub fn complete_settlement(&mut self, claim_id: ClaimId) -> Result<(), ArbitrationError> {
        if !self.outstanding.contains_key(&claim_id) {
            return Err(ArbitrationError::NoOutstandingSettlement(claim_id));
        }
        self.drive_settlement(claim_id)
    }

    /// Check a fraud settlement against the stake the directory reports, so
    /// nothing is slashed when the bounties could not be paid anyway.
    fn check_fraud_settlement(
        &self,
        dispute: &Dispute,
        keeper: Address,
        outcome: u64,
    ) -> Result<(), ArbitrationError> {
        let visible_stake = self
            .collaborators
            .directory
            .stake_of(&dispute.defendant)
            .map_err(ArbitrationError::Directory)?;
        plan_fraud_settlement(
            outcome,
            dispute.challenger,
            keeper,
            dispute.challenger_stake,
            visible_stake,
            self.config.challenger_bounty_bps,
            self.config.keeper_bounty,
        )?;
        self.ensure_engine_holds(dispute.challenger_stake)
    }

    fn ensure_engine_holds(&self, required: u128) -> Result<(), ArbitrationError> {
        let available = self
            .collaborators
            .token
            .balance_of(&self.config.engine_account)
            .map_err(ArbitrationError::Token)?;
        if available < required {
            return Err(ArbitrationError::InsufficientFundsForBounties {
                required,
                available,
            });
        }
        Ok(())
    }

    /// Perform the outstanding steps for `claim_id` in order, stopping at the
    /// first failure. Each step is removed as soon as it succeeds.
    fn drive_settlement(&mut self, claim_id: ClaimId) -> Result<(), ArbitrationError> {
        let engine = self.config.engine_account;
        let defendant = self
            .disputes
            .get(&claim_id)
            .map(|d| d.defendant)
            .ok_or(ArbitrationError::DisputeNotFound(claim_id))?;
        let Some(outstanding) = self.outstanding.get_mut(&claim_id) else {
            return Ok(());
        };
        let token = &self.collaborators.token;

        let mut result = Ok(());
        while let Some(payout) = outstanding.payouts.first().cloned() {
            let available = match token.balance_of(&engine) {
                Ok(available) => available,
                Err(e) => {
                    result = Err(ArbitrationError::Token(e));
                    break;
                }
            };
            if available < payout.amount {
                result = Err(ArbitrationError::InsufficientFundsForBounties {
                    required: payout.amount,
                    available,
                });
                break;
            }
            if let Err(e) = token.transfer(&engine, &payout.recipient, payout.amount) {
                result = Err(ArbitrationError::Token(e));
                break;
            }
            outstanding.payouts.remove(0);
            self.pending_events.push(ArbitrationEvent::PayoutMade {
                claim: claim_id,
                kind: payout.kind,
                recipient: payout.recipient,
                amount: payout.amount,
            });
        }

        if result.is_ok() {
            if let Some(outcome) = outstanding.notify_outcome {
                match self
                    .collaborators
                    .notifier
                    .notify_outcome(&defendant, &claim_id, outcome)
                {
                    Ok(()) => outstanding.notify_outcome = None,
                    Err(e) => result = Err(ArbitrationError::Notifier(e)),
                }
            }
        }

        match result {
            Err(e) => {
                tracing::warn!(
                    claim = %claim_id,
                    outstanding_payouts = outstanding.payouts.len(),
                    owed = outstanding.amount_owed(),
                    notification_pending = outstanding.notify_outcome.is_some(),
                    error = %e,
                    "settlement incomplete"
                );
                self.pending_events.push(ArbitrationEvent::SettlementDeferred {
                    claim: claim_id,
                    outstanding_payouts: outstanding.payouts.len(),
                    notification_pending: outstanding.notify_outcome.is_some(),
                    reason: e.to_string(),
                });
                Err(e)
            }
            Ok(()) => {
                self.outstanding.remove(&claim_id);
                tracing::debug!(claim = %claim_id, "settlement complete");
                self.pending_events
                    .push(ArbitrationEvent::SettlementCompleted { claim: claim_id });
                Ok(())
            }
        }
    }

    // ── Expiry ──────────────────────────────────────────────────────────

    /// Give up on a dispute whose randomness never arrived and refund the
    /// challenger. Anyone may call this once the randomness timeout passed.
    pub fn expire_dispute(
        &mut self,
        claim_id: ClaimId,
        caller: Address,
    ) -> Result<(), ArbitrationError> {
        let now = self.collaborators.environment.now();
        let dispute = self
            .disputes
            .get(&claim_id)
            .ok_or(ArbitrationError::DisputeNotFound(claim_id))?;
        dispute.require_status(DisputeStatus::AwaitingRandomness)?;
        let expires_at = dispute
            .created_at
            .plus_secs(self.config.randomness_timeout_secs);
        if now <= expires_at {
            return Err(ArbitrationError::RandomnessNotExpired {
                claim: claim_id,
                expires_at,
            });
        }

        let challenger = dispute.challenger;
        let refunded = dispute.challenger_stake;
        let request = self
            .pending_requests
            .iter()
            .find(|(_, pending)| pending.claim_id == claim_id)
            .map(|(id, _)| *id);

        let engine = self.config.engine_account;
        self.collaborators
            .token
            .transfer(&engine, &challenger, refunded)
            .map_err(ArbitrationError::Token)?;

        if let Some(request) = request {
            self.pending_requests.remove(&request);
        }
        if let Some(dispute) = self.disputes.get_mut(&claim_id) {
            dispute.advance(DisputeStatus::Expired)?;
        }

        tracing::info!(
            claim = %claim_id,
            caller = %caller,
            challenger = %challenger,
            refunded,
            "dispute expired without randomness"
        );
        self.pending_events.push(ArbitrationEvent::DisputeExpired {
            claim: claim_id,
            refunded,
        });
        self.pending_events.push(ArbitrationEvent::PayoutMade {
            claim: claim_id,
            kind: PayoutKind::ChallengerStakeReturn,
            recipient: challenger,
            amount: refunded,
        });
        Ok(())
    }

    // ── Compensation ────────────────────────────────────────────────────

    /// Commit the compensation set for a fraud-confirmed dispute.
    pub fn publish_compensation_root(
        &mut self,
        caller: Address,
        claim_id: ClaimId,
        root: [u8; 32],
    ) -> Result<(), ArbitrationError> {
        self.require_admin(&caller)?;
        let dispute = self
            .disputes
            .get(&claim_id)
            .ok_or(ArbitrationError::DisputeNotFound(claim_id))?;
        ensure_fraud_confirmed(dispute)?;
        let pool = self
            .compensation
            .get_mut(&claim_id)
            .ok_or(ArbitrationError::NotFraudConfirmed(claim_id))?;
        pool.check_publish(&claim_id, &root)?;
        pool.root = Some(root);

        tracing::info!(claim = %claim_id, root = %hex::encode(root), "compensation root published");
        self.pending_events
            .push(ArbitrationEvent::CompensationRootPublished {
                claim: claim_id,
                root,
            });
        Ok(())
    }

    /// Pay `recipient` their committed compensation. Succeeds at most once
    /// per recipient and claim.
    pub fn claim_compensation(
        &mut self,
        claim_id: ClaimId,
        recipient: Address,
        amount: u128,
        proof: &MerkleProof,
    ) -> Result<(), ArbitrationError> {
        if recipient.is_zero() {
            return Err(ArbitrationError::ZeroAddress("recipient"));
        }
        let engine = self.config.engine_account;
        let pool = self
            .compensation
            .get_mut(&claim_id)
            .ok_or(ArbitrationError::CompensationRootNotSet(claim_id))?;
        pool.check_claim(&claim_id, &recipient, amount, proof)?;

        if amount > 0 {
            self.collaborators
                .token
                .transfer(&engine, &recipient, amount)
                .map_err(ArbitrationError::Token)?;
        }
        pool.record_claim(recipient, amount);
        let remaining = pool.remaining;

        tracing::info!(
            claim = %claim_id,
            recipient = %recipient,
            amount,
            remaining,
            "compensation claimed"
        );
        self.pending_events.push(ArbitrationEvent::CompensationClaimed {
            claim: claim_id,
            recipient,
            amount,
        });
        self.pending_events.push(ArbitrationEvent::PayoutMade {
            claim: claim_id,
            kind: PayoutKind::Compensation,
            recipient,
            amount,
        });
        Ok(())
    }

    // ── Administration ──────────────────────────────────────────────────

    /// Change one parameter. Council admin only; the resulting configuration
    /// must still validate.
    pub fn update_parameter(
        &mut self,
        caller: Address,
        update: ParameterUpdate,
    ) -> Result<(), ArbitrationError> {
        self.require_admin(&caller)?;
        let mut next = self.config.clone();
        next.apply(&update);
        next.validate()?;
        if let ParameterUpdate::KeeperBounty(bounty) = update {
            if let Some(live) = self
                .disputes
                .values()
                .find(|d| !d.status.is_terminal() && d.challenger_stake < bounty)
            {
                return Err(ArbitrationError::InvalidConfig(format!(
                    "keeper_bounty {bounty} exceeds the stake {} of in-flight dispute {}",
                    live.challenger_stake, live.claim_id
                )));
            }
        }
        self.config = next;

        tracing::info!(parameter = update.name(), update = ?update, "parameter updated");
        self.pending_events
            .push(ArbitrationEvent::ParameterUpdated { update });
        Ok(())
    }

    fn require_admin(&self, caller: &Address) -> Result<(), ArbitrationError> {
        if *caller != self.config.council_admin {
            return Err(ArbitrationError::Unauthorized(*caller));
        }
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &ArbitrationConfig {
        &self.config
    }

    /// The challenge signing domain for the current chain.
    pub fn domain_separator(&self) -> [u8; 32] {
        self.domain
            .for_chain(self.collaborators.environment.chain_id())
    }

    pub fn dispute(&self, claim_id: &ClaimId) -> Option<&Dispute> {
        self.disputes.get(claim_id)
    }

    /// Status of the dispute for `claim_id`; `None` if there is none.
    pub fn status(&self, claim_id: &ClaimId) -> DisputeStatus {
        self.disputes
            .get(claim_id)
            .map(|d| d.status)
            .unwrap_or(DisputeStatus::None)
    }

    pub fn council_members(&self, claim_id: &ClaimId) -> &[Address] {
        self.disputes
            .get(claim_id)
            .map(|d| d.council_members.as_slice())
            .unwrap_or(&[])
    }

    pub fn vote_of(&self, claim_id: &ClaimId, juror: &Address) -> Option<u64> {
        self.disputes.get(claim_id).and_then(|d| d.vote_of(juror))
    }

    pub fn has_voted(&self, claim_id: &ClaimId, juror: &Address) -> bool {
        self.disputes
            .get(claim_id)
            .is_some_and(|d| d.has_voted(juror))
    }

    pub fn pending_request(&self, request: &RequestId) -> Option<&PendingRandomnessRequest> {
        self.pending_requests.get(request)
    }

    pub fn compensation_pool(&self, claim_id: &ClaimId) -> Option<&CompensationPool> {
        self.compensation.get(claim_id)
    }

    pub fn compensation_root(&self, claim_id: &ClaimId) -> Option<[u8; 32]> {
        self.compensation.get(claim_id).and_then(|p| p.root)
    }

    pub fn is_claimed(&self, claim_id: &ClaimId, recipient: &Address) -> bool {
        self.compensation
            .get(claim_id)
            .is_some_and(|p| p.is_claimed(recipient))
    }

    /// Settlement steps of a resolved dispute still to be performed.
    pub fn outstanding_settlement(&self, claim_id: &ClaimId) -> Option<&OutstandingSettlement> {
        self.outstanding.get(claim_id)
    }

    /// Take all buffered events.
    pub fn drain_events(&mut self) -> Vec<ArbitrationEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ── Persistence ─────────────────────────────────────────────────────

    /// Capture all persistent state. Buffered events are not included.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            config: self.config.clone(),
            disputes: self.disputes.values().cloned().collect(),
            pending_requests: self
                .pending_requests
                .iter()
                .map(|(id, pending)| (*id, pending.clone()))
                .collect(),
            compensation: self
                .compensation
                .iter()
                .map(|(claim, pool)| (*claim, pool.clone()))
                .collect(),
            outstanding: self
                .outstanding
                .iter()
                .map(|(claim, outstanding)| (*claim, outstanding.clone()))
                .collect(),
        }
    }

    /// Rebuild an engine from a snapshot.
    pub fn restore(
        snapshot: EngineSnapshot,
        collaborators: Collaborators,
    ) -> Result<Self, ArbitrationError> {
        let mut engine = Self::new(snapshot.config, collaborators)?;
        engine.disputes = snapshot
            .disputes
            .into_iter()
            .map(|d| (d.claim_id, d))
            .collect();
        engine.pending_requests = snapshot.pending_requests.into_iter().collect();
        engine.compensation = snapshot.compensation.into_iter().collect();
        engine.outstanding = snapshot.outstanding.into_iter().collect();
        tracing::info!(
            disputes = engine.disputes.len(),
            pending_requests = engine.pending_requests.len(),
            "engine restored from snapshot"
        );
        Ok(engine)
    }
}

impl RandomnessConsumer for ArbitrationEngine {
    type Error = ArbitrationError;

    /// Draw the council for the dispute behind `request`.
    ///
    /// Only the configured provider may call this. The request is consumed
    /// only when selection succeeds; on any failure it stays pending and the
    /// dispute can still be expired.
    fn fulfill_randomness(
        &mut self,
        provider: &Address,
        request: RequestId,
        words: &[u64],
    ) -> Result<(), ArbitrationError> {
        if *provider != self.config.randomness_provider {
            tracing::warn!(provider = %provider, request = %request, "randomness from unknown provider rejected");
            return Err(ArbitrationError::OnlyRandomnessProvider(*provider));
        }
        let Some(pending) = self.pending_requests.get(&request).cloned() else {
            tracing::warn!(request = %request, "randomness for unknown request rejected");
            return Err(ArbitrationError::RequestNotFound(request));
        };
        let claim_id = pending.claim_id;
        self.disputes
            .get(&claim_id)
            .ok_or(ArbitrationError::DisputeNotFound(claim_id))?
            .require_status(DisputeStatus::AwaitingRandomness)?;

        let pool = self
            .collaborators
            .directory
            .eligible_jurors()
            .map_err(ArbitrationError::Directory)?;
        let council = JurorSelector
            .select(
                &pool,
                &pending.challenger,
                &pending.defendant,
                pending.council_size as usize,
                words,
            )
            .map_err(|e| {
                tracing::warn!(claim = %claim_id, request = %request, error = %e, "council selection failed");
                e
            })?;

        let now = self.collaborators.environment.now();
        let deadline = now.plus_secs(self.config.voting_period_secs);
        let dispute = self
            .disputes
            .get_mut(&claim_id)
            .ok_or(ArbitrationError::DisputeNotFound(claim_id))?;
        dispute.advance(DisputeStatus::Voting)?;
        dispute.council_members = council.clone();
        dispute.voting_deadline = Some(deadline);
        self.pending_requests.remove(&request);

        tracing::info!(
            claim = %claim_id,
            request = %request,
            council_size = council.len(),
            deadline = %deadline,
            "council selected, voting open"
        );
        self.pending_events.push(ArbitrationEvent::CouncilSelected {
            claim: claim_id,
            council,
            voting_deadline: deadline.as_secs(),
        });
        Ok(())
    }

    /// A still-pending request is worth redelivering when the juror pool
    /// was too small or the directory could not be read.
    fn should_retry(&self, request: RequestId, error: &ArbitrationError) -> bool {
        self.pending_requests.contains_key(&request)
            && matches!(
                error,
                ArbitrationError::NotEnoughVerifiers { .. } | ArbitrationError::Directory(_)
            )
    }
}
