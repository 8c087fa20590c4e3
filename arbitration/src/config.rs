//! Engine configuration with TOML file support.
//!
//! Every economic and timing parameter is adjustable at runtime by the
//! council admin through [`ParameterUpdate`]; the TOML file provides the
//! starting values.

use crate::error::ArbitrationError;
use serde::{Deserialize, Serialize};
use tribunal_types::Address;

/// Basis-point denominator (10_000 = 100%).
pub const BPS_DENOMINATOR: u128 = 10_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrationConfig {
    /// Holder of the council-admin capability.
    #[serde(default = "default_address")]
    pub council_admin: Address,

    /// The engine's own account on the token ledger (stake custody, bounty
    /// and compensation funds).
    #[serde(default = "default_address")]
    pub engine_account: Address,

    /// The only identity allowed to deliver randomness.
    #[serde(default = "default_address")]
    pub randomness_provider: Address,

    /// Seconds a council has to vote once selected.
    #[serde(default = "default_voting_period_secs")]
    pub voting_period_secs: u64,

    /// Number of jurors drawn per dispute.
    #[serde(default = "default_council_size")]
    pub council_size: u32,

    /// Amount (raw units) a challenger must stake.
    #[serde(default = "default_challenge_stake")]
    pub challenge_stake: u128,

    /// Outcomes strictly below this value confirm fraud.
    #[serde(default = "default_fraud_threshold")]
    pub fraud_threshold: u64,

    /// Fixed amount paid to whoever resolves a dispute.
    #[serde(default = "default_keeper_bounty")]
    pub keeper_bounty: u128,

    /// Challenger bounty as a share of the slashed stake (1000 = 10%).
    #[serde(default = "default_challenger_bounty_bps")]
    pub challenger_bounty_bps: u32,

    /// Seconds after creation before an unfulfilled dispute may be expired.
    #[serde(default = "default_randomness_timeout_secs")]
    pub randomness_timeout_secs: u64,

    /// Signing-domain name for challenge authorisations.
    #[serde(default = "default_domain_name")]
    pub domain_name: String,

    /// Signing-domain version for challenge authorisations.
    #[serde(default = "default_domain_version")]
    pub domain_version: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_address() -> Address {
    Address::ZERO
}

fn default_voting_period_secs() -> u64 {
    3 * 24 * 3600 // 3 days
}

fn default_council_size() -> u32 {
    5
}

fn default_challenge_stake() -> u128 {
    1_000
}

fn default_fraud_threshold() -> u64 {
    50
}

fn default_keeper_bounty() -> u128 {
    10
}

fn default_challenger_bounty_bps() -> u32 {
    1000 // 10%
}

fn default_randomness_timeout_secs() -> u64 {
    24 * 3600 // 1 day
}

fn default_domain_name() -> String {
    "ImpactArbitration".to_string()
}

fn default_domain_version() -> String {
    "1".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ArbitrationConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, ArbitrationError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ArbitrationError::InvalidConfig(format!("{path}: {e}")))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ArbitrationError> {
        toml::from_str(s).map_err(|e| ArbitrationError::InvalidConfig(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ArbitrationError> {
        toml::to_string_pretty(self).map_err(|e| ArbitrationError::InvalidConfig(e.to_string()))
    }

    /// Check the configuration is usable by an engine.
    pub fn validate(&self) -> Result<(), ArbitrationError> {
        if self.council_admin.is_zero() {
            return Err(ArbitrationError::ZeroAddress("council_admin"));
        }
        if self.engine_account.is_zero() {
            return Err(ArbitrationError::ZeroAddress("engine_account"));
        }
        if self.randomness_provider.is_zero() {
            return Err(ArbitrationError::ZeroAddress("randomness_provider"));
        }
        if self.council_size == 0 {
            return Err(ArbitrationError::InvalidConfig(
                "council_size must be at least 1".into(),
            ));
        }
        if self.voting_period_secs == 0 {
            return Err(ArbitrationError::InvalidConfig(
                "voting_period_secs must be positive".into(),
            ));
        }
        if self.randomness_timeout_secs == 0 {
            return Err(ArbitrationError::InvalidConfig(
                "randomness_timeout_secs must be positive".into(),
            ));
        }
        if u128::from(self.challenger_bounty_bps) > BPS_DENOMINATOR {
            return Err(ArbitrationError::InvalidConfig(format!(
                "challenger_bounty_bps {} exceeds {BPS_DENOMINATOR}",
                self.challenger_bounty_bps
            )));
        }
        if self.challenge_stake == 0 {
            return Err(ArbitrationError::InvalidConfig(
                "challenge_stake must be positive".into(),
            ));
        }
        // A rejected challenge pays the keeper out of the forfeited stake.
        if self.keeper_bounty > self.challenge_stake {
            return Err(ArbitrationError::InvalidConfig(format!(
                "keeper_bounty {} exceeds challenge_stake {}",
                self.keeper_bounty, self.challenge_stake
            )));
        }
        Ok(())
    }

    /// Apply one admin update in place.
    pub(crate) fn apply(&mut self, update: &ParameterUpdate) {
        match *update {
            ParameterUpdate::VotingPeriod(secs) => self.voting_period_secs = secs,
            ParameterUpdate::CouncilSize(size) => self.council_size = size,
            ParameterUpdate::ChallengeStake(amount) => self.challenge_stake = amount,
            ParameterUpdate::FraudThreshold(threshold) => self.fraud_threshold = threshold,
            ParameterUpdate::KeeperBounty(amount) => self.keeper_bounty = amount,
            ParameterUpdate::ChallengerBountyBps(bps) => self.challenger_bounty_bps = bps,
            ParameterUpdate::RandomnessProvider(provider) => self.randomness_provider = provider,
            ParameterUpdate::RandomnessTimeout(secs) => self.randomness_timeout_secs = secs,
        }
    }
}

impl Default for ArbitrationConfig {
    fn default() -> Self {
        Self {
            council_admin: default_address(),
            engine_account: default_address(),
            randomness_provider: default_address(),
            voting_period_secs: default_voting_period_secs(),
            council_size: default_council_size(),
            challenge_stake: default_challenge_stake(),
            fraud_threshold: default_fraud_threshold(),
            keeper_bounty: default_keeper_bounty(),
            challenger_bounty_bps: default_challenger_bounty_bps(),
            randomness_timeout_secs: default_randomness_timeout_secs(),
            domain_name: default_domain_name(),
            domain_version: default_domain_version(),
        }
    }
}

/// A parameter change requested by the council admin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterUpdate {
    VotingPeriod(u64),
    CouncilSize(u32),
    ChallengeStake(u128),
    FraudThreshold(u64),
    KeeperBounty(u128),
    ChallengerBountyBps(u32),
    RandomnessProvider(Address),
    RandomnessTimeout(u64),
}

impl ParameterUpdate {
    /// Human-readable name of the parameter.
    pub fn name(&self) -> &'static str {
        match self {
            Self::VotingPeriod(_) => "voting_period_secs",
            Self::CouncilSize(_) => "council_size",
            Self::ChallengeStake(_) => "challenge_stake",
            Self::FraudThreshold(_) => "fraud_threshold",
            Self::KeeperBounty(_) => "keeper_bounty",
            Self::ChallengerBountyBps(_) => "challenger_bounty_bps",
            Self::RandomnessProvider(_) => "randomness_provider",
            Self::RandomnessTimeout(_) => "randomness_timeout_secs",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ArbitrationConfig {
        ArbitrationConfig {
            council_admin: Address::new([1u8; 32]),
            engine_account: Address::new([2u8; 32]),
            randomness_provider: Address::new([3u8; 32]),
            ..Default::default()
        }
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = valid();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = ArbitrationConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = ArbitrationConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.council_size, 5);
        assert_eq!(config.challenger_bounty_bps, 1000);
        assert_eq!(config.voting_period_secs, 259_200);
        assert!(config.council_admin.is_zero());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = format!(
            r#"
            council_admin = "{}"
            council_size = 3
            fraud_threshold = 70
        "#,
            Address::new([9u8; 32])
        );
        let config = ArbitrationConfig::from_toml_str(&toml).expect("should parse");
        assert_eq!(config.council_admin, Address::new([9u8; 32]));
        assert_eq!(config.council_size, 3);
        assert_eq!(config.fraud_threshold, 70);
        assert_eq!(config.keeper_bounty, 10); // default
    }

    #[test]
    fn missing_file_returns_config_error() {
        let err = ArbitrationConfig::from_toml_file("/nonexistent/tribunal.toml").unwrap_err();
        assert!(matches!(err, ArbitrationError::InvalidConfig(_)));
    }

    #[test]
    fn validation_rejects_zero_addresses() {
        let err = ArbitrationConfig::default().validate().unwrap_err();
        assert!(matches!(err, ArbitrationError::ZeroAddress("council_admin")));
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn validation_rejects_bad_parameters() {
        let mut config = valid();
        config.council_size = 0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.challenger_bounty_bps = 10_001;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.voting_period_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn keeper_bounty_must_fit_in_the_stake() {
        let mut config = valid();
        config.keeper_bounty = config.challenge_stake;
        assert!(config.validate().is_ok());

        config.keeper_bounty = config.challenge_stake + 1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("keeper_bounty"));

        let mut config = valid();
        config.apply(&ParameterUpdate::ChallengeStake(config.keeper_bounty - 1));
        assert!(config.validate().is_err());
    }

    #[test]
    fn updates_touch_only_their_field() {
        let mut config = valid();
        config.apply(&ParameterUpdate::FraudThreshold(70));
        assert_eq!(config.fraud_threshold, 70);
        assert_eq!(config.council_size, 5);
        assert_eq!(ParameterUpdate::FraudThreshold(70).name(), "fraud_threshold");
    }
}
