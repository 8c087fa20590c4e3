//! Challenger identity binding.
//!
//! A challenger is never named directly: they sign `(claim, defendant)` under
//! a domain separator, and the engine derives their address from the key
//! that verifies. The domain separator commits to the chain, so an
//! authorisation made for one chain is useless on any other.

use serde::{Deserialize, Serialize};
use tribunal_crypto::{blake2b_256, blake2b_256_multi, sign_message, verify_signature};
use tribunal_types::{Address, ChainId, ClaimId, KeyPair, PublicKey, Signature};

use crate::error::ArbitrationError;

const DOMAIN_TAG: &[u8] = b"tribunal/domain/v1";
const CHALLENGE_TAG: &[u8] = b"tribunal/challenge/v1";

/// A signed request to challenge a claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeAuthorization {
    pub public_key: PublicKey,
    pub signature: Signature,
}

/// Signing domain for challenge authorisations.
///
/// The separator for the chain seen at construction is cached; any other
/// chain gets a freshly computed value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainSeparator {
    name: String,
    version: String,
    verifying_account: Address,
    cached: [u8; 32],
    cached_chain: ChainId,
}

impl DomainSeparator {
    pub fn new(name: &str, version: &str, verifying_account: Address, chain: ChainId) -> Self {
        let cached = compute(name, version, chain, &verifying_account);
        Self {
            name: name.to_string(),
            version: version.to_string(),
            verifying_account,
            cached,
            cached_chain: chain,
        }
    }

    /// The separator in effect on `chain`.
    pub fn for_chain(&self, chain: ChainId) -> [u8; 32] {
        if chain == self.cached_chain {
            self.cached
        } else {
            compute(&self.name, &self.version, chain, &self.verifying_account)
        }
    }

    /// Re-pin the cache to `chain` if it changed. Returns whether it did.
    pub fn refresh(&mut self, chain: ChainId) -> bool {
        if chain == self.cached_chain {
            return false;
        }
        self.cached = compute(&self.name, &self.version, chain, &self.verifying_account);
        self.cached_chain = chain;
        true
    }

    pub fn cached_chain(&self) -> ChainId {
        self.cached_chain
    }
}

fn compute(name: &str, version: &str, chain: ChainId, verifying_account: &Address) -> [u8; 32] {
    blake2b_256_multi(&[
        DOMAIN_TAG,
        &blake2b_256(name.as_bytes()),
        &blake2b_256(version.as_bytes()),
        &chain.to_be_bytes(),
        verifying_account.as_bytes(),
    ])
}

/// The message a challenger signs.
pub fn challenge_digest(domain: &[u8; 32], claim: &ClaimId, defendant: &Address) -> [u8; 32] {
    blake2b_256_multi(&[CHALLENGE_TAG, domain, claim.as_bytes(), defendant.as_bytes()])
}

/// Produce an authorisation for challenging `claim` against `defendant`.
pub fn sign_challenge(
    domain: &[u8; 32],
    claim: &ClaimId,
    defendant: &Address,
    keypair: &KeyPair,
) -> ChallengeAuthorization {
    let digest = challenge_digest(domain, claim, defendant);
    ChallengeAuthorization {
        public_key: keypair.public.clone(),
        signature: sign_message(&digest, &keypair.private),
    }
}

/// Recover the challenger address bound by `auth`.
pub fn recover_challenger(
    domain: &[u8; 32],
    claim: &ClaimId,
    defendant: &Address,
    auth: &ChallengeAuthorization,
) -> Result<Address, ArbitrationError> {
    let digest = challenge_digest(domain, claim, defendant);
    if !verify_signature(&digest, &auth.signature, &auth.public_key) {
        return Err(ArbitrationError::InvalidSignature);
    }
    Ok(Address::from_public_key(&auth.public_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tribunal_crypto::keypair_from_seed;

    fn domain() -> DomainSeparator {
        DomainSeparator::new("ImpactArbitration", "1", Address::new([7u8; 32]), ChainId(1))
    }

    #[test]
    fn recovered_address_matches_signer() {
        let kp = keypair_from_seed(&[1u8; 32]);
        let sep = domain().for_chain(ChainId(1));
        let claim = ClaimId::new([5u8; 32]);
        let defendant = Address::new([6u8; 32]);

        let auth = sign_challenge(&sep, &claim, &defendant, &kp);
        let who = recover_challenger(&sep, &claim, &defendant, &auth).unwrap();
        assert_eq!(who, Address::from_public_key(&kp.public));
    }

    #[test]
    fn signature_is_bound_to_claim_and_defendant() {
        let kp = keypair_from_seed(&[1u8; 32]);
        let sep = domain().for_chain(ChainId(1));
        let claim = ClaimId::new([5u8; 32]);
        let defendant = Address::new([6u8; 32]);
        let auth = sign_challenge(&sep, &claim, &defendant, &kp);

        let other_claim = ClaimId::new([9u8; 32]);
        assert!(matches!(
            recover_challenger(&sep, &other_claim, &defendant, &auth),
            Err(ArbitrationError::InvalidSignature)
        ));
        let other_defendant = Address::new([8u8; 32]);
        assert!(recover_challenger(&sep, &claim, &other_defendant, &auth).is_err());
    }

    #[test]
    fn authorisation_does_not_replay_across_chains() {
        let kp = keypair_from_seed(&[2u8; 32]);
        let d = domain();
        let claim = ClaimId::new([5u8; 32]);
        let defendant = Address::new([6u8; 32]);
        let auth = sign_challenge(&d.for_chain(ChainId(1)), &claim, &defendant, &kp);

        assert!(recover_challenger(&d.for_chain(ChainId(2)), &claim, &defendant, &auth).is_err());
    }

    #[test]
    fn separator_is_pure_over_chain() {
        let d = domain();
        assert_eq!(d.for_chain(ChainId(2)), d.for_chain(ChainId(2)));
        assert_ne!(d.for_chain(ChainId(1)), d.for_chain(ChainId(2)));

        let mut refreshed = d.clone();
        assert!(refreshed.refresh(ChainId(2)));
        assert!(!refreshed.refresh(ChainId(2)));
        assert_eq!(refreshed.for_chain(ChainId(2)), d.for_chain(ChainId(2)));
        assert_eq!(refreshed.cached_chain(), ChainId(2));
    }

    #[test]
    fn separator_depends_on_name_and_account() {
        let a = DomainSeparator::new("A", "1", Address::new([7u8; 32]), ChainId(1));
        let b = DomainSeparator::new("B", "1", Address::new([7u8; 32]), ChainId(1));
        let c = DomainSeparator::new("A", "1", Address::new([8u8; 32]), ChainId(1));
        assert_ne!(a.for_chain(ChainId(1)), b.for_chain(ChainId(1)));
        assert_ne!(a.for_chain(ChainId(1)), c.for_chain(ChainId(1)));
    }
}
