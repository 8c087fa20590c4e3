//! Ed25519 key generation.

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use tribunal_types::{KeyPair, PrivateKey, PublicKey};

/// Generate a new Ed25519 key pair from the OS random source.
pub fn generate_keypair() -> KeyPair {
    let signing_key = SigningKey::generate(&mut OsRng);
    KeyPair {
        public: PublicKey(signing_key.verifying_key().to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}

/// Derive the public key from a private key.
pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    PublicKey(SigningKey::from_bytes(&private.0).verifying_key().to_bytes())
}

/// Derive a key pair from a 32-byte seed (deterministic; used by tests and tooling).
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    let private = PrivateKey(*seed);
    KeyPair {
        public: public_from_private(&private),
        private,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_pairs_are_deterministic() {
        let a = keypair_from_seed(&[42u8; 32]);
        let b = keypair_from_seed(&[42u8; 32]);
        assert_eq!(a.public, b.public);
        assert_ne!(a.public, keypair_from_seed(&[43u8; 32]).public);
    }

    #[test]
    fn public_matches_private() {
        let kp = generate_keypair();
        assert_eq!(public_from_private(&kp.private), kp.public);
    }
}
