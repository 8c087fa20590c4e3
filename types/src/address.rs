//! Party address type.
//!
//! Challengers, defendants, jurors, keepers, and the engine's own custody
//! account are all identified by a 32-byte address. Signing parties derive
//! their address from their Ed25519 public key.

use crate::error::TypesError;
use crate::keys::{deserialize_fixed, serialize_fixed, PublicKey};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Domain tag mixed into public-key address derivation.
const ADDRESS_DERIVATION_TAG: &[u8] = b"tribunal/address/v1";

/// A 32-byte party address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 32]);

impl Address {
    /// The null address. Never a valid party.
    pub const ZERO: Self = Self([0u8; 32]);

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive the address controlled by an Ed25519 public key.
    ///
    /// `Blake2b-256(tag || public_key)`, so a signature verified against
    /// `public_key` binds the signer to exactly this address.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let mut hasher = Blake2b::<U32>::new();
        hasher.update(ADDRESS_DERIVATION_TAG);
        hasher.update(public_key.as_bytes());
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_fixed(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_fixed::<D, 32>(deserializer).map(Self)
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex32(s).map(Self)
    }
}

/// Parse a 64-character hex string (optional `0x` prefix) into 32 bytes.
pub(crate) fn parse_hex32(s: &str) -> Result<[u8; 32], TypesError> {
    let trimmed = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(trimmed).map_err(|e| TypesError::InvalidHex(e.to_string()))?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| TypesError::InvalidLength {
            expected: 32,
            got: bytes.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_address_is_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::new([1u8; 32]).is_zero());
    }

    #[test]
    fn derivation_is_deterministic_and_key_specific() {
        let a = Address::from_public_key(&PublicKey([7u8; 32]));
        let b = Address::from_public_key(&PublicKey([7u8; 32]));
        let c = Address::from_public_key(&PublicKey([8u8; 32]));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.is_zero());
    }

    #[test]
    fn display_parses_back() {
        let addr = Address::new([0xAB; 32]);
        let parsed: Address = addr.to_string().parse().unwrap();
        assert_eq!(parsed, addr);
        let prefixed: Address = format!("0x{addr}").parse().unwrap();
        assert_eq!(prefixed, addr);
    }

    #[test]
    fn wrong_length_rejected() {
        let err = "abcd".parse::<Address>().unwrap_err();
        assert_eq!(
            err,
            TypesError::InvalidLength {
                expected: 32,
                got: 2
            }
        );
    }

    #[test]
    fn bad_hex_rejected() {
        assert!(matches!(
            "zz".repeat(32).parse::<Address>(),
            Err(TypesError::InvalidHex(_))
        ));
    }
}
