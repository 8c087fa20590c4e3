//! Off-chain compensation manifests.
//!
//! A payouts file is a JSON array of `{"recipient": "<hex>", "amount": N}`.
//! Building it yields the root to publish plus one proof per recipient.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tribunal_crypto::{compensation_leaf, verify_proof, MerkleProof, MerkleTree};
use tribunal_types::Address;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutEntry {
    pub recipient: Address,
    pub amount: u128,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProofEntry {
    pub recipient: Address,
    pub amount: u128,
    pub leaf: String,
    pub proof: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CompensationManifest {
    pub root: String,
    /// Sum of all amounts; must not exceed the dispute's compensation pool.
    pub total: u128,
    pub leaves: Vec<ProofEntry>,
}

pub fn parse_payouts(json: &str) -> anyhow::Result<Vec<PayoutEntry>> {
    serde_json::from_str(json).context("payouts file must be a JSON array of {recipient, amount}")
}

/// Build the tree and every proof. Each recipient may appear once, since a
/// recipient can only ever claim once per root.
pub fn build_manifest(entries: &[PayoutEntry]) -> anyhow::Result<CompensationManifest> {
    if entries.is_empty() {
        bail!("no payouts given");
    }
    let mut seen = HashSet::new();
    for entry in entries {
        if entry.recipient.is_zero() {
            bail!("zero address cannot receive compensation");
        }
        if !seen.insert(entry.recipient) {
            bail!("recipient {} appears more than once", entry.recipient);
        }
    }

    let payouts: Vec<(Address, u128)> = entries.iter().map(|e| (e.recipient, e.amount)).collect();
    let tree = MerkleTree::from_payouts(&payouts)?;
    let total = entries
        .iter()
        .try_fold(0u128, |acc, e| acc.checked_add(e.amount))
        .context("payout total overflows")?;

    let leaves = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let proof = tree.proof(index)?;
            Ok(ProofEntry {
                recipient: entry.recipient,
                amount: entry.amount,
                leaf: hex::encode(compensation_leaf(&entry.recipient, entry.amount)),
                proof: proof.siblings.iter().map(hex::encode).collect(),
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CompensationManifest {
        root: hex::encode(tree.root()),
        total,
        leaves,
    })
}

/// Parse a 32-byte hash given as hex, with or without `0x`.
pub fn parse_hash(s: &str) -> anyhow::Result<[u8; 32]> {
    let raw = hex::decode(s.trim().trim_start_matches("0x")).context("invalid hex")?;
    raw.as_slice()
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected 32 bytes, got {}", raw.len()))
}

/// Check a claim the way the engine will.
pub fn verify_claim(
    root: &[u8; 32],
    recipient: &Address,
    amount: u128,
    siblings: &[String],
) -> anyhow::Result<bool> {
    let proof = MerkleProof {
        siblings: siblings
            .iter()
            .map(|s| parse_hash(s))
            .collect::<anyhow::Result<Vec<_>>>()?,
    };
    Ok(verify_proof(root, &compensation_leaf(recipient, amount), &proof))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<PayoutEntry> {
        (1..=5u8)
            .map(|b| PayoutEntry {
                recipient: Address::new([b; 32]),
                amount: u128::from(b) * 100,
            })
            .collect()
    }

    #[test]
    fn manifest_proofs_verify() {
        let manifest = build_manifest(&sample()).unwrap();
        let root = parse_hash(&manifest.root).unwrap();
        assert_eq!(manifest.total, 1_500);
        for leaf in &manifest.leaves {
            assert!(verify_claim(&root, &leaf.recipient, leaf.amount, &leaf.proof).unwrap());
            assert!(!verify_claim(&root, &leaf.recipient, leaf.amount + 1, &leaf.proof).unwrap());
        }
    }

    #[test]
    fn duplicate_recipients_are_rejected() {
        let mut entries = sample();
        entries.push(entries[0].clone());
        assert!(build_manifest(&entries).is_err());
        assert!(build_manifest(&[]).is_err());
    }

    #[test]
    fn parses_payouts_json() {
        let json = format!(
            r#"[{{"recipient": "{}", "amount": 250}}]"#,
            Address::new([3u8; 32])
        );
        let entries = parse_payouts(&json).unwrap();
        assert_eq!(entries[0].amount, 250);
        assert_eq!(entries[0].recipient, Address::new([3u8; 32]));
        assert!(parse_payouts("{}").is_err());
    }

    #[test]
    fn hash_parsing() {
        let hex32 = "ab".repeat(32);
        assert_eq!(parse_hash(&hex32).unwrap(), [0xAB; 32]);
        assert_eq!(parse_hash(&format!("0x{hex32}")).unwrap(), [0xAB; 32]);
        assert!(parse_hash("abcd").is_err());
        assert!(parse_hash("zz").is_err());
    }
}
