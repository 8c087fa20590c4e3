use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("cannot build a Merkle tree with no leaves")]
    EmptyTree,

    #[error("leaf index {index} out of range for {leaves} leaves")]
    LeafOutOfRange { index: usize, leaves: usize },
}
