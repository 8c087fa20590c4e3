//! Juror selection from randomness words.

use crate::error::ArbitrationError;
use std::collections::HashSet;
use tribunal_types::Address;

/// Draws a fixed-size council from the eligible juror pool.
pub struct JurorSelector;

impl JurorSelector {
    /// Select `council_size` distinct jurors, never the challenger or the
    /// defendant.
    ///
    /// The working list is the pool in its given order, deduplicated, with
    /// both parties removed. A partial Fisher–Yates shuffle then fixes one
    /// position per word: for `i` in `0..council_size`,
    /// `j = i + words[i] % (len - i)` and positions `i` and `j` swap. The
    /// first `council_size` entries are the council. The result depends only
    /// on the pool order and the words.
    pub fn select(
        &self,
        pool: &[Address],
        challenger: &Address,
        defendant: &Address,
        council_size: usize,
        words: &[u64],
    ) -> Result<Vec<Address>, ArbitrationError> {
        let mut seen = HashSet::with_capacity(pool.len());
        let mut working: Vec<Address> = pool
            .iter()
            .filter(|juror| *juror != challenger && *juror != defendant)
            .filter(|juror| seen.insert(**juror))
            .copied()
            .collect();

        if working.len() < council_size {
            return Err(ArbitrationError::NotEnoughVerifiers {
                needed: council_size,
                available: working.len(),
            });
        }
        if words.len() < council_size {
            return Err(ArbitrationError::RandomnessBatchTooShort {
                needed: council_size,
                got: words.len(),
            });
        }

        let len = working.len();
        for (i, word) in words.iter().take(council_size).enumerate() {
            let remaining = (len - i) as u64;
            let j = i + (word % remaining) as usize;
            working.swap(i, j);
        }
        working.truncate(council_size);
        Ok(working)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::new([b; 32])
    }

    fn pool(n: u8) -> Vec<Address> {
        (1..=n).map(addr).collect()
    }

    #[test]
    fn exact_pool_selects_everyone() {
        // five in the pool, two of them are the parties
        let pool = pool(5);
        let (challenger, defendant) = (addr(1), addr(2));

        let council = JurorSelector
            .select(&pool, &challenger, &defendant, 3, &[0, 0, 0])
            .unwrap();
        assert_eq!(council, vec![addr(3), addr(4), addr(5)]);

        let council = JurorSelector
            .select(&pool, &challenger, &defendant, 3, &[2, 1, 0])
            .unwrap();
        assert_eq!(council, vec![addr(5), addr(3), addr(4)]);
    }

    #[test]
    fn same_words_same_council() {
        let pool = pool(20);
        let words = [17, 4_000_000_007, 99, 3, u64::MAX];
        let a = JurorSelector.select(&pool, &addr(1), &addr(2), 5, &words).unwrap();
        let b = JurorSelector.select(&pool, &addr(1), &addr(2), 5, &words).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parties_and_duplicates_are_excluded() {
        let mut pool = pool(6);
        pool.extend([addr(3), addr(3), addr(4)]);
        let council = JurorSelector
            .select(&pool, &addr(1), &addr(2), 4, &[5, 5, 5, 5])
            .unwrap();

        assert_eq!(council.len(), 4);
        assert!(!council.contains(&addr(1)));
        assert!(!council.contains(&addr(2)));
        let unique: HashSet<_> = council.iter().collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn too_few_jurors_after_exclusion() {
        let err = JurorSelector
            .select(&pool(4), &addr(1), &addr(2), 3, &[0, 0, 0])
            .unwrap_err();
        assert!(matches!(
            err,
            ArbitrationError::NotEnoughVerifiers {
                needed: 3,
                available: 2
            }
        ));
    }

    #[test]
    fn short_batch_is_rejected() {
        let err = JurorSelector
            .select(&pool(10), &addr(1), &addr(2), 3, &[0, 0])
            .unwrap_err();
        assert!(matches!(
            err,
            ArbitrationError::RandomnessBatchTooShort { needed: 3, got: 2 }
        ));
    }

    #[test]
    fn extra_words_are_ignored() {
        let pool = pool(10);
        let a = JurorSelector.select(&pool, &addr(1), &addr(2), 2, &[7, 8]).unwrap();
        let b = JurorSelector
            .select(&pool, &addr(1), &addr(2), 2, &[7, 8, 9, 10])
            .unwrap();
        assert_eq!(a, b);
    }
}
