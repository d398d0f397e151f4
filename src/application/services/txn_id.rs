//! Transaction ids for idempotent redactions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TXN_ID_PREFIX: &str = "redact_";

/// Generates `redact_<n>` ids with `n` a random non-negative 63-bit integer.
#[derive(Debug, Clone)]
pub struct TxnIdGenerator {
    rng: StdRng,
}

impl TxnIdGenerator {
    /// Creates a generator seeded from the OS.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a reproducible generator.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns the next transaction id.
    pub fn next_id(&mut self) -> String {
        let n = self.rng.r#gen::<u64>() >> 1;
        format!("{TXN_ID_PREFIX}{n}")
    }
}

impl Default for TxnIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_have_prefix_and_63_bit_value() {
        let mut ids = TxnIdGenerator::from_seed(7);
        for _ in 0..100 {
            let id = ids.next_id();
            let n: u64 = id.strip_prefix(TXN_ID_PREFIX).unwrap().parse().unwrap();
            assert!(n <= i64::MAX as u64);
        }
    }

    #[test]
    fn test_ids_do_not_repeat() {
        let mut ids = TxnIdGenerator::new();
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = TxnIdGenerator::from_seed(42);
        let mut b = TxnIdGenerator::from_seed(42);
        assert_eq!(a.next_id(), b.next_id());
    }
}
