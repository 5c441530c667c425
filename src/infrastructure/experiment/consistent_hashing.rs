//! Consistent hashing for experiment bucketing
//!
//! Ensures the same unit always lands in the same bucket for a given
//! experiment, without storing any assignment.

use md5::{Digest, Md5};

use crate::domain::experiment::BUCKET_SPACE;

/// Consistent hasher for experiment assignments
#[derive(Debug, Clone, Copy)]
pub struct ConsistentHasher;

impl ConsistentHasher {
    /// Compute the bucket (0-9999) for an experiment name and unit id
    ///
    /// The bucket is `MD5("{experiment_name}:{unit_id}")`, read as a 128-bit
    /// big-endian unsigned integer, modulo 10000. The derivation is bit-exact
    /// so other implementations of the service agree on every bucket.
    pub fn bucket(experiment_name: &str, unit_id: &str) -> u32 {
        let mut hasher = Md5::new();
        hasher.update(experiment_name.as_bytes());
        hasher.update(b":");
        hasher.update(unit_id.as_bytes());

        let mut digest = [0u8; 16];
        digest.copy_from_slice(&hasher.finalize());

        (u128::from_be_bytes(digest) % u128::from(BUCKET_SPACE)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_golden_value() {
        // MD5("test_exp:user-123") = 51c42c326feafd70ca1b3b07810a6ee1
        assert_eq!(ConsistentHasher::bucket("test_exp", "user-123"), 4705);
    }

    #[test]
    fn test_known_values() {
        assert_eq!(ConsistentHasher::bucket("test_exp", "user-456"), 4288);
        assert_eq!(ConsistentHasher::bucket("planner_policy_exp", "user-123"), 7962);
    }

    #[test]
    fn test_empty_inputs_are_valid() {
        assert_eq!(ConsistentHasher::bucket("", ""), 9559);
        assert_eq!(ConsistentHasher::bucket("exp", ""), 9759);
    }

    #[test]
    fn test_separator_is_part_of_the_key() {
        // "a:b" + ":" + "c" and "a" + ":" + "b:c" hash the same bytes
        assert_eq!(
            ConsistentHasher::bucket("a:b", "c"),
            ConsistentHasher::bucket("a", "b:c")
        );
    }

    #[test]
    fn test_consistent_hash_same_input() {
        let bucket1 = ConsistentHasher::bucket("test_exp", "user-123");
        let bucket2 = ConsistentHasher::bucket("test_exp", "user-123");
        assert_eq!(bucket1, bucket2, "Same inputs should produce same bucket");
    }

    #[test]
    fn test_determinism_across_calls() {
        let unit_id = "household-8812";
        let experiment = "pricing-experiment-v2";

        let first = ConsistentHasher::bucket(experiment, unit_id);

        for _ in 0..100 {
            assert_eq!(ConsistentHasher::bucket(experiment, unit_id), first);
        }
    }

    #[test]
    fn test_range() {
        for i in 0..2000 {
            let bucket = ConsistentHasher::bucket(&format!("exp-{}", i % 7), &format!("unit-{}", i));
            assert!(bucket < BUCKET_SPACE);
        }
    }

    #[test]
    fn test_utf8_inputs() {
        let bucket = ConsistentHasher::bucket("expérience", "utilisateur-é");
        assert!(bucket < BUCKET_SPACE);
        assert_eq!(bucket, ConsistentHasher::bucket("expérience", "utilisateur-é"));
    }

    #[test]
    fn test_bucket_distribution() {
        let mut deciles = [0u32; 10];

        for i in 0..10_000 {
            let bucket = ConsistentHasher::bucket("ab-test", &format!("user-{}", i));
            deciles[(bucket / 1000) as usize] += 1;
        }

        for count in deciles {
            assert!(count > 850, "Decile has too few units: {}", count);
            assert!(count < 1150, "Decile has too many units: {}", count);
        }
    }
}
