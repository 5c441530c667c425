//! Split policies - partition the bucket space into variant ranges

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::entity::Variant;
use super::validation::ExperimentValidationError;

/// Size of the bucket space; buckets are in `[0, BUCKET_SPACE)`
pub const BUCKET_SPACE: u32 = 10_000;

/// One contiguous range of the bucket space, ending (exclusively) at `upper_bound`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitRange {
    pub upper_bound: u32,
    pub variant: Variant,
}

impl SplitRange {
    pub fn new(upper_bound: u32, variant: Variant) -> Self {
        Self {
            upper_bound,
            variant,
        }
    }
}

/// Ordered list of `(cumulative_upper_bound, variant)` ranges
///
/// A bucket falls into the first range whose upper bound is strictly greater
/// than it, so a bucket equal to a boundary belongs to the next range. A
/// constructed policy always covers the whole bucket space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SplitRange>", into = "Vec<SplitRange>")]
pub struct SplitPolicy {
    ranges: Vec<SplitRange>,
}

impl SplitPolicy {
    /// Build a policy from ordered ranges
    pub fn new(ranges: Vec<SplitRange>) -> Result<Self, ExperimentValidationError> {
        validate_ranges(&ranges)?;
        Ok(Self { ranges })
    }

    /// The two-arm 50/50 baseline: `[0, 5000)` control, `[5000, 10000)` treatment
    pub fn even_split(control: Variant, treatment: Variant) -> Self {
        Self {
            ranges: vec![
                SplitRange::new(BUCKET_SPACE / 2, control),
                SplitRange::new(BUCKET_SPACE, treatment),
            ],
        }
    }

    /// Select the variant for a bucket
    ///
    /// Returns `None` only for buckets outside the bucket space.
    pub fn resolve(&self, bucket: u32) -> Option<&Variant> {
        self.ranges
            .iter()
            .find(|range| bucket < range.upper_bound)
            .map(|range| &range.variant)
    }

    pub fn ranges(&self) -> &[SplitRange] {
        &self.ranges
    }

    pub fn variants(&self) -> impl Iterator<Item = &Variant> {
        self.ranges.iter().map(|range| &range.variant)
    }
}

impl TryFrom<Vec<SplitRange>> for SplitPolicy {
    type Error = ExperimentValidationError;

    fn try_from(ranges: Vec<SplitRange>) -> Result<Self, Self::Error> {
        Self::new(ranges)
    }
}

impl From<SplitPolicy> for Vec<SplitRange> {
    fn from(policy: SplitPolicy) -> Self {
        policy.ranges
    }
}

fn validate_ranges(ranges: &[SplitRange]) -> Result<(), ExperimentValidationError> {
    let last = ranges.last().ok_or(ExperimentValidationError::EmptySplit)?;
    let mut previous: Option<u32> = None;
    let mut seen = HashSet::new();

    for range in ranges {
        if range.upper_bound > BUCKET_SPACE {
            return Err(ExperimentValidationError::BoundaryOutOfRange(
                range.upper_bound,
                BUCKET_SPACE,
            ));
        }

        if let Some(previous) = previous {
            if range.upper_bound <= previous {
                return Err(ExperimentValidationError::NonIncreasingBoundary {
                    previous,
                    current: range.upper_bound,
                });
            }
        }

        if !seen.insert(range.variant.id().as_str()) {
            return Err(ExperimentValidationError::DuplicateVariantId(
                range.variant.id().to_string(),
            ));
        }

        previous = Some(range.upper_bound);
    }

    if last.upper_bound != BUCKET_SPACE {
        return Err(ExperimentValidationError::IncompleteCoverage {
            expected: BUCKET_SPACE,
            actual: last.upper_bound,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::experiment::{VariantConfig, VariantId};

    fn variant(id: &str) -> Variant {
        Variant::new(VariantId::new(id).unwrap(), id, VariantConfig::default())
    }

    fn fifty_fifty() -> SplitPolicy {
        SplitPolicy::even_split(variant("control"), variant("treatment"))
    }

    #[test]
    fn test_even_split_boundary() {
        let policy = fifty_fifty();

        assert_eq!(policy.resolve(0).unwrap().name(), "control");
        assert_eq!(policy.resolve(4999).unwrap().name(), "control");
        assert_eq!(policy.resolve(5000).unwrap().name(), "treatment");
        assert_eq!(policy.resolve(9999).unwrap().name(), "treatment");
    }

    #[test]
    fn test_even_split_passes_validation() {
        let policy = fifty_fifty();
        assert!(SplitPolicy::new(policy.ranges().to_vec()).is_ok());
    }

    #[test]
    fn test_out_of_space_bucket_resolves_to_none() {
        assert!(fifty_fifty().resolve(BUCKET_SPACE).is_none());
    }

    #[test]
    fn test_three_way_split() {
        let policy = SplitPolicy::new(vec![
            SplitRange::new(2000, variant("a")),
            SplitRange::new(7000, variant("b")),
            SplitRange::new(10_000, variant("c")),
        ])
        .unwrap();

        assert_eq!(policy.resolve(1999).unwrap().name(), "a");
        assert_eq!(policy.resolve(2000).unwrap().name(), "b");
        assert_eq!(policy.resolve(6999).unwrap().name(), "b");
        assert_eq!(policy.resolve(7000).unwrap().name(), "c");
        assert_eq!(policy.variants().count(), 3);
    }

    #[test]
    fn test_empty_split_rejected() {
        assert_eq!(
            SplitPolicy::new(vec![]),
            Err(ExperimentValidationError::EmptySplit)
        );
    }

    #[test]
    fn test_non_increasing_rejected() {
        let result = SplitPolicy::new(vec![
            SplitRange::new(5000, variant("a")),
            SplitRange::new(5000, variant("b")),
            SplitRange::new(10_000, variant("c")),
        ]);

        assert_eq!(
            result,
            Err(ExperimentValidationError::NonIncreasingBoundary {
                previous: 5000,
                current: 5000
            })
        );
    }

    #[test]
    fn test_incomplete_coverage_rejected() {
        let result = SplitPolicy::new(vec![
            SplitRange::new(5000, variant("a")),
            SplitRange::new(9000, variant("b")),
        ]);

        assert_eq!(
            result,
            Err(ExperimentValidationError::IncompleteCoverage {
                expected: 10_000,
                actual: 9000
            })
        );
    }

    #[test]
    fn test_boundary_beyond_space_rejected() {
        let result = SplitPolicy::new(vec![SplitRange::new(10_001, variant("a"))]);

        assert_eq!(
            result,
            Err(ExperimentValidationError::BoundaryOutOfRange(10_001, 10_000))
        );
    }

    #[test]
    fn test_duplicate_variant_rejected() {
        let result = SplitPolicy::new(vec![
            SplitRange::new(5000, variant("a")),
            SplitRange::new(10_000, variant("a")),
        ]);

        assert_eq!(
            result,
            Err(ExperimentValidationError::DuplicateVariantId("a".to_string()))
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let invalid = serde_json::json!([
            {"upper_bound": 6000, "variant": {"id": "a", "name": "a"}},
            {"upper_bound": 3000, "variant": {"id": "b", "name": "b"}}
        ]);

        assert!(serde_json::from_value::<SplitPolicy>(invalid).is_err());
    }
}
