//! Post-fetch filter pipeline.
//!
//! Runs strictly after retrieval. Bounds compose by logical AND and omitted
//! bounds are no-ops. Unknown seed counts, and the `"-"` size sentinel, fail
//! any bound that was explicitly requested; nothing here ever errors.

use crate::normalize::{CanonicalResult, parse_size};
use crate::provider::NOT_PROVIDED;

/// Range predicates plus a result-count cap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterBounds {
    pub min_seeds: Option<u64>,
    pub max_seeds: Option<u64>,
    /// Bytes
    pub min_size: Option<f64>,
    /// Bytes
    pub max_size: Option<f64>,
    /// Keep at most this many results, in received order
    pub limit: Option<usize>,
}

impl FilterBounds {
    /// Sets the minimum size from text such as `"500MB"`.
    pub fn with_min_size_text(mut self, text: &str) -> Self {
        self.min_size = Some(parse_size(text));
        self
    }

    /// Sets the maximum size from text such as `"4GB"`.
    pub fn with_max_size_text(mut self, text: &str) -> Self {
        self.max_size = Some(parse_size(text));
        self
    }

    fn has_seed_bound(&self) -> bool {
        self.min_seeds.is_some() || self.max_seeds.is_some()
    }

    fn has_size_bound(&self) -> bool {
        self.min_size.is_some() || self.max_size.is_some()
    }

    /// True when no predicate and no limit is set.
    pub fn is_unbounded(&self) -> bool {
        !self.has_seed_bound() && !self.has_size_bound() && self.limit.is_none()
    }

    fn admits(&self, result: &CanonicalResult) -> bool {
        self.admits_seeds(&result.raw.seeds_text) && self.admits_size(result)
    }

    fn admits_seeds(&self, seeds_text: &str) -> bool {
        if !self.has_seed_bound() {
            return true;
        }

        let Some(seeds) = parse_seeds(seeds_text) else {
            return false;
        };

        self.min_seeds.is_none_or(|min| seeds >= min)
            && self.max_seeds.is_none_or(|max| seeds <= max)
    }

    fn admits_size(&self, result: &CanonicalResult) -> bool {
        if !self.has_size_bound() {
            return true;
        }

        if result.raw.size_text.trim() == NOT_PROVIDED {
            return false;
        }

        let size = result.size_bytes;
        self.min_size.is_none_or(|min| size >= min)
            && self.max_size.is_none_or(|max| size <= max)
    }
}

/// A seeds column counts only when it is a plain non-negative integer.
fn parse_seeds(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Applies `bounds` to `results`, preserving input order.
///
/// Pure: the same input and bounds always yield the same output, so applying
/// it twice is the same as applying it once.
pub fn filter(results: &[CanonicalResult], bounds: &FilterBounds) -> Vec<CanonicalResult> {
    let admitted = results.iter().filter(|result| bounds.admits(result)).cloned();

    match bounds.limit {
        Some(limit) => admitted.take(limit).collect(),
        None => admitted.collect(),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::normalize::normalize;
    use crate::provider::RawResult;

    fn result(name: &str, size: &str, seeds: &str) -> CanonicalResult {
        normalize(
            RawResult::new("Site", name)
                .with_size(size)
                .with_peers(seeds, "0"),
        )
    }

    fn names(results: &[CanonicalResult]) -> Vec<&str> {
        results.iter().map(|r| r.raw.name.as_str()).collect()
    }

    #[test]
    fn test_unknown_seeds_fail_explicit_bound() {
        let results = vec![
            result("dash", "1 GB", "-"),
            result("text", "1 GB", "abc"),
            result("many", "1 GB", "15"),
            result("few", "1 GB", "5"),
        ];
        let bounds = FilterBounds {
            min_seeds: Some(10),
            ..Default::default()
        };

        assert_eq!(names(&filter(&results, &bounds)), vec!["many"]);
    }

    #[test]
    fn test_unknown_seeds_pass_without_bound() {
        let results = vec![result("dash", "1 GB", "-"), result("text", "1 GB", "abc")];
        assert_eq!(filter(&results, &FilterBounds::default()), results);
    }

    #[test]
    fn test_max_seeds_also_excludes_unknown() {
        let results = vec![
            result("dash", "1 GB", "-"),
            result("zero", "1 GB", "0"),
            result("many", "1 GB", "200"),
        ];
        let bounds = FilterBounds {
            max_seeds: Some(100),
            ..Default::default()
        };

        assert_eq!(names(&filter(&results, &bounds)), vec!["zero"]);
    }

    #[test]
    fn test_signed_or_padded_seeds_are_unknown() {
        let results = vec![result("plus", "1 GB", "+20"), result("padded", "1 GB", " 20")];
        let bounds = FilterBounds {
            min_seeds: Some(1),
            ..Default::default()
        };

        assert!(filter(&results, &bounds).is_empty());
    }

    #[test]
    fn test_size_bounds() {
        let results = vec![
            result("small", "200 MB", "1"),
            result("medium", "1.2 GB", "1"),
            result("large", "8 GB", "1"),
        ];
        let bounds = FilterBounds::default()
            .with_min_size_text("500MB")
            .with_max_size_text("4GB");

        assert_eq!(names(&filter(&results, &bounds)), vec!["medium"]);
    }

    #[test]
    fn test_unparsable_size_is_zero_bytes() {
        let results = vec![result("garbage", "unknown", "1")];

        let min = FilterBounds::default().with_min_size_text("1 KB");
        assert!(filter(&results, &min).is_empty());

        let max = FilterBounds::default().with_max_size_text("1 KB");
        assert_eq!(names(&filter(&results, &max)), vec!["garbage"]);
    }

    #[test]
    fn test_size_sentinel_fails_any_size_bound() {
        let results = vec![result("dash", "-", "1")];

        let max = FilterBounds::default().with_max_size_text("10 GB");
        assert!(filter(&results, &max).is_empty());
        assert_eq!(filter(&results, &FilterBounds::default()).len(), 1);
    }

    #[test]
    fn test_limit_keeps_first_entries_in_order() {
        let results: Vec<_> = (0..12)
            .map(|i| result(&format!("r{i}"), "1 GB", "1"))
            .collect();
        let bounds = FilterBounds {
            limit: Some(5),
            ..Default::default()
        };

        assert_eq!(
            names(&filter(&results, &bounds)),
            vec!["r0", "r1", "r2", "r3", "r4"]
        );
    }

    #[test]
    fn test_zero_limit_is_empty() {
        let results = vec![result("one", "1 GB", "1")];
        let bounds = FilterBounds {
            limit: Some(0),
            ..Default::default()
        };
        assert!(filter(&results, &bounds).is_empty());
    }

    fn arb_result() -> impl Strategy<Value = CanonicalResult> {
        (
            "[a-z]{1,8}",
            prop_oneof![
                Just("-".to_string()),
                Just("garbage".to_string()),
                (0u32..5000).prop_map(|n| format!("{n} MB")),
            ],
            prop_oneof![
                Just("-".to_string()),
                Just("n/a".to_string()),
                (0u64..500).prop_map(|n| n.to_string()),
            ],
        )
            .prop_map(|(name, size, seeds)| result(&name, &size, &seeds))
    }

    fn arb_bounds() -> impl Strategy<Value = FilterBounds> {
        (
            proptest::option::of(0u64..300),
            proptest::option::of(0u64..300),
            proptest::option::of(0f64..4096.0 * 1024.0 * 1024.0),
            proptest::option::of(0f64..4096.0 * 1024.0 * 1024.0),
            proptest::option::of(0usize..20),
        )
            .prop_map(|(min_seeds, max_seeds, min_size, max_size, limit)| FilterBounds {
                min_seeds,
                max_seeds,
                min_size,
                max_size,
                limit,
            })
    }

    proptest! {
        #[test]
        fn prop_filter_is_idempotent(
            results in proptest::collection::vec(arb_result(), 0..30),
            bounds in arb_bounds(),
        ) {
            let once = filter(&results, &bounds);
            let twice = filter(&once, &bounds);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_limit_is_prefix_of_unlimited(
            results in proptest::collection::vec(arb_result(), 0..30),
            bounds in arb_bounds(),
        ) {
            let unlimited = FilterBounds { limit: None, ..bounds.clone() };
            let full = filter(&results, &unlimited);
            let limited = filter(&results, &bounds);

            prop_assert!(limited.len() <= full.len());
            prop_assert_eq!(&full[..limited.len()], &limited[..]);
        }
    }
}
