use enum_dispatch::enum_dispatch;
use similar::{DiffTag, TextDiff};

#[enum_dispatch]
pub trait SimilarityScorer {
    /// Returns how alike `a` and `b` are, from 0.0 (nothing shared) to 1.0 (identical).
    fn score(&self, a: &str, b: &str) -> f64;
}

#[enum_dispatch(SimilarityScorer)]
#[derive(Debug, Clone, Copy)]
pub enum Scorer {
    SequenceRatio,
    ExactOnly,
}

impl Default for Scorer {
    fn default() -> Self {
        Scorer::SequenceRatio(SequenceRatio)
    }
}

/// `2 * M / T`, where `M` is the number of characters kept by a minimal
/// character diff between both strings and `T` their combined length.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceRatio;

impl SimilarityScorer for SequenceRatio {
    fn score(&self, a: &str, b: &str) -> f64 {
        let total = a.chars().count() + b.chars().count();
        if total == 0 {
            return 1.0;
        }

        let diff = TextDiff::from_chars(a, b);
        let matched: usize = diff
            .ops()
            .iter()
            .filter_map(|op| match op.as_tag_tuple() {
                (DiffTag::Equal, old, _) => Some(old.len()),
                _ => None,
            })
            .sum();

        (2 * matched) as f64 / total as f64
    }
}

/// Only identical strings score; turns off typo tolerance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactOnly;

impl SimilarityScorer for ExactOnly {
    fn score(&self, a: &str, b: &str) -> f64 {
        if a == b {
            1.0
        } else {
            0.0
        }
    }
}
