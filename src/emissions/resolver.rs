use thiserror::Error;

use super::factor::EmissionFactorRecord;
use super::index::{normalize, KeywordIndex};
use super::similarity::{Scorer, SimilarityScorer};
use super::MatchStage;

pub const DEFAULT_THRESHOLD: f64 = 0.70;

#[derive(Debug, PartialEq, Error)]
pub enum ResolverError {
    #[error("similarity threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),
}

/// Outcome of resolving one description against a [`KeywordIndex`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution<'a> {
    pub record: Option<&'a EmissionFactorRecord>,
    pub keyword: Option<&'a str>,
    pub stage: MatchStage,
}

impl<'a> Resolution<'a> {
    fn matched(keyword: &'a str, record: &'a EmissionFactorRecord, stage: MatchStage) -> Resolution<'a> {
        Resolution {
            record: Some(record),
            keyword: Some(keyword),
            stage,
        }
    }

    pub fn unmatched() -> Resolution<'a> {
        Resolution {
            record: None,
            keyword: None,
            stage: MatchStage::None,
        }
    }
}

#[derive(Debug)]
pub struct MatchResolver<S = Scorer> {
    scorer: S,
    threshold: f64,
}

impl Default for MatchResolver {
    fn default() -> Self {
        MatchResolver {
            scorer: Scorer::default(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl<S: SimilarityScorer> MatchResolver<S> {
    pub fn new(scorer: S, threshold: f64) -> Result<MatchResolver<S>, ResolverError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ResolverError::InvalidThreshold(threshold));
        }

        Ok(MatchResolver { scorer, threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Resolves a raw description in four stages, stopping at the first hit:
    /// normalization, exact key lookup, longest contained key, then the first
    /// whitespace token whose closest key clears the similarity threshold.
    ///
    /// Never fails. A description with nothing alphanumeric in it, or one
    /// that no stage can place, resolves to [`MatchStage::None`].
    pub fn resolve<'a>(&self, description: &str, index: &'a KeywordIndex) -> Resolution<'a> {
        let description = normalize(description);
        if !description.chars().any(char::is_alphanumeric) {
            return Resolution::unmatched();
        }

        if let Some((keyword, record)) = index.get(&description) {
            return Resolution::matched(keyword, record, MatchStage::Exact);
        }

        if let Some((keyword, record)) = longest_contained_key(&description, index) {
            return Resolution::matched(keyword, record, MatchStage::Substring);
        }

        if let Some((keyword, record)) = self.first_close_token(&description, index) {
            return Resolution::matched(keyword, record, MatchStage::Fuzzy);
        }

        Resolution::unmatched()
    }

    // Tokens are tried in order; the first one with a key at or above the
    // threshold wins even if a later token would score higher.
    fn first_close_token<'a>(
        &self,
        description: &str,
        index: &'a KeywordIndex,
    ) -> Option<(&'a str, &'a EmissionFactorRecord)> {
        description.split_whitespace().find_map(|token| {
            let mut best: Option<(f64, &'a str, &'a EmissionFactorRecord)> = None;

            for (keyword, record) in index.iter() {
                let score = self.scorer.score(token, keyword);
                if score < self.threshold {
                    continue;
                }

                match best {
                    Some((best_score, _, _)) if best_score >= score => {},
                    _ => best = Some((score, keyword, record)),
                }
            }

            best.map(|(_, keyword, record)| (keyword, record))
        })
    }
}

// Longest key wins so "engine oil" is not shadowed by "oil"; on equal length
// the key seen first in the index is kept.
fn longest_contained_key<'a>(description: &str, index: &'a KeywordIndex) -> Option<(&'a str, &'a EmissionFactorRecord)> {
    let mut longest: Option<(usize, &'a str, &'a EmissionFactorRecord)> = None;

    for (keyword, record) in index.iter() {
        if !description.contains(keyword) {
            continue;
        }

        let length = keyword.chars().count();
        match longest {
            Some((longest_length, _, _)) if longest_length >= length => {},
            _ => longest = Some((length, keyword, record)),
        }
    }

    longest.map(|(_, keyword, record)| (keyword, record))
}
