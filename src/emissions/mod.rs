use getset::{CopyGetters, Getters};
use log::debug;
use rust_decimal::Decimal;
use serde::Serialize;

pub mod calculator;
pub mod factor;
pub mod index;
pub mod report;
pub mod resolver;
pub mod similarity;


use factor::EmissionFactorRecord;
use index::KeywordIndex;
use report::Report;
use resolver::{MatchResolver, Resolution};
use similarity::SimilarityScorer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStage {
    Exact,
    Substring,
    Fuzzy,
    None,
}

#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct InvoiceLine {
    #[getset(get = "pub")]
    description: String,
    #[getset(get_copy = "pub")]
    quantity: Decimal,
}

impl InvoiceLine {
    pub fn new(description: impl Into<String>, quantity: Decimal) -> InvoiceLine {
        InvoiceLine {
            description: description.into(),
            quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct MatchResult {
    #[getset(get = "pub")]
    line: InvoiceLine,
    #[getset(get = "pub")]
    matched_record: Option<EmissionFactorRecord>,
    #[getset(get = "pub")]
    keyword: Option<String>,
    #[getset(get_copy = "pub")]
    stage: MatchStage,
    #[getset(get_copy = "pub")]
    co2: Decimal,
}

impl MatchResult {
    pub fn new(line: InvoiceLine, resolution: &Resolution<'_>, co2: Decimal) -> MatchResult {
        MatchResult {
            line,
            matched_record: resolution.record.cloned(),
            keyword: resolution.keyword.map(String::from),
            stage: resolution.stage,
            co2,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.stage != MatchStage::None
    }
}

/// Resolves, prices and aggregates every line, keeping input order.
pub fn assess<S: SimilarityScorer>(
    lines: impl IntoIterator<Item = InvoiceLine>,
    index: &KeywordIndex,
    resolver: &MatchResolver<S>,
) -> Report {
    let results = lines
        .into_iter()
        .map(|line| {
            let resolution = resolver.resolve(line.description(), index);
            let co2 = calculator::compute(line.quantity(), resolution.record);
            debug!(
                "resolved {:?} as {:?} via {:?}, co2={}",
                line.description(),
                resolution.stage,
                resolution.keyword,
                co2
            );

            MatchResult::new(line, &resolution, co2)
        })
        .collect();

    report::aggregate(results)
}
