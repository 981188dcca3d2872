use std::fmt;

use getset::{CopyGetters, Getters};
use rust_decimal::Decimal;

use super::{calculator, MatchResult, MatchStage};

const BANNER_WIDTH: usize = 40;

#[derive(Debug, Getters, CopyGetters)]
pub struct Report {
    #[getset(get_copy = "pub")]
    total_co2: Decimal,
    #[getset(get_copy = "pub")]
    matched: usize,
    #[getset(get_copy = "pub")]
    unmatched: usize,
    #[getset(get = "pub")]
    results: Vec<MatchResult>,
}

pub fn aggregate(results: Vec<MatchResult>) -> Report {
    let total_co2 = calculator::total(results.iter().map(|result| result.co2));
    let matched = results.iter().filter(|result| result.is_matched()).count();

    Report {
        total_co2,
        matched,
        unmatched: results.len() - matched,
        results,
    }
}

impl Report {
    /// The line with the largest footprint, the earliest one on ties.
    pub fn highest_emitter(&self) -> Option<&MatchResult> {
        self.results.iter().fold(None, |highest, result| match highest {
            Some(highest) if highest.co2 >= result.co2 => Some(highest),
            _ => Some(result),
        })
    }

    pub fn stage_count(&self, stage: MatchStage) -> usize {
        self.results.iter().filter(|result| result.stage == stage).count()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let banner = "=".repeat(BANNER_WIDTH);

        writeln!(f, "{banner}")?;
        writeln!(f, "{:^width$}", "CO2 ACCOUNTING REPORT", width = BANNER_WIDTH)?;
        writeln!(f, "{banner}")?;
        writeln!(f, "Total Carbon Footprint: {:.2} kg CO2", self.total_co2)?;

        if let Some(highest) = self.highest_emitter() {
            writeln!(
                f,
                "Highest Emitting Item:  {} ({:.2} kg)",
                highest.line.description(),
                highest.co2
            )?;
        }

        writeln!(
            f,
            "Matched: {} (exact {}, substring {}, fuzzy {})",
            self.matched,
            self.stage_count(MatchStage::Exact),
            self.stage_count(MatchStage::Substring),
            self.stage_count(MatchStage::Fuzzy)
        )?;

        if self.unmatched > 0 {
            writeln!(
                f,
                "Warning: {} items could not be matched to emission factors.",
                self.unmatched
            )?;
        }

        write!(f, "{banner}")
    }
}
