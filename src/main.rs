use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use env_logger::Env;
use log::info;

use co2matcher::data;
use co2matcher::emissions::index::KeywordIndex;
use co2matcher::emissions::resolver::{MatchResolver, DEFAULT_THRESHOLD};
use co2matcher::emissions::similarity::{ExactOnly, Scorer, SequenceRatio};
use co2matcher::emissions::assess;

/// Assigns a CO2 emission factor to every invoice line item.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Emission factor table (category, factor_kg_co2_per_unit, aliases)
    #[arg(long, default_value = "emission_factors.csv")]
    factors: PathBuf,

    /// Invoice line items (item_description, quantity)
    #[arg(long, default_value = "invoices.csv")]
    invoices: PathBuf,

    #[arg(short, long, default_value = "invoice_with_co2_results.csv")]
    output: PathBuf,

    /// Minimum similarity for typo-tolerant word matching
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Only match exact keywords and substrings
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let factors = data::load_factors(&args.factors)?;
    let lines = data::load_invoice_lines(&args.invoices)?;
    if factors.is_empty() || lines.is_empty() {
        bail!("one or more input files were empty or invalid");
    }

    let scorer = if args.strict {
        Scorer::from(ExactOnly)
    } else {
        Scorer::from(SequenceRatio)
    };
    let resolver = MatchResolver::new(scorer, args.threshold)?;
    let index = KeywordIndex::build(factors);

    info!("matching {} invoice lines against {} keywords", lines.len(), index.len());
    let report = assess(lines, &index, &resolver);

    println!("{report}");
    data::export_results_file(&report, &args.output)?;

    Ok(())
}
