use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::emissions::factor::EmissionFactorRecord;
use crate::emissions::report::Report;
use crate::emissions::{InvoiceLine, MatchResult, MatchStage};

const ALIAS_SEPARATOR: char = ';';
const UNMATCHED_CATEGORY: &str = "unmatched";

#[derive(Debug, Error)]
pub enum FactorDataError {
    #[error("category must not be empty")]
    EmptyCategory,
    #[error("emission factor must not be negative, got {0}")]
    NegativeFactor(Decimal),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("the file '{}' was not found, please check the path", .0.display())]
    FileNotFound(PathBuf),
    #[error("input has no header row")]
    EmptyInput,
}

#[derive(Debug, Deserialize)]
pub struct FactorRecord {
    pub category: String,
    #[serde(rename = "factor_kg_co2_per_unit", with = "rust_decimal::serde::str")]
    pub factor: Decimal,
    #[serde(default)] // Missing column or empty field means no aliases
    pub aliases: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InvoiceRecord {
    #[serde(rename = "item_description", default = "unknown_description")]
    pub description: String,
    #[serde(default)] // Parsed leniently below, a single unit when absent or unreadable
    pub quantity: Option<String>,
}

fn unknown_description() -> String {
    "Unknown".to_string()
}

#[derive(Debug, Serialize)]
pub struct ResultRecord<'a> {
    pub item_description: &'a str,
    pub quantity: Decimal,
    pub matched_category: &'a str,
    pub matched_keyword: &'a str,
    pub match_stage: MatchStage,
    pub matched_factor: Decimal,
    pub total_line_co2: Decimal,
}

impl TryFrom<FactorRecord> for EmissionFactorRecord {
    type Error = FactorDataError;

    fn try_from(row: FactorRecord) -> Result<Self, Self::Error> {
        if row.category.trim().is_empty() {
            return Err(FactorDataError::EmptyCategory);
        }

        if row.factor < Decimal::ZERO {
            return Err(FactorDataError::NegativeFactor(row.factor));
        }

        let aliases = row
            .aliases
            .as_deref()
            .unwrap_or_default()
            .split(ALIAS_SEPARATOR)
            .map(str::trim)
            .filter(|alias| !alias.is_empty())
            .map(String::from)
            .collect::<Vec<_>>();

        Ok(EmissionFactorRecord::new(row.category, row.factor).with_aliases(aliases))
    }
}

impl From<InvoiceRecord> for InvoiceLine {
    fn from(row: InvoiceRecord) -> Self {
        let quantity = parse_quantity(&row.description, row.quantity.as_deref());
        InvoiceLine::new(row.description, quantity)
    }
}

fn parse_quantity(description: &str, quantity: Option<&str>) -> Decimal {
    let Some(quantity) = quantity else {
        return Decimal::ONE;
    };

    Decimal::from_str(quantity)
        .or_else(|_| Decimal::from_scientific(quantity))
        .unwrap_or_else(|err| {
            warn!(
                "invalid quantity {:?} for {:?}, defaulting to 1, err={}",
                quantity, description, err
            );
            Decimal::ONE
        })
}

impl<'a> From<&'a MatchResult> for ResultRecord<'a> {
    fn from(result: &'a MatchResult) -> Self {
        let record = result.matched_record().as_ref();

        ResultRecord {
            item_description: result.line().description(),
            quantity: result.line().quantity(),
            matched_category: record.map_or(UNMATCHED_CATEGORY, |record| record.category().as_str()),
            matched_keyword: result.keyword().as_deref().unwrap_or_default(),
            match_stage: result.stage(),
            matched_factor: record.map_or(Decimal::ZERO, |record| record.factor()),
            total_line_co2: result.co2(),
        }
    }
}

fn csv_reader<R: io::Read>(reader: R) -> Result<csv::Reader<R>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    if csv_reader.headers()?.is_empty() {
        return Err(LoadError::EmptyInput.into());
    }

    Ok(csv_reader)
}

fn open(path: &Path) -> Result<File> {
    if !path.exists() {
        return Err(LoadError::FileNotFound(path.to_path_buf()).into());
    }

    Ok(File::open(path)?)
}

/// Reads the emission factor table. Invalid rows are logged and skipped.
pub fn read_factors<R: io::Read>(reader: R) -> Result<Vec<EmissionFactorRecord>> {
    let mut csv_reader = csv_reader(reader)?;
    let mut factors = Vec::new();

    for record in csv_reader.deserialize::<FactorRecord>() {
        match record {
            Ok(row) => match EmissionFactorRecord::try_from(row) {
                Ok(factor) => factors.push(factor),
                Err(err) => warn!("invalid emission factor, err={}", err),
            },
            Err(err) => warn!("failed to deserialize emission factor, err={}", err),
        }
    }

    debug!("read {} emission factors", factors.len());

    Ok(factors)
}

/// Reads invoice line items, one per row. An unreadable quantity counts as one unit.
pub fn read_invoice_lines<R: io::Read>(reader: R) -> Result<Vec<InvoiceLine>> {
    let mut csv_reader = csv_reader(reader)?;
    let mut lines: Vec<InvoiceLine> = Vec::new();

    for record in csv_reader.deserialize::<InvoiceRecord>() {
        match record {
            Ok(row) => lines.push(row.into()),
            Err(err) => warn!("failed to deserialize invoice line, err={}", err),
        }
    }

    debug!("read {} invoice lines", lines.len());

    Ok(lines)
}

pub fn load_factors(path: &Path) -> Result<Vec<EmissionFactorRecord>> {
    info!("loading '{}'", path.display());
    read_factors(open(path)?).with_context(|| format!("failed to read '{}'", path.display()))
}

pub fn load_invoice_lines(path: &Path) -> Result<Vec<InvoiceLine>> {
    info!("loading '{}'", path.display());
    read_invoice_lines(open(path)?).with_context(|| format!("failed to read '{}'", path.display()))
}

pub fn export_results<W: io::Write>(report: &Report, writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    for result in report.results() {
        let record: ResultRecord = result.into();
        csv_writer.serialize(record)?;
    }

    csv_writer.flush()?;

    Ok(())
}

pub fn export_results_file(report: &Report, path: &Path) -> Result<()> {
    if report.is_empty() {
        warn!("no data to export");
        return Ok(());
    }

    let file = File::create(path).with_context(|| format!("failed to create '{}'", path.display()))?;
    export_results(report, file)?;
    info!("detailed results exported to '{}'", path.display());

    Ok(())
}
