use std::collections::BTreeMap;
use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{Regime, SlabTable, SlabTableError, TaxSlab, TaxYearConfig};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur when loading slab tables.
#[derive(Debug, Error, PartialEq)]
pub enum SlabTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("unknown regime '{value}' on row {row} (expected NEW or OLD)")]
    InvalidRegime { value: String, row: usize },

    #[error("slab file mixes tax years '{first}' and '{other}'")]
    MixedTaxYears { first: String, other: String },

    #[error("invalid {regime} regime slab table: {source}")]
    Table {
        regime: Regime,
        #[source]
        source: SlabTableError,
    },
}

impl From<csv::Error> for SlabTableLoaderError {
    fn from(err: csv::Error) -> Self {
        SlabTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a slab CSV file.
///
/// - `tax_year`: label of the tax year, e.g. `FY 2024-25`
/// - `regime`: `NEW` or `OLD` (case-insensitive)
/// - `min_income`: lower bound of the slab
/// - `max_income`: upper bound of the slab (empty for the unbounded top slab)
/// - `rate`: marginal rate as a percentage (e.g. `5` for 5%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SlabRecord {
    pub tax_year: String,
    pub regime: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .replace(',', "")
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for slab tables from CSV files.
///
/// Rows are grouped by regime, ordered by `min_income` and validated as a
/// [`SlabTable`]. Unlike salary profiles, slab files are reference data, so a
/// malformed cell is an error rather than a zero.
pub struct SlabTableLoader;

impl SlabTableLoader {
    /// Parse slab records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<SlabRecord>, SlabTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let records = csv_reader
            .deserialize()
            .collect::<Result<Vec<SlabRecord>, csv::Error>>()?;

        debug!(count = records.len(), "parsed slab records");
        Ok(records)
    }

    /// Groups `records` by regime and validates each group as a slab table.
    ///
    /// # Errors
    ///
    /// * [`SlabTableLoaderError::InvalidRegime`] for a regime other than NEW or OLD.
    /// * [`SlabTableLoaderError::MixedTaxYears`] if records name more than one tax year.
    /// * [`SlabTableLoaderError::Table`] if a regime's slabs leave a gap, overlap,
    ///   do not start at zero or do not end unbounded.
    pub fn build(records: &[SlabRecord]) -> Result<BTreeMap<Regime, SlabTable>, SlabTableLoaderError> {
        let mut groups: BTreeMap<Regime, Vec<TaxSlab>> = BTreeMap::new();

        for (idx, record) in records.iter().enumerate() {
            let first = &records[0].tax_year;
            if record.tax_year.trim() != first.trim() {
                return Err(SlabTableLoaderError::MixedTaxYears {
                    first: first.clone(),
                    other: record.tax_year.clone(),
                });
            }

            let regime =
                Regime::parse(&record.regime).ok_or_else(|| SlabTableLoaderError::InvalidRegime {
                    value: record.regime.clone(),
                    row: idx + 1,
                })?;

            groups.entry(regime).or_default().push(TaxSlab::new(
                record.min_income,
                record.max_income,
                record.rate,
            ));
        }

        groups
            .into_iter()
            .map(|(regime, mut slabs)| {
                slabs.sort_by(|a, b| a.min_income.cmp(&b.min_income));
                SlabTable::new(slabs)
                    .map(|table| (regime, table))
                    .map_err(|source| SlabTableLoaderError::Table { regime, source })
            })
            .collect()
    }

    /// Replaces the slab tables of `config` for every regime present in
    /// `records`. Regimes absent from the file keep their current tables.
    ///
    /// Returns the number of regimes replaced. Nothing is changed on error.
    pub fn apply(
        config: &mut TaxYearConfig,
        records: &[SlabRecord],
    ) -> Result<usize, SlabTableLoaderError> {
        let tables = Self::build(records)?;

        if let Some(record) = records.first()
            && record.tax_year.trim() != config.tax_year
        {
            warn!(
                file = %record.tax_year,
                policy = %config.tax_year,
                "slab file tax year differs from the active policy"
            );
        }

        let replaced = tables.len();
        for (regime, table) in tables {
            debug!(%regime, slabs = table.slabs().len(), "replacing slab table");
            config.rules_mut(regime).slabs = table;
        }

        Ok(replaced)
    }
}
