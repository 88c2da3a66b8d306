//! CSV instrument catalogs.
//!
//! Each row becomes an [`Instrument`]; row order is catalog order. Columns
//! are located by header name, so extra columns (sector, notes, ...) are
//! ignored. Any unreadable row fails the whole catalog.

use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{Catalog, Instrument};
use crate::error::CatalogError;

/// How the yield column is expressed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum YieldUnit {
    /// `5` means 5%.
    #[default]
    Percent,
    /// `0.05` means 5%.
    Fraction,
}

impl YieldUnit {
    /// Convert a column value to the fractional yield stored on instruments.
    #[must_use]
    pub fn to_fraction(self, value: Decimal) -> Decimal {
        match self {
            Self::Percent => value / Decimal::ONE_HUNDRED,
            Self::Fraction => value,
        }
    }
}

/// Layout of a catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogFormat {
    #[serde(default = "default_name_column")]
    pub name_column: String,

    #[serde(default = "default_price_column")]
    pub price_column: String,

    #[serde(default = "default_yield_column")]
    pub yield_column: String,

    #[serde(default)]
    pub yield_unit: YieldUnit,

    /// Field delimiter; a single ASCII character.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_name_column() -> String {
    "Stock Name".to_string()
}

fn default_price_column() -> String {
    "Price per Lot (MYR)".to_string()
}

fn default_yield_column() -> String {
    "Estimated Dividend Yield (%)".to_string()
}

fn default_delimiter() -> char {
    ','
}

impl Default for CatalogFormat {
    fn default() -> Self {
        Self {
            name_column: default_name_column(),
            price_column: default_price_column(),
            yield_column: default_yield_column(),
            yield_unit: YieldUnit::default(),
            delimiter: default_delimiter(),
        }
    }
}

/// Loads instrument catalogs from CSV files.
#[derive(Debug, Clone, Default)]
pub struct CsvCatalogLoader {
    format: CatalogFormat,
}

struct Columns {
    name: usize,
    price: usize,
    dividend_yield: usize,
}

impl CsvCatalogLoader {
    #[must_use]
    pub fn new(format: CatalogFormat) -> Self {
        Self { format }
    }

    #[must_use]
    pub fn format(&self) -> &CatalogFormat {
        &self.format
    }

    /// Load the catalog at `path`, labelled with the path.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the file cannot be read, a required column
    /// is missing, a row is malformed, or the instruments fail validation.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| CatalogError::Read {
            path: path.to_path_buf(),
            source: csv::Error::from(e),
        })?;
        let catalog = self.load_from_reader(path, file)?;
        info!(
            catalog = catalog.label(),
            instruments = catalog.len(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// Load a catalog from any reader; `label` names it in reports and errors.
    ///
    /// # Errors
    ///
    /// Same as [`CsvCatalogLoader::load`].
    pub fn load_from_reader<R: io::Read>(
        &self,
        label: impl AsRef<Path>,
        reader: R,
    ) -> Result<Catalog, CatalogError> {
        let label = label.as_ref().to_path_buf();
        let delimiter = u8::try_from(self.format.delimiter).map_err(|_| {
            CatalogError::MalformedRow {
                path: label.clone(),
                line: 0,
                reason: format!("delimiter '{}' is not ASCII", self.format.delimiter),
            }
        })?;

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = reader.headers().map_err(|e| read_error(&label, e))?.clone();
        let columns = self.locate_columns(&label, &headers)?;

        let mut instruments = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| read_error(&label, e))?;
            let line = record.position().map_or(0, csv::Position::line);
            if record.iter().all(str::is_empty) {
                debug!(line, "Skipping blank row");
                continue;
            }
            instruments.push(self.parse_row(&label, line, &record, &columns)?);
        }

        Ok(Catalog::try_new(label.display().to_string(), instruments)?)
    }

    fn locate_columns(
        &self,
        path: &Path,
        headers: &StringRecord,
    ) -> Result<Columns, CatalogError> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(column))
                .ok_or_else(|| CatalogError::MissingColumn {
                    path: path.to_path_buf(),
                    column: column.to_string(),
                })
        };
        Ok(Columns {
            name: find(&self.format.name_column)?,
            price: find(&self.format.price_column)?,
            dividend_yield: find(&self.format.yield_column)?,
        })
    }

    fn parse_row(
        &self,
        path: &Path,
        line: u64,
        record: &StringRecord,
        columns: &Columns,
    ) -> Result<Instrument, CatalogError> {
        let malformed = |reason: String| CatalogError::MalformedRow {
            path: path.to_path_buf(),
            line,
            reason,
        };

        let field = |index: usize, column: &str| {
            record
                .get(index)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| malformed(format!("missing value for '{column}'")))
        };

        let name = field(columns.name, &self.format.name_column)?;
        let price_raw = field(columns.price, &self.format.price_column)?;
        let yield_raw = field(columns.dividend_yield, &self.format.yield_column)?;

        let price = parse_number(price_raw).ok_or_else(|| {
            malformed(format!(
                "'{price_raw}' in '{}' is not a number",
                self.format.price_column
            ))
        })?;
        let dividend_yield = parse_number(yield_raw).ok_or_else(|| {
            malformed(format!(
                "'{yield_raw}' in '{}' is not a number",
                self.format.yield_column
            ))
        })?;

        Ok(Instrument::try_new(
            name,
            price,
            self.format.yield_unit.to_fraction(dividend_yield),
        )?)
    }
}

fn read_error(path: &Path, source: csv::Error) -> CatalogError {
    CatalogError::Read {
        path: PathBuf::from(path),
        source,
    }
}

/// Parse a numeric cell, accepting thousands separators and a trailing `%`.
fn parse_number(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(cleaned.trim())
        .or_else(|_| Decimal::from_scientific(cleaned.trim()))
        .ok()
}
