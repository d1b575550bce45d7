use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{QuoteError, Result};
use crate::numbering::file_component;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Party {
    pub name: String,
    pub email: String,
    pub contact: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct LineItem {
    pub serial_number: String,
    pub description: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl LineItem {
    pub fn new(
        serial_number: impl Into<String>,
        description: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Self {
        Self {
            serial_number: serial_number.into(),
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    /// Always derived from the current quantity and price, never stored.
    /// Saturates at `Decimal::MAX`/`MIN`; use [`LineItem::checked_line_total`]
    /// to detect that.
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity).saturating_mul(self.unit_price)
    }

    pub fn checked_line_total(&self) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(self.unit_price)
    }
}

/// Everything the user enters for one quotation.
///
/// Starts out empty (`Default`) and is filled field by field by whoever
/// collects the input. It is checked with [`crate::validate::validate`] and
/// summarized with [`crate::calc::summarize`] before rendering.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct QuotationRecord {
    pub number: String,
    pub date: String,
    pub company_name: String,
    // TOML: scalar keys must precede the nested tables.
    #[serde(default)]
    pub shipping_charges: Decimal,
    #[serde(default)]
    pub packaging_charges: Decimal,
    /// Percentage, e.g. `10` for 10%.
    #[serde(default)]
    pub tax_rate: Decimal,
    /// "Quotation From"
    pub issuer: Party,
    /// "Quotation To"
    pub recipient: Party,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl QuotationRecord {
    /// Loads a record from a `.toml` or `.json` file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            _ => Err(QuoteError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Writes the record as `<number>-<YYYYmmdd-HHMMSS>.toml` under `dir`.
    ///
    /// Never replaces an existing file: a taken name gets a `-2`, `-3`, ...
    /// suffix. An empty or unusable number is filed as `draft`.
    pub fn save_draft(&self, dir: &Path, now: NaiveDateTime) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let content = self.to_toml()?;
        let stem = format!(
            "{}-{}",
            file_component(&self.number, "draft"),
            now.format("%Y%m%d-%H%M%S")
        );

        let mut attempt = 1u32;
        loop {
            let name = if attempt == 1 {
                format!("{}.toml", stem)
            } else {
                format!("{}-{}.toml", stem, attempt)
            };
            let path = dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(content.as_bytes())?;
                    tracing::info!(path = %path.display(), "draft saved");
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt = attempt.saturating_add(1),
                Err(e) => return Err(e.into()),
            }
        }
    }
}

// Values handed to the template, money already rounded for display.
#[derive(Serialize)]
pub struct ItemRow {
    pub serial_number: String,
    pub description: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

#[derive(Serialize)]
pub struct QuotationContext {
    pub number: String,
    pub date: String,
    pub company_name: String,
    pub issuer: Party,
    pub recipient: Party,
    pub currency: String,
    pub items: Vec<ItemRow>,
    pub subtotal: String,
    pub shipping_charges: String,
    pub packaging_charges: String,
    pub tax_rate: String,
    pub tax_amount: String,
    pub grand_total: String,
}
