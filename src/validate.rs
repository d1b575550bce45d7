//! Completeness checks for a collected quotation.
//!
//! Every failing check is reported, in a fixed order, so the whole list can be
//! shown to the user at once.

use rust_decimal::Decimal;

use crate::error::{QuoteError, Result};
use crate::model::{LineItem, QuotationRecord};

/// Tunables for the validator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Accept line items priced at exactly zero (free or promotional rows).
    pub allow_zero_price: bool,
}

pub fn validate(record: &QuotationRecord) -> Vec<String> {
    validate_with(record, ValidationPolicy::default())
}

pub fn validate_with(record: &QuotationRecord, policy: ValidationPolicy) -> Vec<String> {
    let header = [
        (&record.number, "Quotation Number"),
        (&record.date, "Quotation Date"),
        (&record.company_name, "Company Name"),
        (&record.issuer.name, "Name (Quotation From)"),
        (&record.issuer.email, "Email (Quotation From)"),
        (&record.issuer.contact, "Contact Number (Quotation From)"),
        (&record.recipient.name, "Name (Quotation To)"),
        (&record.recipient.email, "Email (Quotation To)"),
        (&record.recipient.contact, "Contact Number (Quotation To)"),
    ];

    // No trimming: a value of "  " counts as filled in.
    let mut missing: Vec<String> = header
        .iter()
        .filter(|(value, _)| value.is_empty())
        .map(|(_, label)| label.to_string())
        .collect();

    if record.items.is_empty() {
        missing.push("Items".to_string());
    }

    for (idx, item) in record.items.iter().enumerate() {
        check_item(item, idx + 1, policy, &mut missing);
    }

    // Lines that overflow are already reported as their price.
    let lines_fit = record.items.iter().all(|i| i.checked_line_total().is_some());
    if lines_fit && record.checked_summary().is_none() {
        missing.push("Grand Total".to_string());
    }

    tracing::debug!(missing = missing.len(), "validated quotation record");
    missing
}

fn check_item(item: &LineItem, n: usize, policy: ValidationPolicy, missing: &mut Vec<String>) {
    if item.serial_number.is_empty() {
        missing.push(format!("Serial Number {}", n));
    }
    if item.description.is_empty() {
        missing.push(format!("Production Description {}", n));
    }
    if item.quantity == 0 {
        missing.push(format!("Quantity {}", n));
    }
    let price_ok = if policy.allow_zero_price {
        item.unit_price >= Decimal::ZERO
    } else {
        item.unit_price > Decimal::ZERO
    };
    if !price_ok || item.checked_line_total().is_none() {
        missing.push(format!("Price {}", n));
    }
}

impl QuotationRecord {
    pub fn is_complete(&self, policy: ValidationPolicy) -> bool {
        validate_with(self, policy).is_empty()
    }

    /// Turns a non-empty label list into [`QuoteError::IncompleteInput`].
    pub fn ensure_complete(&self, policy: ValidationPolicy) -> Result<()> {
        let missing = validate_with(self, policy);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(QuoteError::IncompleteInput { missing })
        }
    }
}
