//! Interactive collection of a quotation record.

use std::str::FromStr;

use chrono::Local;
use inquire::{DateSelect, Text};
use rust_decimal::Decimal;

use crate::error::Result;
use crate::model::{LineItem, Party, QuotationRecord};
use crate::numbering::next_quotation_number;
use crate::settings::{IssuerDefaults, Settings};

/// Unparseable input becomes zero; the validator reports it afterwards.
pub fn parse_decimal(input: &str) -> Decimal {
    Decimal::from_str(input.trim()).unwrap_or(Decimal::ZERO)
}

pub fn parse_quantity(input: &str) -> u32 {
    input.trim().parse().unwrap_or(0)
}

/// Upper bound on line items per quotation entered through the wizard.
pub const MAX_ITEMS: u32 = 500;

/// Item count typed by the user, if it lies in `1..=MAX_ITEMS`.
pub fn item_count(input: &str) -> Option<u32> {
    match parse_quantity(input) {
        n @ 1..=MAX_ITEMS => Some(n),
        _ => None,
    }
}

fn ask(prompt: &str, default: &str) -> Result<String> {
    let text = Text::new(prompt);
    let text = if default.is_empty() { text } else { text.with_default(default) };
    Ok(text.prompt()?)
}

fn ask_party(heading: &str, defaults: &Party) -> Result<Party> {
    println!("\n--- {} ---", heading);
    Ok(Party {
        name: ask(&format!("Name ({}):", heading), &defaults.name)?,
        email: ask(&format!("Email ({}):", heading), &defaults.email)?,
        contact: ask(&format!("Contact Number ({}):", heading), &defaults.contact)?,
    })
}

fn enter_items(currency: &str) -> Result<Vec<LineItem>> {
    println!("\n--- Items ---");
    let count = loop {
        match item_count(&ask("Number of Items:", "1")?) {
            Some(n) => break n,
            None => println!("❌ Enter a number between 1 and {}.", MAX_ITEMS),
        }
    };

    let mut items = Vec::new();
    for n in 1..=count {
        println!("Item {}", n);
        let serial_number = ask(&format!("Serial Number {}:", n), &n.to_string())?;
        let description = ask(&format!("Production Description {}:", n), "")?;
        let quantity = parse_quantity(&ask(&format!("Quantity {}:", n), "1")?);
        let unit_price = parse_decimal(&ask(&format!("Price {} ({}):", n, currency), "0")?);

        let item = LineItem::new(serial_number, description, quantity, unit_price);
        tracing::debug!(n, line_total = %item.line_total(), "item entered");
        items.push(item);
    }
    Ok(items)
}

/// Walks the user through every field of a new quotation.
///
/// The returned record is not validated yet.
pub fn collect_record(settings: &Settings, issuer: &IssuerDefaults) -> Result<QuotationRecord> {
    println!("\n--- Quotation Details ---");
    let date = DateSelect::new("Quotation Date:")
        .with_default(Local::now().date_naive())
        .prompt()?;
    let suggested = next_quotation_number(&settings.output_root(), &settings.number_prefix, date);
    let number = ask("Quotation Number:", &suggested)?;
    let company_name = ask("Company Name:", &issuer.company_name)?;

    let from = ask_party("Quotation From", &issuer.party())?;
    let to = ask_party("Quotation To", &Party::default())?;

    let items = enter_items(&settings.currency)?;

    println!("\n--- Additional Charges ---");
    let currency = &settings.currency;
    let shipping_charges = parse_decimal(&ask(&format!("Shipping Charges ({}):", currency), "0")?);
    let packaging_charges = parse_decimal(&ask(&format!("Packaging Charges ({}):", currency), "0")?);
    let tax_rate = parse_decimal(&ask("Tax Rate (%):", "0")?);

    Ok(QuotationRecord {
        number,
        date: date.format("%Y-%m-%d").to_string(),
        company_name,
        issuer: from,
        recipient: to,
        items,
        shipping_charges,
        packaging_charges,
        tax_rate,
    })
}
