use std::fs;

use chrono::NaiveDate;
use quotation_maker::ledger::scan_quotations;
use quotation_maker::numbering::next_quotation_number;
use quotation_maker::render::{builtin_templates, load_templates, write_quotation};
use quotation_maker::settings::Settings;
use quotation_maker::{QuotationRecord, QuoteError, validate};
use rust_decimal_macros::dec;
use tempfile::TempDir;

const RECORD_TOML: &str = r#"
number = "QT20261016-01"
date = "2026-10-16"
company_name = "Acme Traders"
shipping_charges = "10"
packaging_charges = "5"
tax_rate = "10"

[issuer]
name = "Ali Raza"
email = "ali@acme.pk"
contact = "0300-1234567"

[recipient]
name = "Sara Khan"
email = "sara@client.pk"
contact = "0311-7654321"

[[items]]
serial_number = "1"
description = "Steel bracket"
quantity = 2
unit_price = "100"

[[items]]
serial_number = "2"
description = "Mounting kit"
quantity = 1
unit_price = "50"
"#;

fn settings_in(dir: &TempDir) -> Settings {
    let mut settings = Settings::new(dir.path().to_string_lossy().to_string());
    settings.compile_pdf = false;
    settings
}

fn write_record(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn toml_record_validates_and_summarizes() {
    let dir = TempDir::new().unwrap();
    let record = QuotationRecord::from_path(&write_record(&dir, "q.toml", RECORD_TOML)).unwrap();

    assert!(validate(&record).is_empty());
    let summary = record.summary();
    assert_eq!(summary.subtotal, dec!(250));
    assert_eq!(summary.tax_amount, dec!(25));
    assert_eq!(summary.grand_total, dec!(290));
}

#[test]
fn json_record_loads() {
    let dir = TempDir::new().unwrap();
    let record = QuotationRecord::from_path(&write_record(&dir, "q.toml", RECORD_TOML)).unwrap();
    let json = serde_json::to_string(&record).unwrap();

    let loaded = QuotationRecord::from_path(&write_record(&dir, "q.json", &json)).unwrap();
    assert_eq!(loaded, record);
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let err = QuotationRecord::from_path(&write_record(&dir, "q.yaml", RECORD_TOML)).unwrap_err();
    assert!(matches!(err, QuoteError::UnsupportedFormat { .. }));
}

#[test]
fn render_then_list_then_number() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let record = QuotationRecord::from_path(&write_record(&dir, "q.toml", RECORD_TOML)).unwrap();

    let tera = load_templates(&settings.root()).unwrap();
    assert!(dir.path().join("templates/quotation.tera").exists());

    let rendered = write_quotation(&settings, &tera, &record).unwrap();
    assert!(rendered.pdf_path.is_none());
    assert_eq!(
        rendered.typ_path,
        dir.path()
            .join("output/2026/sara-khan/QT20261016-01_acme-traders.typ")
    );

    let source = fs::read_to_string(&rendered.typ_path).unwrap();
    assert!(source.contains("Total (Incl. Tax): 290.00"));
    assert!(source.contains("All prices are in"));

    let infos = scan_quotations(&settings.output_root());
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].number, "QT20261016-01");
    assert_eq!(infos[0].recipient, "Sara Khan");
    assert_eq!(infos[0].grand_total, dec!(290));

    let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
    assert_eq!(
        next_quotation_number(&settings.output_root(), &settings.number_prefix, date),
        "QT20261016-02"
    );
}

#[test]
fn incomplete_record_is_not_rendered() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let mut record = QuotationRecord::from_path(&write_record(&dir, "q.toml", RECORD_TOML)).unwrap();
    record.company_name.clear();
    record.items[0].quantity = 0;

    let tera = builtin_templates().unwrap();
    let err = write_quotation(&settings, &tera, &record).unwrap_err();
    assert_eq!(err.missing_fields(), ["Company Name", "Quantity 1"]);
    assert!(!settings.output_root().exists());
}

#[test]
fn zero_price_allowed_when_configured() {
    let dir = TempDir::new().unwrap();
    let mut settings = settings_in(&dir);
    let mut record = QuotationRecord::from_path(&write_record(&dir, "q.toml", RECORD_TOML)).unwrap();
    record.items[1].unit_price = dec!(0);

    let tera = builtin_templates().unwrap();
    assert!(write_quotation(&settings, &tera, &record).is_err());

    settings.allow_zero_price = true;
    let rendered = write_quotation(&settings, &tera, &record).unwrap();
    let source = fs::read_to_string(rendered.typ_path).unwrap();
    assert!(source.contains("Subtotal: 200.00"));
}
