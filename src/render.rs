use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{Datelike, Local, NaiveDate};
use slug::slugify;
use tera::{Context, Tera, Value};

use crate::calc::QuotationSummary;
use crate::error::{QuoteError, Result};
use crate::model::{ItemRow, QuotationContext, QuotationRecord};
use crate::money;
use crate::numbering::file_component;
use crate::settings::Settings;

// Embed template at compile time so a fresh data directory can be seeded
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/quotation.tera");
pub const TEMPLATE_NAME: &str = "quotation.tera";

/// Files produced for one quotation.
#[derive(Debug, Clone)]
pub struct RenderedQuotation {
    pub typ_path: PathBuf,
    /// `None` when compilation is disabled or `typst` is unavailable.
    pub pdf_path: Option<PathBuf>,
}

/// Tera filter: quote a value as a Typst string literal.
fn typst_str(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let escaped = raw
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    Ok(Value::String(format!("\"{}\"", escaped)))
}

/// Templates from `<root>/templates`, seeding the default one if absent.
pub fn load_templates(root: &Path) -> Result<Tera> {
    let template_dir = root.join("templates");
    fs::create_dir_all(&template_dir)?;
    let template_path = template_dir.join(TEMPLATE_NAME);
    if !template_path.exists() {
        println!("✨ Initializing default template...");
        fs::write(&template_path, DEFAULT_TEMPLATE)?;
    }

    let glob = template_dir.join("*.tera");
    let glob = glob.to_str().ok_or_else(|| QuoteError::Config {
        message: format!("template path is not valid UTF-8: {:?}", template_dir),
    })?;
    let mut tera = Tera::new(glob)?;
    tera.register_filter("typst_str", typst_str);
    Ok(tera)
}

/// Only the built-in template; nothing touches the filesystem.
pub fn builtin_templates() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, DEFAULT_TEMPLATE)?;
    tera.register_filter("typst_str", typst_str);
    Ok(tera)
}

pub fn build_context(
    record: &QuotationRecord,
    summary: &QuotationSummary,
    currency: &str,
) -> QuotationContext {
    let items = record
        .items
        .iter()
        .map(|item| ItemRow {
            serial_number: item.serial_number.clone(),
            description: item.description.clone(),
            quantity: item.quantity,
            unit_price: money::format(item.unit_price),
            line_total: money::format(item.line_total()),
        })
        .collect();

    QuotationContext {
        number: record.number.clone(),
        date: record.date.clone(),
        company_name: record.company_name.clone(),
        issuer: record.issuer.clone(),
        recipient: record.recipient.clone(),
        currency: currency.to_string(),
        items,
        subtotal: money::format(summary.subtotal),
        shipping_charges: money::format(summary.shipping_charges),
        packaging_charges: money::format(summary.packaging_charges),
        tax_rate: money::format_rate(summary.tax_rate),
        tax_amount: money::format(summary.tax_amount),
        grand_total: money::format(summary.grand_total),
    }
}

pub fn render_typst(tera: &Tera, context: &QuotationContext) -> Result<String> {
    let context = Context::from_serialize(context)?;
    Ok(tera.render(TEMPLATE_NAME, &context)?)
}

/// Year used to file the quotation; falls back to the current year when the
/// date text isn't recognised.
pub fn filing_year(date: &str) -> i32 {
    ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%m/%d/%Y", "%d.%m.%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date.trim(), fmt).ok())
        .map(|d| d.year())
        .unwrap_or_else(|| Local::now().year())
}

/// `output/<year>/<recipient>/<number>_<company>.typ`
pub fn output_path(output_root: &Path, record: &QuotationRecord) -> PathBuf {
    let recipient = slugify(&record.recipient.name);
    let recipient = if recipient.is_empty() { "unknown".to_string() } else { recipient };
    let number = file_component(&record.number, "quotation");
    let filename = format!("{}_{}.typ", number, slugify(&record.company_name));
    output_root
        .join(filing_year(&record.date).to_string())
        .join(recipient)
        .join(filename)
}

pub fn typst_available() -> bool {
    Command::new("typst").arg("--version").output().is_ok()
}

pub fn compile_pdf(typ_path: &Path) -> Result<PathBuf> {
    let pdf_path = typ_path.with_extension("pdf");
    println!("\n🔨 Compiling PDF...");
    match Command::new("typst")
        .arg("compile")
        .arg(typ_path)
        .arg(&pdf_path)
        .status()
    {
        Ok(s) if s.success() => Ok(pdf_path),
        _ => Err(QuoteError::Compile {
            path: typ_path.to_path_buf(),
        }),
    }
}

/// Validates, totals and writes one quotation under the configured data root.
pub fn write_quotation(
    settings: &Settings,
    tera: &Tera,
    record: &QuotationRecord,
) -> Result<RenderedQuotation> {
    record.ensure_complete(settings.policy())?;
    let summary = record.summary();

    let context = build_context(record, &summary, &settings.currency);
    let rendered = render_typst(tera, &context)?;

    let typ_path = output_path(&settings.output_root(), record);
    if let Some(dir) = typ_path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(&typ_path, rendered)?;
    tracing::info!(path = %typ_path.display(), number = %record.number, "quotation written");

    let pdf_path = if !settings.compile_pdf {
        None
    } else if !typst_available() {
        tracing::warn!("'typst' is not installed, skipping PDF compilation");
        println!("⚠️  'typst' is not installed. Install it to produce a PDF (https://typst.app).");
        None
    } else {
        Some(compile_pdf(&typ_path)?)
    };

    Ok(RenderedQuotation { typ_path, pdf_path })
}

/// Reveal a file in Finder/Explorer, or open its folder on Linux.
pub fn open_and_reveal(path: &Path) {
    #[cfg(target_os = "macos")]
    Command::new("open").arg("-R").arg(path).spawn().ok();

    #[cfg(target_os = "windows")]
    Command::new("explorer")
        .arg(format!("/select,{}", path.to_string_lossy()))
        .spawn()
        .ok();

    #[cfg(target_os = "linux")]
    Command::new("xdg-open")
        .arg(path.parent().unwrap_or(path))
        .spawn()
        .ok();
}

pub fn open_folder(path: &Path) {
    #[cfg(target_os = "macos")]
    Command::new("open").arg(path).spawn().ok();

    #[cfg(target_os = "windows")]
    Command::new("explorer").arg(path).spawn().ok();

    #[cfg(target_os = "linux")]
    Command::new("xdg-open").arg(path).spawn().ok();
}
