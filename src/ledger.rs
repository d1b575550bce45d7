//! Reads back quotations that were already rendered to the output tree.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::numbering::collect_files;
use crate::render::filing_year;

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"number:\s*"((?:[^"\\]|\\.)*)""#).expect("valid regex"));
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"date:\s*"((?:[^"\\]|\\.)*)""#).expect("valid regex"));
static RECIPIENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"recipient:\s*"((?:[^"\\]|\\.)*)""#).expect("valid regex"));
static TOTAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"grand_total:\s*"(-?[\d.]+)""#).expect("valid regex"));

#[derive(Debug, Clone, PartialEq)]
pub struct QuotationInfo {
    pub number: String,
    pub date: String,
    pub recipient: String,
    pub grand_total: Decimal,
    pub path: PathBuf,
}

impl QuotationInfo {
    pub fn year(&self) -> i32 {
        filing_year(&self.date)
    }
}

// Inverse of the `typst_str` template filter.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn capture(re: &Regex, content: &str) -> Option<String> {
    re.captures(content).map(|caps| unescape(&caps[1]))
}

/// Pulls the header block out of one rendered `.typ` file.
///
/// Returns `Ok(None)` for files that don't carry a quotation header
/// (hand-written Typst, other templates).
pub fn parse_quotation(path: &Path) -> Result<Option<QuotationInfo>> {
    let content = fs::read_to_string(path)?;

    let (Some(number), Some(total)) = (capture(&NUMBER_RE, &content), capture(&TOTAL_RE, &content))
    else {
        return Ok(None);
    };
    let Ok(grand_total) = Decimal::from_str(&total) else {
        return Ok(None);
    };

    Ok(Some(QuotationInfo {
        number,
        date: capture(&DATE_RE, &content).unwrap_or_default(),
        recipient: capture(&RECIPIENT_RE, &content).unwrap_or_else(|| "Unknown".to_string()),
        grand_total,
        path: path.to_path_buf(),
    }))
}

/// Every rendered quotation under `output_root`, newest number first.
pub fn scan_quotations(output_root: &Path) -> Vec<QuotationInfo> {
    let mut infos: Vec<QuotationInfo> = collect_files(output_root, "typ")
        .into_iter()
        .filter_map(|path| match parse_quotation(&path) {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable quotation");
                None
            }
        })
        .collect();

    infos.sort_by(|a, b| b.number.cmp(&a.number));
    infos
}
