use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use regex::Regex;

/// All files under `dir` (recursively) with the given extension.
pub fn collect_files(dir: &Path, ext: &str) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(dir) = stack.pop() {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    stack.push(path);
                } else if path.extension().is_some_and(|e| e == ext) {
                    files.push(path);
                }
            }
        }
    }
    files
}

/// Makes user text safe to use as one path component: anything outside
/// `[A-Za-z0-9_-]` becomes `-`, so separators and `..` can't escape the
/// target directory. Case is kept so numbers still match [`next_quotation_number`].
pub fn file_component(raw: &str, fallback: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '-' })
        .collect();
    if cleaned.chars().all(|c| c == '-') {
        fallback.to_string()
    } else {
        cleaned
    }
}

/// Next free quotation number for `date`, e.g. `QT20261016-03`.
///
/// Looks at every rendered `.typ` file under `output_root/<year>` whose name
/// starts with `<prefix><YYYYMMDD>-NN` and picks one past the highest `NN`.
pub fn next_quotation_number(output_root: &Path, prefix: &str, date: NaiveDate) -> String {
    let stem = format!("{}{}", prefix, date.format("%Y%m%d"));
    let year_dir = output_root.join(date.format("%Y").to_string());

    let mut next_idx = 1;
    if year_dir.exists() {
        let pattern = format!(r"^{}-(\d+)", regex::escape(&stem));
        if let Ok(re) = Regex::new(&pattern) {
            for path in collect_files(&year_dir, "typ") {
                let Some(fname) = path.file_name() else { continue };
                let fname = fname.to_string_lossy();
                if let Some(idx) = re
                    .captures(&fname)
                    .and_then(|caps| caps[1].parse::<u32>().ok())
                {
                    next_idx = next_idx.max(idx.saturating_add(1));
                }
            }
        }
    }

    let number = format!("{}-{:02}", stem, next_idx);
    tracing::debug!(%number, "allocated quotation number");
    number
}
