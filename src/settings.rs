use std::fs;
use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};
use inquire::{Confirm, Text};
use serde::{Deserialize, Serialize};

use crate::error::{QuoteError, Result};
use crate::model::Party;
use crate::validate::ValidationPolicy;

const DEFAULT_ISSUER_TEMPLATE: &str = include_str!("../issuer.toml");

fn default_currency() -> String {
    "PKR".to_string()
}

fn default_prefix() -> String {
    "QT".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub data_root: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub allow_zero_price: bool,
    #[serde(default = "default_true")]
    pub compile_pdf: bool,
    #[serde(default = "default_prefix")]
    pub number_prefix: String,
}

impl Settings {
    pub fn new(data_root: impl Into<String>) -> Self {
        Self {
            data_root: data_root.into(),
            currency: default_currency(),
            allow_zero_price: false,
            compile_pdf: true,
            number_prefix: default_prefix(),
        }
    }

    /// Platform config location, e.g. `~/.config/quotation-maker/settings.toml`.
    pub fn config_path() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("com", "quotation-maker", "app") {
            return proj_dirs.config_dir().join("settings.toml");
        }
        PathBuf::from("settings.toml")
    }

    /// `Ok(None)` when nothing has been configured yet.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(toml::from_str(&content)?))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        tracing::info!(path = %path.display(), "settings saved");
        Ok(())
    }

    pub fn root(&self) -> PathBuf {
        PathBuf::from(expand_home_dir(&self.data_root))
    }

    pub fn output_root(&self) -> PathBuf {
        self.root().join("output")
    }

    pub fn policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            allow_zero_price: self.allow_zero_price,
        }
    }
}

/// Defaults for the "Quotation From" block, kept in `issuer.toml` under the data root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssuerDefaults {
    pub company_name: String,
    pub name: String,
    pub email: String,
    pub contact: String,
}

impl IssuerDefaults {
    /// Reads `issuer.toml`, seeding it from the built-in template on first use.
    pub fn load_or_init(root: &Path) -> Result<Self> {
        let path = root.join("issuer.toml");
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            return Ok(toml::from_str(&content)?);
        }

        println!("✨ Initializing default issuer configuration...");
        fs::create_dir_all(root)?;
        fs::write(&path, DEFAULT_ISSUER_TEMPLATE)?;
        Ok(toml::from_str(DEFAULT_ISSUER_TEMPLATE)?)
    }

    pub fn party(&self) -> Party {
        Party {
            name: self.name.clone(),
            email: self.email.clone(),
            contact: self.contact.clone(),
        }
    }
}

pub fn expand_home_dir(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(base_dirs) = BaseDirs::new() {
            let home = base_dirs.home_dir().to_string_lossy();
            return path.replacen('~', &home, 1);
        }
    }
    path.to_string()
}

/// Interactive setup for `config` and for the very first run.
pub fn setup_config_wizard(path: &Path) -> Result<Settings> {
    println!("\n⚙️  --- Configuration Setup ---");
    let current = Settings::load_from(path)?;
    let default_root = current
        .as_ref()
        .map(|s| s.data_root.clone())
        .unwrap_or_else(|| "~/Documents/Quotations".to_string());

    println!("📂 Opening folder picker...");
    let picked_path = rfd::FileDialog::new()
        .set_title("Select Root Data Directory")
        .pick_folder();

    let data_root = match picked_path {
        Some(p) => p.to_string_lossy().to_string(),
        None => {
            println!("❌ No folder selected. Falling back to manual input.");
            Text::new("Enter Root Data Directory:")
                .with_default(&default_root)
                .prompt()?
        }
    };
    if data_root.trim().is_empty() {
        return Err(QuoteError::Config {
            message: "data directory cannot be empty".to_string(),
        });
    }

    let base = current.unwrap_or_else(|| Settings::new(data_root.clone()));
    let currency = Text::new("Currency label:")
        .with_default(&base.currency)
        .prompt()?;
    let allow_zero_price = Confirm::new("Allow zero-priced items (free / promotional)?")
        .with_default(base.allow_zero_price)
        .prompt()?;
    let compile_pdf = Confirm::new("Compile PDF with typst after rendering?")
        .with_default(base.compile_pdf)
        .prompt()?;

    let settings = Settings {
        data_root,
        currency,
        allow_zero_price,
        compile_pdf,
        number_prefix: base.number_prefix,
    };
    settings.save_to(path)?;
    println!("✅ Settings saved.");
    Ok(settings)
}
