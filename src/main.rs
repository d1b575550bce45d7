use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Datelike, Local};
use clap::{CommandFactory, Parser, Subcommand};
use inquire::Confirm;

use quotation_maker::ledger::scan_quotations;
use quotation_maker::logging::init_logger;
use quotation_maker::render::{self, RenderedQuotation};
use quotation_maker::report::{ledger_table, preview_table};
use quotation_maker::settings::{IssuerDefaults, Settings, setup_config_wizard};
use quotation_maker::wizard::collect_record;
use quotation_maker::{QuotationRecord, validate_with};

#[derive(Parser)]
#[command(name = "quotation-maker")]
struct Cli {
    /// Show debug diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new quotation interactively
    New,
    /// Validate a quotation file (.toml / .json) and preview its totals
    Check {
        file: PathBuf,
        /// Print the summary as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Render a quotation file to Typst (and PDF when typst is installed)
    Render { file: PathBuf },
    /// List rendered quotations for a year
    List {
        /// Year to list (defaults to current year)
        year: Option<i32>,
    },
    /// Configure data directory and defaults
    Config,
    /// Open output folder
    Open,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config_path = Settings::config_path();

    match command {
        Commands::Config => {
            setup_config_wizard(&config_path)?;
        }
        Commands::Check { file, json } => {
            // Checking works without a configured data directory.
            let settings = Settings::load_from(&config_path)?.unwrap_or_else(|| Settings::new("."));
            check_file(&settings, &file, json)?;
        }
        Commands::New => {
            let settings = load_or_configure(&config_path)?;
            new_quotation(&settings)?;
        }
        Commands::Render { file } => {
            let settings = load_or_configure(&config_path)?;
            let record = QuotationRecord::from_path(&file)
                .with_context(|| format!("Failed to load quotation from {:?}", file))?;
            exit_if_incomplete(&settings, &record);
            let rendered = render_record(&settings, &record)?;
            reveal(&rendered);
        }
        Commands::List { year } => {
            let settings = load_or_configure(&config_path)?;
            list_quotations(&settings, year);
        }
        Commands::Open => {
            let settings = load_or_configure(&config_path)?;
            let output = settings.output_root();
            fs::create_dir_all(&output)?;
            println!("🚀 Opening: {:?}", output);
            render::open_folder(&output);
        }
    }
    Ok(())
}

fn load_or_configure(config_path: &Path) -> anyhow::Result<Settings> {
    let settings = match Settings::load_from(config_path)? {
        Some(s) => s,
        None => setup_config_wizard(config_path)?,
    };
    let root = settings.root();
    fs::create_dir_all(&root)
        .with_context(|| format!("Failed to create data directory {:?}", root))?;
    Ok(settings)
}

// ==========================================
// Validation output
// ==========================================

fn print_missing(missing: &[String]) {
    println!("❌ Please fill in all required fields:");
    for label in missing {
        println!("   - {}", label);
    }
}

fn exit_if_incomplete(settings: &Settings, record: &QuotationRecord) {
    let missing = validate_with(record, settings.policy());
    if !missing.is_empty() {
        print_missing(&missing);
        std::process::exit(1);
    }
}

fn check_file(settings: &Settings, file: &Path, json: bool) -> anyhow::Result<()> {
    let record = QuotationRecord::from_path(file)
        .with_context(|| format!("Failed to load quotation from {:?}", file))?;
    exit_if_incomplete(settings, &record);

    let summary = record.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("✅ Quotation {} is complete.", record.number);
        println!("{}", preview_table(&record, &summary, &settings.currency));
    }
    Ok(())
}

// ==========================================
// New quotation
// ==========================================

fn new_quotation(settings: &Settings) -> anyhow::Result<()> {
    let issuer = IssuerDefaults::load_or_init(&settings.root())?;
    let record = collect_record(settings, &issuer)?;

    let missing = validate_with(&record, settings.policy());
    if !missing.is_empty() {
        print_missing(&missing);
        let draft = save_draft(settings, &record)?;
        println!("💾 Draft saved to {:?}. Fix it and run `quotation-maker render <file>`.", draft);
        std::process::exit(1);
    }

    let summary = record.summary();
    println!("{}", preview_table(&record, &summary, &settings.currency));

    if !Confirm::new("Generate quotation?").with_default(true).prompt()? {
        println!("Cancelled");
        return Ok(());
    }
    let rendered = render_record(settings, &record)?;
    reveal(&rendered);
    Ok(())
}

fn save_draft(settings: &Settings, record: &QuotationRecord) -> anyhow::Result<PathBuf> {
    let drafts = settings.root().join("drafts");
    Ok(record.save_draft(&drafts, Local::now().naive_local())?)
}

// ==========================================
// Rendering & listing
// ==========================================

fn render_record(settings: &Settings, record: &QuotationRecord) -> anyhow::Result<RenderedQuotation> {
    let tera = render::load_templates(&settings.root())?;
    let rendered = render::write_quotation(settings, &tera, record)?;
    println!("✅ Typst source: {:?}", rendered.typ_path);
    if let Some(pdf) = &rendered.pdf_path {
        println!("✅ PDF Generated: {:?}", pdf);
    }
    Ok(rendered)
}

fn reveal(rendered: &RenderedQuotation) {
    let target = rendered.pdf_path.as_ref().unwrap_or(&rendered.typ_path);
    render::open_and_reveal(target);
}

fn list_quotations(settings: &Settings, year: Option<i32>) {
    let year = year.unwrap_or_else(|| Local::now().year());
    println!("🔍 Scanning quotations (Year: {})...", year);

    let infos = scan_quotations(&settings.output_root());
    if !infos.iter().any(|i| i.year() == year) {
        println!("(None found)");
        return;
    }
    println!("\n--- Quotations ({}) ---", year);
    println!("{}", ledger_table(&infos, year, &settings.currency));
}
