use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use abafile::aba::{read_file, validate_item, DirectEntryFile, LineEnding};
use abafile::batch::partition;
use abafile::config::{
    config_dir, load_batch, load_config, resolve_output_dir, BATCH_TEMPLATE, CONFIG_TEMPLATE,
};
use abafile::error::{AbaError, Result};

#[derive(Parser)]
#[command(name = "abafile")]
#[command(version, about = "Direct Entry (ABA) payment file generator", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.abafile or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Show originator details and output settings
    Status,

    /// Show which batch items will be paid and the totals the file will carry
    Preview {
        /// Batch snapshot (.toml or .json)
        #[arg(short, long)]
        batch: PathBuf,
    },

    /// Generate a Direct Entry file for a batch
    Generate {
        /// Batch snapshot (.toml or .json)
        #[arg(short, long)]
        batch: PathBuf,

        /// Custom output file path (default: output_dir/<batch-number>.aba)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the configured description
        #[arg(short, long)]
        description: Option<String>,

        /// Terminate lines with LF instead of the configured ending
        #[arg(long)]
        lf: bool,
    },

    /// Check a Direct Entry file's layout and control totals
    Verify {
        /// Path to the .aba file
        file: PathBuf,

        /// Print the parsed records as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    pretty_env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::Preview { batch } => cmd_preview(&batch),
        Commands::Generate {
            batch,
            output,
            description,
            lf,
        } => cmd_generate(&cfg_dir, &batch, output, description, lf),
        Commands::Verify { file, json } => cmd_verify(&file, json),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    if cfg_dir.exists() {
        return Err(AbaError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("output"))?;

    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(cfg_dir.join("batch.example.toml"), BATCH_TEMPLATE)?;

    println!("Initialized abafile config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit your bank details:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Preview a batch:         abafile preview --batch {}/batch.example.toml",
        cfg_dir.display()
    );
    println!();
    println!("Then generate the file:");
    println!("  abafile generate --batch <batch-file>");

    Ok(())
}

/// Show originator and output settings
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(AbaError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let config = load_config(cfg_dir)?;
    let originator = &config.originator;
    let line_ending = match config.file.line_ending {
        LineEnding::Crlf => "CRLF",
        LineEnding::Lf => "LF",
    };

    println!("abafile Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Originator:       {}", originator.name);
    println!("BSB:              {}", originator.routing_code);
    println!("Account:          {}", originator.account_number);
    println!("Description:      {}", originator.description);
    if let Some(institution) = &originator.institution {
        println!("Institution:      {}", institution);
    }
    if let Some(user_id) = originator.user_id {
        println!("APCA user id:     {:06}", user_id);
    }
    println!(
        "Output directory: {}",
        resolve_output_dir(&config.file.output_dir, cfg_dir).display()
    );
    println!("Line ending:      {}", line_ending);

    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct PreviewRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "ITEM")]
    item: String,
    #[tabled(rename = "PAYEE")]
    payee: String,
    #[tabled(rename = "BSB")]
    bsb: String,
    #[tabled(rename = "ACCOUNT")]
    account: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

#[derive(Tabled)]
struct DetailRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "BSB")]
    bsb: String,
    #[tabled(rename = "ACCOUNT")]
    account: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "REFERENCE")]
    reference: String,
    #[tabled(rename = "CODE")]
    code: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

/// Format cents as dollars with thousands separators (e.g., $2,500.00)
fn format_cents(cents: i64) -> String {
    format_money(cents < 0, cents.unsigned_abs())
}

fn format_money(negative: bool, abs: u64) -> String {
    let digits = (abs / 100).to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    let grouped: String = out.chars().rev().collect();
    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", abs % 100)
}

/// Show bankable and excluded items for a batch
fn cmd_preview(batch_path: &Path) -> Result<()> {
    let batch = load_batch(batch_path)?;
    let split = partition(&batch.items);

    if batch.items.is_empty() {
        println!("Batch {} has no items.", batch.number);
        return Ok(());
    }

    let rows: Vec<PreviewRow> = batch
        .items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let missing = item.bank.missing_fields();
            let status = if !missing.is_empty() {
                format!("EXCLUDED (no {})", missing.join(", "))
            } else {
                match validate_item(item) {
                    Ok(()) => "BANKABLE".to_string(),
                    Err(e) => format!("INVALID: {e}"),
                }
            };
            PreviewRow {
                index: idx + 1,
                item: item.id.clone(),
                payee: item.payee_name.clone(),
                bsb: item.bank.routing_code.clone().unwrap_or_default(),
                account: item.bank.account_number.clone().unwrap_or_default(),
                amount: format_cents(item.amount),
                status,
            }
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    let invalid = split
        .bankable
        .iter()
        .filter(|i| validate_item(i).is_err())
        .count();
    let credit = split
        .bankable
        .iter()
        .filter(|i| validate_item(i).is_ok())
        .try_fold(0u64, |acc, i| acc.checked_add(i.amount as u64));

    println!();
    println!("Batch:    {}", batch.number);
    println!("Records:  {}", split.bankable.len());
    println!("Excluded: {}", split.excluded.len());
    match credit {
        Some(total) => println!("Credit:   {}", format_money(false, total)),
        None => println!("Credit:   overflow"),
    }
    if invalid > 0 {
        println!("Invalid:  {} (generate will fail until these are fixed)", invalid);
    }

    Ok(())
}

/// Generate a Direct Entry file
fn cmd_generate(
    cfg_dir: &Path,
    batch_path: &Path,
    output: Option<PathBuf>,
    description: Option<String>,
    lf: bool,
) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(AbaError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let config = load_config(cfg_dir)?;
    let batch = load_batch(batch_path)?;

    let mut originator = config.originator.clone();
    if let Some(description) = description {
        originator.description = description;
    }

    let mut options = config.file.options();
    if lf {
        options.line_ending = LineEnding::Lf;
    }

    let file = DirectEntryFile::build(&batch, &originator, &options)?;

    let path = match output {
        Some(p) => p,
        None => {
            let dir = resolve_output_dir(&config.file.output_dir, cfg_dir);
            fs::create_dir_all(&dir)?;
            dir.join(format!("{}.aba", batch.number))
        }
    };
    fs::write(&path, file.to_bytes())?;

    for warning in file.warnings() {
        eprintln!("Warning: {warning}");
    }

    let summary = file.summary();
    println!("Generated {}", batch.number);
    println!("  Records:  {}", summary.record_count);
    println!("  Credit:   {}", format_money(false, summary.credit_total));
    if !summary.excluded.is_empty() {
        println!(
            "  Excluded: {} ({})",
            summary.excluded.len(),
            summary.excluded.join(", ")
        );
    }
    println!("  Saved:    {}", path.display());

    Ok(())
}

/// Verify a Direct Entry file
fn cmd_verify(path: &Path, json: bool) -> Result<()> {
    let bytes = fs::read(path)?;
    let parsed = read_file(&bytes)?;

    if json {
        let content = serde_json::to_string_pretty(&parsed).map_err(|e| {
            AbaError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                e.to_string(),
            ))
        })?;
        println!("{content}");
        return Ok(());
    }

    let header = &parsed.header;
    println!("Originator:  {}", header.user_name);
    println!("Description: {}", header.description);
    if let Some(date) = header.processing_date {
        println!("Process on:  {}", date.format("%Y-%m-%d"));
    }

    if !parsed.details.is_empty() {
        let rows: Vec<DetailRow> = parsed
            .details
            .iter()
            .enumerate()
            .map(|(idx, d)| DetailRow {
                index: idx + 1,
                bsb: d.routing_code.clone(),
                account: d.account_number.clone(),
                name: d.account_name.clone(),
                reference: d.reference.clone(),
                code: d.transaction_code.clone(),
                amount: format_money(false, d.amount),
            })
            .collect();

        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
    }

    let footer = &parsed.footer;
    println!("Records: {}", footer.record_count);
    println!("Credit:  {}", format_money(false, footer.credit_total));
    println!("Debit:   {}", format_money(false, footer.debit_total));
    println!("Net:     {}", format_money(false, footer.net_total));
    println!("File OK");

    Ok(())
}
