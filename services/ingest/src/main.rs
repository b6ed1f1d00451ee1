//! Bulk Ingest CLI - Parse a pasted spreadsheet block and import it
//!
//! Reads tab-delimited text from a file or stdin, prints what the unit's
//! parser recognized, and unless `--dry-run` writes the rows to Postgres.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::fs;
use tokio::io::AsyncReadExt;

use ingest::paste::decode_paste;
use ingest::store::PgStore;
use ingest::{import_rows, parse_paste, parser_for, Config, ParsedRow, UnitRegistry};

#[derive(Parser, Debug)]
#[command(name = "ingest", about = "Imports pasted spreadsheet rows as unit records")]
struct Args {
    /// Unit identifier (e.g. animal-feeds)
    #[arg(long)]
    unit: String,

    /// Paste file, or `-` for stdin
    #[arg(long, default_value = "-")]
    input: String,

    /// Province used when a row has none (overrides DEFAULT_PROVINCE)
    #[arg(long)]
    default_province: Option<String>,

    /// Caller identity recorded on every row and in the audit log
    #[arg(long, default_value = "cli")]
    created_by: String,

    /// Dry run - parse and preview only
    #[arg(long, default_value = "false")]
    dry_run: bool,

    /// Number of sample rows to print
    #[arg(long, default_value = "3")]
    preview: usize,

    /// Print the parsed rows in canonical tab-separated form
    #[arg(long, default_value = "false")]
    canonical: bool,

    /// Unit schema file (overrides UNIT_SCHEMA_PATH)
    #[arg(long)]
    schema: Option<PathBuf>,
}

async fn read_input(input: &str) -> Result<String> {
    let bytes = if input == "-" {
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .context("Failed to read stdin")?;
        buf
    } else {
        fs::read(input)
            .await
            .with_context(|| format!("Failed to read input file {}", input))?
    };
    Ok(decode_paste(&bytes))
}

fn print_sample(rows: &[ParsedRow], limit: usize) {
    for (i, row) in rows.iter().take(limit).enumerate() {
        let summary: Vec<String> = row
            .fields()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        println!("  [{}] {}", i + 1, summary.join(" | "));
    }
    if rows.len() > limit {
        println!("  ... and {} more", rows.len() - limit);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    ingest::init_tracing();
    let args = Args::parse();

    let mut config = Config::from_env().context("Invalid environment configuration")?;
    if let Some(path) = args.schema.clone() {
        config.unit_schema_path = Some(path);
    }
    let default_province = args
        .default_province
        .clone()
        .unwrap_or_else(|| config.default_province.clone());

    println!("=== Bulk Ingest ===");
    println!("Unit: {}", args.unit);
    println!("Input: {}", if args.input == "-" { "stdin" } else { args.input.as_str() });
    println!("Mode: {}", if args.dry_run { "dry-run" } else { "live" });

    let registry: UnitRegistry = config
        .load_registry()
        .await
        .context("Failed to load unit schema")?;

    let text = read_input(&args.input).await?;
    println!("Content size: {} bytes", text.len());

    let outcome = parse_paste(&registry, &args.unit, &text, &default_province)
        .context("Cannot parse paste")?;

    println!("\nParsed {} rows", outcome.rows.len());
    if let Some(warning) = &outcome.warning {
        println!("Warning: {}", warning);
        return Ok(());
    }
    print_sample(&outcome.rows, args.preview);

    if args.canonical {
        let parser = parser_for(&args.unit, &registry).context("Unknown unit")?;
        println!("\n{}", parser.serialize(&outcome.rows));
    }

    if args.dry_run {
        println!("\nDry run - no records saved to database");
        return Ok(());
    }

    let db_url = config.db_url().context("DB_URL env var missing")?;
    let store = PgStore::connect(db_url, config.max_connections)
        .await
        .context("Failed to connect to database")?;

    let summary = import_rows(&store, &store, &args.unit, &outcome.rows, &args.created_by)
        .await
        .context("Import failed")?;

    println!("\n=== Import Complete ===");
    println!("Attempted: {}", summary.attempted);
    println!("Succeeded: {}", summary.succeeded);
    println!("Failed:    {}", summary.failed);
    println!("{}", summary.message);

    Ok(())
}
