use std::io::Read as _;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Args;
use depgraph_core::{Link, SqliteStore, Ticket};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::StoreArgs;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON file to load; `-` reads stdin.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Output report in JSON format.
    #[arg(long)]
    pub json: bool,
}

/// Import file layout.
#[derive(Debug, Default, Deserialize)]
struct ImportFile {
    #[serde(default)]
    tickets: Vec<Ticket>,
    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Debug, Serialize)]
struct ImportReport {
    tickets: usize,
    links: usize,
    total_tickets: usize,
}

fn read_input(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

/// Execute `dg import`. Tickets and links are written in one transaction.
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed, or the write fails.
pub fn run_import(args: &ImportArgs) -> Result<()> {
    let raw = read_input(&args.file)?;
    let input: ImportFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", args.file.display()))?;

    let mut store = SqliteStore::open(&args.store.db)?;
    store.import(&input.tickets, &input.links)?;

    let report = ImportReport {
        tickets: input.tickets.len(),
        links: input.links.len(),
        total_tickets: store.ticket_count()?,
    };
    info!(
        tickets = report.tickets,
        links = report.links,
        "import complete"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Imported {} tickets and {} links ({} tickets total)",
            report.tickets, report.links, report.total_tickets
        );
    }
    Ok(())
}
