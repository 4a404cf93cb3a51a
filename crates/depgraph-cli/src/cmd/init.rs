use anyhow::{Context as _, Result};
use clap::Args;
use depgraph_core::SqliteStore;
use tracing::info;

use super::StoreArgs;

#[derive(Args, Debug)]
pub struct InitArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}

/// Execute `dg init`: create the database, or bring an existing one up to
/// the latest schema.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrated.
pub fn run_init(args: &InitArgs) -> Result<()> {
    let existed = args.store.db.exists();
    let store = SqliteStore::open(&args.store.db)
        .with_context(|| format!("Failed to initialize {}", args.store.db.display()))?;
    let tickets = store.ticket_count()?;
    let schema = store.schema_version()?;
    info!(path = %args.store.db.display(), tickets, schema, "ticket database ready");

    if existed {
        println!(
            "Ticket database {} is up to date ({tickets} tickets, schema v{schema})",
            args.store.db.display()
        );
    } else {
        println!(
            "Created ticket database {} (schema v{schema})",
            args.store.db.display()
        );
    }
    Ok(())
}
