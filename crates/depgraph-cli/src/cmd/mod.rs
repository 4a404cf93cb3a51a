//! Subcommand handlers and the argument groups they share.

pub mod import;
pub mod init;
pub mod options;
pub mod render;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use depgraph_core::OptionMap;

use crate::config;

/// Where the ticket database lives.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Path to the SQLite ticket database.
    #[arg(long, env = "DEPGRAPH_DB", default_value = "depgraph.db", value_name = "PATH")]
    pub db: PathBuf,
}

impl StoreArgs {
    /// Fail early when the database has not been created yet.
    pub fn require_existing(&self) -> Result<&Path> {
        anyhow::ensure!(
            self.db.exists(),
            "ticket database {} not found; run `dg init` first",
            self.db.display()
        );
        Ok(&self.db)
    }
}

/// Option overrides, lowest to highest precedence: config file, `--content`,
/// positional `KEY=VALUE` pairs.
#[derive(Args, Debug, Clone, Default)]
pub struct OptionArgs {
    /// Option overrides, e.g. `milestone=1.0` or `fontsize=10`.
    #[arg(value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub pairs: Vec<(String, String)>,

    /// Macro argument text, e.g. `milestone=1.0|2.0, debug=1`.
    #[arg(long, value_name = "TEXT")]
    pub content: Option<String>,

    /// TOML file with default options. Defaults to the user config file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl OptionArgs {
    /// Config-file defaults and the explicit argument map.
    pub fn layers(&self) -> Result<(OptionMap, OptionMap)> {
        let defaults = config::load(self.config.as_deref())?;
        let named = self.pairs.iter().cloned().collect();
        Ok((defaults, named))
    }
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing option name in `{raw}`"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
