use anyhow::Result;
use chrono::Local;
use clap::Args;
use depgraph_core::Options;

use super::OptionArgs;

#[derive(Args, Debug)]
pub struct OptionsArgs {
    #[command(flatten)]
    pub options: OptionArgs,
}

/// Execute `dg options`: resolve the layers and print the result as JSON.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded or an option value
/// is invalid.
pub fn run_options(args: &OptionsArgs) -> Result<()> {
    let (defaults, named) = args.options.layers()?;
    let options = Options::resolve_call(
        Some(&defaults),
        args.options.content.as_deref(),
        Some(&named),
        &Local::now(),
    )?;
    println!("{}", serde_json::to_string_pretty(&options)?);
    Ok(())
}
