//! `dg render`: one render per invocation.
//!
//! Like the wiki macro, a failed render prints the short failure text in
//! place of the graph and exits successfully. `--strict` turns the failure
//! into a non-zero exit instead.

use anyhow::Result;
use chrono::Local;
use clap::{Args, ValueEnum};
use depgraph_core::{DEFAULT_BASE_URL, MacroCall, Options, Renderer, SqliteStore};
use tracing::{info, warn};

use super::{OptionArgs, StoreArgs};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RenderFormat {
    /// Graph text inside the `{{{ #!graphviz ... }}}` block.
    #[default]
    Wiki,
    /// Bare Graphviz text.
    Dot,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub options: OptionArgs,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Prefix for ticket URLs; the ticket id is appended.
    #[arg(long, default_value = DEFAULT_BASE_URL, value_name = "URL")]
    pub base_url: String,

    /// Output format.
    #[arg(long, value_enum, default_value_t = RenderFormat::Wiki)]
    pub format: RenderFormat,

    /// Exit non-zero on render failure instead of printing the failure text.
    #[arg(long)]
    pub strict: bool,
}

/// Execute `dg render`.
///
/// # Errors
///
/// Returns an error if the config file or database cannot be opened, or, with
/// `--strict`, if the render fails.
pub fn run_render(args: &RenderArgs) -> Result<()> {
    let (defaults, named) = args.options.layers()?;
    let store = SqliteStore::open_read_only(args.store.require_existing()?)?;
    let renderer = Renderer::new(store).with_base_url(args.base_url.as_str());

    let call = MacroCall {
        defaults: Some(&defaults),
        content: args.options.content.as_deref(),
        args: Some(&named),
    };
    let now = Local::now();
    let result = match args.format {
        RenderFormat::Wiki => renderer.try_expand_macro(&call, &now),
        RenderFormat::Dot => Options::resolve_call(call.defaults, call.content, call.args, &now)
            .and_then(|options| renderer.render(&options)),
    };

    match result {
        Ok(text) => {
            info!(bytes = text.len(), "rendered graph");
            print!("{text}");
            Ok(())
        }
        Err(err) if args.strict => Err(err.into()),
        Err(err) => {
            warn!(code = %err.code(), "render failed");
            println!("{}", err.failure_text());
            Ok(())
        }
    }
}
