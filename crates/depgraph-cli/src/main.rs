#![forbid(unsafe_code)]

mod cmd;
mod config;

use clap::{Parser, Subcommand};
use std::env;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "dg: ticket dependency graphs for Graphviz",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Create or migrate the ticket database",
        after_help = "EXAMPLES:\n    # Create depgraph.db in the current directory\n    dg init\n\n    # Use another location\n    dg init --db tracker/tickets.db"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        about = "Load tickets and blocking links from JSON",
        long_about = "Load tickets and blocking links from a JSON file ({\"tickets\": [...], \"links\": [...]}). Existing tickets with the same id are replaced.",
        after_help = "EXAMPLES:\n    # Import a tracker export\n    dg import tickets.json\n\n    # Read from stdin\n    cat tickets.json | dg import -"
    )]
    Import(cmd::import::ImportArgs),

    #[command(
        about = "Render the dependency graph",
        long_about = "Render the blocking-link graph as a wiki graphviz block, or as bare DOT text with --format dot.",
        after_help = "EXAMPLES:\n    # Render everything\n    dg render\n\n    # One milestone, no ticket numbers\n    dg render milestone=1.0 show_ticket_number=0\n\n    # Macro-style argument text\n    dg render --content 'milestone=1.0|1.1, debug=1'\n\n    # Feed Graphviz directly\n    dg render --format dot | dot -Tsvg > deps.svg"
    )]
    Render(cmd::render::RenderArgs),

    #[command(
        about = "Print the resolved option set",
        after_help = "EXAMPLES:\n    # Show defaults merged with the config file\n    dg options\n\n    # Check how arguments merge\n    dg options --content 'fontsize=10' fontsize=14"
    )]
    Options(cmd::options::OptionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("DEPGRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "depgraph_core=debug,dg=debug,info"
        } else {
            "depgraph_core=info,dg=info,warn"
        })
    });

    let format = env::var("DEPGRAPH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        debug!("verbose mode enabled");
    }

    match cli.command {
        Commands::Init(args) => cmd::init::run_init(&args),
        Commands::Import(args) => cmd::import::run_import(&args),
        Commands::Render(args) => cmd::render::run_render(&args),
        Commands::Options(args) => cmd::options::run_options(&args),
    }
}
