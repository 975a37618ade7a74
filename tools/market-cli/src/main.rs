//! Market CLI - drive the marketplace cart from a terminal.
//!
//! Commands:
//! - `market add` - Add one unit of a product
//! - `market increment` - Add one unit to an existing entry
//! - `market decrement` - Remove one unit, dropping the entry at zero
//! - `market list` - Show the cart
//! - `market reset` - Empty the cart and delete its snapshot
//! - `market config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{AddArgs, ConfigArgs, QuantityArgs};

/// Market CLI - Manage the persistent marketplace cart
#[derive(Parser)]
#[command(name = "market")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of a product to the cart
    Add(AddArgs),

    /// Add one unit to a cart entry
    Increment(QuantityArgs),

    /// Remove one unit from a cart entry
    Decrement(QuantityArgs),

    /// Show the cart
    List,

    /// Empty the cart and delete its stored snapshot
    Reset,

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    logging::init_logging(&ctx.config.log, cli.verbose);

    // Execute command
    let result = match cli.command {
        Commands::Add(args) => commands::add::run(args, &ctx).await,
        Commands::Increment(args) => commands::quantity::increment(args, &ctx).await,
        Commands::Decrement(args) => commands::quantity::decrement(args, &ctx).await,
        Commands::List => commands::list::run(&ctx).await,
        Commands::Reset => commands::reset::run(&ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
