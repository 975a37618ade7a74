//! CLI command implementations.

pub mod add;
pub mod config;
pub mod list;
pub mod quantity;
pub mod reset;

use clap::{Args, Subcommand};

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product ID.
    #[arg(long)]
    pub id: String,

    /// Product title.
    #[arg(short, long)]
    pub title: String,

    /// Product image URL.
    #[arg(long, default_value = "")]
    pub image_url: String,

    /// Unit price.
    #[arg(short, long)]
    pub price: f64,
}

/// Arguments for the increment and decrement commands.
#[derive(Args)]
pub struct QuantityArgs {
    /// Product ID.
    pub id: String,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
