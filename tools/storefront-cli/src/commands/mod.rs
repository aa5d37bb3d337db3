//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;

use clap::{Args, Subcommand};

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Case-insensitive search over title and description.
    #[arg(short, long)]
    pub query: Option<String>,

    /// Sort key: relevance, price-asc or price-desc.
    #[arg(short, long, default_value = "relevance")]
    pub sort: String,

    /// Reverse the sorted list.
    #[arg(short, long)]
    pub reverse: bool,

    /// Show at most N products (0 for all).
    #[arg(short, long, default_value_t = 0)]
    pub limit: usize,
}

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    /// Product handle.
    pub handle: String,
}

/// Arguments for the collection command.
#[derive(Args)]
pub struct CollectionArgs {
    /// Collection handle.
    pub handle: String,

    /// Case-insensitive search within the collection.
    #[arg(short, long)]
    pub query: Option<String>,

    /// Sort key: relevance, price-asc or price-desc.
    #[arg(short, long, default_value = "relevance")]
    pub sort: String,

    /// Reverse the sorted list.
    #[arg(short, long)]
    pub reverse: bool,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart.
    Show,
    /// Add one unit of a variant.
    Add {
        /// Variant id, e.g. 1-1.
        variant: String,
    },
    /// Set the quantity of a line (0 removes it).
    Update {
        /// Line id or variant id.
        line: String,
        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line.
    Remove {
        /// Line id or variant id.
        line: String,
    },
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
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
    /// Write a default storefront.toml.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}
