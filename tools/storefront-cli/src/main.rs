//! Storefront CLI - browse the catalog, fill a cart and check out.
//!
//! The CLI plays the browser: it keeps the cookie jar between runs and
//! replays the `Set-Cookie` headers each action produces.
//!
//! Commands:
//! - `storefront products` - List and search products
//! - `storefront product` - Show one product
//! - `storefront collections` - List collections
//! - `storefront collection` - List the products of a collection
//! - `storefront cart` - Show and change the cart
//! - `storefront checkout` - Place an order
//! - `storefront config` - Manage configuration

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{CartArgs, CheckoutArgs, CollectionArgs, ConfigArgs, ProductArgs, ProductsArgs};

/// Storefront CLI - shop the ACME store from the terminal
#[derive(Parser)]
#[command(name = "storefront")]
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
    /// List products, optionally searched and sorted
    Products(ProductsArgs),

    /// Show a product by handle
    Product(ProductArgs),

    /// List collections
    Collections,

    /// List the products of a collection
    Collection(CollectionArgs),

    /// Show or change the cart
    Cart(CartArgs),

    /// Place an order for the cart
    Checkout(CheckoutArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let output = output::Output::new(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Products(args) => commands::catalog::products(args, &ctx).await,
        Commands::Product(args) => commands::catalog::product(args, &ctx).await,
        Commands::Collections => commands::catalog::collections(&ctx).await,
        Commands::Collection(args) => commands::catalog::collection(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins; otherwise warnings, or debug with
/// `--verbose`.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,storefront_core=debug,storefront_cache=debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();
}
