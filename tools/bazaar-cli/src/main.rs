//! Bazaar CLI - a terminal storefront.
//!
//! Commands:
//! - `bazaar catalog` - Browse products
//! - `bazaar cart` - Manage the shopping cart
//! - `bazaar preorder` - Manage the preorder item
//! - `bazaar quote` - Price the current order
//! - `bazaar checkout` - Place the order
//! - `bazaar config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{CartArgs, CatalogArgs, CheckoutArgs, ConfigArgs, PreorderArgs, QuoteArgs};

/// Bazaar CLI - browse, fill a cart and check out
#[derive(Parser)]
#[command(name = "bazaar")]
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

    /// Session ID (defaults to the remembered session)
    #[arg(long, global = true)]
    session: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog(CatalogArgs),

    /// Manage the shopping cart
    Cart(CartArgs),

    /// Manage the preorder item
    Preorder(PreorderArgs),

    /// Show the order summary
    Quote(QuoteArgs),

    /// Place the order
    Checkout(CheckoutArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);
    let ctx = match context::Context::load(cli.config.as_deref(), cli.session, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let filter = if cli.verbose {
        "debug"
    } else {
        ctx.config.logging.filter.as_str()
    };
    if let Err(e) = bazaar_observability::init_tracing(ctx.config.logging.format, Some(filter)) {
        ctx.output.debug(&e.to_string());
    }
    tracing::debug!(config = ?ctx.config_path, "configuration loaded");

    let result = match cli.command {
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Preorder(args) => commands::preorder::run(args, &ctx).await,
        Commands::Quote(args) => commands::quote::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
