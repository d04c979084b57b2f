//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod preorder;
pub mod quote;

use bazaar_commerce::pricing::{DeliveryArea, PaymentMethod};
use clap::{Args, Subcommand};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// List products.
    List {
        /// Only products in this category or subcategory.
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show a product with its variants and related products.
    Show {
        /// Product ID.
        id: String,
    },
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Add a product to the cart.
    Add {
        /// Product ID.
        product: String,

        /// Variant ID (defaults to the product's first variant).
        #[arg(long)]
        variant: Option<String>,

        /// Quantity.
        #[arg(short, long, default_value = "1")]
        quantity: i64,
    },
    /// Show the cart.
    Show,
    /// Set a line's quantity (0 removes it).
    Update {
        /// Line ID from `cart show`.
        line: String,
        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line.
    Remove {
        /// Line ID from `cart show`.
        line: String,
    },
    /// Empty the cart.
    Clear,
}

/// Arguments for the preorder command.
#[derive(Args)]
pub struct PreorderArgs {
    #[command(subcommand)]
    pub command: PreorderCommand,
}

#[derive(Subcommand)]
pub enum PreorderCommand {
    /// Put a product in the preorder slot, replacing any previous one.
    Set {
        /// Product ID.
        product: String,

        /// Variant ID.
        #[arg(long)]
        variant: Option<String>,

        /// Quantity.
        #[arg(short, long, default_value = "1")]
        quantity: i64,

        /// Unit price override, e.g. "4500" or "4500.50".
        #[arg(long)]
        price: Option<String>,
    },
    /// Show the preorder item.
    Show,
    /// Empty the preorder slot.
    Clear,
}

/// Arguments for the quote command.
#[derive(Args)]
pub struct QuoteArgs {
    /// Delivery area: inside_dhaka or outside_dhaka.
    #[arg(short, long)]
    pub area: Option<DeliveryArea>,

    /// Payment method: cod, bkash or nagad.
    #[arg(short, long, default_value = "cod")]
    pub payment: PaymentMethod,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Full name.
    #[arg(long, default_value = "")]
    pub name: String,

    /// 11-digit mobile number.
    #[arg(long, default_value = "")]
    pub phone: String,

    /// Delivery address.
    #[arg(long, default_value = "")]
    pub address: String,

    /// Delivery area: inside_dhaka or outside_dhaka.
    #[arg(long)]
    pub area: Option<DeliveryArea>,

    /// Payment method: cod, bkash or nagad.
    #[arg(long, default_value = "cod")]
    pub payment: PaymentMethod,

    /// bKash/Nagad transaction ID.
    #[arg(long, default_value = "")]
    pub txn: String,

    /// Delivery notes.
    #[arg(long)]
    pub notes: Option<String>,

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
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
