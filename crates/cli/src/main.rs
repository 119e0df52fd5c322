//! Shopfront CLI - browse the catalog and drive the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # List products, newest first
//! shop-cli catalog list --sort newest
//!
//! # Add two of product 3 to the cart, then show it
//! shop-cli cart add 3 -q 2
//! shop-cli cart show
//!
//! # Check out with shipping/payment details from a YAML file
//! shop-cli checkout --details order.yaml
//! ```
//!
//! # Commands
//!
//! - `catalog` - List, show and facet catalog products
//! - `cart` - Show and change the cart shared with the storefront server
//! - `checkout` - Place a simulated order for the current cart
//!
//! Reads the same `STOREFRONT_*` environment variables as the server, so
//! both operate on one cart when they share `STOREFRONT_STORAGE_DIR`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shopfront_core::ProductId;

mod commands;

#[derive(Parser)]
#[command(name = "shop-cli")]
#[command(author, version, about = "Shopfront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for the current cart
    Checkout {
        /// YAML file with the checkout form fields
        #[arg(short, long)]
        details: PathBuf,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Only products in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Match title, description or tags
        #[arg(short, long)]
        search: Option<String>,

        /// price-asc, price-desc, rating, newest, oldest, popular, featured
        #[arg(long)]
        sort: Option<String>,

        /// Maximum price, e.g. 99.50 or '$1,200'
        #[arg(long)]
        price_max: Option<String>,

        /// Only products with stock
        #[arg(long)]
        in_stock: bool,

        #[arg(long)]
        page: Option<usize>,

        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one product by slug or title
    Show { slug: String },
    /// List every category
    Categories,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show items and totals
    Show,
    /// Add a product by id
    Add {
        product_id: ProductId,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity (0 or less removes it)
    Set {
        product_id: ProductId,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove { product_id: ProductId },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = commands::Context::from_env()?;

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List {
                category,
                search,
                sort,
                price_max,
                in_stock,
                page,
                limit,
            } => {
                let query = commands::catalog::ListArgs {
                    category,
                    search,
                    sort,
                    price_max,
                    in_stock,
                    page,
                    limit,
                };
                commands::catalog::list(&ctx, query).await?;
            }
            CatalogAction::Show { slug } => commands::catalog::show(&ctx, &slug).await?,
            CatalogAction::Categories => commands::catalog::categories(&ctx).await?,
        },
        Commands::Cart { action } => {
            let mut cart = ctx.open_cart()?;
            match action {
                CartAction::Show => commands::cart::show(&cart),
                CartAction::Add {
                    product_id,
                    quantity,
                } => commands::cart::add(&ctx, &mut cart, product_id, quantity).await?,
                CartAction::Set {
                    product_id,
                    quantity,
                } => commands::cart::set(&mut cart, product_id, quantity),
                CartAction::Remove { product_id } => commands::cart::remove(&mut cart, product_id),
                CartAction::Clear => commands::cart::clear(&mut cart),
            }
        }
        Commands::Checkout { details } => {
            let mut cart = ctx.open_cart()?;
            commands::checkout::run(&ctx, &mut cart, &details).await?;
        }
    }
    Ok(())
}
