//! Emberwick CLI - Catalog inspection and cart-sync demo.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog, optionally filtered by category
//! emberwick-cli catalog list
//! emberwick-cli catalog list -c seasonal
//!
//! # List browsing categories
//! emberwick-cli catalog categories
//!
//! # Walk the guest -> login -> checkout flow against in-memory stores
//! emberwick-cli demo
//! ```
//!
//! # Commands
//!
//! - `catalog` - Inspect the static product catalog
//! - `demo` - Run the cart reconciliation walkthrough

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "emberwick-cli")]
#[command(author, version, about = "Emberwick CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Run the cart-sync walkthrough against in-memory stores
    Demo,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Only show products in this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List browsing categories
    Categories,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List { category } => commands::catalog::list(category.as_deref()),
            CatalogAction::Categories => commands::catalog::categories(),
        },
        Commands::Demo => commands::demo::run().await?,
    }
    Ok(())
}
