//! RocketShoes CLI - cart management from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the persisted cart
//! rs-cli cart show
//!
//! # Add one unit of product 3
//! rs-cli cart add 3
//!
//! # Set product 3's quantity to 2
//! rs-cli cart update 3 2
//!
//! # Remove product 3
//! rs-cli cart remove 3
//! ```
//!
//! Reads the same environment as the storefront server (`STORE_API_URL`,
//! `CART_STORAGE_DIR`, `CART_STORAGE_KEY`, ...), so both work on the same
//! persisted cart. The cart listing goes to stdout and logs go to stderr.
//! Rejected operations are reported as notices and leave the cart unchanged;
//! the command itself still succeeds.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocketshoes_core::ProductId;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "rs-cli")]
#[command(author, version, about = "RocketShoes CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and change the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartCommand,
    },
}

#[derive(Subcommand)]
enum CartCommand {
    /// List the cart's line items
    Show,
    /// Print the number of distinct products
    Count,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set a product's quantity (zero or less is ignored)
    Update {
        /// Product ID
        product_id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rs_cli=info,rocketshoes=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Cart { action } => {
            let mut provider = commands::cart::open()?;
            match action {
                CartCommand::Show => {}
                CartCommand::Count => {
                    commands::cart::count(&provider);
                    return Ok(());
                }
                CartCommand::Add { product_id } => provider.add_product(product_id).await,
                CartCommand::Remove { product_id } => provider.remove_product(product_id),
                CartCommand::Update { product_id, amount } => {
                    commands::cart::update(&mut provider, product_id, amount).await;
                }
            }
            commands::cart::show(&provider);
        }
    }
    Ok(())
}
