//! Imprenta CLI - Inspect and edit the persisted cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart with standard shipping applied
//! imprenta-cli cart show --shipping standard
//!
//! # Add two units of a product
//! imprenta-cli cart add --product-id 7 --name "Tarjetas" --price 1000 --stock 5 --quantity 2
//!
//! # Set the quantity of a line
//! imprenta-cli cart set <ITEM_ID> 3
//!
//! # Empty the cart
//! imprenta-cli cart clear --yes
//!
//! # List shipping options and slides
//! imprenta-cli shipping list
//! imprenta-cli slider list --all
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and edit the cart stored at `CART_STORAGE_PATH`
//! - `shipping list` - Print the shipping table
//! - `slider list` - Print the seeded slides

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;

#[derive(Parser)]
#[command(name = "imprenta-cli")]
#[command(author, version, about = "Imprenta storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and edit the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Shipping options
    Shipping {
        #[command(subcommand)]
        action: ShippingAction,
    },
    /// Home page slider
    Slider {
        #[command(subcommand)]
        action: SliderAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the line items and totals
    Show {
        /// Shipping option used for the totals
        #[arg(short, long)]
        shipping: Option<String>,
    },
    /// Add a product to the cart
    Add {
        /// Catalog product id
        #[arg(long)]
        product_id: i32,

        /// Product name
        #[arg(short, long)]
        name: String,

        /// Unit price in pesos
        #[arg(short, long)]
        price: Decimal,

        /// Units available for sale
        #[arg(short, long)]
        stock: u32,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a line (0 or less removes it)
    Set {
        /// Line item id
        item_id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove {
        /// Line item id
        item_id: String,
    },
    /// Empty the cart
    Clear {
        /// Skip the confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ShippingAction {
    /// List shipping options
    List,
}

#[derive(Subcommand)]
enum SliderAction {
    /// List slides
    List {
        /// Include inactive slides
        #[arg(short, long)]
        all: bool,
    },
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
        Commands::Cart { action } => {
            let mut session = commands::cart::CartSession::open()?;
            match action {
                CartAction::Show { shipping } => session.show(shipping.as_deref()),
                CartAction::Add {
                    product_id,
                    name,
                    price,
                    stock,
                    quantity,
                } => session.add(product_id, &name, price, stock, quantity),
                CartAction::Set { item_id, quantity } => session.set(&item_id, quantity)?,
                CartAction::Remove { item_id } => session.remove(&item_id)?,
                CartAction::Clear { yes } => session.clear(yes).await?,
            }
        }
        Commands::Shipping { action } => match action {
            ShippingAction::List => commands::shipping::list(),
        },
        Commands::Slider { action } => match action {
            SliderAction::List { all } => commands::slider::list(all).await?,
        },
    }
    Ok(())
}
