//! Cart Calc CLI - shopping cart calculator and shopping list.
//!
//! # Usage
//!
//! ```bash
//! # Add two line items and show the total
//! cart-calc cart add Milk -q 2 -p 3.50
//! cart-calc cart add Bread -p 5
//! cart-calc cart show
//!
//! # Keep a checklist
//! cart-calc list add Eggs -q 12
//! cart-calc list toggle 1
//! cart-calc list clear --completed
//! ```
//!
//! Items are referenced by id or by their position in `show` output.
//! State is saved after every change (see `cart_calc_store::AppConfig`
//! for the environment variables).

#![cfg_attr(not(test), forbid(unsafe_code))]

use cart_calc_store::{AppConfig, AppState};
use clap::{ArgGroup, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "cart-calc")]
#[command(author, version, about = "Shopping cart calculator and shopping list")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the shopping list
    List {
        #[command(subcommand)]
        action: ListAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a line item
    Add {
        /// Item name
        name: String,

        /// Quantity
        #[arg(short, long, default_value = "1")]
        quantity: String,

        /// Unit price
        #[arg(short, long)]
        price: String,
    },
    /// Edit a line item
    #[command(group(ArgGroup::new("fields").required(true).multiple(true)))]
    Edit {
        /// Item id or position
        reference: String,

        /// New name
        #[arg(long, group = "fields")]
        name: Option<String>,

        /// New quantity
        #[arg(long, group = "fields")]
        quantity: Option<String>,

        /// New unit price
        #[arg(long, group = "fields")]
        price: Option<String>,
    },
    /// Remove a line item
    Remove {
        /// Item id or position
        reference: String,
    },
    /// Remove every line item
    Clear,
    /// Show the items and the total
    Show,
}

#[derive(Subcommand)]
enum ListAction {
    /// Add an item
    Add {
        /// Item name
        name: String,

        /// Quantity
        #[arg(short, long, default_value = "1")]
        quantity: String,
    },
    /// Edit an item
    #[command(group(ArgGroup::new("fields").required(true).multiple(true)))]
    Edit {
        /// Item id or position
        reference: String,

        /// New name
        #[arg(long, group = "fields")]
        name: Option<String>,

        /// New quantity
        #[arg(long, group = "fields")]
        quantity: Option<String>,

        /// Completed flag (true or false)
        #[arg(long, group = "fields")]
        completed: Option<bool>,
    },
    /// Mark an item as done, or as not done
    Toggle {
        /// Item id or position
        reference: String,
    },
    /// Remove an item
    Remove {
        /// Item id or position
        reference: String,
    },
    /// Remove every item
    Clear {
        /// Only remove completed items
        #[arg(long)]
        completed: bool,
    },
    /// Show the items and progress
    Show,
}

fn main() {
    // Load .env file if present so RUST_LOG can come from it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Log to stderr, keeping stdout for command output.
fn init_tracing(json: bool) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cart_calc=info".into());

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = AppConfig::from_env()?;
    let mut state = AppState::new(config)?;
    let currency = state.config().currency;

    let output = match cli.command {
        Commands::Cart { action } => {
            let cart = state.stores_mut().cart_mut();
            match action {
                CartAction::Add {
                    name,
                    quantity,
                    price,
                } => commands::cart::add(cart, currency, &name, &quantity, &price)?,
                CartAction::Edit {
                    reference,
                    name,
                    quantity,
                    price,
                } => commands::cart::edit(
                    cart,
                    currency,
                    &reference,
                    name.as_deref(),
                    quantity.as_deref(),
                    price.as_deref(),
                )?,
                CartAction::Remove { reference } => {
                    commands::cart::remove(cart, currency, &reference)?
                }
                CartAction::Clear => commands::cart::clear(cart),
                CartAction::Show => commands::cart::show(cart, currency),
            }
        }
        Commands::List { action } => {
            let list = state.stores_mut().shopping_list_mut();
            match action {
                ListAction::Add { name, quantity } => commands::list::add(list, &name, &quantity)?,
                ListAction::Edit {
                    reference,
                    name,
                    quantity,
                    completed,
                } => commands::list::edit(
                    list,
                    &reference,
                    name.as_deref(),
                    quantity.as_deref(),
                    completed,
                )?,
                ListAction::Toggle { reference } => commands::list::toggle(list, &reference)?,
                ListAction::Remove { reference } => commands::list::remove(list, &reference)?,
                ListAction::Clear { completed } => commands::list::clear(list, completed),
                ListAction::Show => commands::list::show(list),
            }
        }
    };

    print_output(&output);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_output(output: &str) {
    println!("{output}");
}
