//! buddy - TechBuddy storefront CLI

mod catalog;
mod chat;
mod checkout;
mod config;
mod ui;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use buddy_assistant::{AssistantClient, ChatWidget, ConversationContext, HttpTransport};
use buddy_store::{CartItem, CartStore, ConversationStore, FileStore, KeyValueStore, OrderStore};

/// buddy - browse the TechBuddy store and chat with its assistant
#[derive(Parser, Debug)]
#[command(name = "buddy")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalog products
    Catalog {
        /// Only show this category
        #[arg(long)]
        category: Option<String>,
        /// Substring search over names and descriptions
        #[arg(long)]
        search: Option<String>,
        /// Sort by ascending price
        #[arg(long)]
        sort_price: bool,
    },
    /// Show one product
    Show { id: String },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartCommand,
    },
    /// Chat with the assistant
    Chat {
        /// Product id to set as conversation context
        #[arg(long)]
        product: Option<String>,
    },
    /// Show an order confirmation
    Order { order_id: String },
    /// Initialize config file
    InitConfig,
}

#[derive(Subcommand, Debug)]
enum CartCommand {
    /// Add a catalog product to the cart
    Add {
        id: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product from the cart
    Remove { id: String },
    /// List cart contents
    List,
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup tracing
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("buddy_store=debug,buddy_assistant=debug")
            .init();
    }

    // Initialize config and exit
    if matches!(args.command, Command::InitConfig) {
        let path = config::Config::init()?;
        println!("Config file created at: {}", path.display());
        println!("\nExample config:\n{}", config::example_config());
        return Ok(());
    }

    let cfg = config::Config::load();
    let currency = cfg.currency();

    let kv: Arc<dyn KeyValueStore> = Arc::new(FileStore::open_default()?);
    let cart = CartStore::new(kv.clone());
    let orders = OrderStore::new(kv.clone());

    match args.command {
        Command::Catalog {
            category,
            search,
            sort_price,
        } => {
            let mut products: Vec<&catalog::Product> = match (&category, &search) {
                (Some(category), _) => catalog::by_category(category),
                (None, Some(query)) => catalog::search(query),
                (None, None) => catalog::all().iter().collect(),
            };
            if let (Some(_), Some(query)) = (&category, &search) {
                let query = query.to_lowercase();
                products.retain(|p| p.name.to_lowercase().contains(&query));
            }
            if sort_price {
                products = catalog::sorted_by_price(products);
            }

            if products.is_empty() {
                println!("No products found.");
            } else {
                let rows: Vec<Vec<String>> = std::iter::once(vec![
                    "ID".to_string(),
                    "Name".to_string(),
                    "Category".to_string(),
                    "Price".to_string(),
                ])
                .chain(products.iter().map(|p| {
                    vec![
                        p.id.to_string(),
                        p.name.to_string(),
                        p.category.to_string(),
                        ui::format_price(p.price, &currency),
                    ]
                }))
                .collect();
                print!("{}", ui::format_table(&rows));
            }
        }

        Command::Show { id } => match catalog::get(&id) {
            Some(product) => {
                println!("{} ({})", product.name, product.id);
                println!("Category: {}", product.category);
                println!("Price: {}", ui::format_price(product.price, &currency));
                println!("{}", product.description);
                println!("\nAsk the assistant about it: buddy chat --product {}", id);
            }
            None => {
                eprintln!("Unknown product: {}", id);
                std::process::exit(1);
            }
        },

        Command::Cart { action } => match action {
            CartCommand::Add { id, quantity } => {
                let Some(product) = catalog::get(&id) else {
                    eprintln!("Unknown product: {}", id);
                    std::process::exit(1);
                };
                cart.add(CartItem {
                    id: product.id.to_string(),
                    name: product.name.to_string(),
                    price: product.price,
                    quantity,
                    category: product.category.to_string(),
                })?;
                println!("Added {} x{} to the cart.", product.name, quantity);
            }
            CartCommand::Remove { id } => {
                cart.remove(&id)?;
                println!("Removed {} from the cart.", id);
            }
            CartCommand::List => {
                let items = cart.items();
                if items.is_empty() {
                    println!("Your cart is empty.");
                } else {
                    for item in &items {
                        println!(
                            "{} x{} - {}",
                            item.name,
                            item.quantity,
                            ui::format_price(item.price * item.quantity as f64, &currency)
                        );
                    }
                    println!("Total: {}", ui::format_price(cart.total(), &currency));
                }
            }
            CartCommand::Clear => {
                cart.clear()?;
                println!("Cart cleared.");
            }
        },

        Command::Chat { product } => {
            let context = match product.as_deref() {
                Some(id) => match catalog::get(id) {
                    Some(product) => product.context(),
                    None => {
                        eprintln!("Unknown product: {}", id);
                        std::process::exit(1);
                    }
                },
                None => ConversationContext::default(),
            };

            let endpoint = cfg.endpoint();
            if endpoint.api_key.is_empty() {
                eprintln!("Warning: no API key configured.");
                eprintln!("Set TECHBUDDY_API_KEY or add api_key to the config file (buddy init-config).");
            }

            let store = Arc::new(ConversationStore::new(kv.clone()));
            let transport = Arc::new(HttpTransport::new(endpoint));
            let client = AssistantClient::new(transport, store.clone());
            let widget = ChatWidget::new(client, store);

            chat::run_chat(&widget, &context, &orders, &cart, &currency).await?;
        }

        Command::Order { order_id } => match orders.get(&order_id) {
            Some(order) => print!("{}", ui::format_order(&order, &currency)),
            None => {
                eprintln!("Order not found: {}", order_id);
                std::process::exit(1);
            }
        },

        Command::InitConfig => unreachable!("handled above"),
    }

    Ok(())
}
