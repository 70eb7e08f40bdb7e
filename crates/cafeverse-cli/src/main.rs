mod account;
mod cart;
mod checkout;
mod menu;
mod orders;
mod storefront;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cart::CartCommands;
use crate::checkout::CheckoutArgs;
use crate::orders::{AdminCommands, OrdersCommands};
use crate::storefront::Storefront;

#[derive(Debug, Parser)]
#[command(name = "cafeverse")]
#[command(about = "Browse the café menu, manage your cart and place orders")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "CAFEVERSE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CAFEVERSE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        first_name: Option<String>,
    },
    /// Forget the saved session
    Logout,
    /// Show the menu
    Menu {
        /// Only this category (slug as shown in the listing)
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive match on item names
        #[arg(long)]
        search: Option<String>,
        /// Hide items priced above this amount
        #[arg(long)]
        max_price: Option<f64>,
    },
    /// Inspect or change the cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Place an order for the cart
    Checkout(CheckoutArgs),
    /// Your orders
    Orders {
        #[command(subcommand)]
        command: Option<OrdersCommands>,
        /// `all`, `pending`, `delivered`, `completed` or `cancelled`
        #[arg(long, default_value = "all")]
        status: cafeverse_core::StatusFilter,
    },
    /// Staff order management
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = cafeverse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let storefront = Storefront::open(config)?;

    let result = match cli.command {
        Commands::Login { username, password } => {
            account::run_login(&storefront, &username, &password).await
        }
        Commands::Signup {
            username,
            email,
            password,
            first_name,
        } => {
            let request = cafeverse_api::SignupRequest {
                username,
                email,
                password,
                first_name,
            };
            account::run_signup(&storefront, &request).await
        }
        Commands::Logout => account::run_logout(&storefront),
        Commands::Menu {
            category,
            search,
            max_price,
        } => {
            let filter = cafeverse_core::MenuFilter {
                category,
                name_query: search,
                max_price,
            };
            menu::run_menu(&storefront, &filter).await
        }
        Commands::Cart { command } => cart::run_cart(&storefront, command).await,
        Commands::Checkout(args) => checkout::run_checkout(&storefront, args).await,
        Commands::Orders { command, status } => {
            orders::run_orders(&storefront, command, status).await
        }
        Commands::Admin { command } => orders::run_admin(&storefront, command).await,
    };

    storefront.report_login_request();
    result
}
