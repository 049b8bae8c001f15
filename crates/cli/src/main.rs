//! Kasuwa CLI - browse, sell and chat on the Kasuwa marketplace from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (the token is kept in KASUWA_SESSION_FILE)
//! KASUWA_PASSWORD=... kasuwa login -e ada@kasuwa.ng
//!
//! # Search the catalog
//! kasuwa products search ankara --min-price "₦1,000" --page 2
//!
//! # List a product with two variants and one image
//! kasuwa products add -n "Ankara fabric" -d "Six yards" -p "₦1,250.50" \
//!     --category fashion --subcategory fabrics \
//!     --variant "Blue;40;10-49@₦1,200|50-@₦1,000" --variant "Red;;5-@₦1,300" \
//!     --image front.jpg
//!
//! # Chat
//! kasuwa chat send c-42 "Is this still available?"
//! ```
//!
//! # Environment Variables
//!
//! - `KASUWA_API_URL` - Marketplace API origin (required)
//! - `KASUWA_PASSWORD` - Password for `login`, `signup` and `password-reset confirm`
//! - `RUST_LOG` - Log filter (default: `kasuwa=info,kasuwa_client=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod session;

use error::CliError;

#[derive(Parser)]
#[command(name = "kasuwa")]
#[command(author, version, about = "Kasuwa marketplace CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and keep the session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(long, env = "KASUWA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(short, long)]
        email: String,

        /// Nigerian phone number (e.g. 0803 123 4567)
        #[arg(long)]
        phone: String,

        #[arg(long, value_enum, default_value = "buyer")]
        role: Role,

        #[arg(long, env = "KASUWA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the session
    Logout,
    /// One-time passcodes
    Otp {
        #[command(subcommand)]
        action: OtpAction,
    },
    /// Reset a forgotten password
    PasswordReset {
        #[command(subcommand)]
        action: PasswordResetAction,
    },
    /// Account management
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Show the category tree
    Categories,
    /// Search, view and manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Saved products
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Conversations
    Chat {
        #[command(subcommand)]
        action: ChatAction,
    },
    /// Seller wallet
    Wallet {
        #[command(subcommand)]
        action: WalletAction,
    },
    /// Your profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Role {
    Buyer,
    Seller,
}

#[derive(Subcommand)]
enum OtpAction {
    /// Send a code by email or SMS
    Send {
        /// Email address or phone number
        destination: String,
    },
    /// Verify a received code
    Verify {
        /// Email address or phone number the code was sent to
        destination: String,

        /// Six-digit code
        code: String,
    },
}

#[derive(Subcommand)]
enum PasswordResetAction {
    /// Email a reset code
    Request {
        #[arg(short, long)]
        email: String,
    },
    /// Set a new password with the emailed code
    Confirm {
        #[arg(short, long)]
        email: String,

        /// Six-digit code
        #[arg(short, long)]
        code: String,

        /// New password
        #[arg(long, env = "KASUWA_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Permanently delete the signed-in account
    Delete {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Search the catalog
    Search {
        /// Search text
        query: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        subcategory: Option<String>,

        #[arg(long)]
        brand: Option<String>,

        /// Lowest price (e.g. "₦1,000")
        #[arg(long, default_value = "")]
        min_price: String,

        /// Highest price
        #[arg(long, default_value = "")]
        max_price: String,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show one product
    Show { id: String },
    /// Your listings
    Mine {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// List a new product (goes to review)
    Add(commands::products::AddArgs),
    /// Edit a listing
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// New price (e.g. "₦1,250.50")
        #[arg(long)]
        price: Option<String>,

        #[arg(long)]
        stock: Option<u32>,
    },
    /// Remove a listing
    Delete { id: String },
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show saved products
    List,
    /// Save a product
    Add { id: String },
    /// Remove a saved product
    Remove { id: String },
}

#[derive(Subcommand)]
enum ChatAction {
    /// List conversations
    List,
    /// Show a conversation
    Show { id: String },
    /// Send a message
    Send { id: String, text: String },
    /// Share one of your products into a conversation
    Share {
        id: String,

        /// Product id
        #[arg(short, long)]
        product: String,

        /// Optional note
        #[arg(long, default_value = "")]
        note: String,
    },
}

#[derive(Subcommand)]
enum WalletAction {
    /// Available and pending balance
    Balance,
    /// Transaction history
    Transactions {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show your profile
    Show,
    /// Edit name or phone
    Update {
        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },
    /// Set where you trade from
    Location {
        #[arg(long)]
        state: String,

        #[arg(long)]
        lga: String,

        #[arg(long)]
        area: String,
    },
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kasuwa=info,kasuwa_client=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = commands::Context::from_env()?;

    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&ctx, &email, password).await,
        Commands::Signup {
            first_name,
            last_name,
            email,
            phone,
            role,
            password,
        } => {
            let role = match role {
                Role::Buyer => kasuwa_core::UserRole::Buyer,
                Role::Seller => kasuwa_core::UserRole::Seller,
            };
            commands::auth::signup(&ctx, first_name, last_name, &email, &phone, role, password)
                .await
        }
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::Otp { action } => match action {
            OtpAction::Send { destination } => commands::auth::send_otp(&ctx, &destination).await,
            OtpAction::Verify { destination, code } => {
                commands::auth::verify_otp(&ctx, &destination, &code).await
            }
        },
        Commands::PasswordReset { action } => match action {
            PasswordResetAction::Request { email } => {
                commands::auth::request_password_reset(&ctx, &email).await
            }
            PasswordResetAction::Confirm {
                email,
                code,
                password,
            } => commands::auth::confirm_password_reset(&ctx, email, code, password).await,
        },
        Commands::Account { action } => match action {
            AccountAction::Delete { yes } => commands::auth::delete_account(&ctx, yes).await,
        },
        Commands::Categories => commands::products::categories(&ctx).await,
        Commands::Products { action } => match action {
            ProductAction::Search {
                query,
                category,
                subcategory,
                brand,
                min_price,
                max_price,
                page,
            } => {
                let search = commands::products::SearchArgs {
                    query,
                    category,
                    subcategory,
                    brand,
                    min_price,
                    max_price,
                    page,
                };
                commands::products::search(&ctx, search).await
            }
            ProductAction::Show { id } => commands::products::show(&ctx, &id).await,
            ProductAction::Mine { page } => commands::products::mine(&ctx, page).await,
            ProductAction::Add(args) => commands::products::add(&ctx, args).await,
            ProductAction::Update {
                id,
                name,
                description,
                price,
                stock,
            } => commands::products::update(&ctx, &id, name, description, price, stock).await,
            ProductAction::Delete { id } => commands::products::delete(&ctx, &id).await,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::List => commands::wishlist::list(&ctx).await,
            WishlistAction::Add { id } => commands::wishlist::add(&ctx, &id).await,
            WishlistAction::Remove { id } => commands::wishlist::remove(&ctx, &id).await,
        },
        Commands::Chat { action } => match action {
            ChatAction::List => commands::chat::list(&ctx).await,
            ChatAction::Show { id } => commands::chat::show(&ctx, &id).await,
            ChatAction::Send { id, text } => commands::chat::send(&ctx, &id, &text).await,
            ChatAction::Share { id, product, note } => {
                commands::chat::share(&ctx, &id, &product, note).await
            }
        },
        Commands::Wallet { action } => match action {
            WalletAction::Balance => commands::wallet::balance(&ctx).await,
            WalletAction::Transactions { page } => commands::wallet::transactions(&ctx, page).await,
        },
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(&ctx).await,
            ProfileAction::Update {
                first_name,
                last_name,
                phone,
            } => commands::profile::update(&ctx, first_name, last_name, phone).await,
            ProfileAction::Location { state, lga, area } => {
                commands::profile::location(&ctx, &state, &lga, &area).await
            }
        },
    }
}
