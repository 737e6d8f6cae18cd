//! Souk CLI - Browse the catalog, review orders and check out a cart.
//!
//! # Usage
//!
//! ```bash
//! # List stores whose name contains "carrefour"
//! souk stores --search carrefour
//!
//! # Browse a store
//! souk categories STORE_ID
//! souk products STORE_ID CATEGORY_ID
//!
//! # Order history, optionally filtered by status
//! souk orders USER_ID --status delivered
//!
//! # Account details, and changing the phone number on file
//! souk profile USER_ID
//! souk phone USER_ID 98123456
//!
//! # Preview, then place, a delivery order from a cart file
//! souk checkout --store STORE_ID --user USER_ID --cart cart.yaml \
//!     --destination "Rue de Marseille, Tunis" --lat 36.80 --lng 10.18 --dry-run
//! ```
//!
//! # Environment Variables
//!
//! See `souk_client::config` for the full list; `SOUK_API_URL` is required.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use souk_client::{ApiClient, ClientConfig};
use souk_core::{CategoryId, OrderFilter, OrderType, PhoneNumber, StoreId, UserId};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CliError;
use commands::checkout::CheckoutArgs;

#[derive(Parser)]
#[command(name = "souk")]
#[command(author, version, about = "Souk grocery delivery CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stores
    Stores {
        /// Only show stores whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List the categories of a store
    Categories {
        store_id: String,

        /// Only show categories whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List the products of a category
    Products { store_id: String, category_id: String },
    /// List a user's orders
    Orders {
        user_id: String,

        /// Order status to show (`all`, `pending`, `processing`, `delivered`, `cancelled`)
        #[arg(long, default_value = "all")]
        status: OrderFilter,
    },
    /// Show a user's profile
    Profile { user_id: String },
    /// Set a user's mobile phone number
    Phone {
        user_id: String,

        /// Tunisian mobile number, with or without the `+216` prefix
        number: PhoneNumber,
    },
    /// Build a cart from a YAML file and place the order
    Checkout {
        /// Store the order is placed with
        #[arg(long)]
        store: String,

        /// User placing the order
        #[arg(long)]
        user: String,

        /// YAML file listing `{ id, name, unitPrice, image, quantity }` entries
        #[arg(long)]
        cart: PathBuf,

        /// Collect at the store instead of delivery
        #[arg(long)]
        pickup: bool,

        /// Delivery address
        #[arg(long, requires_all = ["lat", "lng"])]
        destination: Option<String>,

        /// Delivery latitude
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Delivery longitude
        #[arg(long, allow_negative_numbers = true)]
        lng: Option<f64>,

        /// Print the order payload instead of submitting it
        #[arg(long)]
        dry_run: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration is loaded before tracing so Sentry can be initialized first
    let config = ClientConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "souk=info,souk_client=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli, &config).await {
        e.report();
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), CliError> {
    let api = ApiClient::new(config)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Stores { search } => {
            commands::catalog::stores(&api, search.as_deref(), &mut out).await?;
        }
        Commands::Categories { store_id, search } => {
            commands::catalog::categories(&api, &StoreId::new(store_id), search.as_deref(), &mut out)
                .await?;
        }
        Commands::Products {
            store_id,
            category_id,
        } => {
            commands::catalog::products(
                &api,
                &StoreId::new(store_id),
                &CategoryId::new(category_id),
                &mut out,
            )
            .await?;
        }
        Commands::Orders { user_id, status } => {
            commands::orders::list(&api, &UserId::new(user_id), &status, &mut out).await?;
        }
        Commands::Profile { user_id } => {
            commands::profile::show(&api, &UserId::new(user_id), &mut out).await?;
        }
        Commands::Phone { user_id, number } => {
            commands::profile::set_phone(&api, &UserId::new(user_id), &number, &mut out).await?;
        }
        Commands::Checkout {
            store,
            user,
            cart,
            pickup,
            destination,
            lat,
            lng,
            dry_run,
        } => {
            let args = CheckoutArgs {
                store_id: StoreId::new(store),
                user_id: UserId::new(user),
                cart_file: cart,
                order_type: if pickup {
                    OrderType::Pickup
                } else {
                    OrderType::Delivery
                },
                address: destination,
                latitude: lat,
                longitude: lng,
                dry_run,
            };
            commands::checkout::run(api, args, &mut out).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_destination_requires_coordinates() {
        let result = Cli::try_parse_from([
            "souk", "checkout", "--store", "s1", "--user", "u1", "--cart", "cart.yaml",
            "--destination", "Tunis",
        ]);
        assert!(result.is_err());

        let result = Cli::try_parse_from([
            "souk", "checkout", "--store", "s1", "--user", "u1", "--cart", "cart.yaml",
            "--destination", "Tunis", "--lat", "36.8", "--lng", "10.18",
        ]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_orders_status_parses_filter() {
        let cli = Cli::try_parse_from(["souk", "orders", "u1", "--status", "Delivered"]);
        let Ok(Cli {
            command: Commands::Orders { status, .. },
        }) = cli
        else {
            panic!("expected orders command");
        };
        assert_eq!(status, OrderFilter::Status(souk_core::OrderStatus::Delivered));
    }

    #[test]
    fn test_phone_number_is_validated_on_parse() {
        let cli = Cli::try_parse_from(["souk", "phone", "u1", "+21655123456"]);
        let Ok(Cli {
            command: Commands::Phone { number, .. },
        }) = cli
        else {
            panic!("expected phone command");
        };
        assert_eq!(number.national(), "55123456");

        assert!(Cli::try_parse_from(["souk", "phone", "u1", "71123456"]).is_err());
        assert!(Cli::try_parse_from(["souk", "phone", "u1", "5512"]).is_err());
    }
}
