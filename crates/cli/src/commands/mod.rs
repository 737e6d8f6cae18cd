//! Subcommand implementations.
//!
//! Each command writes its human-readable output to the `out` writer it is
//! given, so tests can capture it. Diagnostics go through `tracing`.

pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod profile;

use souk_client::ApiError;
use souk_core::ProductId;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Backend request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Reading the cart file or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cart file is not valid YAML for a cart.
    #[error("Invalid cart file: {0}")]
    CartFile(#[from] serde_yaml::Error),

    /// Order payload could not be rendered.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A delivery order was requested without a drop-off point.
    #[error("Delivery orders need --destination, --lat and --lng")]
    MissingDestination,

    /// A cart file entry asks for more units than one order may hold.
    #[error("Quantity {quantity} of {product_id} exceeds the limit of {max}")]
    QuantityTooLarge {
        product_id: ProductId,
        quantity: u32,
        max: u32,
    },
}

impl CliError {
    /// Log the error, capturing backend failures to Sentry.
    pub fn report(&self) {
        match self {
            Self::Api(e) => e.report(),
            _ => tracing::error!(error = %self, "Command failed"),
        }
    }
}
