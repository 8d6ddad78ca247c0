//! Command implementations and shared setup.

pub mod cart;

use std::path::PathBuf;

use rocketshoes_cart::config::parse_base_url;
use rocketshoes_cart::{
    CartConfig, CartError, CartStore, FileStore, HttpInventory, StoreError, TracingNotifier,
};
use thiserror::Error;

/// Cart wired to the HTTP inventory, the snapshot file, and log notifications.
pub type CliCart = CartStore<HttpInventory, FileStore, TracingNotifier>;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// A command-line flag has an invalid value.
    #[error("Invalid value for --{0}: {1}")]
    InvalidArgument(&'static str, String),

    /// The HTTP client could not be created.
    #[error("Failed to create inventory client: {0}")]
    Client(#[from] reqwest::Error),

    /// The saved cart could not be read.
    #[error("Failed to open cart: {0}")]
    Store(#[from] StoreError),

    /// The cart rejected the mutation.
    #[error("{0}")]
    Cart(#[from] CartError),
}

/// Apply command-line overrides on top of the environment configuration.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` if `api_url` is not an http(s) URL.
pub fn apply_overrides(
    config: &mut CartConfig,
    data_dir: Option<PathBuf>,
    api_url: Option<&str>,
) -> Result<(), CliError> {
    if let Some(dir) = data_dir {
        config.storage.data_dir = dir;
    }
    if let Some(raw) = api_url {
        config.inventory.base_url =
            parse_base_url(raw).map_err(|e| CliError::InvalidArgument("api-url", e))?;
    }
    Ok(())
}

/// Open the cart described by `config`.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or the saved cart
/// cannot be loaded.
pub async fn open_cart(config: &CartConfig) -> Result<CliCart, CliError> {
    let inventory = HttpInventory::new(&config.inventory)?;
    let store = FileStore::from_config(&config.storage);
    tracing::debug!(path = %store.path().display(), inventory = %inventory.base_url(), "Opening cart");

    Ok(CartStore::open(inventory, store, TracingNotifier).await?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocketshoes_cart::{InventoryConfig, StorageConfig};

    use super::*;

    fn config() -> CartConfig {
        CartConfig {
            inventory: InventoryConfig::new(parse_base_url("http://localhost:3333").unwrap()),
            storage: StorageConfig::default(),
            sentry_dsn: None,
        }
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = config();
        apply_overrides(
            &mut config,
            Some(PathBuf::from("/tmp/cart")),
            Some("https://inventory.example.com"),
        )
        .unwrap();

        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/cart"));
        assert_eq!(
            config.inventory.base_url.as_str(),
            "https://inventory.example.com/"
        );
    }

    #[test]
    fn test_apply_overrides_rejects_bad_url() {
        let mut config = config();
        let err = apply_overrides(&mut config, None, Some("localhost:3333")).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument("api-url", _)));
        assert_eq!(config.inventory.base_url.as_str(), "http://localhost:3333/");
    }

    #[test]
    fn test_no_overrides() {
        let mut config = config();
        apply_overrides(&mut config, None, None).unwrap();
        assert_eq!(config.storage, StorageConfig::default());
    }
}
