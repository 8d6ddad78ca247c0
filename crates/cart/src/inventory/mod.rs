//! Inventory service: stock levels and catalog metadata.
//!
//! The cart only ever reads from the inventory. Two implementations ship
//! with the crate:
//!
//! - [`HttpInventory`] talks to a json-server style REST API
//!   (`GET /stock/{id}`, `GET /products/{id}`) and caches catalog metadata.
//! - [`InMemoryInventory`] keeps everything in process, for tests and demos.
//!
//! Callers must not assume whether lookups are served per item or in bulk.

mod http;
mod memory;

use std::future::Future;

use rocketshoes_core::{Product, ProductId, StockEntry};
use thiserror::Error;

pub use http::HttpInventory;
pub use memory::InMemoryInventory;

/// Errors that can occur when querying the inventory service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// The product does not exist in the catalog.
    #[error("product {0} not found in inventory")]
    NotFound(ProductId),

    /// The service could not be reached or returned an unusable answer.
    #[error("inventory unavailable: {0}")]
    Unavailable(String),
}

/// Read-only view of the remote inventory.
pub trait Inventory: Send + Sync {
    /// Current stock for `id`.
    fn get_stock(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<StockEntry, InventoryError>> + Send;

    /// Catalog metadata (title, price, image) for `id`.
    fn get_product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Product, InventoryError>> + Send;
}
