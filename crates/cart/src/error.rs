//! Unified error handling for cart mutations.
//!
//! Every [`CartStore`](crate::CartStore) operation returns
//! `Result<Cart, CartError>`. Collaborator failures ([`InventoryError`],
//! [`StoreError`]) are folded into the four cart error kinds, and each kind
//! maps to a short user-facing message that is sent to the
//! [`Notifier`](crate::Notifier).

use rocketshoes_core::ProductId;
use thiserror::Error;

use crate::inventory::InventoryError;
use crate::storage::StoreError;

/// Message shown when a quantity cannot be served.
pub const OUT_OF_STOCK_MESSAGE: &str = "Requested quantity is out of stock";

/// Error type for cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The requested amount exceeds available stock.
    #[error("requested {requested} of product {product_id}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// The product is missing from the catalog, or from the cart when the
    /// operation requires an existing line.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// Non-positive or out of range quantity.
    #[error("invalid amount: {0}")]
    InvalidAmount(i64),

    /// The inventory service or the snapshot store failed.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Tag identifying a [`CartError`] variant without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartErrorKind {
    OutOfStock,
    ProductNotFound,
    InvalidAmount,
    ServiceUnavailable,
}

/// The cart mutation being performed, used to pick the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AddItem,
    RemoveItem,
    UpdateAmount,
}

impl Operation {
    /// Stable name for log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddItem => "add_item",
            Self::RemoveItem => "remove_item",
            Self::UpdateAmount => "update_amount",
        }
    }
}

impl CartError {
    #[must_use]
    pub const fn kind(&self) -> CartErrorKind {
        match self {
            Self::OutOfStock { .. } => CartErrorKind::OutOfStock,
            Self::ProductNotFound(_) => CartErrorKind::ProductNotFound,
            Self::InvalidAmount(_) => CartErrorKind::InvalidAmount,
            Self::ServiceUnavailable(_) => CartErrorKind::ServiceUnavailable,
        }
    }

    /// Message to surface to the shopper when `operation` fails with `self`.
    ///
    /// Internal details (service errors, IDs) are never exposed.
    #[must_use]
    pub const fn user_message(&self, operation: Operation) -> &'static str {
        match (self, operation) {
            (Self::OutOfStock { .. }, _) | (Self::InvalidAmount(_), Operation::UpdateAmount) => {
                OUT_OF_STOCK_MESSAGE
            }
            (_, Operation::AddItem) => "Error adding product",
            (_, Operation::RemoveItem) => "Error removing product",
            (_, Operation::UpdateAmount) => "Error changing product amount",
        }
    }
}

impl From<InventoryError> for CartError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NotFound(id) => Self::ProductNotFound(id),
            InventoryError::Unavailable(reason) => Self::ServiceUnavailable(reason),
        }
    }
}

impl From<StoreError> for CartError {
    fn from(err: StoreError) -> Self {
        Self::ServiceUnavailable(err.to_string())
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
