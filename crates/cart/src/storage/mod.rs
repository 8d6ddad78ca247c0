//! Durable single-slot storage for the cart snapshot.
//!
//! The store holds exactly one value: the last committed [`Cart`], encoded
//! as a JSON array of items. `save` replaces the whole snapshot atomically;
//! there is never a partially written cart on disk.
//!
//! # Implementations
//!
//! | Store | Use Case |
//! |-------|----------|
//! | [`FileStore`] | Default; a JSON file under the data directory |
//! | [`MemoryStore`] | Tests; can be told to fail writes |

mod file;
mod memory;

use std::future::Future;

use rocketshoes_core::Cart;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors that can occur when loading or saving a snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the underlying medium failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cart could not be encoded.
    #[error("failed to serialize cart: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The stored snapshot is not a valid cart.
    #[error("stored cart snapshot is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
}

/// Single-slot durable register for the cart snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Read the last saved snapshot, or `None` if nothing was ever saved.
    fn load(&self) -> impl Future<Output = Result<Option<Cart>, StoreError>> + Send;

    /// Replace the stored snapshot with `cart`.
    fn save(&self, cart: &Cart) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Encode a cart as its persisted JSON form.
pub(crate) fn encode(cart: &Cart) -> Result<String, StoreError> {
    serde_json::to_string(cart).map_err(StoreError::Serialization)
}

/// Decode a persisted snapshot, validating the cart invariants.
pub(crate) fn decode(raw: &str) -> Result<Cart, StoreError> {
    serde_json::from_str(raw).map_err(StoreError::Corrupt)
}
