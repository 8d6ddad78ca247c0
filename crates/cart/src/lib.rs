//! RocketShoes cart library.
//!
//! Owns the shopping cart and keeps it consistent with a remote inventory:
//! a line's requested amount never exceeds the stock observed when the line
//! was last changed. Every change is persisted as a complete snapshot before
//! it becomes visible.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::{CartConfig, CartStore, FileStore, HttpInventory, TracingNotifier};
//!
//! let config = CartConfig::from_env()?;
//! let inventory = HttpInventory::new(&config.inventory)?;
//! let store = FileStore::from_config(&config.storage);
//! let cart = CartStore::open(inventory, store, TracingNotifier).await?;
//!
//! cart.add_item(ProductId::new(1)).await?;
//! cart.update_amount(ProductId::new(1), 3).await?;
//! cart.remove_item(ProductId::new(1)).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod inventory;
pub mod mutation;
pub mod notify;
pub mod storage;
pub mod store;

pub use config::{CartConfig, ConfigError, InventoryConfig, StorageConfig};
pub use error::{CartError, CartErrorKind, Operation};
pub use inventory::{HttpInventory, InMemoryInventory, Inventory, InventoryError};
pub use notify::{MemoryNotifier, Notifier, TracingNotifier};
pub use storage::{FileStore, MemoryStore, SnapshotStore, StoreError};
pub use store::CartStore;
