//! In-process inventory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rocketshoes_core::{Product, ProductId, StockEntry};

use super::{Inventory, InventoryError};

/// Inventory backed by in-memory tables.
///
/// Clones share the same tables, so a test can keep a handle and change
/// stock levels while a [`CartStore`](crate::CartStore) owns another.
#[derive(Clone, Default)]
pub struct InMemoryInventory {
    inner: Arc<Mutex<Tables>>,
}

#[derive(Default)]
struct Tables {
    products: HashMap<ProductId, Product>,
    stock: HashMap<ProductId, u32>,
    offline: bool,
}

impl InMemoryInventory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `product` with `stock` units available.
    #[must_use]
    pub fn with_product(self, product: Product, stock: u32) -> Self {
        self.insert(product, stock);
        self
    }

    /// Register or replace `product` with `stock` units available.
    pub fn insert(&self, product: Product, stock: u32) {
        let mut tables = self.lock();
        tables.stock.insert(product.id, stock);
        tables.products.insert(product.id, product);
    }

    /// Change the available stock of an existing or new product.
    pub fn set_stock(&self, id: ProductId, amount: u32) {
        self.lock().stock.insert(id, amount);
    }

    /// Make every lookup fail with [`InventoryError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lookup<T>(
        &self,
        id: ProductId,
        read: impl FnOnce(&Tables) -> Option<T>,
    ) -> Result<T, InventoryError> {
        let tables = self.lock();
        if tables.offline {
            return Err(InventoryError::Unavailable("inventory is offline".to_string()));
        }
        read(&tables).ok_or(InventoryError::NotFound(id))
    }
}

impl Inventory for InMemoryInventory {
    async fn get_stock(&self, id: ProductId) -> Result<StockEntry, InventoryError> {
        self.lookup(id, |tables| {
            tables.stock.get(&id).map(|&amount| StockEntry::new(id, amount))
        })
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, InventoryError> {
        self.lookup(id, |tables| tables.products.get(&id).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocketshoes_core::Price;

    use super::*;

    fn sneaker(id: i32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Tênis {id}"),
            price: Price::from_cents(17990),
            image: String::new(),
        }
    }

    #[tokio::test]
    async fn test_lookup_and_stock_changes() {
        let inventory = InMemoryInventory::new().with_product(sneaker(1), 5);
        let handle = inventory.clone();

        assert_eq!(inventory.get_stock(ProductId::new(1)).await.unwrap().amount, 5);
        handle.set_stock(ProductId::new(1), 2);
        assert_eq!(inventory.get_stock(ProductId::new(1)).await.unwrap().amount, 2);
        assert_eq!(
            inventory.get_product(ProductId::new(1)).await.unwrap().title,
            "Tênis 1"
        );
    }

    #[tokio::test]
    async fn test_missing_product() {
        let inventory = InMemoryInventory::new();
        assert_eq!(
            inventory.get_stock(ProductId::new(4)).await,
            Err(InventoryError::NotFound(ProductId::new(4)))
        );
    }

    #[tokio::test]
    async fn test_offline() {
        let inventory = InMemoryInventory::new().with_product(sneaker(1), 5);
        inventory.set_offline(true);
        assert!(matches!(
            inventory.get_product(ProductId::new(1)).await,
            Err(InventoryError::Unavailable(_))
        ));
    }
}
