//! The cart store: owner of the authoritative cart.
//!
//! # Mutation protocol
//!
//! Every operation follows the same steps while holding the cart lock:
//!
//! 1. **Validate** - query the inventory and plan the new snapshot with the
//!    pure functions in [`crate::mutation`].
//! 2. **Commit** - save the new snapshot to the [`SnapshotStore`], then swap
//!    it in as the in-memory cart.
//!
//! If either step fails the in-memory cart and the stored snapshot are left
//! exactly as they were, the [`Notifier`] receives a user-facing message, and
//! the typed [`CartError`] is returned.
//!
//! The lock is a `tokio::sync::Mutex`, which queues waiters in FIFO order, so
//! concurrent callers on a shared store are serialized and no two mutations
//! ever interleave their validate-then-commit windows.

use std::sync::Arc;

use rocketshoes_core::{Cart, ProductId};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, instrument};

use crate::error::{CartError, Operation, Result};
use crate::inventory::Inventory;
use crate::mutation;
use crate::notify::Notifier;
use crate::storage::{SnapshotStore, StoreError};

/// Stock-checked, persisted shopping cart.
///
/// Cheap to clone; clones share the same cart and collaborators.
pub struct CartStore<I, S, N> {
    inner: Arc<CartStoreInner<I, S, N>>,
}

struct CartStoreInner<I, S, N> {
    inventory: I,
    store: S,
    notifier: N,
    cart: Mutex<Cart>,
}

impl<I, S, N> Clone for CartStore<I, S, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I, S, N> CartStore<I, S, N>
where
    I: Inventory,
    S: SnapshotStore,
    N: Notifier,
{
    /// Open the cart, rehydrating it from `store` if a snapshot exists.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the snapshot cannot be read or is corrupt.
    #[instrument(skip_all)]
    pub async fn open(inventory: I, store: S, notifier: N) -> std::result::Result<Self, StoreError> {
        let cart = store.load().await?.unwrap_or_default();
        info!(lines = cart.len(), "Cart opened");

        Ok(Self {
            inner: Arc::new(CartStoreInner {
                inventory,
                store,
                notifier,
                cart: Mutex::new(cart),
            }),
        })
    }

    /// Snapshot of the current cart.
    pub async fn cart(&self) -> Cart {
        self.inner.cart.lock().await.clone()
    }

    /// Add one unit of `id` to the cart.
    ///
    /// Appends a new line (with catalog metadata) if the product is not in
    /// the cart yet, otherwise increments the existing line in place.
    ///
    /// # Errors
    ///
    /// - [`CartError::OutOfStock`] if the resulting amount exceeds stock
    /// - [`CartError::ProductNotFound`] if the product is not in the catalog
    /// - [`CartError::ServiceUnavailable`] on inventory or storage failure
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn add_item(&self, id: ProductId) -> Result<Cart> {
        let mut cart = self.inner.cart.lock().await;
        let planned = self.plan_add(&cart, id).await;
        self.finish(Operation::AddItem, &mut cart, planned).await
    }

    /// Remove the line for `id`.
    ///
    /// # Errors
    ///
    /// - [`CartError::ProductNotFound`] if the cart has no line for `id`;
    ///   nothing is persisted in that case
    /// - [`CartError::ServiceUnavailable`] on storage failure
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn remove_item(&self, id: ProductId) -> Result<Cart> {
        let mut cart = self.inner.cart.lock().await;
        let planned = mutation::plan_remove(&cart, id);
        self.finish(Operation::RemoveItem, &mut cart, planned).await
    }

    /// Set the amount of the line for `id` to `amount`.
    ///
    /// The new amount is persisted even when it equals the current one.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidAmount`] if `amount` is not positive
    /// - [`CartError::ProductNotFound`] if the cart has no line for `id`
    /// - [`CartError::OutOfStock`] if `amount` exceeds stock
    /// - [`CartError::ServiceUnavailable`] on inventory or storage failure
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn update_amount(&self, id: ProductId, amount: i64) -> Result<Cart> {
        let mut cart = self.inner.cart.lock().await;
        let planned = self.plan_update(&cart, id, amount).await;
        self.finish(Operation::UpdateAmount, &mut cart, planned).await
    }

    async fn plan_add(&self, cart: &Cart, id: ProductId) -> Result<Cart> {
        let stock = self.inner.inventory.get_stock(id).await?;
        mutation::ensure_in_stock(mutation::requested_by_add(cart, id), &stock)?;

        if cart.get(id).is_some() {
            return mutation::plan_increment(cart, id, &stock);
        }

        let product = self.inner.inventory.get_product(id).await?;
        mutation::plan_append(cart, product, &stock)
    }

    async fn plan_update(&self, cart: &Cart, id: ProductId, amount: i64) -> Result<Cart> {
        let amount = mutation::validate_amount(amount)?;
        if cart.get(id).is_none() {
            return Err(CartError::ProductNotFound(id));
        }

        let stock = self.inner.inventory.get_stock(id).await?;
        mutation::plan_set_amount(cart, id, amount, &stock)
    }

    /// Commit a planned cart, or report why it was rejected.
    async fn finish(
        &self,
        operation: Operation,
        current: &mut MutexGuard<'_, Cart>,
        planned: Result<Cart>,
    ) -> Result<Cart> {
        let committed = match planned {
            Ok(next) => self.commit(current, next).await,
            Err(e) => Err(e),
        };

        match committed {
            Ok(cart) => {
                info!(
                    operation = operation.as_str(),
                    lines = cart.len(),
                    total_quantity = cart.total_quantity(),
                    "Cart updated"
                );
                Ok(cart)
            }
            Err(e) => {
                if matches!(e, CartError::ServiceUnavailable(_)) {
                    tracing::error!(operation = operation.as_str(), error = %e, "Cart mutation failed");
                } else {
                    tracing::warn!(operation = operation.as_str(), error = %e, "Cart mutation rejected");
                }
                self.inner.notifier.report(e.user_message(operation));
                Err(e)
            }
        }
    }

    /// Persist `next`, then make it the authoritative cart.
    async fn commit(&self, current: &mut MutexGuard<'_, Cart>, next: Cart) -> Result<Cart> {
        self.inner.store.save(&next).await?;
        **current = next.clone();
        Ok(next)
    }
}
