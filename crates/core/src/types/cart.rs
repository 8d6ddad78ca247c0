//! Cart lines and the cart snapshot.
//!
//! A [`Cart`] is an ordered sequence of [`Item`]s, unique by product ID. It is
//! treated as an immutable snapshot: every builder method returns a new cart
//! and leaves `self` untouched, so a rejected mutation can never leave a
//! half-applied cart behind.
//!
//! On disk a cart is a JSON array of items:
//!
//! ```json
//! [{"id": 1, "title": "Tênis", "price": 179.9, "image": "https://...", "amount": 2}]
//! ```

use std::collections::HashSet;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// Errors raised when a sequence of items does not form a valid cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartInvariantError {
    /// Two lines share the same product ID.
    #[error("duplicate cart line for product {0}")]
    DuplicateLine(ProductId),
}

/// One purchase line: catalog metadata plus the requested quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Product image URL.
    pub image: String,
    /// Requested quantity; never zero.
    pub amount: NonZeroU32,
}

impl Item {
    /// Create a line for `product` with the given quantity.
    #[must_use]
    pub fn from_product(product: Product, amount: NonZeroU32) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            amount,
        }
    }

    /// Line subtotal (`price × amount`).
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.amount.get())
    }
}

/// The ordered, ID-unique collection of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Item>", into = "Vec<Item>")]
pub struct Cart {
    items: Vec<Item>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from a sequence of lines, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`CartInvariantError::DuplicateLine`] if two lines share an ID.
    pub fn from_items(items: Vec<Item>) -> Result<Self, CartInvariantError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id) {
                return Err(CartInvariantError::DuplicateLine(item.id));
            }
        }
        Ok(Self { items })
    }

    /// All lines, in cart order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The line for `id`, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Index of the line for `id`, if present.
    #[must_use]
    pub fn position(&self, id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all requested quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount.get())).sum()
    }

    /// Sum of all line subtotals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(Item::subtotal).sum()
    }

    /// A new cart with `item` appended at the end.
    ///
    /// # Errors
    ///
    /// Returns [`CartInvariantError::DuplicateLine`] if a line for the same
    /// product already exists.
    pub fn with_appended(&self, item: Item) -> Result<Self, CartInvariantError> {
        if self.get(item.id).is_some() {
            return Err(CartInvariantError::DuplicateLine(item.id));
        }
        let mut items = self.items.clone();
        items.push(item);
        Ok(Self { items })
    }

    /// A new cart with the amount of line `id` replaced, keeping its position.
    ///
    /// Returns `None` if there is no line for `id`.
    #[must_use]
    pub fn with_amount(&self, id: ProductId, amount: NonZeroU32) -> Option<Self> {
        let index = self.position(id)?;
        let mut items = self.items.clone();
        if let Some(line) = items.get_mut(index) {
            line.amount = amount;
        }
        Some(Self { items })
    }

    /// A new cart without line `id`, keeping the order of the rest.
    ///
    /// Returns `None` if there is no line for `id`.
    #[must_use]
    pub fn without(&self, id: ProductId) -> Option<Self> {
        self.position(id)?;
        let items = self
            .items
            .iter()
            .filter(|item| item.id != id)
            .cloned()
            .collect();
        Some(Self { items })
    }
}

impl TryFrom<Vec<Item>> for Cart {
    type Error = CartInvariantError;

    fn try_from(items: Vec<Item>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<Item> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
