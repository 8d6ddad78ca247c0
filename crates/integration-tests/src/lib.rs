//! Integration tests for the RocketShoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - End-to-end cart behaviour against the file store
//! - `cart_properties` - Property tests over random operation sequences
//! - `http_inventory` - The REST inventory client against a fake server
//!
//! This library holds the shared fixtures.

use std::num::NonZeroU32;

use rocketshoes_core::{Cart, Item, Price, Product, ProductId};

/// A catalog product with a predictable title, price and image.
#[must_use]
pub fn sneaker(id: i32) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Tênis {id}"),
        price: Price::from_cents(10_000 + i64::from(id) * 990),
        image: format!("https://rocketshoes.example.com/img/{id}.jpg"),
    }
}

/// Build a cart from `(id, amount)` pairs using [`sneaker`] metadata.
///
/// # Panics
///
/// Panics if an amount is zero or an ID repeats.
#[must_use]
#[allow(clippy::expect_used)]
pub fn cart_of(lines: &[(i32, u32)]) -> Cart {
    Cart::from_items(
        lines
            .iter()
            .map(|&(id, amount)| {
                Item::from_product(
                    sneaker(id),
                    NonZeroU32::new(amount).expect("amount must be positive"),
                )
            })
            .collect(),
    )
    .expect("lines must be unique")
}

/// `(id, amount)` pairs of a cart, in order.
#[must_use]
pub fn amounts(cart: &Cart) -> Vec<(i32, u32)> {
    cart.items()
        .iter()
        .map(|item| (item.id.as_i32(), item.amount.get()))
        .collect()
}
