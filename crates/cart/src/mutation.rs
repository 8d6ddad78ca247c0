//! Pure mutation planning.
//!
//! Each `plan_*` function takes the current cart plus inventory data that
//! has already been fetched and returns the cart that should be committed,
//! or the reason the mutation is rejected. Nothing here performs I/O, so the
//! validation rules are testable without any collaborators.

use std::num::NonZeroU32;

use rocketshoes_core::{Cart, Item, Product, ProductId, StockEntry};

use crate::error::{CartError, Result};

/// Validate a caller-supplied quantity.
///
/// # Errors
///
/// Returns [`CartError::InvalidAmount`] for zero, negative, or values that
/// do not fit a `u32`.
pub fn validate_amount(amount: i64) -> Result<NonZeroU32> {
    u32::try_from(amount)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or(CartError::InvalidAmount(amount))
}

/// Check that `requested` units of `stock.id` are available.
///
/// # Errors
///
/// Returns [`CartError::OutOfStock`] if `requested` exceeds the stock.
pub fn ensure_in_stock(requested: u64, stock: &StockEntry) -> Result<()> {
    if !stock.covers(requested) {
        return Err(CartError::OutOfStock {
            product_id: stock.id,
            requested,
            available: stock.amount,
        });
    }
    Ok(())
}

/// Amount an add would request for `id`: the current line amount plus one.
#[must_use]
pub fn requested_by_add(cart: &Cart, id: ProductId) -> u64 {
    cart.get(id).map_or(0, |line| u64::from(line.amount.get())) + 1
}

/// Add one unit to the existing line for `id`, keeping its position.
///
/// # Errors
///
/// - [`CartError::ProductNotFound`] if there is no line for `id`
/// - [`CartError::OutOfStock`] if the incremented amount exceeds stock
pub fn plan_increment(cart: &Cart, id: ProductId, stock: &StockEntry) -> Result<Cart> {
    let line = cart.get(id).ok_or(CartError::ProductNotFound(id))?;
    ensure_in_stock(requested_by_add(cart, id), stock)?;

    let amount = line
        .amount
        .checked_add(1)
        .ok_or_else(|| CartError::InvalidAmount(i64::from(line.amount.get()) + 1))?;

    cart.with_amount(id, amount)
        .ok_or(CartError::ProductNotFound(id))
}

/// Append a new line for `product` with an amount of one.
///
/// # Errors
///
/// - [`CartError::OutOfStock`] if the product has no stock
/// - [`CartError::ProductNotFound`] if the cart already has a line for the
///   product; existing lines go through [`plan_increment`]
pub fn plan_append(cart: &Cart, product: Product, stock: &StockEntry) -> Result<Cart> {
    ensure_in_stock(1, stock)?;

    let item = Item::from_product(product, NonZeroU32::MIN);
    let id = item.id;
    cart.with_appended(item)
        .map_err(|_| CartError::ProductNotFound(id))
}

/// Remove the line for `id`, keeping the order of the remaining lines.
///
/// # Errors
///
/// Returns [`CartError::ProductNotFound`] if there is no line for `id`.
pub fn plan_remove(cart: &Cart, id: ProductId) -> Result<Cart> {
    cart.without(id).ok_or(CartError::ProductNotFound(id))
}

/// Set the amount of the line for `id` to `amount` (an absolute total, not a
/// delta).
///
/// # Errors
///
/// - [`CartError::ProductNotFound`] if there is no line for `id`
/// - [`CartError::OutOfStock`] if `amount` exceeds the stock
pub fn plan_set_amount(
    cart: &Cart,
    id: ProductId,
    amount: NonZeroU32,
    stock: &StockEntry,
) -> Result<Cart> {
    if cart.get(id).is_none() {
        return Err(CartError::ProductNotFound(id));
    }
    ensure_in_stock(u64::from(amount.get()), stock)?;

    cart.with_amount(id, amount)
        .ok_or(CartError::ProductNotFound(id))
}
