//! Cart commands.
//!
//! Each mutation prints the resulting cart on success. On failure the cart
//! has already reported a user-facing message through its notifier; the
//! error is returned so the process exits non-zero.

use std::fmt::Write as _;

use rocketshoes_cart::CartError;
use rocketshoes_core::{Cart, ProductId};

use super::CliCart;

/// Print the current cart.
pub async fn show(cart: &CliCart) {
    print_cart(&cart.cart().await);
}

/// Add one unit of `id` and print the cart.
///
/// # Errors
///
/// Returns the `CartError` if the cart rejected the addition.
pub async fn add(cart: &CliCart, id: ProductId) -> Result<(), CartError> {
    let updated = cart.add_item(id).await?;
    print_cart(&updated);
    Ok(())
}

/// Remove the line for `id` and print the cart.
///
/// # Errors
///
/// Returns the `CartError` if the cart has no such line or cannot be saved.
pub async fn remove(cart: &CliCart, id: ProductId) -> Result<(), CartError> {
    let updated = cart.remove_item(id).await?;
    print_cart(&updated);
    Ok(())
}

/// Set the amount of `id` and print the cart.
///
/// # Errors
///
/// Returns the `CartError` if the amount is invalid or cannot be served.
pub async fn update(cart: &CliCart, id: ProductId, amount: i64) -> Result<(), CartError> {
    let updated = cart.update_amount(id, amount).await?;
    print_cart(&updated);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_cart(cart: &Cart) {
    print!("{}", render_cart(cart));
}

/// Render the cart as a plain-text table.
fn render_cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let title_width = cart
        .items()
        .iter()
        .map(|item| item.title.chars().count())
        .max()
        .unwrap_or(0)
        .max("PRODUCT".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6}  {:<title_width$}  {:>10}  {:>6}  {:>11}",
        "ID", "PRODUCT", "PRICE", "AMOUNT", "SUBTOTAL"
    );
    for item in cart {
        let _ = writeln!(
            out,
            "{:>6}  {:<title_width$}  {:>10}  {:>6}  {:>11}",
            item.id,
            item.title,
            item.price.to_string(),
            item.amount,
            item.subtotal().to_string(),
        );
    }
    let _ = writeln!(
        out,
        "{} item(s), total {}",
        cart.total_quantity(),
        cart.subtotal()
    );
    out
}
