//! Catalog and stock types as served by the inventory service.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Catalog metadata for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Product image URL.
    pub image: String,
}

/// Available inventory for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    pub id: ProductId,
    pub amount: u32,
}

impl StockEntry {
    /// Create a new stock entry.
    #[must_use]
    pub const fn new(id: ProductId, amount: u32) -> Self {
        Self { id, amount }
    }

    /// Whether `requested` units can be served from this stock.
    #[must_use]
    pub fn covers(&self, requested: u64) -> bool {
        requested <= u64::from(self.amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_covers() {
        let stock = StockEntry::new(ProductId::new(1), 5);
        assert!(stock.covers(0));
        assert!(stock.covers(5));
        assert!(!stock.covers(6));
        assert!(!stock.covers(u64::from(u32::MAX) + 1));
    }

    #[test]
    fn test_product_parses_inventory_payload() {
        let json = r#"{
            "id": 1,
            "title": "Tênis de Caminhada Leve Confortável",
            "price": 179.9,
            "image": "https://example.com/tenis1.jpg"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Price::from_cents(17990));
        assert_eq!(product.image, "https://example.com/tenis1.jpg");
    }

    #[test]
    fn test_stock_rejects_negative_amount() {
        let result = serde_json::from_str::<StockEntry>(r#"{"id": 1, "amount": -1}"#);
        assert!(result.is_err());
    }
}
