//! Static product catalog.
//!
//! There is no commerce backend; the storefront sells a fixed line-up. Cart
//! lines originate here.

use rust_decimal::Decimal;
use stride_core::CartLine;

/// A sellable product.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// URL-safe unique identifier.
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub image_url: String,
}

impl Product {
    fn new(id: &str, name: &str, price_cents: i64, image_url: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            price: Decimal::new(price_cents, 2),
            image_url: image_url.to_owned(),
        }
    }

    /// A one-unit cart line for this product.
    #[must_use]
    pub fn to_cart_line(&self, quantity: u32) -> CartLine {
        CartLine {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image_url: self.image_url.clone(),
            quantity: quantity.max(1),
        }
    }
}

/// Every product in the shop, in display order.
#[must_use]
pub fn all() -> Vec<Product> {
    vec![
        Product::new(
            "running-shoe",
            "Running Shoe",
            9999,
            "https://images.unsplash.com/photo-1549298713-1aca92f03c4e?auto=format&fit=crop&w=3180&q=80",
        ),
        Product::new(
            "basketball-shoe",
            "Basketball Shoe",
            12999,
            "https://images.unsplash.com/photo-1515955656352-a1b9c5cf27ea?auto=format&fit=crop&w=3300&q=80",
        ),
        Product::new(
            "casual-shoe",
            "Casual Shoe",
            7999,
            "https://images.unsplash.com/photo-1606107557195-0a29a5b4b4aa?auto=format&fit=crop&w=3264&q=80",
        ),
        Product::new(
            "training-shoe",
            "Training Shoe",
            10999,
            "https://images.unsplash.com/photo-1588361403511-5fef9c3c6cb5?auto=format&fit=crop&w=3000&q=80",
        ),
    ]
}

/// Look up a product by id.
#[must_use]
pub fn find(id: &str) -> Option<Product> {
    all().into_iter().find(|product| product.id == id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let products = all();
        for (i, a) in products.iter().enumerate() {
            for b in products.iter().skip(i + 1) {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_find_known_product() {
        let product = find("running-shoe").unwrap();
        assert_eq!(product.name, "Running Shoe");
        assert_eq!(product.price, Decimal::new(9999, 2));
    }

    #[test]
    fn test_find_unknown_product() {
        assert!(find("sandals").is_none());
    }

    #[test]
    fn test_cart_line_quantity_floor() {
        let product = find("casual-shoe").unwrap();
        assert_eq!(product.to_cart_line(0).quantity, 1);
        assert_eq!(product.to_cart_line(3).quantity, 3);
    }
}
