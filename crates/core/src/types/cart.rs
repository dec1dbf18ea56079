//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Product, ProductId};

/// A single cart line: a product reference plus quantity and the display
/// fields denormalized from the product at add-time.
///
/// Invariants (maintained by the cart engine): at most one line per
/// `product_id` within a cart, and `quantity >= 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product this line refers to; unique within a cart.
    pub product_id: ProductId,
    /// Product name at add-time.
    pub name: String,
    /// Product description at add-time.
    pub description: String,
    /// Unit price at add-time.
    pub unit_price: Decimal,
    /// Category ID at add-time.
    pub category: String,
    /// Image URL at add-time.
    pub image: String,
    /// Stock flag at add-time.
    pub in_stock: bool,
    /// Number of units; always at least 1.
    pub quantity: u32,
}

impl LineItem {
    /// Build a line item from a catalog product, copying its display fields.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            unit_price: product.price,
            category: product.category.clone(),
            image: product.image.clone(),
            in_stock: product.in_stock,
            quantity,
        }
    }

    /// Price of this line: `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}
