//! Product catalog records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;

/// A catalog product.
///
/// The catalog is read-only and static for this scope; products are seeded
/// in-process rather than fetched from a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog-unique product ID.
    pub id: ProductId,
    /// Display name (e.g., "Lavender Dreams").
    pub name: String,
    /// Short marketing description.
    pub description: String,
    /// Unit price in USD.
    pub price: Decimal,
    /// Category ID this product belongs to.
    pub category: String,
    /// Product image URL.
    pub image: String,
    /// Whether to feature this product on the home page.
    pub featured: bool,
    /// Whether the product can currently be added to a cart.
    pub in_stock: bool,
}

/// A catalog category for browsing/filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable category ID (e.g., "scented").
    pub id: String,
    /// Display name (e.g., "Scented").
    pub name: String,
}
