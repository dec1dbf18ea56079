//! Catalog inspection commands.

use emberwick_storefront::catalog;

/// List products, optionally filtered by category ID.
pub fn list(category: Option<&str>) {
    let products = category.map_or_else(
        || catalog::all().iter().collect::<Vec<_>>(),
        catalog::by_category,
    );

    if products.is_empty() {
        tracing::warn!("No products found for category {:?}", category);
        return;
    }

    for product in products {
        let flags = match (product.featured, product.in_stock) {
            (true, true) => " [featured]",
            (_, false) => " [out of stock]",
            _ => "",
        };
        tracing::info!(
            "#{:<3} {:<20} ${:<7} {}{}",
            product.id,
            product.name,
            product.price,
            product.category,
            flags
        );
    }
}

/// List browsing categories.
pub fn categories() {
    for category in catalog::categories() {
        tracing::info!("{:<12} {}", category.id, category.name);
    }
}
