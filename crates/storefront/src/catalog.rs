//! Static product catalog.
//!
//! The catalog is seeded in-process and read-only for this scope: no
//! inventory management, search, or recommendations. `add_to_cart` copies
//! display fields out of these records at add-time.

use std::sync::LazyLock;

use rust_decimal::Decimal;

use emberwick_core::{Category, Product, ProductId};

fn candle(
    id: i32,
    name: &str,
    description: &str,
    price_cents: i64,
    category: &str,
    image: &str,
    featured: bool,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        description: description.to_owned(),
        price: Decimal::new(price_cents, 2),
        category: category.to_owned(),
        image: image.to_owned(),
        featured,
        in_stock: true,
    }
}

static CATEGORIES: LazyLock<Vec<Category>> = LazyLock::new(|| {
    [
        ("all", "All Candles"),
        ("scented", "Scented"),
        ("unscented", "Unscented"),
        ("soy", "Soy Candles"),
        ("beeswax", "Beeswax"),
        ("seasonal", "Seasonal"),
    ]
    .into_iter()
    .map(|(id, name)| Category {
        id: id.to_owned(),
        name: name.to_owned(),
    })
    .collect()
});

static PRODUCTS: LazyLock<Vec<Product>> = LazyLock::new(|| {
    vec![
        candle(
            1,
            "Lavender Dreams",
            "Soothing lavender scent perfect for relaxation",
            2499,
            "scented",
            "https://images.unsplash.com/photo-1602874801006-40d6e5d8c99f?w=400&h=400&fit=crop",
            true,
        ),
        candle(
            2,
            "Vanilla Bliss",
            "Sweet vanilla aroma that fills your space",
            2299,
            "scented",
            "https://images.unsplash.com/photo-1602874801100-bc649315c851?w=400&h=400&fit=crop",
            true,
        ),
        candle(
            3,
            "Ocean Breeze",
            "Fresh ocean scent for a calming atmosphere",
            2699,
            "scented",
            "https://images.unsplash.com/photo-1603006905003-be475563bc59?w=400&h=400&fit=crop",
            true,
        ),
        candle(
            4,
            "Pure Soy Natural",
            "Unscented natural soy candle",
            1999,
            "soy",
            "https://images.unsplash.com/photo-1603006905003-be475563bc59?w=400&h=400&fit=crop",
            false,
        ),
        candle(
            5,
            "Beeswax Classic",
            "Pure beeswax candle with natural honey scent",
            2999,
            "beeswax",
            "https://images.unsplash.com/photo-1602874801100-bc649315c851?w=400&h=400&fit=crop",
            false,
        ),
        candle(
            6,
            "Cinnamon Spice",
            "Warm cinnamon fragrance for cozy evenings",
            2399,
            "seasonal",
            "https://images.unsplash.com/photo-1602874801006-40d6e5d8c99f?w=400&h=400&fit=crop",
            true,
        ),
        candle(
            7,
            "Rose Garden",
            "Delicate rose scent for a romantic ambiance",
            2799,
            "scented",
            "https://images.unsplash.com/photo-1603006905003-be475563bc59?w=400&h=400&fit=crop",
            false,
        ),
        candle(
            8,
            "Pine Forest",
            "Fresh pine scent reminiscent of winter walks",
            2599,
            "seasonal",
            "https://images.unsplash.com/photo-1602874801100-bc649315c851?w=400&h=400&fit=crop",
            false,
        ),
        candle(
            9,
            "Eucalyptus Mint",
            "Refreshing eucalyptus and mint blend",
            2499,
            "scented",
            "https://images.unsplash.com/photo-1602874801006-40d6e5d8c99f?w=400&h=400&fit=crop",
            false,
        ),
        candle(
            10,
            "Coconut Paradise",
            "Tropical coconut scent for summer vibes",
            2399,
            "scented",
            "https://images.unsplash.com/photo-1603006905003-be475563bc59?w=400&h=400&fit=crop",
            false,
        ),
        candle(
            11,
            "Unscented White",
            "Pure white candle without fragrance",
            1899,
            "unscented",
            "https://images.unsplash.com/photo-1602874801100-bc649315c851?w=400&h=400&fit=crop",
            false,
        ),
        candle(
            12,
            "Pumpkin Spice",
            "Fall favorite with warm pumpkin spice",
            2699,
            "seasonal",
            "https://images.unsplash.com/photo-1602874801006-40d6e5d8c99f?w=400&h=400&fit=crop",
            false,
        ),
    ]
});

/// All catalog products.
#[must_use]
pub fn all() -> &'static [Product] {
    &PRODUCTS
}

/// All browsing categories, including the synthetic "all" category.
#[must_use]
pub fn categories() -> &'static [Category] {
    &CATEGORIES
}

/// Look up a product by ID.
#[must_use]
pub fn find(id: ProductId) -> Option<&'static Product> {
    PRODUCTS.iter().find(|product| product.id == id)
}

/// Products flagged for the home page.
pub fn featured() -> impl Iterator<Item = &'static Product> {
    PRODUCTS.iter().filter(|product| product.featured)
}

/// Products in the given category; `"all"` returns the whole catalog.
#[must_use]
pub fn by_category(category_id: &str) -> Vec<&'static Product> {
    if category_id == "all" {
        return PRODUCTS.iter().collect();
    }
    PRODUCTS
        .iter()
        .filter(|product| product.category == category_id)
        .collect()
}
