//! Cart reconciliation walkthrough.
//!
//! Exercises the full flow against in-memory stores: guest browsing, the
//! merge on login, checkout, and order history.

use std::sync::Arc;

use emberwick_core::{AccountId, Email, ProductId, ShippingAddress};
use emberwick_storefront::catalog;
use emberwick_storefront::config::StorefrontConfig;
use emberwick_storefront::services::{CartService, CheckoutService};
use emberwick_storefront::session::SessionFeed;
use emberwick_storefront::stores::memory::{
    MemoryLocalStore, MemoryOrderStore, MemoryRemoteCartStore,
};

/// Run the walkthrough.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let local = Arc::new(MemoryLocalStore::new());
    let remote = Arc::new(MemoryRemoteCartStore::new());
    let orders = Arc::new(MemoryOrderStore::new());

    let (cart, mut failures) = CartService::new(local, remote, &config);
    let checkout = CheckoutService::new(orders);

    let feed = SessionFeed::new();

    // App start: resolve the initial (guest) session directly.
    cart.on_session_change(feed.current()).await;

    let lavender = catalog::find(ProductId::new(1)).ok_or("catalog product 1 missing")?;
    let vanilla = catalog::find(ProductId::new(2)).ok_or("catalog product 2 missing")?;

    tracing::info!("Guest adds {} and 2x {}", lavender.name, vanilla.name);
    cart.add_to_cart(lavender, 1);
    cart.add_to_cart(vanilla, 2);
    cart.flush().await;
    tracing::info!(
        "Guest cart: {} units, subtotal ${}",
        cart.item_count(),
        cart.subtotal()
    );

    let account = AccountId::new("demo-account");
    tracing::info!("Logging in as {account}; the guest cart merges into the account cart");
    feed.login(account.clone());
    cart.on_session_change(feed.current()).await;
    tracing::info!(
        "Account cart: {} units, subtotal ${}",
        cart.item_count(),
        cart.subtotal()
    );

    let shipping = ShippingAddress {
        full_name: "Demo Customer".to_owned(),
        email: Some(Email::parse("demo@example.com")?),
        address: "12 Wax Lane".to_owned(),
        city: "Portland".to_owned(),
        state: "OR".to_owned(),
        zip_code: "97201".to_owned(),
        phone: "555-0100".to_owned(),
    };

    let order = checkout.place_order(&cart, shipping).await?;
    tracing::info!(
        "Order {} placed: {} line(s), total ${}, status {}",
        order.id,
        order.items.len(),
        order.total,
        order.status
    );

    let history = checkout.order_history(&feed.current()).await?;
    tracing::info!("Order history has {} order(s)", history.len());

    cart.flush().await;
    while let Ok(failure) = failures.try_recv() {
        tracing::warn!(
            "Persistence failure during demo: {:?} - {}",
            failure.target,
            failure.error
        );
    }

    Ok(())
}
