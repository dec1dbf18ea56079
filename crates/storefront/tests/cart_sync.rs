//! Cart synchronization scenarios across login/logout transitions.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::Notify;

use emberwick_core::{AccountId, LineItem, Product, ProductId};
use emberwick_storefront::config::StorefrontConfig;
use emberwick_storefront::services::cart::{CartService, PersistTarget};
use emberwick_storefront::session::{AccountSession, SessionFeed};
use emberwick_storefront::stores::memory::{MemoryLocalStore, MemoryRemoteCartStore};
use emberwick_storefront::stores::{LocalCartStore, RemoteCartStore, StoreError};

fn product(id: i32, cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Candle {id}"),
        description: "A candle".to_owned(),
        price: Decimal::new(cents, 2),
        category: "scented".to_owned(),
        image: format!("https://example.com/{id}.jpg"),
        featured: false,
        in_stock: true,
    }
}

fn line(id: i32, quantity: u32) -> LineItem {
    LineItem::from_product(&product(id, 1999), quantity)
}

fn quantities(items: &[LineItem]) -> Vec<(i32, u32)> {
    items
        .iter()
        .map(|item| (item.product_id.as_i32(), item.quantity))
        .collect()
}

#[tokio::test]
async fn test_guest_cart_merges_into_empty_account_cart_on_login() {
    let local = Arc::new(MemoryLocalStore::new());
    let remote = Arc::new(MemoryRemoteCartStore::new());
    let (cart, _failures) =
        CartService::new(local.clone(), remote.clone(), &StorefrontConfig::default());

    // Guest browsing: two products end up in the local store.
    cart.on_session_change(AccountSession::Guest).await;
    cart.add_to_cart(&product(1, 2499), 1);
    cart.add_to_cart(&product(2, 1999), 2);
    cart.flush().await;
    assert!(local.contains("guest_cart"));

    // Login with an empty remote cart.
    let account = AccountId::new("acct-1");
    cart.on_session_change(AccountSession::Account(account.clone()))
        .await;

    assert_eq!(quantities(&cart.items()), vec![(1, 1), (2, 2)]);
    let stored = remote.get(&account).await.unwrap().unwrap();
    assert_eq!(quantities(&stored), vec![(1, 1), (2, 2)]);
    assert!(!local.contains("guest_cart"));
}

#[tokio::test]
async fn test_logout_add_login_merges_guest_item_after_remote() {
    let local = Arc::new(MemoryLocalStore::new());
    let remote = Arc::new(MemoryRemoteCartStore::new());
    let account = AccountId::new("acct-1");
    remote.seed(account.clone(), vec![line(3, 1)]);

    let (cart, _failures) =
        CartService::new(local, remote.clone(), &StorefrontConfig::default());

    cart.on_session_change(AccountSession::Account(account.clone()))
        .await;
    assert_eq!(quantities(&cart.items()), vec![(3, 1)]);

    // Logout: the guest cart starts empty, then picks up one product.
    cart.on_session_change(AccountSession::Guest).await;
    assert!(cart.items().is_empty());
    cart.add_to_cart(&product(4, 2399), 1);
    cart.flush().await;

    // Login again: remote entries come first, the guest item is appended.
    cart.on_session_change(AccountSession::Account(account.clone()))
        .await;
    assert_eq!(quantities(&cart.items()), vec![(3, 1), (4, 1)]);
    let stored = remote.get(&account).await.unwrap().unwrap();
    assert_eq!(quantities(&stored), vec![(3, 1), (4, 1)]);
}

#[tokio::test]
async fn test_repeat_login_with_no_guest_cart_leaves_remote_untouched() {
    let local = Arc::new(MemoryLocalStore::new());
    let remote = Arc::new(MemoryRemoteCartStore::new());
    let account = AccountId::new("acct-1");
    remote.seed(account.clone(), vec![line(3, 2), line(5, 1)]);

    let (cart, _failures) =
        CartService::new(local, remote.clone(), &StorefrontConfig::default());
    cart.on_session_change(AccountSession::Account(account.clone()))
        .await;

    // No local cart: the remote cart is adopted as-is, order preserved.
    assert_eq!(quantities(&cart.items()), vec![(3, 2), (5, 1)]);
    let stored = remote.get(&account).await.unwrap().unwrap();
    assert_eq!(quantities(&stored), vec![(3, 2), (5, 1)]);
}

// =============================================================================
// Failure handling
// =============================================================================

/// Remote store whose writes always fail; reads delegate to a memory store.
struct WriteFailingRemoteStore {
    inner: MemoryRemoteCartStore,
}

#[async_trait]
impl RemoteCartStore for WriteFailingRemoteStore {
    async fn get(&self, account: &AccountId) -> Result<Option<Vec<LineItem>>, StoreError> {
        self.inner.get(account).await
    }

    async fn put(&self, _account: &AccountId, _items: &[LineItem]) -> Result<(), StoreError> {
        Err(StoreError::Backend("remote store is down".to_owned()))
    }
}

#[tokio::test]
async fn test_failed_merge_write_keeps_guest_cart_and_reports() {
    let local = Arc::new(MemoryLocalStore::new());
    let remote = Arc::new(WriteFailingRemoteStore {
        inner: MemoryRemoteCartStore::new(),
    });
    let (cart, mut failures) =
        CartService::new(local.clone(), remote, &StorefrontConfig::default());

    cart.on_session_change(AccountSession::Guest).await;
    cart.add_to_cart(&product(1, 2499), 1);
    cart.flush().await;

    cart.on_session_change(AccountSession::Account(AccountId::new("acct-1")))
        .await;

    // The merged cart is live in memory and the failure is observable,
    // but the guest cart blob survives for a later retry.
    assert_eq!(quantities(&cart.items()), vec![(1, 1)]);
    assert!(local.contains("guest_cart"));
    let failure = failures.recv().await.expect("failure should be reported");
    assert_eq!(failure.target, PersistTarget::Remote);
}

#[tokio::test]
async fn test_read_failure_yields_empty_cart_not_error() {
    struct ReadFailingLocalStore;

    #[async_trait]
    impl LocalCartStore for ReadFailingLocalStore {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            Err(StoreError::Backend("device storage unavailable".to_owned()))
        }

        async fn put(&self, _key: &str, _value: Vec<u8>) -> Result<(), StoreError> {
            Ok(())
        }

        async fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    let (cart, _failures) = CartService::new(
        Arc::new(ReadFailingLocalStore),
        Arc::new(MemoryRemoteCartStore::new()),
        &StorefrontConfig::default(),
    );

    cart.on_session_change(AccountSession::Guest).await;
    assert!(cart.is_loaded());
    assert!(cart.items().is_empty());
}

// =============================================================================
// Loads racing mutations and session changes
// =============================================================================

/// Local store whose reads block until the gate opens.
struct GatedLocalStore {
    inner: MemoryLocalStore,
    open: AtomicBool,
    notify: Notify,
}

impl GatedLocalStore {
    fn new() -> Self {
        Self {
            inner: MemoryLocalStore::new(),
            open: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    async fn wait_open(&self) {
        while !self.open.load(Ordering::SeqCst) {
            let notified = self.notify.notified();
            if self.open.load(Ordering::SeqCst) {
                break;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl LocalCartStore for GatedLocalStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.wait_open().await;
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.inner.put(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key).await
    }
}

#[tokio::test]
async fn test_mutation_during_load_survives_load_completion() {
    let local = Arc::new(GatedLocalStore::new());
    let remote = Arc::new(MemoryRemoteCartStore::new());
    let (cart, _failures) =
        CartService::new(local.clone(), remote, &StorefrontConfig::default());

    let loading = {
        let cart = cart.clone();
        tokio::spawn(async move { cart.on_session_change(AccountSession::Guest).await })
    };

    // The load is blocked on the local read; mutate anyway.
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!cart.is_loaded());
    cart.add_to_cart(&product(1, 2499), 2);
    assert_eq!(cart.item_count(), 2);

    local.open();
    loading.await.expect("load task");

    // The mutation survived the (empty) load and was persisted.
    assert!(cart.is_loaded());
    assert_eq!(quantities(&cart.items()), vec![(1, 2)]);
    cart.flush().await;
    assert!(local.inner.contains("guest_cart"));
}

#[tokio::test]
async fn test_newer_session_transition_wins_over_stale_load() {
    let local = Arc::new(GatedLocalStore::new());
    let remote = Arc::new(MemoryRemoteCartStore::new());
    let account = AccountId::new("acct-1");
    remote.seed(account.clone(), vec![line(3, 1)]);
    local
        .put("guest_cart", serde_json::to_vec(&vec![line(9, 1)]).unwrap())
        .await
        .unwrap();

    let (cart, _failures) =
        CartService::new(local.clone(), remote.clone(), &StorefrontConfig::default());

    // A guest load starts and blocks; a login supersedes it before it lands.
    let stale = {
        let cart = cart.clone();
        tokio::spawn(async move { cart.on_session_change(AccountSession::Guest).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    let fresh = {
        let cart = cart.clone();
        let account = account.clone();
        tokio::spawn(
            async move { cart.on_session_change(AccountSession::Account(account)).await },
        )
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    local.open();
    stale.await.expect("stale load task");
    fresh.await.expect("fresh load task");

    // Whatever order the loads completed in, the login's merge result wins.
    assert!(cart.is_loaded());
    assert_eq!(cart.session(), AccountSession::Account(account.clone()));
    assert_eq!(quantities(&cart.items()), vec![(3, 1), (9, 1)]);
    let stored = remote.get(&account).await.unwrap().unwrap();
    assert_eq!(quantities(&stored), vec![(3, 1), (9, 1)]);
}

// =============================================================================
// Session feed integration
// =============================================================================

async fn wait_for_session(cart: &CartService, expected: &AccountSession) {
    for _ in 0..500 {
        if cart.is_loaded() && &cart.session() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("cart never reached session {expected:?}");
}

#[tokio::test]
async fn test_cart_follows_identity_provider_feed() {
    let local = Arc::new(MemoryLocalStore::new());
    let remote = Arc::new(MemoryRemoteCartStore::new());
    let (cart, _failures) =
        CartService::new(local, remote.clone(), &StorefrontConfig::default());

    let feed = SessionFeed::new();
    let follower = cart.follow_sessions(feed.subscribe());

    // App start resolves to guest.
    wait_for_session(&cart, &AccountSession::Guest).await;
    cart.add_to_cart(&product(1, 2499), 1);
    cart.flush().await;

    // Login merges the guest cart into the account.
    let account = AccountId::new("acct-1");
    feed.login(account.clone());
    wait_for_session(&cart, &AccountSession::Account(account.clone())).await;
    assert_eq!(quantities(&cart.items()), vec![(1, 1)]);
    assert!(remote.get(&account).await.unwrap().is_some());

    // Logout returns to an empty guest cart.
    feed.logout();
    wait_for_session(&cart, &AccountSession::Guest).await;
    assert!(cart.items().is_empty());

    drop(feed);
    follower.await.expect("follower task");
}
