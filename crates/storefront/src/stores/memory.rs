//! In-memory store adapters.
//!
//! Back the test suite and the demo CLI. Each adapter keeps its records in a
//! mutex-guarded map and implements the corresponding port faithfully,
//! including the server-side stamps (order IDs, timestamps) a real backend
//! would assign.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use emberwick_core::{AccountId, CustomerProfile, LineItem, NewOrder, Order, OrderId, OrderStatus};

use super::{LocalCartStore, OrderStore, ProfileStore, RemoteCartStore, StoreError};

/// Lock a mutex, recovering the guard if a panicking test poisoned it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory device-local blob store.
#[derive(Debug, Default)]
pub struct MemoryLocalStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryLocalStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any blob is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        lock(&self.blobs).contains_key(key)
    }
}

#[async_trait]
impl LocalCartStore for MemoryLocalStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(lock(&self.blobs).get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        lock(&self.blobs).insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        lock(&self.blobs).remove(key);
        Ok(())
    }
}

/// In-memory per-account cart store.
#[derive(Debug, Default)]
pub struct MemoryRemoteCartStore {
    carts: Mutex<HashMap<AccountId, Vec<LineItem>>>,
}

impl MemoryRemoteCartStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a cart record directly, bypassing the port.
    pub fn seed(&self, account: AccountId, items: Vec<LineItem>) {
        lock(&self.carts).insert(account, items);
    }
}

#[async_trait]
impl RemoteCartStore for MemoryRemoteCartStore {
    async fn get(&self, account: &AccountId) -> Result<Option<Vec<LineItem>>, StoreError> {
        Ok(lock(&self.carts).get(account).cloned())
    }

    async fn put(&self, account: &AccountId, items: &[LineItem]) -> Result<(), StoreError> {
        lock(&self.carts).insert(account.clone(), items.to_vec());
        Ok(())
    }
}

/// In-memory append-only order store.
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    orders: Mutex<Vec<Order>>,
}

impl MemoryOrderStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders, across all accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.orders).len()
    }

    /// Whether no orders are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.orders).is_empty()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn append(&self, order: NewOrder) -> Result<Order, StoreError> {
        let stored = Order {
            id: OrderId::generate(),
            account_id: order.account_id,
            items: order.items,
            total: order.total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            shipping_address: order.shipping_address,
            payment_method: order.payment_method,
        };
        lock(&self.orders).push(stored.clone());
        Ok(stored)
    }

    async fn list_for_account(&self, account: &AccountId) -> Result<Vec<Order>, StoreError> {
        Ok(lock(&self.orders)
            .iter()
            .filter(|order| &order.account_id == account)
            .cloned()
            .collect())
    }
}

/// In-memory per-account profile store.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: Mutex<HashMap<AccountId, CustomerProfile>>,
}

impl MemoryProfileStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get(&self, account: &AccountId) -> Result<Option<CustomerProfile>, StoreError> {
        Ok(lock(&self.profiles).get(account).cloned())
    }

    async fn put(&self, account: &AccountId, profile: &CustomerProfile) -> Result<(), StoreError> {
        let mut stamped = profile.clone();
        stamped.updated_at = Some(Utc::now());
        lock(&self.profiles).insert(account.clone(), stamped);
        Ok(())
    }
}
