//! Store ports for the external persistence collaborators.
//!
//! The storefront delegates all persistence to an external document database
//! and a device-local key-value store. This module defines the async ports
//! the engine is written against; [`memory`] provides in-process adapters
//! for tests and demos. The production adapters live with the deployment,
//! not in this crate.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use emberwick_core::{AccountId, CustomerProfile, LineItem, NewOrder, Order};

/// Errors surfaced by store adapters.
///
/// The cart engine swallows these at the collaborator boundary (empty cart
/// on read failure, logged-and-reported on write failure); checkout and
/// profile operations propagate them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store reported a failure.
    #[error("store backend error: {0}")]
    Backend(String),

    /// A stored blob could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Device-local key-value blob store, used for the guest cart.
///
/// The engine uses a single fixed key and treats values as opaque bytes
/// (JSON-encoded line items in practice).
#[async_trait]
pub trait LocalCartStore: Send + Sync {
    /// Read the blob stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `value` under `key`, replacing any previous blob.
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Remove the blob stored under `key`; absent keys are not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Per-account remote cart store.
#[async_trait]
pub trait RemoteCartStore: Send + Sync {
    /// Read the cart record for `account`, if one exists.
    async fn get(&self, account: &AccountId) -> Result<Option<Vec<LineItem>>, StoreError>;

    /// Replace the cart record for `account` with `items`.
    async fn put(&self, account: &AccountId, items: &[LineItem]) -> Result<(), StoreError>;
}

/// Append-only order store.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Append a new order.
    ///
    /// The store assigns the order ID and the server-side creation
    /// timestamp, and initializes the status to pending.
    async fn append(&self, order: NewOrder) -> Result<Order, StoreError>;

    /// All orders placed by `account`, in store order (callers sort).
    async fn list_for_account(&self, account: &AccountId) -> Result<Vec<Order>, StoreError>;
}

/// Per-account customer profile store.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Read the profile record for `account`, if one exists.
    async fn get(&self, account: &AccountId) -> Result<Option<CustomerProfile>, StoreError>;

    /// Replace the profile record for `account`.
    ///
    /// The store stamps `updated_at` with the server-side write time.
    async fn put(&self, account: &AccountId, profile: &CustomerProfile) -> Result<(), StoreError>;
}
