//! Cart reconciliation engine.
//!
//! Owns the in-memory cart and mediates between two storage backends: the
//! device-local store while no account is active, and the per-account remote
//! store after login. On every session transition the engine decides which
//! store is authoritative, merges the guest cart into the account cart when
//! both exist, and thereafter persists every mutation to the authoritative
//! store as a full-overwrite save.
//!
//! Mutations apply to the in-memory cart immediately and never block on
//! store I/O; persistence runs as a spawned background task whose failures
//! are logged and reported on the failure channel returned by
//! [`CartService::new`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use emberwick_core::{AccountId, LineItem, Product, ProductId};

use crate::config::StorefrontConfig;
use crate::session::AccountSession;
use crate::stores::{LocalCartStore, RemoteCartStore, StoreError};

/// Which store a persistence write targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistTarget {
    /// The device-local guest cart blob.
    Local,
    /// The per-account remote cart record.
    Remote,
}

/// A persistence write that failed.
///
/// Failures never roll back the in-memory cart and are not retried; they are
/// logged and delivered on the channel returned by [`CartService::new`] so
/// the caller can surface them.
#[derive(Debug)]
pub struct PersistFailure {
    /// Store the write targeted.
    pub target: PersistTarget,
    /// The underlying store error.
    pub error: StoreError,
}

/// A cart mutation, queued for replay when it arrives mid-load.
#[derive(Debug, Clone)]
enum CartOp {
    Add(LineItem),
    Remove(ProductId),
    SetQuantity(ProductId, u32),
    Clear,
}

struct CartState {
    items: Vec<LineItem>,
    session: AccountSession,
    /// Gates persistence until the initial load completes.
    loaded: bool,
    /// Mutations applied while a load was in flight, replayed on completion.
    pending: Vec<CartOp>,
    /// Bumped on every session transition; stale loads are discarded.
    epoch: u64,
}

struct CartServiceInner {
    state: Mutex<CartState>,
    local: Arc<dyn LocalCartStore>,
    remote: Arc<dyn RemoteCartStore>,
    guest_cart_key: String,
    failures: mpsc::UnboundedSender<PersistFailure>,
    /// In-flight persistence tasks, awaited by [`CartService::flush`].
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

/// The cart engine. Cheaply cloneable; all clones share one cart.
#[derive(Clone)]
pub struct CartService {
    inner: Arc<CartServiceInner>,
}

/// Lock a mutex, recovering the guard if a panicking holder poisoned it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Merge a guest cart into an account cart.
///
/// The result preserves `remote`'s entries and order. Each local item either
/// folds its quantity into the matching remote entry (whose display fields
/// win) or is appended unchanged. Duplicate product IDs within `local` are
/// tolerated and accumulate into a single entry.
#[must_use]
pub fn merge_carts(remote: Vec<LineItem>, local: &[LineItem]) -> Vec<LineItem> {
    let mut merged = remote;
    for item in local {
        if let Some(existing) = merged
            .iter_mut()
            .find(|line| line.product_id == item.product_id)
        {
            existing.quantity += item.quantity;
        } else {
            merged.push(item.clone());
        }
    }
    merged
}

fn apply_op(items: &mut Vec<LineItem>, op: &CartOp) {
    match op {
        CartOp::Add(line) => {
            if let Some(existing) = items
                .iter_mut()
                .find(|item| item.product_id == line.product_id)
            {
                existing.quantity += line.quantity;
            } else {
                items.push(line.clone());
            }
        }
        CartOp::Remove(product_id) => {
            items.retain(|item| item.product_id != *product_id);
        }
        CartOp::SetQuantity(product_id, 0) => {
            items.retain(|item| item.product_id != *product_id);
        }
        CartOp::SetQuantity(product_id, quantity) => {
            if let Some(existing) = items.iter_mut().find(|item| item.product_id == *product_id) {
                existing.quantity = *quantity;
            }
        }
        CartOp::Clear => items.clear(),
    }
}

impl CartService {
    /// Create a cart engine over the given stores.
    ///
    /// Returns the engine and the receiver for persistence failures. The
    /// engine starts unloaded in the guest state; drive it with
    /// [`on_session_change`](Self::on_session_change) or attach it to a
    /// session feed via [`follow_sessions`](Self::follow_sessions).
    #[must_use]
    pub fn new(
        local: Arc<dyn LocalCartStore>,
        remote: Arc<dyn RemoteCartStore>,
        config: &StorefrontConfig,
    ) -> (Self, mpsc::UnboundedReceiver<PersistFailure>) {
        let (failures, failure_rx) = mpsc::unbounded_channel();
        let service = Self {
            inner: Arc::new(CartServiceInner {
                state: Mutex::new(CartState {
                    items: Vec::new(),
                    session: AccountSession::Guest,
                    loaded: false,
                    pending: Vec::new(),
                    epoch: 0,
                }),
                local,
                remote,
                guest_cart_key: config.guest_cart_key.clone(),
                failures,
                tasks: Mutex::new(Vec::new()),
            }),
        };
        (service, failure_rx)
    }

    // =========================================================================
    // Session transitions
    // =========================================================================

    /// React to a session transition (login, logout, app start).
    ///
    /// Loads the cart from the store that is authoritative for the new
    /// session, merging the guest cart into the account cart on login. Only
    /// once the load (and any merge write-back) completes does the engine
    /// become `loaded`; mutations issued in the meantime are replayed onto
    /// the loaded cart so none are dropped.
    #[instrument(skip(self))]
    pub async fn on_session_change(&self, session: AccountSession) {
        let epoch = {
            let mut state = lock(&self.inner.state);
            state.epoch += 1;
            state.loaded = false;
            state.session = session.clone();
            // pending ops survive superseded loads; only an install drains them
            state.epoch
        };

        let loaded_items = match &session {
            AccountSession::Guest => self.inner.read_guest_cart().await,
            AccountSession::Account(account) => self.inner.reconcile_account_cart(account).await,
        };

        let follow_up = {
            let mut state = lock(&self.inner.state);
            if state.epoch != epoch {
                debug!("session changed again during load, discarding result");
                return;
            }
            state.items = loaded_items;
            let replayed = !state.pending.is_empty();
            for op in std::mem::take(&mut state.pending) {
                apply_op(&mut state.items, &op);
            }
            state.loaded = true;
            debug!(items = state.items.len(), replayed, "cart loaded");
            replayed.then(|| (state.session.clone(), state.items.clone()))
        };

        // Mutations that landed mid-load still need their persistence write.
        if let Some((session, items)) = follow_up {
            self.spawn_persist(session, items);
        }
    }

    /// Drive this engine from an identity-provider session feed.
    ///
    /// Applies the feed's current value as the app-start transition, then
    /// each subsequent transition. The task ends when the feed is dropped.
    pub fn follow_sessions(
        &self,
        mut feed: watch::Receiver<AccountSession>,
    ) -> JoinHandle<()> {
        let cart = self.clone();
        tokio::spawn(async move {
            loop {
                let session = feed.borrow_and_update().clone();
                cart.on_session_change(session).await;
                if feed.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` units of `product` to the cart.
    ///
    /// Increments the existing line if the product is already in the cart,
    /// otherwise appends a new line copied from the product's fields. A zero
    /// quantity is ignored: line quantities are always at least 1.
    pub fn add_to_cart(&self, product: &Product, quantity: u32) {
        if quantity == 0 {
            warn!(product_id = %product.id, "ignoring add_to_cart with zero quantity");
            return;
        }
        self.mutate(CartOp::Add(LineItem::from_product(product, quantity)));
    }

    /// Remove the line for `product_id`; a no-op if absent.
    pub fn remove_from_cart(&self, product_id: ProductId) {
        self.mutate(CartOp::Remove(product_id));
    }

    /// Set the quantity for `product_id` absolutely.
    ///
    /// A quantity of zero removes the line. A no-op if the product is not in
    /// the cart.
    pub fn update_quantity(&self, product_id: ProductId, quantity: u32) {
        self.mutate(CartOp::SetQuantity(product_id, quantity));
    }

    /// Empty the cart.
    pub fn clear_cart(&self) {
        self.mutate(CartOp::Clear);
    }

    fn mutate(&self, op: CartOp) {
        let snapshot = {
            let mut state = lock(&self.inner.state);
            apply_op(&mut state.items, &op);
            if state.loaded {
                Some((state.session.clone(), state.items.clone()))
            } else {
                // Captured and replayed once the in-flight load completes.
                state.pending.push(op);
                None
            }
        };
        if let Some((session, items)) = snapshot {
            self.spawn_persist(session, items);
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Snapshot of the current cart lines.
    #[must_use]
    pub fn items(&self) -> Vec<LineItem> {
        lock(&self.inner.state).items.clone()
    }

    /// Sum of `unit_price * quantity` over all lines; zero when empty.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        lock(&self.inner.state)
            .items
            .iter()
            .map(LineItem::line_total)
            .sum()
    }

    /// Total unit count across all lines (not distinct products).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        lock(&self.inner.state)
            .items
            .iter()
            .map(|item| item.quantity)
            .sum()
    }

    /// Whether the initial load for the current session has completed.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        lock(&self.inner.state).loaded
    }

    /// The session the cart is currently scoped to.
    #[must_use]
    pub fn session(&self) -> AccountSession {
        lock(&self.inner.state).session.clone()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn spawn_persist(&self, session: AccountSession, items: Vec<LineItem>) {
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            inner.persist(&session, &items).await;
        });

        let mut tasks = lock(&self.inner.tasks);
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle);
    }

    /// Wait for all in-flight persistence writes to settle.
    ///
    /// Persistence is best-effort and callers normally never wait on it;
    /// this exists for graceful shutdown and deterministic tests.
    pub async fn flush(&self) {
        loop {
            let tasks: Vec<JoinHandle<()>> = std::mem::take(&mut *lock(&self.inner.tasks));
            if tasks.is_empty() {
                return;
            }
            for task in tasks {
                // a panicked persistence task has nothing left to wait for
                let _ = task.await;
            }
        }
    }
}

impl CartServiceInner {
    /// Read and decode the guest cart blob; any failure yields an empty cart.
    async fn read_guest_cart(&self) -> Vec<LineItem> {
        match self.local.get(&self.guest_cart_key).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(items) => items,
                Err(error) => {
                    warn!(%error, "guest cart blob is unreadable, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!(%error, "guest cart read failed, starting empty");
                Vec::new()
            }
        }
    }

    /// Load the account cart, folding in any guest cart left on this device.
    ///
    /// When a merge happens the result is written back to the remote store,
    /// and the guest key is cleared only after that write succeeds; on
    /// failure the guest cart is kept so the merge can be replayed later.
    async fn reconcile_account_cart(&self, account: &AccountId) -> Vec<LineItem> {
        let remote_cart = match self.remote.get(account).await {
            Ok(Some(items)) => items,
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!(%error, "remote cart read failed, treating as empty");
                Vec::new()
            }
        };

        let local_cart = self.read_guest_cart().await;
        if local_cart.is_empty() {
            return remote_cart;
        }

        let merged = merge_carts(remote_cart, &local_cart);
        match self.remote.put(account, &merged).await {
            Ok(()) => {
                if let Err(error) = self.local.remove(&self.guest_cart_key).await {
                    self.report(PersistTarget::Local, error);
                }
            }
            Err(error) => {
                // guest cart stays in place; the merge replays on next login
                self.report(PersistTarget::Remote, error);
            }
        }
        merged
    }

    /// Full-overwrite save of the cart to the authoritative store.
    async fn persist(&self, session: &AccountSession, items: &[LineItem]) {
        match session {
            AccountSession::Guest => {
                let bytes = match serde_json::to_vec(items) {
                    Ok(bytes) => bytes,
                    Err(error) => {
                        self.report(PersistTarget::Local, error.into());
                        return;
                    }
                };
                if let Err(error) = self.local.put(&self.guest_cart_key, bytes).await {
                    self.report(PersistTarget::Local, error);
                }
            }
            AccountSession::Account(account) => {
                if let Err(error) = self.remote.put(account, items).await {
                    self.report(PersistTarget::Remote, error);
                }
            }
        }
    }

    /// Log a persistence failure and push it onto the failure channel.
    fn report(&self, target: PersistTarget, error: StoreError) {
        warn!(?target, %error, "cart persistence write failed");
        // receiver may have been dropped; the warn above still lands
        let _ = self.failures.send(PersistFailure { target, error });
    }
}
