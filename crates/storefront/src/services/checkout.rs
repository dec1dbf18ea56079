//! Checkout and order history.
//!
//! Order submission requires an active account and a non-empty cart; the
//! order record is a snapshot of the cart at submission time. Payment
//! processing is deferred, so every order carries the "pending" payment
//! placeholder. Status transitions happen outside this system.

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use emberwick_core::{LineItem, NewOrder, Order, ShippingAddress};
use rust_decimal::Decimal;

use crate::services::cart::CartService;
use crate::session::AccountSession;
use crate::stores::{OrderStore, StoreError};

/// Placeholder payment method written until payment processing lands.
const PAYMENT_METHOD_PENDING: &str = "pending";

/// Errors that can occur during checkout operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No account is active; checkout requires login.
    #[error("an account is required to place an order")]
    Unauthenticated,

    /// The cart has no items to order.
    #[error("cannot place an order with an empty cart")]
    EmptyCart,

    /// A required shipping field is blank.
    #[error("missing required shipping field: {0}")]
    MissingShippingField(&'static str),

    /// The order store failed.
    #[error("order store error: {0}")]
    Store(#[from] StoreError),
}

/// Checkout service over the append-only order store.
#[derive(Clone)]
pub struct CheckoutService {
    orders: Arc<dyn OrderStore>,
}

impl CheckoutService {
    /// Create a checkout service.
    #[must_use]
    pub fn new(orders: Arc<dyn OrderStore>) -> Self {
        Self { orders }
    }

    /// Place an order for the cart's current contents.
    ///
    /// On success the stored order (with its server-assigned ID and
    /// creation time) is returned and the cart is cleared, which triggers
    /// the cart's usual persistence side effect.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Unauthenticated`] when no account is active,
    /// [`CheckoutError::EmptyCart`] for an empty cart, and
    /// [`CheckoutError::MissingShippingField`] for an incomplete address.
    /// None of these mutate the cart.
    #[instrument(skip(self, cart, shipping))]
    pub async fn place_order(
        &self,
        cart: &CartService,
        shipping: ShippingAddress,
    ) -> Result<Order, CheckoutError> {
        let session = cart.session();
        let account_id = session
            .account_id()
            .ok_or(CheckoutError::Unauthenticated)?
            .clone();

        let items = cart.items();
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        if let Some(field) = shipping.first_blank_field() {
            return Err(CheckoutError::MissingShippingField(field));
        }

        // Total comes from the snapshot, not a second cart read.
        let total: Decimal = items.iter().map(LineItem::line_total).sum();
        let order = self
            .orders
            .append(NewOrder {
                account_id,
                items,
                total,
                shipping_address: Some(shipping),
                payment_method: Some(PAYMENT_METHOD_PENDING.to_owned()),
            })
            .await?;

        tracing::info!(order_id = %order.id, total = %order.total, "order placed");
        cart.clear_cart();
        Ok(order)
    }

    /// The account's order history, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Unauthenticated`] when no account is active,
    /// or a store error from the order store.
    pub async fn order_history(
        &self,
        session: &AccountSession,
    ) -> Result<Vec<Order>, CheckoutError> {
        let account = session
            .account_id()
            .ok_or(CheckoutError::Unauthenticated)?;

        let mut orders = self.orders.list_for_account(account).await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}
