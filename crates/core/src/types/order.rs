//! Order records and shipping addresses.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AccountId, Email, LineItem, OrderId};

/// Order fulfillment status.
///
/// Orders are created as `Pending`. Status transitions happen outside this
/// system; the storefront only displays the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Shipping address collected on the checkout form.
///
/// An explicit record type with named fields; every field except `email` is
/// required at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ShippingAddress {
    /// Recipient's full name.
    pub full_name: String,
    /// Contact email, if provided.
    pub email: Option<Email>,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Postal code.
    pub zip_code: String,
    /// Contact phone number.
    pub phone: String,
}

impl ShippingAddress {
    /// Returns the name of the first required field that is blank, if any.
    ///
    /// Used by checkout to reject incomplete addresses with a field-level
    /// message.
    #[must_use]
    pub fn first_blank_field(&self) -> Option<&'static str> {
        let required = [
            ("full_name", &self.full_name),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zip_code", &self.zip_code),
            ("phone", &self.phone),
        ];
        required
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
    }
}

/// A stored order, as returned by the order store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Store-assigned order ID.
    pub id: OrderId,
    /// Account that placed the order.
    pub account_id: AccountId,
    /// Snapshot of the cart at checkout.
    pub items: Vec<LineItem>,
    /// Order total at checkout.
    pub total: Decimal,
    /// Fulfillment status; starts as [`OrderStatus::Pending`].
    pub status: OrderStatus,
    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
    /// Shipping address, if collected.
    pub shipping_address: Option<ShippingAddress>,
    /// Payment method; currently always the "pending" placeholder.
    pub payment_method: Option<String>,
}

/// A new order to append to the order store.
///
/// The store assigns the order ID and creation timestamp and initializes the
/// status to [`OrderStatus::Pending`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Account placing the order.
    pub account_id: AccountId,
    /// Snapshot of the cart at checkout.
    pub items: Vec<LineItem>,
    /// Order total at checkout.
    pub total: Decimal,
    /// Shipping address, if collected.
    pub shipping_address: Option<ShippingAddress>,
    /// Payment method placeholder.
    pub payment_method: Option<String>,
}
