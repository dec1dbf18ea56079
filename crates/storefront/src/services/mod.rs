//! Storefront services: the cart engine, checkout, and profiles.

pub mod cart;
pub mod checkout;
pub mod profile;

pub use cart::{CartService, PersistFailure, PersistTarget};
pub use checkout::{CheckoutError, CheckoutService};
pub use profile::{ProfileError, ProfileService};
