//! Emberwick Core - Shared types library.
//!
//! This crate provides the domain vocabulary used across all Emberwick
//! components:
//! - `storefront` - Cart reconciliation, checkout, profiles, catalog
//! - `cli` - Command-line demo and inspection tools
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no store clients, no async.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, products, cart lines, orders, profiles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
