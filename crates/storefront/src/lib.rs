//! Emberwick Storefront library.
//!
//! The storefront core for a small candle retailer. The centerpiece is the
//! cart engine in [`services::cart`], which reconciles a device-local guest
//! cart with a per-account remote cart across login/logout transitions.
//!
//! # Architecture
//!
//! - [`catalog`] - Static product catalog
//! - [`config`] - Environment-backed configuration
//! - [`session`] - Account session values and the identity-provider feed
//! - [`stores`] - Async store ports plus in-memory adapters
//! - [`services`] - Cart engine, checkout/orders, customer profiles
//!
//! Persistence and authentication are delegated: this crate reads and writes
//! the injected stores and observes session changes, nothing more.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod services;
pub mod session;
pub mod stores;
