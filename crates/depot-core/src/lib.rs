//! Core types and trait definitions for the Depot relief-supply tracker.
//!
//! This crate is deliberately free of database and I/O dependencies. It owns
//! the domain model (sites, items, per-site inventory state, audit records),
//! the site field registry, and the [`store::SupplyStore`] abstraction that
//! storage backends implement.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod field;
pub mod inventory;
pub mod item;
pub mod notify;
pub mod service;
pub mod site;
pub mod store;

pub use error::{Error, ErrorKind, Result};
