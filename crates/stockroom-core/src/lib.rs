//! Core types, rules, and store traits for the Stockroom office inventory.
//!
//! This crate is deliberately free of database and terminal dependencies.
//! Storage backends implement the traits in [`store`]; the services in
//! [`service`] run on top of any of them.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod category;
pub mod depreciation;
pub mod error;
pub mod item;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(any(test, feature = "memory"))]
pub mod memory;

pub use error::{Error, Result};
