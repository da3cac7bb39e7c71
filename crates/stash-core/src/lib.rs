//! Stash Core
//!
//! Shared error taxonomy and boundary traits for the stash build cache.
//! This crate has minimal dependencies and defines the vocabulary used
//! across the cache and CLI crates.

pub mod error;
pub mod ports;

pub use error::{Error, Result};
