//! Common utilities for tessera
//!
//! This crate provides shared functionality used across all tessera backends.

pub mod error;

pub use error::{Result, TesseraError};
