//! Core types for Loomwear.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod variant;

pub use id::ProductId;
pub use price::{CURRENCY_SYMBOL, Price};
pub use variant::{Color, Size, VariantError};
