//! Loomwear Core - Shared cart and checkout types.
//!
//! This crate provides the domain model used by the storefront:
//! - `types` - Newtype wrappers for product IDs, prices, and variant labels
//! - `cart` - Line items, the cart aggregate, and its persisted blob format
//! - `checkout` - Payment methods, payment form validation, and receipts
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no
//! sessions, no HTTP. Persistence of the cart blob is the storefront's job;
//! this crate only defines how a cart encodes to and decodes from it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod types;

pub use cart::{CART_BLOB_KEY, Cart, CartError, LineItem};
pub use checkout::{
    BANKS, CardDetails, CheckoutError, InternetBankingDetails, PaymentMethod, PaymentReceipt,
};
pub use types::*;
