//! Per-browser cart persistence.
//!
//! The cart lives in one serialized blob, keyed by
//! [`CART_BLOB_KEY`](loomwear_core::CART_BLOB_KEY), inside storage scoped to a
//! single browser. [`CartStore`] loads that blob at the start of a request,
//! applies mutations, and writes the whole blob back after each one.

pub mod storage;
pub mod store;

pub use storage::{BlobStorage, MemoryStorage, SessionStorage, StorageError};
pub use store::{CartStore, SessionCart, StoreError};
