//! Cart store: the single source of truth for the cart during a request.

use axum::{extract::FromRequestParts, http::request::Parts};
use loomwear_core::{CART_BLOB_KEY, Cart, CartError, LineItem};
use rust_decimal::Decimal;
use thiserror::Error;
use tower_sessions::Session;
use tracing::instrument;

use super::storage::{BlobStorage, SessionStorage, StorageError};
use crate::error::AppError;

/// Errors from cart store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Owns the in-memory cart and keeps it in sync with its storage.
///
/// Every mutation re-serializes the whole cart and writes it back before
/// returning, so a later request (or the other page) sees the change.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    cart: Cart,
}

/// Cart store over the requesting browser's session.
pub type SessionCart = CartStore<SessionStorage>;

impl<S: BlobStorage> CartStore<S> {
    /// Load the cart from storage.
    ///
    /// A missing blob is an empty cart. So is a blob that fails to decode;
    /// that case is logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` only if the backend itself fails.
    #[instrument(skip_all)]
    pub async fn load(storage: S) -> Result<Self, StoreError> {
        let cart = match storage.read(CART_BLOB_KEY).await? {
            Some(blob) => Cart::from_blob(&blob).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding malformed cart blob");
                Cart::new()
            }),
            None => Cart::new(),
        };

        tracing::debug!(lines = cart.len(), "Cart loaded");
        Ok(Self { storage, cart })
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Add a product variant, merging with a matching line. Returns the
    /// index of the affected line.
    ///
    /// # Errors
    ///
    /// `StoreError::Cart` for an invalid quantity or price (nothing is
    /// written), or a storage/encoding error from persisting.
    #[instrument(skip_all, fields(product_id = %item.id, quantity = item.quantity))]
    pub async fn add_item(&mut self, item: LineItem) -> Result<usize, StoreError> {
        let index = self.cart.add_item(item)?;
        self.persist().await?;
        Ok(index)
    }

    /// Set the quantity of the line at `index`, raising values below 1 to 1.
    /// Returns the quantity actually stored.
    ///
    /// # Errors
    ///
    /// `StoreError::Cart` if `index` is out of range, or a persist error.
    #[instrument(skip(self))]
    pub async fn update_quantity(&mut self, index: usize, quantity: i64) -> Result<u32, StoreError> {
        let stored = self.cart.update_quantity(index, quantity)?.quantity;
        self.persist().await?;
        Ok(stored)
    }

    /// Remove the line at `index`; later lines shift down by one.
    ///
    /// # Errors
    ///
    /// `StoreError::Cart` if `index` is out of range, or a persist error.
    #[instrument(skip(self))]
    pub async fn remove_item(&mut self, index: usize) -> Result<LineItem, StoreError> {
        let removed = self.cart.remove_item(index)?;
        self.persist().await?;
        Ok(removed)
    }

    /// Cart total rounded to cents.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cart.total()
    }

    /// Empty the cart and delete its blob from storage.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the blob cannot be removed.
    #[instrument(skip(self))]
    pub async fn clear(&mut self) -> Result<(), StoreError> {
        self.cart.clear();
        self.storage.remove(CART_BLOB_KEY).await?;
        tracing::debug!("Cart cleared");
        Ok(())
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let blob = self.cart.to_blob()?;
        self.storage.write(CART_BLOB_KEY, blob).await?;
        tracing::debug!(lines = self.cart.len(), "Cart persisted");
        Ok(())
    }
}

impl<S> FromRequestParts<S> for SessionCart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::Internal(msg.to_string()))?;

        Ok(Self::load(SessionStorage::new(session)).await?)
    }
}
