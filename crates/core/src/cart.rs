//! Cart aggregate and its persisted blob format.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s. Insertion order is display
//! order, and every positional operation (`update_quantity`, `remove_item`)
//! addresses lines by their current position in that order.
//!
//! # Blob Format
//!
//! The whole cart is stored as one JSON array under [`CART_BLOB_KEY`]:
//!
//! ```json
//! [{"id":"p1","name":"Basic Tee","price":"19.99","quantity":3,
//!   "size":"M","color":"Black","image":"/static/img/p1.jpg"}]
//! ```
//!
//! `price` is written as a decimal string; numeric prices are accepted on read.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::price::round_money;
use crate::types::{Color, Price, ProductId, Size};

/// Key the cart blob is stored under.
pub const CART_BLOB_KEY: &str = "cart";

/// Errors from cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("quantity must be at least 1 (got {0})")]
    InvalidQuantity(i64),
    #[error("price must not be negative (got {0})")]
    NegativePrice(Decimal),
    #[error("no cart line at position {index} (cart has {len} lines)")]
    LineNotFound { index: usize, len: usize },
}

/// One product variant selection in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    /// Unit price.
    pub price: Decimal,
    pub quantity: u32,
    pub size: Size,
    pub color: Color,
    /// Display image URL or path.
    pub image: String,
}

impl LineItem {
    /// Whether this line holds the given product variant.
    #[must_use]
    pub fn is_variant(&self, id: &ProductId, size: Size, color: Color) -> bool {
        self.id == *id && self.size == size && self.color == color
    }

    /// Unit price times quantity, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Unit price as a displayable [`Price`].
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::from_amount(self.price)
    }
}

/// The shopper's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Decode a cart from its persisted blob.
    ///
    /// # Errors
    ///
    /// Returns the decode error if the blob is not a valid cart. Callers
    /// loading from storage treat this as an empty cart.
    pub fn from_blob(blob: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(blob)
    }

    /// Encode the cart as its persisted blob.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_blob(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Lines in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a product variant to the cart.
    ///
    /// If a line with the same `(id, size, color)` exists its quantity grows
    /// by `item.quantity`; otherwise `item` is appended. Returns the index of
    /// the affected line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for a zero quantity and
    /// `CartError::NegativePrice` for a negative unit price.
    pub fn add_item(&mut self, item: LineItem) -> Result<usize, CartError> {
        if item.quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }
        if item.price.is_sign_negative() && !item.price.is_zero() {
            return Err(CartError::NegativePrice(item.price));
        }

        let existing = self
            .items
            .iter()
            .position(|line| line.is_variant(&item.id, item.size, item.color));

        match existing.and_then(|index| self.items.get_mut(index).map(|line| (index, line))) {
            Some((index, line)) => {
                line.quantity = line.quantity.saturating_add(item.quantity);
                Ok(index)
            }
            None => {
                self.items.push(item);
                Ok(self.items.len() - 1)
            }
        }
    }

    /// Set the quantity of the line at `index`.
    ///
    /// Quantities below 1 are raised to 1 rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` if `index` is out of range.
    pub fn update_quantity(&mut self, index: usize, quantity: i64) -> Result<&LineItem, CartError> {
        let len = self.items.len();
        let line = self
            .items
            .get_mut(index)
            .ok_or(CartError::LineNotFound { index, len })?;
        line.quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
        Ok(line)
    }

    /// Remove the line at `index`; later lines shift down by one.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` if `index` is out of range.
    pub fn remove_item(&mut self, index: usize) -> Result<LineItem, CartError> {
        if index >= self.items.len() {
            return Err(CartError::LineNotFound {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Sum of `price × quantity` over all lines, rounded to cents.
    #[must_use]
    pub fn total(&self) -> Decimal {
        round_money(self.items.iter().map(LineItem::line_total).sum())
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
