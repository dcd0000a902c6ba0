//! Product catalog.
//!
//! The shop sells a fixed list of products compiled into the binary from
//! `content/catalog.json`. The catalog is loaded once at startup and shared
//! through [`AppState`](crate::state::AppState).

use loomwear_core::{Price, ProductId};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Raw catalog data.
const CATALOG_JSON: &str = include_str!("../content/catalog.json");

/// Highest star rating a product can carry.
pub const MAX_RATING: u8 = 5;

/// Errors loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id in catalog: {0}")]
    DuplicateId(ProductId),
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
}

/// A product as listed on the catalog page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    /// Star rating, 1 to [`MAX_RATING`].
    #[serde(default)]
    pub rating: u8,
}

impl Product {
    /// Unit price as a displayable [`Price`].
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::from_amount(self.price)
    }
}

/// The fixed product list.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

/// One page of the catalog.
#[derive(Debug, Clone, Copy)]
pub struct CatalogPage<'a> {
    pub products: &'a [Product],
    /// 1-based page number, already clamped into range.
    pub current_page: usize,
    pub total_pages: usize,
}

impl CatalogPage<'_> {
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Page numbers for the pagination buttons.
    #[must_use]
    pub fn page_numbers(&self) -> Vec<usize> {
        (1..=self.total_pages).collect()
    }
}

impl Catalog {
    /// Load the catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled catalog is malformed.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(CATALOG_JSON)
    }

    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on invalid JSON, duplicate ids, or negative prices.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let mut products: Vec<Product> = serde_json::from_str(json)?;

        let mut seen = std::collections::HashSet::new();
        for product in &mut products {
            if !seen.insert(product.id.clone()) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
            if product.price.is_sign_negative() && !product.price.is_zero() {
                return Err(CatalogError::NegativePrice(product.id.clone()));
            }
            product.rating = product.rating.min(MAX_RATING);
        }

        Ok(Self { products })
    }

    /// Create a catalog from already-validated products.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == *id)
    }

    /// Number of pages at `per_page` products each (at least 1).
    #[must_use]
    pub fn total_pages(&self, per_page: usize) -> usize {
        self.products.len().div_ceil(per_page.max(1)).max(1)
    }

    /// Slice out one page. `page` is 1-based and clamped into range.
    #[must_use]
    pub fn page(&self, page: usize, per_page: usize) -> CatalogPage<'_> {
        let per_page = per_page.max(1);
        let total_pages = self.total_pages(per_page);
        let current_page = page.clamp(1, total_pages);

        let start = (current_page - 1) * per_page;
        let end = (start + per_page).min(self.products.len());
        let products = self.products.get(start..end).unwrap_or_default();

        CatalogPage {
            products,
            current_page,
            total_pages,
        }
    }
}
