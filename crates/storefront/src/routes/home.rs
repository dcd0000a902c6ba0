//! Catalog page route handlers.
//!
//! The home page lists the catalog a page at a time. Each product card carries
//! size, color, and quantity pickers feeding `POST /cart/add`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use loomwear_core::{Color, Size};
use serde::Deserialize;
use tracing::instrument;

use crate::cart::SessionCart;
use crate::catalog::{CatalogPage, MAX_RATING, Product};
use crate::filters;
use crate::routes::cart::CartView;
use crate::state::AppState;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: String,
    pub rating: u8,
    /// One entry per star; `true` for filled.
    pub stars: Vec<bool>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.unit_price().display(),
            image: product.image.clone(),
            rating: product.rating,
            stars: (1..=MAX_RATING).map(|star| star <= product.rating).collect(),
        }
    }
}

/// Catalog grid display data for templates.
#[derive(Clone)]
pub struct ProductGridView {
    pub products: Vec<ProductCardView>,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_numbers: Vec<usize>,
    pub has_previous: bool,
    pub has_next: bool,
    pub sizes: Vec<&'static str>,
    pub colors: Vec<&'static str>,
}

impl From<CatalogPage<'_>> for ProductGridView {
    fn from(page: CatalogPage<'_>) -> Self {
        Self {
            products: page.products.iter().map(ProductCardView::from).collect(),
            current_page: page.current_page,
            total_pages: page.total_pages,
            page_numbers: page.page_numbers(),
            has_previous: page.has_previous(),
            has_next: page.has_next(),
            sizes: Size::ALL.iter().map(Size::label).collect(),
            colors: Color::ALL.iter().map(Color::label).collect(),
        }
    }
}

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<usize>,
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub grid: ProductGridView,
    pub cart: CartView,
}

/// Catalog grid fragment template (for HTMX pagination).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub grid: ProductGridView,
}

fn grid_for(state: &AppState, query: &PaginationQuery) -> ProductGridView {
    let per_page = state.config().catalog.products_per_page;
    ProductGridView::from(state.catalog().page(query.page.unwrap_or(1), per_page))
}

/// Display the catalog page.
#[instrument(skip(state, store))]
pub async fn home(
    State(state): State<AppState>,
    store: SessionCart,
    Query(query): Query<PaginationQuery>,
) -> impl IntoResponse {
    HomeTemplate {
        grid: grid_for(&state, &query),
        cart: CartView::from(store.cart()),
    }
}

/// Render one page of the catalog grid (HTMX).
#[instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> impl IntoResponse {
    ProductGridTemplate {
        grid: grid_for(&state, &query),
    }
}
