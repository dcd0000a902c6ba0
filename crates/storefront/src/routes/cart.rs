//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every handler loads the cart from the browser's session through
//! [`SessionCart`], mutates it, and re-renders the fragment from the
//! resulting state. Line positions are recomputed on every render.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use loomwear_core::{Cart, CartError, Color, LineItem, Price, Size, VariantError, checkout};
use serde::Deserialize;
use tracing::instrument;

use crate::cart::{SessionCart, StoreError};
use crate::error::{Result, add_breadcrumb};
use crate::routes::notify::{CART_UPDATED, Notify, OPEN_CART};
use crate::state::AppState;

/// Response header asking HTMX to navigate client-side.
const HX_REDIRECT: HeaderName = HeaderName::from_static("hx-redirect");

/// Response header overriding the swap strategy.
pub(crate) const HX_RESWAP: HeaderName = HeaderName::from_static("hx-reswap");

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    /// Current display position; used as the line's address in forms.
    pub index: usize,
    pub id: String,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub size: &'static str,
    pub color: &'static str,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .enumerate()
                .map(|(index, line)| CartItemView::from_line(index, line))
                .collect(),
            total: Price::from_amount(cart.total()).display(),
            item_count: cart.item_count(),
        }
    }
}

impl CartItemView {
    fn from_line(index: usize, line: &LineItem) -> Self {
        Self {
            index,
            id: line.id.to_string(),
            name: line.name.clone(),
            image: line.image.clone(),
            quantity: line.quantity,
            size: line.size.label(),
            color: line.color.label(),
            price: line.unit_price().display(),
            line_price: Price::from_amount(line.line_total()).display(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub size: String,
    pub color: String,
    pub quantity: Option<i64>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub index: usize,
}

/// Cart sidebar contents fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Render the cart sidebar contents.
#[instrument(skip_all)]
pub async fn show(store: SessionCart) -> impl IntoResponse {
    CartItemsTemplate {
        cart: CartView::from(store.cart()),
    }
}

/// Add a product variant to the cart (HTMX).
///
/// Product name, price, and image come from the catalog. Returns the
/// refreshed sidebar, opens it, and shows a confirmation toast. A rejected
/// addition leaves the sidebar as it is and explains why in a toast.
#[instrument(skip(state, store))]
pub async fn add(
    State(state): State<AppState>,
    mut store: SessionCart,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let item = match line_for(&state, &form) {
        Ok(item) => item,
        Err(reason) => return Ok(rejected(&state, &reason)),
    };

    let name = item.name.clone();
    let (id, size, color, quantity) = (item.id.clone(), item.size, item.color, item.quantity);
    match store.add_item(item).await {
        Ok(_) => {}
        Err(StoreError::Cart(e)) => return Ok(rejected(&state, &e.to_string())),
        Err(e) => return Err(e.into()),
    }

    add_breadcrumb("cart", "Added item", Some(&[("product_id", id.as_str())]));
    tracing::info!(product_id = %id, %size, %color, quantity, "Item added to cart");

    let notify = Notify::new()
        .toast(
            format!("{name} ({size}, {color}) x{quantity} added to cart!"),
            state.config().toast_duration_ms,
        )
        .event(CART_UPDATED)
        .event(OPEN_CART);

    Ok((
        notify,
        CartItemsTemplate {
            cart: CartView::from(store.cart()),
        },
    )
        .into_response())
}

/// Build the cart line for an add form from the catalog.
///
/// Quantities beyond what a line can hold are capped.
fn line_for(state: &AppState, form: &AddToCartForm) -> std::result::Result<LineItem, String> {
    let requested = form.quantity.unwrap_or(1);
    if requested < 1 {
        return Err(CartError::InvalidQuantity(requested).to_string());
    }
    let quantity = u32::try_from(requested).unwrap_or(u32::MAX);

    let size: Size = form.size.parse().map_err(|e: VariantError| e.to_string())?;
    let color: Color = form.color.parse().map_err(|e: VariantError| e.to_string())?;

    let product = state
        .catalog()
        .find(&form.product_id.as_str().into())
        .ok_or_else(|| format!("unknown product {}", form.product_id))?;

    Ok(LineItem {
        id: product.id.clone(),
        name: product.name.clone(),
        price: product.price,
        quantity,
        size,
        color,
        image: product.image.clone(),
    })
}

/// Answer a rejected cart action with a toast and no swap.
fn rejected(state: &AppState, reason: &str) -> Response {
    tracing::debug!(%reason, "Add to cart rejected");
    (
        StatusCode::OK,
        Notify::new().toast(
            format!("Could not add to cart: {reason}"),
            state.config().toast_duration_ms,
        ),
        [(HX_RESWAP, HeaderValue::from_static("none"))],
    )
        .into_response()
}

/// Remove a cart line by its display position (HTMX).
#[instrument(skip(store))]
pub async fn remove(
    mut store: SessionCart,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let removed = store.remove_item(form.index).await?;
    tracing::info!(product_id = %removed.id, "Item removed from cart");

    Ok((
        Notify::new().event(CART_UPDATED),
        CartItemsTemplate {
            cart: CartView::from(store.cart()),
        },
    )
        .into_response())
}

/// Get cart count badge (HTMX).
#[instrument(skip_all)]
pub async fn count(store: SessionCart) -> impl IntoResponse {
    CartCountTemplate {
        count: store.cart().item_count(),
    }
}

/// Move from the cart to the payment page.
///
/// An empty cart shows a toast and leaves the shopper where they are.
#[instrument(skip_all)]
pub async fn checkout(State(state): State<AppState>, store: SessionCart) -> Response {
    if let Err(e) = checkout::ensure_not_empty(store.cart()) {
        tracing::debug!("Checkout blocked: cart is empty");
        return (
            StatusCode::OK,
            Notify::new().toast(e.to_string(), state.config().toast_duration_ms),
            [(HX_RESWAP, HeaderValue::from_static("none"))],
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [(HX_REDIRECT, HeaderValue::from_static("/payment"))],
    )
        .into_response()
}
