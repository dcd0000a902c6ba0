//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Catalog page (?page=N)
//! GET  /products                  - Catalog grid fragment (?page=N, HTMX)
//! GET  /health                    - Health check
//! GET  /contact                   - Contact page
//! POST /contact                   - Acknowledge a message (toast, resets the form)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                      - Cart sidebar contents
//! POST /cart/add                  - Add item (returns sidebar, toast, opens cart)
//! POST /cart/remove               - Remove line by position (returns sidebar)
//! GET  /cart/count                - Cart count badge
//!
//! # Checkout
//! POST /checkout                  - Empty cart: toast only. Otherwise HX-Redirect to /payment
//! GET  /payment                   - Payment page with order summary
//! GET  /payment/method/{method}   - Payment form fragment (card | internet-banking)
//! POST /payment/summary/update    - Change line quantity (returns order summary)
//! POST /payment/card              - Pay by card
//! POST /payment/internet-banking  - Pay by internet banking
//! ```

pub mod cart;
pub mod contact;
pub mod home;
pub mod notify;
pub mod payment;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the payment routes router.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(payment::show))
        .route("/method/{method}", get(payment::select_method))
        .route("/summary/update", post(payment::update_quantity))
        .route("/card", post(payment::pay_by_card))
        .route("/internet-banking", post(payment::pay_by_internet_banking))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/", get(home::home))
        .route("/products", get(home::products))
        // Cart fragments
        .nest("/cart", cart_routes())
        // Checkout and payment
        .route("/checkout", post(cart::checkout))
        .nest("/payment", payment_routes())
        // Contact
        .route("/contact", get(contact::show).post(contact::submit))
}
