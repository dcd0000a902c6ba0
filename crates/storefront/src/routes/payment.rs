//! Payment page route handlers.
//!
//! The payment page shows an editable order summary and one of two payment
//! forms. Choosing a method swaps in that method's form; the other is not
//! rendered. Submitting a complete form "pays" the cart total and clears the
//! cart. Nothing is charged.

use std::num::IntErrorKind;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use loomwear_core::{
    BANKS, CardDetails, CheckoutError, InternetBankingDetails, PaymentMethod, PaymentReceipt,
    checkout,
};
use serde::Deserialize;
use tracing::instrument;

use crate::cart::SessionCart;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::routes::cart::CartView;
use crate::routes::notify::{CART_UPDATED, Notify};
use crate::state::AppState;

/// Payment form display data for templates.
#[derive(Clone)]
pub struct PaymentFormView {
    pub method: PaymentMethod,
    pub banks: &'static [&'static str],
}

impl PaymentFormView {
    #[must_use]
    pub const fn new(method: PaymentMethod) -> Self {
        Self {
            method,
            banks: BANKS,
        }
    }

    #[must_use]
    pub fn is_card(&self) -> bool {
        self.method == PaymentMethod::Card
    }
}

/// Outcome of a payment attempt for templates.
#[derive(Clone)]
pub struct PaymentResultView {
    pub success: bool,
    pub message: String,
}

impl From<&PaymentReceipt> for PaymentResultView {
    fn from(receipt: &PaymentReceipt) -> Self {
        Self {
            success: true,
            message: receipt.message(),
        }
    }
}

impl From<&CheckoutError> for PaymentResultView {
    fn from(err: &CheckoutError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
        }
    }
}

/// Order summary quantity change form data.
///
/// `quantity` is kept as text; anything that is not a number counts as 1.
/// Numbers too large to represent saturate.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityForm {
    pub index: usize,
    pub quantity: String,
}

impl UpdateQuantityForm {
    fn requested_quantity(&self) -> i64 {
        match self.quantity.trim().parse::<i64>() {
            Ok(quantity) => quantity,
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => i64::MAX,
                IntErrorKind::NegOverflow => i64::MIN,
                _ => 1,
            },
        }
    }
}

/// Payment page template.
#[derive(Template, WebTemplate)]
#[template(path = "payment/show.html")]
pub struct PaymentShowTemplate {
    pub summary: CartView,
    pub form: PaymentFormView,
}

/// Order summary fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_summary.html")]
pub struct OrderSummaryTemplate {
    pub summary: CartView,
}

/// Payment form fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/payment_form.html")]
pub struct PaymentFormTemplate {
    pub form: PaymentFormView,
}

/// Payment result fragment template (for HTMX).
///
/// On success the order summary is swapped out-of-band to its empty state.
#[derive(Template, WebTemplate)]
#[template(path = "partials/payment_result.html")]
pub struct PaymentResultTemplate {
    pub result: PaymentResultView,
    pub summary: Option<CartView>,
}

/// Display the payment page.
#[instrument(skip_all)]
pub async fn show(store: SessionCart) -> impl IntoResponse {
    PaymentShowTemplate {
        summary: CartView::from(store.cart()),
        form: PaymentFormView::new(PaymentMethod::default()),
    }
}

/// Switch the active payment method (HTMX).
#[instrument]
pub async fn select_method(Path(method): Path<String>) -> Result<impl IntoResponse> {
    let method: PaymentMethod = method.parse().map_err(AppError::NotFound)?;
    Ok(PaymentFormTemplate {
        form: PaymentFormView::new(method),
    })
}

/// Change a line's quantity from the order summary (HTMX).
///
/// Values below 1 are stored as 1.
#[instrument(skip(store))]
pub async fn update_quantity(
    mut store: SessionCart,
    Form(form): Form<UpdateQuantityForm>,
) -> Result<Response> {
    let stored = store
        .update_quantity(form.index, form.requested_quantity())
        .await?;
    tracing::info!(index = form.index, quantity = stored, "Cart quantity updated");

    Ok((
        Notify::new().event(CART_UPDATED),
        OrderSummaryTemplate {
            summary: CartView::from(store.cart()),
        },
    )
        .into_response())
}

/// Pay by card (HTMX).
#[instrument(skip_all)]
pub async fn pay_by_card(
    State(state): State<AppState>,
    store: SessionCart,
    Form(details): Form<CardDetails>,
) -> Result<Response> {
    let outcome = checkout::pay_by_card(store.cart(), &details);
    settle(&state, store, outcome).await
}

/// Pay by internet banking (HTMX).
#[instrument(skip_all)]
pub async fn pay_by_internet_banking(
    State(state): State<AppState>,
    store: SessionCart,
    Form(details): Form<InternetBankingDetails>,
) -> Result<Response> {
    let outcome = checkout::pay_by_internet_banking(store.cart(), &details);
    settle(&state, store, outcome).await
}

/// Clear the cart after a successful payment and render the outcome.
///
/// A rejected payment leaves the cart untouched.
async fn settle(
    state: &AppState,
    mut store: SessionCart,
    outcome: std::result::Result<PaymentReceipt, CheckoutError>,
) -> Result<Response> {
    match outcome {
        Ok(receipt) => {
            store.clear().await?;
            add_breadcrumb("checkout", "Payment completed", Some(&[("method", receipt.method.slug())]));
            tracing::info!(method = %receipt.method, amount = %receipt.amount, "Payment completed");

            Ok((
                Notify::new()
                    .toast(receipt.message(), state.config().toast_duration_ms)
                    .event(CART_UPDATED),
                PaymentResultTemplate {
                    result: PaymentResultView::from(&receipt),
                    summary: Some(CartView::from(store.cart())),
                },
            )
                .into_response())
        }
        Err(err) => {
            match err {
                CheckoutError::FormMissing(method) => {
                    tracing::warn!(%method, "Payment form fields absent from submission");
                }
                _ => tracing::debug!(error = %err, "Payment rejected"),
            }

            Ok(PaymentResultTemplate {
                result: PaymentResultView::from(&err),
                summary: None,
            }
            .into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_quantity_parsing() {
        let form = |quantity: &str| UpdateQuantityForm {
            index: 0,
            quantity: quantity.to_string(),
        };
        assert_eq!(form("3").requested_quantity(), 3);
        assert_eq!(form(" -2 ").requested_quantity(), -2);
        assert_eq!(form("abc").requested_quantity(), 1);
        assert_eq!(form("").requested_quantity(), 1);
        assert_eq!(form("99999999999999999999").requested_quantity(), i64::MAX);
        assert_eq!(form("-99999999999999999999").requested_quantity(), i64::MIN);
    }

    #[test]
    fn test_result_view_from_error() {
        let view = PaymentResultView::from(&CheckoutError::IncompleteCardDetails);
        assert!(!view.success);
        assert_eq!(
            view.message,
            "Please fill in all card details before proceeding."
        );
    }
}
