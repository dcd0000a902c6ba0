//! End-to-end tests for the storefront router.
//!
//! Requests go through the full middleware stack in-process via
//! `tower::ServiceExt::oneshot`. The session cookie from the first response
//! is carried on later requests so they share one browser's cart.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use loomwear_storefront::{app, config::StorefrontConfig, state::AppState};
use serde_json::Value;
use tower::ServiceExt;

const FORM: &str = "application/x-www-form-urlencoded";

/// One browser talking to one storefront instance.
struct Browser {
    app: Router,
    cookie: Option<String>,
}

impl Browser {
    fn new() -> Self {
        let state = AppState::new(StorefrontConfig::local()).expect("built-in catalog loads");
        Self {
            app: app(state),
            cookie: None,
        }
    }

    async fn send(&mut self, mut request: Request<Body>) -> Response {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.app.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }
        response
    }

    async fn get(&mut self, uri: &str) -> Response {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn post(&mut self, uri: &str, form: &str) -> Response {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, FORM)
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
    }
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn trigger(response: &Response) -> Option<Value> {
    response
        .headers()
        .get("hx-trigger")
        .map(|value| serde_json::from_str(value.to_str().unwrap()).unwrap())
}

async fn cart_count(browser: &mut Browser) -> String {
    body_text(browser.get("/cart/count").await).await
}

// ============================================================================
// Health & Pages
// ============================================================================

#[tokio::test]
async fn test_health() {
    let mut browser = Browser::new();
    let response = browser.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_security_headers_present() {
    let mut browser = Browser::new();
    let response = browser.get("/health").await;

    let headers = response.headers();
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.contains_key("content-security-policy"));
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_home_renders_first_page() {
    let mut browser = Browser::new();
    let response = browser.get("/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Basic Tee"));
    assert!(body.contains("Your cart is empty."));
    assert!(body.contains(r#"class="page-btn active" hx-get="/products?page=1""#));
}

#[tokio::test]
async fn test_out_of_range_page_is_clamped() {
    let mut browser = Browser::new();
    let body = body_text(browser.get("/products?page=99").await).await;

    assert!(body.contains(r#"class="page-btn active" hx-get="/products?page=3""#));
    assert!(!body.contains("Basic Tee"));
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_adding_same_variant_merges_lines() {
    let mut browser = Browser::new();

    let response = browser
        .post("/cart/add", "product_id=p1&size=M&color=Black&quantity=2")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let events = trigger(&response).unwrap();
    assert_eq!(
        events["showToast"]["message"],
        "Basic Tee (M, Black) x2 added to cart!"
    );
    assert_eq!(events["open-cart"], true);
    assert_eq!(events["cart-updated"], true);

    let response = browser
        .post("/cart/add", "product_id=p1&size=M&color=Black&quantity=1")
        .await;
    let body = body_text(response).await;
    assert!(body.contains("$19.99 x 3"));
    assert!(body.contains("Total: $59.97"));

    assert!(cart_count(&mut browser).await.contains(">3<"));
}

#[tokio::test]
async fn test_different_variants_stay_separate() {
    let mut browser = Browser::new();
    browser
        .post("/cart/add", "product_id=p1&size=M&color=Black&quantity=1")
        .await;
    browser
        .post("/cart/add", "product_id=p1&size=L&color=Black&quantity=1")
        .await;

    let body = body_text(browser.get("/cart").await).await;
    assert_eq!(body.matches(r#"class="cart-item""#).count(), 2);
    assert!(body.contains("Total: $39.98"));
}

#[tokio::test]
async fn test_rejected_add_explains_with_toast() {
    let mut browser = Browser::new();

    for (form, reason) in [
        (
            "product_id=p1&size=M&color=Black&quantity=0",
            "quantity must be at least 1 (got 0)",
        ),
        (
            "product_id=nope&size=M&color=Black&quantity=1",
            "unknown product nope",
        ),
        (
            "product_id=p1&size=XS&color=Black&quantity=1",
            "unknown size: XS",
        ),
    ] {
        let response = browser.post("/cart/add", form).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("hx-reswap").unwrap(), "none");
        assert_eq!(
            trigger(&response).unwrap()["showToast"]["message"],
            format!("Could not add to cart: {reason}")
        );
    }

    assert!(cart_count(&mut browser).await.contains(">0<"));
}

#[tokio::test]
async fn test_huge_add_quantity_is_capped() {
    let mut browser = Browser::new();
    let response = browser
        .post("/cart/add", "product_id=p1&size=M&color=Black&quantity=5000000000")
        .await;

    let message = trigger(&response).unwrap()["showToast"]["message"].clone();
    assert_eq!(message, "Basic Tee (M, Black) x4294967295 added to cart!");
}

#[tokio::test]
async fn test_remove_reindexes_lines() {
    let mut browser = Browser::new();
    browser
        .post("/cart/add", "product_id=p1&size=M&color=Black&quantity=1")
        .await;
    browser
        .post("/cart/add", "product_id=p2&size=M&color=Black&quantity=1")
        .await;

    let response = browser.post("/cart/remove", "index=0").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(!body.contains("Basic Tee"));
    assert!(body.contains("Heavyweight Tee"));
    assert!(body.contains(r#"name="index" value="0""#));

    let response = browser.post("/cart/remove", "index=5").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_carts_are_per_browser() {
    let mut alice = Browser::new();
    alice
        .post("/cart/add", "product_id=p1&size=M&color=Black&quantity=2")
        .await;

    let mut bob = Browser {
        app: alice.app.clone(),
        cookie: None,
    };
    assert!(cart_count(&mut bob).await.contains(">0<"));
    assert!(cart_count(&mut alice).await.contains(">2<"));
}

// ============================================================================
// Checkout & Payment
// ============================================================================

#[tokio::test]
async fn test_checkout_with_empty_cart_stays_put() {
    let mut browser = Browser::new();
    let response = browser.post("/checkout", "").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("hx-redirect").is_none());
    assert_eq!(response.headers().get("hx-reswap").unwrap(), "none");
    assert_eq!(
        trigger(&response).unwrap()["showToast"]["message"],
        "Your cart is empty!"
    );
}

#[tokio::test]
async fn test_checkout_redirects_to_payment() {
    let mut browser = Browser::new();
    browser
        .post("/cart/add", "product_id=p1&size=M&color=Black&quantity=1")
        .await;

    let response = browser.post("/checkout", "").await;
    assert_eq!(response.headers().get("hx-redirect").unwrap(), "/payment");
}

#[tokio::test]
async fn test_summary_quantity_update_clamps() {
    let mut browser = Browser::new();
    browser
        .post("/cart/add", "product_id=p1&size=M&color=Black&quantity=2")
        .await;

    let body = body_text(
        browser
            .post("/payment/summary/update", "index=0&quantity=-4")
            .await,
    )
    .await;
    assert!(body.contains("Basic Tee</strong> x 1"));
    assert!(body.contains("Total: $19.99"));

    let body = body_text(
        browser
            .post("/payment/summary/update", "index=0&quantity=5")
            .await,
    )
    .await;
    assert!(body.contains("Total: $99.95"));
    assert!(cart_count(&mut browser).await.contains(">5<"));
}

#[tokio::test]
async fn test_summary_quantity_update_saturates() {
    let mut browser = Browser::new();
    browser
        .post("/cart/add", "product_id=p1&size=M&color=Black&quantity=1")
        .await;

    let body = body_text(
        browser
            .post("/payment/summary/update", "index=0&quantity=99999999999999999999")
            .await,
    )
    .await;
    assert!(body.contains("Basic Tee</strong> x 4294967295"));
}

#[tokio::test]
async fn test_nav_checkout_goes_through_gate() {
    let mut browser = Browser::new();
    let body = body_text(browser.get("/").await).await;

    assert!(body.contains(r#"class="nav-link" hx-post="/checkout""#));
    assert!(!body.contains(r#"href="/payment""#));
}

#[tokio::test]
async fn test_method_switch() {
    let mut browser = Browser::new();

    let body = body_text(browser.get("/payment/method/internet-banking").await).await;
    assert!(body.contains(r#"name="bank""#));
    assert!(!body.contains(r#"name="card_number""#));

    let response = browser.get("/payment/method/crypto").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_incomplete_card_payment_keeps_cart() {
    let mut browser = Browser::new();
    browser
        .post("/cart/add", "product_id=p1&size=M&color=Black&quantity=3")
        .await;

    let response = browser
        .post(
            "/payment/card",
            "card_holder=Ada+Lovelace&card_number=&expiry=12%2F30&cvv=123",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Please fill in all card details before proceeding."));
    assert!(body.contains("alert-error"));

    assert!(cart_count(&mut browser).await.contains(">3<"));
}

#[tokio::test]
async fn test_card_payment_clears_cart() {
    let mut browser = Browser::new();
    browser
        .post("/cart/add", "product_id=p1&size=M&color=Black&quantity=3")
        .await;

    let response = browser
        .post(
            "/payment/card",
            "card_holder=Ada+Lovelace&card_number=4242424242424242&expiry=12%2F30&cvv=123",
        )
        .await;
    assert_eq!(
        trigger(&response).unwrap()["showToast"]["message"],
        "Card payment successful! Amount Paid: $59.97"
    );
    let body = body_text(response).await;
    assert!(body.contains("alert-success"));
    assert!(body.contains(r#"hx-swap-oob="innerHTML""#));

    assert!(cart_count(&mut browser).await.contains(">0<"));
}

#[tokio::test]
async fn test_internet_banking_payment() {
    let mut browser = Browser::new();

    let body = body_text(
        browser
            .post("/payment/internet-banking", "bank=Union+Trust&account=12345")
            .await,
    )
    .await;
    assert!(body.contains("Your cart is empty!"));

    browser
        .post("/cart/add", "product_id=p2&size=S&color=Red&quantity=2")
        .await;
    let body = body_text(
        browser
            .post("/payment/internet-banking", "bank=Union+Trust&account=12345")
            .await,
    )
    .await;
    assert!(body.contains("Internet Banking payment successful! Amount Paid: $49.00"));
    assert!(cart_count(&mut browser).await.contains(">0<"));
}

// ============================================================================
// Contact
// ============================================================================

#[tokio::test]
async fn test_contact_message_is_acknowledged() {
    let mut browser = Browser::new();

    let response = browser.get("/contact").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(r#"id="contactForm""#));

    let response = browser
        .post(
            "/contact",
            "name=Ada&email=ada%40example.com&message=Do+you+ship+abroad%3F",
        )
        .await;
    assert_eq!(
        trigger(&response).unwrap()["showToast"]["message"],
        "✅ Your message has been sent!"
    );
    let body = body_text(response).await;
    assert!(body.contains(r#"id="contactForm""#));
    assert!(!body.contains("Ada"));
}

#[tokio::test]
async fn test_incomplete_contact_message_keeps_form() {
    let mut browser = Browser::new();
    let response = browser.post("/contact", "name=Ada&email=&message=").await;

    assert_eq!(response.headers().get("hx-reswap").unwrap(), "none");
    assert_eq!(
        trigger(&response).unwrap()["showToast"]["message"],
        "Please fill in all fields."
    );
}
