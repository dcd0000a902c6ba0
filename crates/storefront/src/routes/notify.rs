//! Client notifications carried in the `HX-Trigger` response header.
//!
//! HTMX dispatches each key of the header's JSON object as a DOM event on the
//! page. `static/js/app.js` listens for `showToast` (transient message),
//! `open-cart` (slide the sidebar in) and `cart-updated` (refresh badges).

use std::convert::Infallible;

use axum::http::{HeaderName, HeaderValue};
use axum::response::{IntoResponseParts, ResponseParts};
use serde_json::{Map, Value, json};

/// Response header HTMX reads client-side events from.
pub const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");

/// Event fired whenever the cart changes.
pub const CART_UPDATED: &str = "cart-updated";

/// Event that opens the cart sidebar.
pub const OPEN_CART: &str = "open-cart";

/// Builder for the events attached to one response.
#[derive(Debug, Default, Clone)]
pub struct Notify {
    events: Map<String, Value>,
}

impl Notify {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `message` for `duration_ms` milliseconds.
    #[must_use]
    pub fn toast(mut self, message: impl Into<String>, duration_ms: u64) -> Self {
        self.events.insert(
            "showToast".to_string(),
            json!({ "message": message.into(), "duration": duration_ms }),
        );
        self
    }

    /// Fire a bare event.
    #[must_use]
    pub fn event(mut self, name: &str) -> Self {
        self.events.insert(name.to_string(), Value::Bool(true));
        self
    }

    /// Header value for the collected events, if any.
    #[must_use]
    pub fn header_value(&self) -> Option<HeaderValue> {
        if self.events.is_empty() {
            return None;
        }
        let json = Value::Object(self.events.clone()).to_string();
        HeaderValue::from_str(&escape_non_ascii(&json)).ok()
    }
}

impl IntoResponseParts for Notify {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        match self.header_value() {
            Some(value) => {
                res.headers_mut().insert(HX_TRIGGER, value);
            }
            None if !self.events.is_empty() => {
                tracing::warn!("Dropping notification that cannot be sent as a header");
            }
            None => {}
        }
        Ok(res)
    }
}

/// Rewrite non-ASCII characters as JSON `\uXXXX` escapes so the text is a
/// valid header value. Only string contents can hold such characters, where
/// the escape is equivalent.
fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0_u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}
