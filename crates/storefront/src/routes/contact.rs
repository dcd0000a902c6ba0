//! Contact page route handlers.
//!
//! Messages are acknowledged and not stored or forwarded anywhere.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::routes::cart::HX_RESWAP;
use crate::routes::notify::Notify;
use crate::state::AppState;

/// Toast shown once a message is accepted.
pub const MESSAGE_SENT: &str = "✅ Your message has been sent!";

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl ContactForm {
    fn is_complete(&self) -> bool {
        [&self.name, &self.email, &self.message]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate;

/// Empty contact form fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/contact_form.html")]
pub struct ContactFormTemplate;

/// Display the contact page.
#[instrument]
pub async fn show() -> impl IntoResponse {
    ContactTemplate
}

/// Acknowledge a contact message and reset the form (HTMX).
///
/// An incomplete form is left in place with a toast.
#[instrument(skip_all)]
pub async fn submit(State(state): State<AppState>, Form(form): Form<ContactForm>) -> Response {
    let duration = state.config().toast_duration_ms;

    if !form.is_complete() {
        return (
            StatusCode::OK,
            Notify::new().toast("Please fill in all fields.", duration),
            [(HX_RESWAP, HeaderValue::from_static("none"))],
        )
            .into_response();
    }

    tracing::info!(message_len = form.message.len(), "Contact message received");
    (Notify::new().toast(MESSAGE_SENT, duration), ContactFormTemplate).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_form_completeness() {
        let form = |name: &str, email: &str, message: &str| ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        };
        assert!(form("Ada", "ada@example.com", "Hi").is_complete());
        assert!(!form("Ada", "ada@example.com", "   ").is_complete());
        assert!(!form("", "", "").is_complete());
    }
}
