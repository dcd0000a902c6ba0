//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the URL of the fingerprinted stylesheet.
///
/// Usage in templates: `{{ ""|css_path }}`
#[askama::filter_fn]
pub fn css_path(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(asset_path("css", "main", env!("CSS_HASH")))
}

/// Returns the URL of the fingerprinted script.
///
/// Usage in templates: `{{ ""|js_path }}`
#[askama::filter_fn]
pub fn js_path(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(asset_path("js", "app", env!("JS_HASH")))
}

/// Derived path when the build script produced a hash, plain path otherwise.
fn asset_path(ext: &str, stem: &str, hash: &str) -> String {
    if hash.is_empty() {
        format!("/static/{ext}/{stem}.{ext}")
    } else {
        format!("/static/{ext}/derived/{stem}.{hash}.{ext}")
    }
}
