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

/// Path of the stylesheet, content-hashed when the build could hash it.
///
/// Usage in templates: `{{ ""|stylesheet_path }}`
#[askama::filter_fn]
pub fn stylesheet_path(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(hashed_stylesheet(env!("CSS_HASH")))
}

fn hashed_stylesheet(hash: &str) -> String {
    if hash.is_empty() {
        "/static/css/site.css".to_string()
    } else {
        format!("/static/css/derived/site.{hash}.css")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashed_stylesheet() {
        assert_eq!(hashed_stylesheet(""), "/static/css/site.css");
        assert_eq!(
            hashed_stylesheet("0badf00d"),
            "/static/css/derived/site.0badf00d.css"
        );
    }
}
