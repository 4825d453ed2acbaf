//! Locale extraction from the first path segment.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use winter_gifts_core::Locale;

use crate::i18n::Messages;
use crate::state::AppState;

/// The page locale and its messages.
///
/// `/{locale}/...` is resolved through the configured resolver, so an
/// unsupported segment renders in the default locale.
#[derive(Debug, Clone)]
pub struct PageLocale {
    pub locale: Locale,
    pub messages: Messages,
    /// Path after the locale segment, used by the language switcher.
    pub rest: String,
}

/// Split `/{segment}/{rest...}` into the segment and the remaining path.
fn split_locale_segment(path: &str) -> (Option<&str>, &str) {
    let trimmed = path.trim_start_matches('/');
    match trimmed.split_once('/') {
        Some((segment, rest)) => (Some(segment), rest),
        None if trimmed.is_empty() => (None, ""),
        None => (Some(trimmed), ""),
    }
}

impl FromRequestParts<AppState> for PageLocale {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (segment, rest) = split_locale_segment(parts.uri.path());
        let locale = state.resolver().resolve(segment);

        Ok(Self {
            locale,
            messages: state.messages(locale),
            rest: rest.to_string(),
        })
    }
}
