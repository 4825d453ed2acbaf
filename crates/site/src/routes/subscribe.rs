//! Newsletter subscription (HTMX).

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;
use winter_gifts_core::backend::Subscription;
use winter_gifts_core::{Email, Locale};

use crate::i18n::Messages;
use crate::middleware::PageLocale;
use crate::state::AppState;

/// Subscription form data.
#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    #[serde(default)]
    pub email: String,
}

/// State of the subscription form.
#[derive(Debug, Clone)]
pub struct SubscribeFormView {
    pub action: String,
    pub email: String,
    pub error: Option<String>,
}

impl SubscribeFormView {
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        Self {
            action: format!("/{}/subscribe", locale.code()),
            email: String::new(),
            error: None,
        }
    }
}

/// Form fragment, re-rendered with an error.
#[derive(Template, WebTemplate)]
#[template(path = "subscribe/_form.html")]
pub struct SubscribeFormTemplate {
    pub i18n: Messages,
    pub subscribe: SubscribeFormView,
}

/// Success fragment (replaces the form).
#[derive(Template, WebTemplate)]
#[template(path = "subscribe/_success.html")]
pub struct SubscribeSuccessTemplate {
    pub message: String,
}

/// Subscribe to the newsletter.
///
/// POST /{locale}/subscribe
///
/// An address that is already subscribed gets the same success message.
#[instrument(skip(state, page, form), fields(locale = %page.locale))]
pub async fn subscribe(
    State(state): State<AppState>,
    page: PageLocale,
    Form(form): Form<SubscribeForm>,
) -> impl IntoResponse {
    let failed = |key: &str, email: String| {
        let mut subscribe = SubscribeFormView::new(page.locale);
        subscribe.email = email;
        subscribe.error = Some(page.messages.t(key).to_string());
        SubscribeFormTemplate {
            i18n: page.messages.clone(),
            subscribe,
        }
        .into_response()
    };

    let Ok(email) = Email::parse(&form.email) else {
        return failed("subscribe.errors.email", form.email);
    };

    match state.backend().subscribe(&email, page.locale).await {
        Ok(outcome) => {
            if outcome == Subscription::AlreadySubscribed {
                tracing::info!("Address already subscribed; treating as success");
            } else {
                tracing::info!("Newsletter subscription created");
            }
            SubscribeSuccessTemplate {
                message: page
                    .messages
                    .t_with("subscribe.success", &[("email", email.as_str())]),
            }
            .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Newsletter subscription failed");
            failed("subscribe.errors.backend", email.into_inner())
        }
    }
}
