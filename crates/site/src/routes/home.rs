//! Home page, locale negotiation and the not-found page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, header::ACCEPT_LANGUAGE},
    response::{IntoResponse, Redirect},
};
use tracing::instrument;

use crate::filters;
use crate::i18n::Messages;
use crate::middleware::{CspNonce, PageLocale};
use crate::state::AppState;

use super::subscribe::SubscribeFormView;
use super::{PageChrome, ProjectView};

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub chrome: PageChrome,
    pub i18n: Messages,
    pub children_waiting: String,
    /// `None` when the backend could not be reached.
    pub projects: Option<Vec<ProjectView>>,
    pub subscribe: SubscribeFormView,
}

/// Not-found page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub chrome: PageChrome,
    pub i18n: Messages,
}

/// Redirect `/` to the best locale for the `Accept-Language` header.
///
/// GET /
pub async fn root_redirect(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    let accept = headers.get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok());
    let locale = state.resolver().negotiate(accept);
    Redirect::to(&format!("/{}", locale.code()))
}

/// Home page.
///
/// GET /{locale}
///
/// A backend failure hides the project list instead of failing the page.
#[instrument(skip(state, page, nonce), fields(locale = %page.locale))]
pub async fn home(
    State(state): State<AppState>,
    page: PageLocale,
    nonce: CspNonce,
) -> impl IntoResponse {
    let projects = match state.projects().published().await {
        Ok(projects) => Some(
            projects
                .iter()
                .map(|p| ProjectView::new(p, page.locale, &page.messages))
                .collect(),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Published projects unavailable");
            None
        }
    };

    let count = state.gifts().children_count().to_string();
    let children_waiting = page
        .messages
        .t_with("home.children_waiting", &[("count", count.as_str())]);

    HomeTemplate {
        chrome: PageChrome::new(&page, &nonce, state.config().locales.supported()),
        children_waiting,
        projects,
        subscribe: SubscribeFormView::new(page.locale),
        i18n: page.messages,
    }
}

/// Localized 404 page.
pub async fn not_found(
    State(state): State<AppState>,
    page: PageLocale,
    nonce: CspNonce,
) -> impl IntoResponse {
    not_found_page(&state, page, &nonce)
}

pub(crate) fn not_found_page(
    state: &AppState,
    page: PageLocale,
    nonce: &CspNonce,
) -> axum::response::Response {
    let template = NotFoundTemplate {
        chrome: PageChrome::new(&page, nonce, state.config().locales.supported()),
        i18n: page.messages,
    };
    (StatusCode::NOT_FOUND, template).into_response()
}
