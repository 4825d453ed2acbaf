//! HTTP route handlers for the public site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                   - Redirect to the negotiated locale (303)
//! GET  /health                             - Liveness
//! GET  /health/ready                       - Readiness (backend ping)
//!
//! GET  /{locale}                           - Home: snowfall, projects, subscribe form
//! GET  /{locale}/projects/{slug}           - Project detail with pledge form
//! POST /{locale}/projects/{slug}/donate    - Record a pending donation (rate limited)
//! POST /{locale}/subscribe                 - Newsletter signup, HTMX fragment (rate limited)
//! ```
//!
//! An unsupported `{locale}` segment renders in the default locale.

pub mod health;
pub mod home;
pub mod projects;
pub mod subscribe;

use axum::{
    Router,
    routing::{get, post},
};
use winter_gifts_core::{CurrencyCode, Locale, Project};

use crate::content::FOOTER_HTML;
use crate::i18n::Messages;
use crate::middleware::{CspNonce, PageLocale, form_rate_limiter};
use crate::snowfall::{DEFAULT_FLAKE_COUNT, Snowfall};
use crate::state::AppState;

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    let forms = Router::new()
        .route("/{locale}/projects/{slug}/donate", post(projects::donate))
        .route("/{locale}/subscribe", post(subscribe::subscribe))
        .layer(form_rate_limiter());

    Router::new()
        .route("/", get(home::root_redirect))
        .route("/{locale}", get(home::home))
        .route("/{locale}/projects/{slug}", get(projects::show))
        .merge(forms)
        .merge(health::router())
        .fallback(home::not_found)
}

/// Entry in the language switcher.
#[derive(Debug, Clone)]
pub struct LocaleLink {
    pub name: &'static str,
    pub href: String,
    pub active: bool,
}

/// Layout data shared by every full page.
#[derive(Debug, Clone)]
pub struct PageChrome {
    /// `lang` attribute value.
    pub lang: &'static str,
    /// Locale code used in links.
    pub locale: &'static str,
    pub nonce: String,
    pub snow_css: String,
    pub flakes: Vec<usize>,
    pub locales: Vec<LocaleLink>,
    pub footer: &'static str,
}

impl PageChrome {
    #[must_use]
    pub fn new(page: &PageLocale, nonce: &CspNonce, supported: &[Locale]) -> Self {
        let snowfall = Snowfall::daily(DEFAULT_FLAKE_COUNT);
        let locales = supported
            .iter()
            .map(|&locale| LocaleLink {
                name: locale.native_name(),
                href: locale_href(locale, &page.rest),
                active: locale == page.locale,
            })
            .collect();

        Self {
            lang: page.locale.html_lang(),
            locale: page.locale.code(),
            nonce: nonce.value().to_string(),
            snow_css: snowfall.stylesheet(),
            flakes: (0..snowfall.len()).collect(),
            locales,
            footer: FOOTER_HTML,
        }
    }
}

fn locale_href(locale: Locale, rest: &str) -> String {
    if rest.is_empty() {
        format!("/{}", locale.code())
    } else {
        format!("/{}/{rest}", locale.code())
    }
}

/// Project summary for cards and the detail page.
#[derive(Debug, Clone)]
pub struct ProjectView {
    pub slug: String,
    pub href: String,
    pub title: String,
    pub summary: String,
    pub goal: String,
    pub raised: String,
    pub progress: u8,
    pub progress_label: String,
}

impl ProjectView {
    #[must_use]
    pub fn new(project: &Project, locale: Locale, i18n: &Messages) -> Self {
        let currency = CurrencyCode::default();
        let progress = project.progress_percent();
        Self {
            slug: project.slug.clone(),
            href: format!("/{}/projects/{}", locale.code(), project.slug),
            title: project.title.clone(),
            summary: project.summary.clone(),
            goal: currency.format(project.goal_amount),
            raised: currency.format(project.raised_amount),
            progress,
            progress_label: i18n.t_with(
                "project.progress",
                &[("percent", progress.to_string().as_str())],
            ),
        }
    }
}
