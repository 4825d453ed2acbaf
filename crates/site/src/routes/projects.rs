//! Project detail and pledge handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;
use winter_gifts_core::{Amount, CurrencyCode, Email, Locale, NewDonation, Project};

use crate::error::AppError;
use crate::filters;
use crate::i18n::Messages;
use crate::middleware::{CspNonce, PageLocale};
use crate::state::AppState;

use super::home::not_found_page;
use super::{PageChrome, ProjectView};

const MAX_NAME_CHARS: usize = 120;
const MAX_MESSAGE_CHARS: usize = 1000;

/// Currencies offered in the pledge form.
const CURRENCIES: [CurrencyCode; 3] = [CurrencyCode::USD, CurrencyCode::EUR, CurrencyCode::UAH];

/// Currency option for the pledge form.
#[derive(Debug, Clone)]
pub struct CurrencyOption {
    pub code: &'static str,
    pub symbol: &'static str,
    pub selected: bool,
}

/// State of the pledge form.
#[derive(Debug, Clone)]
pub struct DonateFormView {
    pub action: String,
    pub donor_name: String,
    pub email: String,
    pub amount: String,
    pub message: String,
    pub currencies: Vec<CurrencyOption>,
    pub error: Option<String>,
}

impl DonateFormView {
    fn empty(locale: Locale, slug: &str) -> Self {
        Self {
            action: format!("/{}/projects/{slug}/donate", locale.code()),
            donor_name: String::new(),
            email: String::new(),
            amount: String::new(),
            message: String::new(),
            currencies: currency_options(CurrencyCode::default()),
            error: None,
        }
    }

    fn refill(locale: Locale, slug: &str, form: &DonateForm, error: Option<String>) -> Self {
        Self {
            donor_name: form.donor_name.clone(),
            email: form.email.clone(),
            amount: form.amount.clone(),
            message: form.message.clone(),
            currencies: currency_options(form.currency()),
            error,
            ..Self::empty(locale, slug)
        }
    }
}

fn currency_options(selected: CurrencyCode) -> Vec<CurrencyOption> {
    CURRENCIES
        .iter()
        .map(|c| CurrencyOption {
            code: c.code(),
            symbol: c.symbol(),
            selected: *c == selected,
        })
        .collect()
}

/// Project detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "project.html")]
pub struct ProjectTemplate {
    pub chrome: PageChrome,
    pub i18n: Messages,
    pub project: ProjectView,
    pub form: DonateFormView,
    pub thanks: Option<String>,
}

/// Pledge form data.
#[derive(Debug, Deserialize)]
pub struct DonateForm {
    #[serde(default)]
    pub donor_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub message: String,
}

impl DonateForm {
    fn currency(&self) -> CurrencyCode {
        self.currency.parse().unwrap_or_default()
    }

    /// Validate into a pledge, or the catalog key of the first problem.
    fn validate(&self, project: &Project) -> Result<NewDonation, &'static str> {
        let donor_name = self.donor_name.trim();
        if donor_name.is_empty() || donor_name.chars().count() > MAX_NAME_CHARS {
            return Err("donate.errors.name");
        }
        let email = Email::parse(&self.email).map_err(|_| "donate.errors.email")?;
        let amount = Amount::parse(&self.amount).map_err(|_| "donate.errors.amount")?;
        let message = self.message.trim();
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err("donate.errors.message");
        }

        Ok(NewDonation {
            project_id: Some(project.id),
            donor_name: donor_name.to_string(),
            email,
            amount,
            currency: self.currency(),
            message: Some(message.to_string()).filter(|m| !m.is_empty()),
        })
    }
}

fn project_page(
    state: &AppState,
    page: PageLocale,
    nonce: &CspNonce,
    project: &Project,
    form: DonateFormView,
    thanks: Option<String>,
) -> ProjectTemplate {
    ProjectTemplate {
        chrome: PageChrome::new(&page, nonce, state.config().locales.supported()),
        project: ProjectView::new(project, page.locale, &page.messages),
        form,
        thanks,
        i18n: page.messages,
    }
}

/// Project detail page.
///
/// GET /{locale}/projects/{slug}
#[instrument(skip(state, page, nonce), fields(locale = %page.locale))]
pub async fn show(
    State(state): State<AppState>,
    page: PageLocale,
    nonce: CspNonce,
    Path((_, slug)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let Some(project) = state.projects().by_slug(&slug).await? else {
        return Ok(not_found_page(&state, page, &nonce));
    };

    let form = DonateFormView::empty(page.locale, &project.slug);
    Ok(project_page(&state, page, &nonce, &project, form, None).into_response())
}

/// Record a pledge for a project.
///
/// POST /{locale}/projects/{slug}/donate
///
/// Invalid input re-renders the form with a localized error (422); a
/// backend failure does the same with 503. Nothing is recorded in either
/// case.
#[instrument(skip(state, page, nonce, form), fields(locale = %page.locale))]
pub async fn donate(
    State(state): State<AppState>,
    page: PageLocale,
    nonce: CspNonce,
    Path((_, slug)): Path<(String, String)>,
    Form(form): Form<DonateForm>,
) -> Result<Response, AppError> {
    let Some(project) = state.projects().by_slug(&slug).await? else {
        return Ok(not_found_page(&state, page, &nonce));
    };

    let pledge = match form.validate(&project) {
        Ok(pledge) => pledge,
        Err(key) => {
            let error = Some(page.messages.t(key).to_string());
            let view = DonateFormView::refill(page.locale, &project.slug, &form, error);
            let template = project_page(&state, page, &nonce, &project, view, None);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    match state.backend().create_donation(pledge).await {
        Ok(donation) => {
            tracing::info!(
                donation_id = %donation.id,
                project = %project.slug,
                "Pledge recorded"
            );
            let thanks = page.messages.t_with(
                "donate.thanks",
                &[
                    ("name", donation.donor_name.as_str()),
                    ("amount", donation.display_amount().as_str()),
                ],
            );
            let view = DonateFormView::empty(page.locale, &project.slug);
            Ok(project_page(&state, page, &nonce, &project, view, Some(thanks)).into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, project = %project.slug, "Pledge could not be recorded");
            let error = Some(page.messages.t("donate.errors.backend").to_string());
            let view = DonateFormView::refill(page.locale, &project.slug, &form, error);
            let template = project_page(&state, page, &nonce, &project, view, None);
            Ok((StatusCode::SERVICE_UNAVAILABLE, template).into_response())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use winter_gifts_core::ProjectId;

    use super::*;

    fn project() -> Project {
        Project {
            id: ProjectId::new(4),
            slug: "warm-boots".to_string(),
            title: "Warm Boots".to_string(),
            summary: String::new(),
            goal_amount: Decimal::new(1000, 0),
            raised_amount: Decimal::ZERO,
            published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn form(name: &str, email: &str, amount: &str) -> DonateForm {
        DonateForm {
            donor_name: name.to_string(),
            email: email.to_string(),
            amount: amount.to_string(),
            currency: "eur".to_string(),
            message: "  ".to_string(),
        }
    }

    #[test]
    fn test_valid_pledge() {
        let pledge = form(" Olena ", "Olena@Example.org", "25.50")
            .validate(&project())
            .unwrap();
        assert_eq!(pledge.donor_name, "Olena");
        assert_eq!(pledge.email.as_str(), "olena@example.org");
        assert_eq!(pledge.amount.value(), Decimal::new(2550, 2));
        assert_eq!(pledge.currency, CurrencyCode::EUR);
        assert_eq!(pledge.project_id, Some(ProjectId::new(4)));
        assert_eq!(pledge.message, None);
    }

    #[test]
    fn test_validation_keys() {
        let p = project();
        assert_eq!(form("", "a@b.org", "5").validate(&p).unwrap_err(), "donate.errors.name");
        assert_eq!(form("A", "nope", "5").validate(&p).unwrap_err(), "donate.errors.email");
        assert_eq!(form("A", "a@b.org", "0").validate(&p).unwrap_err(), "donate.errors.amount");
        assert_eq!(form("A", "a@b.org", "ten").validate(&p).unwrap_err(), "donate.errors.amount");

        let mut long = form("A", "a@b.org", "5");
        long.message = "x".repeat(MAX_MESSAGE_CHARS + 1);
        assert_eq!(long.validate(&p).unwrap_err(), "donate.errors.message");
    }

    #[test]
    fn test_unknown_currency_falls_back_to_default() {
        let mut f = form("A", "a@b.org", "5");
        f.currency = "btc".to_string();
        assert_eq!(f.currency(), CurrencyCode::default());
    }
}
