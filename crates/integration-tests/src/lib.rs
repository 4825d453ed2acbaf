//! Integration test support for Winter Gifts.
//!
//! Both routers are driven in-process with `tower::ServiceExt::oneshot`
//! against [`FakeBackend`], an in-memory implementation of every backend
//! capability. The fake counts collection fetches and can be told to fail,
//! so tests can assert that the admin data gate never reaches the backend and
//! that a failed mutation leaves the table untouched.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p winter-gifts-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use chrono::Utc;
use rust_decimal::Decimal;
use secrecy::SecretString;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use winter_gifts_core::backend::{
    AdminGrant, AdminIdentity, AdminSessions, DonationIntake, DonationStore, HealthCheck,
    ProjectCatalog, ProjectStore, SessionToken, SubscriberStore, Subscription,
};
use winter_gifts_core::{
    AdminRole, AdminUserId, BackendError, CurrencyCode, Donation, DonationEdit, DonationId,
    DonationStatus, Email, Locale, LocaleConfig, NewDonation, Project, ProjectDraft, ProjectId,
    StatusChange,
};

/// Password given to every admin created through [`FakeBackend::with_admin`].
pub const ADMIN_PASSWORD: &str = "correct horse battery";

#[derive(Default)]
struct FakeData {
    next_id: i32,
    admins: Vec<(AdminIdentity, String)>,
    sessions: HashMap<String, AdminUserId>,
    donations: Vec<Donation>,
    projects: Vec<Project>,
    subscribers: Vec<(Email, Locale)>,
}

impl FakeData {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn raised_for(&self, id: ProjectId) -> Decimal {
        self.donations
            .iter()
            .filter(|d| d.project_id == Some(id) && d.status.counts_as_raised())
            .map(|d| d.amount)
            .sum()
    }

    fn with_raised(&self, project: &Project) -> Project {
        Project {
            raised_amount: self.raised_for(project.id),
            ..project.clone()
        }
    }
}

/// In-memory backend for both binaries.
#[derive(Default)]
pub struct FakeBackend {
    data: Mutex<FakeData>,
    donation_fetches: AtomicUsize,
    project_fetches: AtomicUsize,
    fail_mutations: AtomicBool,
    unavailable: AtomicBool,
}

impl FakeBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn data(&self) -> MutexGuard<'_, FakeData> {
        self.data.lock().unwrap()
    }

    fn check_available(&self) -> Result<(), BackendError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("fake backend is down".to_string()));
        }
        Ok(())
    }

    fn check_mutation(&self) -> Result<(), BackendError> {
        self.check_available()?;
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("mutation rejected".to_string()));
        }
        Ok(())
    }

    /// Register an admin whose password is [`ADMIN_PASSWORD`].
    #[must_use]
    pub fn with_admin(self, email: &str, name: &str, role: AdminRole) -> Self {
        {
            let mut data = self.data();
            let id = AdminUserId::new(data.next_id());
            let identity = AdminIdentity {
                id,
                email: Email::parse(email).unwrap(),
                name: name.to_string(),
                role,
            };
            data.admins.push((identity, ADMIN_PASSWORD.to_string()));
        }
        self
    }

    /// Add a project; newest first like the real listing.
    pub fn add_project(&self, slug: &str, title: &str, goal: i64, published: bool) -> ProjectId {
        let mut data = self.data();
        let id = ProjectId::new(data.next_id());
        let now = Utc::now();
        data.projects.insert(
            0,
            Project {
                id,
                slug: slug.to_string(),
                title: title.to_string(),
                summary: format!("Summary of {title}"),
                goal_amount: Decimal::from(goal),
                raised_amount: Decimal::ZERO,
                published,
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    /// Add a donation with the given status and a one-entry history.
    pub fn add_donation(
        &self,
        project_id: Option<ProjectId>,
        donor_name: &str,
        amount: i64,
        status: DonationStatus,
    ) -> DonationId {
        let mut data = self.data();
        let id = DonationId::new(data.next_id());
        let now = Utc::now();
        data.donations.insert(
            0,
            Donation {
                id,
                project_id,
                donor_name: donor_name.to_string(),
                email: Email::parse(&format!("donor{}@example.org", id.as_i32())).unwrap(),
                amount: Decimal::from(amount),
                currency: CurrencyCode::USD,
                message: None,
                status,
                created_at: now,
                updated_at: now,
                history: vec![StatusChange {
                    status,
                    note: None,
                    changed_by: None,
                    changed_at: now,
                }],
            },
        );
        id
    }

    /// Number of donation collection fetches served so far.
    pub fn donation_fetches(&self) -> usize {
        self.donation_fetches.load(Ordering::SeqCst)
    }

    /// Number of project collection fetches served so far.
    pub fn project_fetches(&self) -> usize {
        self.project_fetches.load(Ordering::SeqCst)
    }

    /// All collection fetches, donations and projects.
    pub fn collection_fetches(&self) -> usize {
        self.donation_fetches() + self.project_fetches()
    }

    /// Make every mutation fail with `Unavailable` while reads keep working.
    pub fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    /// Make every call fail with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Drop every issued session token.
    pub fn revoke_all_sessions(&self) {
        self.data().sessions.clear();
    }

    /// Current donation record.
    pub fn donation(&self, id: DonationId) -> Option<Donation> {
        self.data().donations.iter().find(|d| d.id == id).cloned()
    }

    pub fn donations(&self) -> Vec<Donation> {
        self.data().donations.clone()
    }

    pub fn subscribers(&self) -> Vec<(Email, Locale)> {
        self.data().subscribers.clone()
    }
}

#[async_trait]
impl AdminSessions for FakeBackend {
    async fn sign_in(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Option<AdminGrant>, BackendError> {
        self.check_available()?;
        let mut data = self.data();
        let Some(identity) = data
            .admins
            .iter()
            .find(|(identity, stored)| &identity.email == email && stored == password)
            .map(|(identity, _)| identity.clone())
        else {
            return Ok(None);
        };

        let token = format!("token-{}", data.next_id());
        data.sessions.insert(token.clone(), identity.id);
        Ok(Some(AdminGrant {
            token: SessionToken::new(token),
            identity,
            expires_at: Utc::now() + chrono::Duration::hours(12),
        }))
    }

    async fn current_admin(
        &self,
        token: &SessionToken,
    ) -> Result<Option<AdminIdentity>, BackendError> {
        self.check_available()?;
        let data = self.data();
        let identity = data.sessions.get(token.as_str()).and_then(|id| {
            data.admins
                .iter()
                .find(|(identity, _)| identity.id == *id)
                .map(|(identity, _)| identity.clone())
        });
        Ok(identity)
    }

    async fn sign_out(&self, token: &SessionToken) -> Result<(), BackendError> {
        self.data().sessions.remove(token.as_str());
        Ok(())
    }
}

#[async_trait]
impl DonationStore for FakeBackend {
    async fn list_donations(&self) -> Result<Vec<Donation>, BackendError> {
        self.donation_fetches.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.donations())
    }

    async fn get_donation(&self, id: DonationId) -> Result<Donation, BackendError> {
        self.check_available()?;
        self.donation(id)
            .ok_or_else(|| BackendError::NotFound(format!("donation {id}")))
    }

    async fn set_donation_status(
        &self,
        id: DonationId,
        status: DonationStatus,
        note: Option<String>,
        changed_by: Option<AdminUserId>,
    ) -> Result<Donation, BackendError> {
        self.check_mutation()?;
        let mut data = self.data();
        let donation = data
            .donations
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| BackendError::NotFound(format!("donation {id}")))?;
        let now = Utc::now();
        donation.status = status;
        donation.updated_at = now;
        donation.history.push(StatusChange {
            status,
            note,
            changed_by,
            changed_at: now,
        });
        Ok(donation.clone())
    }

    async fn update_donation(
        &self,
        id: DonationId,
        edit: DonationEdit,
    ) -> Result<Donation, BackendError> {
        self.check_mutation()?;
        let mut data = self.data();
        let donation = data
            .donations
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| BackendError::NotFound(format!("donation {id}")))?;
        donation.donor_name = edit.donor_name;
        donation.email = edit.email;
        donation.amount = edit.amount.value();
        donation.message = edit.message;
        donation.updated_at = Utc::now();
        Ok(donation.clone())
    }

    async fn delete_donation(&self, id: DonationId) -> Result<(), BackendError> {
        self.check_mutation()?;
        let mut data = self.data();
        let before = data.donations.len();
        data.donations.retain(|d| d.id != id);
        if data.donations.len() == before {
            return Err(BackendError::NotFound(format!("donation {id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl DonationIntake for FakeBackend {
    async fn create_donation(&self, donation: NewDonation) -> Result<Donation, BackendError> {
        self.check_mutation()?;
        let mut data = self.data();
        let id = DonationId::new(data.next_id());
        let now = Utc::now();
        let created = Donation {
            id,
            project_id: donation.project_id,
            donor_name: donation.donor_name,
            email: donation.email,
            amount: donation.amount.value(),
            currency: donation.currency,
            message: donation.message,
            status: DonationStatus::Pending,
            created_at: now,
            updated_at: now,
            history: vec![StatusChange {
                status: DonationStatus::Pending,
                note: None,
                changed_by: None,
                changed_at: now,
            }],
        };
        data.donations.insert(0, created.clone());
        Ok(created)
    }
}

#[async_trait]
impl ProjectStore for FakeBackend {
    async fn list_projects(&self) -> Result<Vec<Project>, BackendError> {
        self.project_fetches.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let data = self.data();
        Ok(data.projects.iter().map(|p| data.with_raised(p)).collect())
    }

    async fn create_project(&self, draft: ProjectDraft) -> Result<Project, BackendError> {
        self.check_mutation()?;
        let mut data = self.data();
        if data.projects.iter().any(|p| p.slug == draft.slug) {
            return Err(BackendError::Conflict("project slug already exists".to_string()));
        }
        let now = Utc::now();
        let project = Project {
            id: ProjectId::new(data.next_id()),
            slug: draft.slug,
            title: draft.title,
            summary: draft.summary,
            goal_amount: draft.goal_amount,
            raised_amount: Decimal::ZERO,
            published: draft.published,
            created_at: now,
            updated_at: now,
        };
        data.projects.insert(0, project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        id: ProjectId,
        draft: ProjectDraft,
    ) -> Result<Project, BackendError> {
        self.check_mutation()?;
        let mut data = self.data();
        if data.projects.iter().any(|p| p.id != id && p.slug == draft.slug) {
            return Err(BackendError::Conflict("project slug already exists".to_string()));
        }
        let project = data
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| BackendError::NotFound(format!("project {id}")))?;
        project.slug = draft.slug;
        project.title = draft.title;
        project.summary = draft.summary;
        project.goal_amount = draft.goal_amount;
        project.published = draft.published;
        project.updated_at = Utc::now();
        let project = project.clone();
        Ok(data.with_raised(&project))
    }

    async fn delete_project(&self, id: ProjectId) -> Result<(), BackendError> {
        self.check_mutation()?;
        let mut data = self.data();
        let before = data.projects.len();
        data.projects.retain(|p| p.id != id);
        if data.projects.len() == before {
            return Err(BackendError::NotFound(format!("project {id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectCatalog for FakeBackend {
    async fn published_projects(&self) -> Result<Vec<Project>, BackendError> {
        self.project_fetches.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let data = self.data();
        Ok(data
            .projects
            .iter()
            .filter(|p| p.published)
            .map(|p| data.with_raised(p))
            .collect())
    }

    async fn project_by_slug(&self, slug: &str) -> Result<Option<Project>, BackendError> {
        self.check_available()?;
        let data = self.data();
        Ok(data
            .projects
            .iter()
            .find(|p| p.published && p.slug == slug)
            .map(|p| data.with_raised(p)))
    }
}

#[async_trait]
impl SubscriberStore for FakeBackend {
    async fn subscribe(&self, email: &Email, locale: Locale) -> Result<Subscription, BackendError> {
        self.check_mutation()?;
        let mut data = self.data();
        if data.subscribers.iter().any(|(existing, _)| existing == email) {
            return Ok(Subscription::AlreadySubscribed);
        }
        data.subscribers.push((email.clone(), locale));
        Ok(Subscription::Created)
    }
}

#[async_trait]
impl HealthCheck for FakeBackend {
    async fn ping(&self) -> Result<(), BackendError> {
        self.check_available()
    }
}

// ============================================================================
// Apps
// ============================================================================

fn localhost() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

/// Admin configuration for in-process tests.
#[must_use]
pub fn admin_config() -> winter_gifts_admin::config::AdminConfig {
    winter_gifts_admin::config::AdminConfig {
        database_url: SecretString::from("postgres://localhost/unused"),
        host: localhost(),
        port: 3001,
        base_url: "http://localhost:3001".to_string(),
        session_ttl_hours: 12,
        sentry: Default::default(),
    }
}

/// Admin router over `backend` with an in-memory session store.
pub fn admin_app(backend: Arc<FakeBackend>) -> Router {
    let config = admin_config();
    let session_layer =
        winter_gifts_admin::middleware::create_session_layer(MemoryStore::default(), &config);
    let state = winter_gifts_admin::state::AppState::new(config, backend);
    winter_gifts_admin::app(state, session_layer)
}

/// Path of the bundled children content directory.
#[must_use]
pub fn content_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../site/content")
}

/// Site configuration for in-process tests.
#[must_use]
pub fn site_config() -> winter_gifts_site::config::SiteConfig {
    winter_gifts_site::config::SiteConfig {
        database_url: SecretString::from("postgres://localhost/unused"),
        host: localhost(),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        content_dir: content_dir(),
        locales: LocaleConfig::standard(),
        project_cache_ttl: Duration::from_secs(60),
        sentry: Default::default(),
    }
}

/// Site router over `backend`.
pub fn site_app(backend: Arc<FakeBackend>) -> Router {
    let config = site_config();
    let catalogs = winter_gifts_site::i18n::Catalogs::load(&config.locales).unwrap();
    let gifts = winter_gifts_site::content::load_gift_content(&config.children_file()).unwrap();
    let state = winter_gifts_site::state::AppState::new(config, backend, catalogs, gifts);
    winter_gifts_site::app(state)
}

// ============================================================================
// Requests
// ============================================================================

/// Send one request through a clone of `app`.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// `GET path`, with an optional session cookie.
#[must_use]
pub fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Form `POST` with an optional session cookie.
#[must_use]
pub fn post_form(path: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header("x-forwarded-for", "203.0.113.10");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

/// Response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `name=value` of the first `Set-Cookie` header, if any.
#[must_use]
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

/// Sign in through the login form and return the session cookie.
pub async fn sign_in(app: &Router, email: &str) -> String {
    let form = format!("email={email}&password={}", ADMIN_PASSWORD.replace(' ', "+"));
    let response = send(app, post_form("/auth/login", &form, None)).await;
    assert!(
        response.status().is_redirection(),
        "login failed with {}",
        response.status()
    );
    session_cookie(&response).unwrap()
}
