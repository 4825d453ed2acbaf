//! Public site pages, pledges and newsletter signup.

use std::sync::Arc;

use axum::http::StatusCode;

use winter_gifts_core::{DonationStatus, Locale};
use winter_gifts_integration_tests::{FakeBackend, body_text, get, post_form, send, site_app};

fn backend() -> Arc<FakeBackend> {
    let backend = FakeBackend::new();
    backend.add_project("sleds", "Sleds for the village school", 300, false);
    let boots = backend.add_project("winter-boots", "Winter boots", 500, true);
    backend.add_donation(Some(boots), "Olena", 125, DonationStatus::Confirmed);
    backend.add_donation(Some(boots), "Wei", 50, DonationStatus::Pending);
    Arc::new(backend)
}

const PLEDGE: &str = "donor_name=Olena&email=olena%40example.org&amount=25&currency=USD&message=";

#[tokio::test]
async fn test_home_lists_published_projects() {
    let backend = backend();
    let app = site_app(Arc::clone(&backend));

    let response = send(&app, get("/en", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;

    assert!(body.contains("Winter boots"));
    assert!(body.contains(r#"href="/en/projects/winter-boots""#));
    assert!(!body.contains("Sleds for the village school"));
    // Only confirmed donations count as raised
    assert!(body.contains("$125.00"));
    assert!(body.contains("10 children are waiting for a gift this winter."));
}

#[tokio::test]
async fn test_published_projects_are_cached() {
    let backend = backend();
    let app = site_app(Arc::clone(&backend));

    send(&app, get("/en", None)).await;
    send(&app, get("/zh", None)).await;
    assert_eq!(backend.project_fetches(), 1);
}

#[tokio::test]
async fn test_home_survives_backend_outage() {
    let backend = backend();
    backend.set_unavailable(true);
    let app = site_app(Arc::clone(&backend));

    let response = send(&app, get("/en", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Projects cannot be shown right now."));
}

#[tokio::test]
async fn test_style_nonce_matches_csp_header() {
    let app = site_app(backend());

    let response = send(&app, get("/en", None)).await;
    let csp = response
        .headers()
        .get("content-security-policy")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    let body = body_text(response).await;

    let start = csp.find("'nonce-").unwrap() + "'nonce-".len();
    let nonce = &csp[start..start + csp[start..].find('\'').unwrap()];
    assert!(!nonce.is_empty());
    assert!(body.contains(&format!(r#"<style nonce="{nonce}">"#)));
    assert!(body.contains(r#"class="flake flake-0""#));
}

#[tokio::test]
async fn test_unknown_pages_are_localized_404s() {
    let app = site_app(backend());

    let response = send(&app, get("/en/projects/does-not-exist", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Page not found"));

    // Unpublished projects are not reachable
    let response = send(&app, get("/en/projects/sleds", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, get("/ua/nowhere/at/all", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Сторінку не знайдено"));
}

#[tokio::test]
async fn test_pledge_is_recorded_as_pending() {
    let backend = backend();
    let app = site_app(Arc::clone(&backend));

    let response = send(
        &app,
        post_form("/en/projects/winter-boots/donate", PLEDGE, None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Thank you, Olena! Your pledge of $25.00 has been recorded."));

    let newest = &backend.donations()[0];
    assert_eq!(newest.status, DonationStatus::Pending);
    assert_eq!(newest.history.len(), 1);
    assert_eq!(newest.email.as_str(), "olena@example.org");
}

#[tokio::test]
async fn test_invalid_pledge_is_rejected() {
    let backend = backend();
    let app = site_app(Arc::clone(&backend));

    let response = send(
        &app,
        post_form(
            "/en/projects/winter-boots/donate",
            "donor_name=Olena&email=olena%40example.org&amount=-4&currency=USD",
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_text(response).await;
    assert!(body.contains("Please enter a positive amount"));
    assert_eq!(backend.donations().len(), 2);
}

#[tokio::test]
async fn test_pledge_backend_failure_is_503() {
    let backend = backend();
    let app = site_app(Arc::clone(&backend));
    backend.fail_mutations(true);

    let response = send(
        &app,
        post_form("/en/projects/winter-boots/donate", PLEDGE, None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_text(response).await;
    assert!(body.contains("Your pledge could not be recorded."));
    // The form keeps what the donor typed
    assert!(body.contains("olena@example.org"));
    assert_eq!(backend.donations().len(), 2);
}

#[tokio::test]
async fn test_subscribe_twice_succeeds_once() {
    let backend = backend();
    let app = site_app(Arc::clone(&backend));

    for _ in 0..2 {
        let response = send(
            &app,
            post_form("/zh/subscribe", "email=reader%40example.org", None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("reader@example.org"));
    }

    let subscribers = backend.subscribers();
    assert_eq!(subscribers.len(), 1);
    assert_eq!(subscribers[0].1, Locale::Zh);
}

#[tokio::test]
async fn test_subscribe_invalid_email_rerenders_form() {
    let backend = backend();
    let app = site_app(Arc::clone(&backend));

    let response = send(&app, post_form("/en/subscribe", "email=not-an-email", None)).await;
    let body = body_text(response).await;
    assert!(body.contains("Please enter a valid email address."));
    assert!(body.contains(r#"value="not-an-email""#));
    assert!(backend.subscribers().is_empty());
}

#[tokio::test]
async fn test_forms_are_rate_limited() {
    let app = site_app(backend());

    let mut statuses = Vec::new();
    for _ in 0..8 {
        let response = send(&app, post_form("/en/subscribe", "email=x%40example.org", None)).await;
        statuses.push(response.status());
    }
    assert!(statuses.contains(&StatusCode::TOO_MANY_REQUESTS));
    assert_eq!(statuses[0], StatusCode::OK);
}

#[tokio::test]
async fn test_health_endpoints() {
    let backend = backend();
    let app = site_app(Arc::clone(&backend));

    let response = send(&app, get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");

    backend.set_unavailable(true);
    let response = send(&app, get("/health/ready", None)).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
