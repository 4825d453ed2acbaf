//! The admin data gate: no session, no backend fetch.

use std::sync::Arc;

use axum::http::{StatusCode, header};

use winter_gifts_core::{AdminRole, DonationId, DonationStatus};
use winter_gifts_integration_tests::{
    FakeBackend, admin_app, body_text, get, post_form, send, session_cookie, sign_in,
};

fn backend() -> Arc<FakeBackend> {
    let backend = FakeBackend::new()
        .with_admin("admin@example.org", "Admin", AdminRole::Admin)
        .with_admin("viewer@example.org", "Viewer", AdminRole::Viewer);
    let project = backend.add_project("winter-boots", "Winter boots", 500, true);
    backend.add_donation(Some(project), "Olena", 25, DonationStatus::Pending);
    Arc::new(backend)
}

#[tokio::test]
async fn test_unauthenticated_pages_redirect_without_fetching() {
    let backend = backend();
    let app = admin_app(Arc::clone(&backend));

    for path in ["/donations", "/projects", "/donations?status=pending"] {
        let response = send(&app, get(path, None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/auth/login",
            "{path}"
        );
    }

    assert_eq!(backend.collection_fetches(), 0);
}

#[tokio::test]
async fn test_unauthenticated_api_gets_401() {
    let backend = backend();
    let app = admin_app(Arc::clone(&backend));

    let response = send(&app, get("/api/donations", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = send(&app, get("/api/projects", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(backend.collection_fetches(), 0);
}

#[tokio::test]
async fn test_unauthenticated_mutation_changes_nothing() {
    let backend = backend();
    let app = admin_app(Arc::clone(&backend));
    let id = backend.donations()[0].id;

    let response = send(
        &app,
        post_form(&format!("/donations/{id}/status"), "status=delivered", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    assert_eq!(backend.donation(id).unwrap().status, DonationStatus::Pending);
    assert_eq!(backend.collection_fetches(), 0);
}

#[tokio::test]
async fn test_signed_in_admin_reaches_the_table() {
    let backend = backend();
    let app = admin_app(Arc::clone(&backend));
    let cookie = sign_in(&app, "admin@example.org").await;

    let response = send(&app, get("/donations", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Olena"));
    assert_eq!(backend.donation_fetches(), 1);
}

#[tokio::test]
async fn test_signed_in_admin_gets_donations_json() {
    let backend = backend();
    let app = admin_app(Arc::clone(&backend));
    let cookie = sign_in(&app, "admin@example.org").await;
    let id = backend.donations()[0].id;

    let response = send(&app, get("/api/donations", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], id.as_i32());
    assert_eq!(rows[0]["donor_name"], "Olena");
    assert_eq!(rows[0]["status"], "pending");
    assert_eq!(backend.donation_fetches(), 1);
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let backend = backend();
    let app = admin_app(Arc::clone(&backend));

    let response = send(
        &app,
        post_form("/auth/login", "email=admin@example.org&password=nope", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_text(response).await;
    assert!(body.contains("Invalid email or password."));
}

#[tokio::test]
async fn test_revoked_session_is_sent_back_to_login() {
    let backend = backend();
    let app = admin_app(Arc::clone(&backend));
    let cookie = sign_in(&app, "admin@example.org").await;

    backend.revoke_all_sessions();

    let response = send(&app, get("/donations", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(backend.collection_fetches(), 0);
}

#[tokio::test]
async fn test_logout_ends_the_session() {
    let backend = backend();
    let app = admin_app(Arc::clone(&backend));
    let cookie = sign_in(&app, "admin@example.org").await;

    let response = send(&app, post_form("/auth/logout", "", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = send(&app, get("/donations", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(backend.collection_fetches(), 0);
}

#[tokio::test]
async fn test_backend_outage_during_gate_is_503() {
    let backend = backend();
    let app = admin_app(Arc::clone(&backend));
    let cookie = sign_in(&app, "admin@example.org").await;

    backend.set_unavailable(true);
    let response = send(&app, get("/donations", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(backend.collection_fetches(), 0);
}

#[tokio::test]
async fn test_viewer_can_read_but_not_mutate() {
    let backend = backend();
    let app = admin_app(Arc::clone(&backend));
    let cookie = sign_in(&app, "viewer@example.org").await;
    let id: DonationId = backend.donations()[0].id;

    let response = send(&app, get("/donations", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Read only"));

    let response = send(
        &app,
        post_form(
            &format!("/donations/{id}/status"),
            "status=delivered",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(backend.donation(id).unwrap().status, DonationStatus::Pending);
}

#[tokio::test]
async fn test_health_is_public() {
    let backend = backend();
    let app = admin_app(Arc::clone(&backend));

    let response = send(&app, get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).is_none());
}
