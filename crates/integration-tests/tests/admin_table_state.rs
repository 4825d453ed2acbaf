//! Admin tables: seeded from a snapshot, reconciled from mutation results.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderValue, Request, StatusCode, header};
use rust_decimal::Decimal;

use winter_gifts_core::{AdminRole, DonationStatus};
use winter_gifts_integration_tests::{
    FakeBackend, admin_app, body_text, get, post_form, send, sign_in,
};

fn htmx(mut request: Request<Body>) -> Request<Body> {
    request
        .headers_mut()
        .insert("hx-request", HeaderValue::from_static("true"));
    request
}

fn backend() -> Arc<FakeBackend> {
    let backend = FakeBackend::new().with_admin("admin@example.org", "Admin", AdminRole::Admin);
    let boots = backend.add_project("winter-boots", "Winter boots", 500, true);
    backend.add_donation(Some(boots), "Olena", 25, DonationStatus::Pending);
    backend.add_donation(None, "Wei", 40, DonationStatus::Pending);
    Arc::new(backend)
}

#[tokio::test]
async fn test_status_change_reconciles_without_refetch() {
    let backend = backend();
    let app = admin_app(Arc::clone(&backend));
    let cookie = sign_in(&app, "admin@example.org").await;
    let id = backend.donations()[1].id;

    let response = send(&app, get("/donations", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(backend.donation_fetches(), 1);

    let response = send(
        &app,
        htmx(post_form(
            &format!("/donations/{id}/status"),
            "status=confirmed&note=Bank+transfer+received",
            Some(&cookie),
        )),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("HX-Trigger").unwrap(),
        "donations-updated"
    );
    let fragment = body_text(response).await;
    assert!(fragment.contains("Confirmed</span>"));
    assert!(fragment.contains("Bank transfer received"));
    assert!(fragment.contains("2 change(s)"));

    // The table was updated from the mutation result, not a new snapshot
    assert_eq!(backend.donation_fetches(), 1);

    let stored = backend.donation(id).unwrap();
    assert_eq!(stored.status, DonationStatus::Confirmed);
    assert_eq!(stored.history.len(), 2);
}

#[tokio::test]
async fn test_failed_mutation_leaves_table_unchanged() {
    let backend = backend();
    let app = admin_app(Arc::clone(&backend));
    let cookie = sign_in(&app, "admin@example.org").await;
    let id = backend.donations()[0].id;

    send(&app, get("/donations", Some(&cookie))).await;
    backend.fail_mutations(true);

    let response = send(
        &app,
        htmx(post_form(
            &format!("/donations/{id}/status"),
            "status=delivered",
            Some(&cookie),
        )),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("HX-Trigger").unwrap(),
        "donations-error"
    );
    let fragment = body_text(response).await;
    assert!(fragment.contains("The backend is unavailable. Nothing was changed"));
    assert!(!fragment.contains("Delivered</span>"));
    assert!(fragment.contains("Showing 2 of 2 donations"));

    let response = send(
        &app,
        htmx(post_form(&format!("/donations/{id}/delete"), "", Some(&cookie))),
    )
    .await;
    let fragment = body_text(response).await;
    assert!(fragment.contains("Showing 2 of 2 donations"));
    assert_eq!(backend.donations().len(), 2);
}

#[tokio::test]
async fn test_delete_removes_row_and_plain_post_redirects() {
    let backend = backend();
    let app = admin_app(Arc::clone(&backend));
    let cookie = sign_in(&app, "admin@example.org").await;
    let id = backend.donations()[0].id;

    send(&app, get("/donations", Some(&cookie))).await;

    let response = send(
        &app,
        post_form(&format!("/donations/{id}/delete"), "filter=", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/donations"
    );
    assert!(backend.donation(id).is_none());
}

#[tokio::test]
async fn test_invalid_edit_never_reaches_backend() {
    let backend = backend();
    let app = admin_app(Arc::clone(&backend));
    let cookie = sign_in(&app, "admin@example.org").await;
    let id = backend.donations()[0].id;

    send(&app, get("/donations", Some(&cookie))).await;

    let response = send(
        &app,
        htmx(post_form(
            &format!("/donations/{id}/edit"),
            "donor_name=Wei&email=wei%40example.org&amount=-3",
            Some(&cookie),
        )),
    )
    .await;
    let fragment = body_text(response).await;
    assert!(fragment.contains("Invalid amount"));
    assert_eq!(backend.donation(id).unwrap().amount, Decimal::from(40));
}

#[tokio::test]
async fn test_unknown_status_shows_error_banner() {
    let backend = backend();
    let app = admin_app(Arc::clone(&backend));
    let cookie = sign_in(&app, "admin@example.org").await;
    let id = backend.donations()[0].id;

    send(&app, get("/donations", Some(&cookie))).await;

    let response = send(
        &app,
        htmx(post_form(
            &format!("/donations/{id}/status"),
            "status=bogus",
            Some(&cookie),
        )),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("HX-Trigger").unwrap(),
        "donations-error"
    );
    let fragment = body_text(response).await;
    assert!(fragment.contains("Invalid status: invalid donation status: bogus."));
    assert!(fragment.contains("Showing 2 of 2 donations"));

    let stored = backend.donation(id).unwrap();
    assert_eq!(stored.status, DonationStatus::Pending);
    assert_eq!(stored.history.len(), 1);
}

#[tokio::test]
async fn test_created_project_is_inserted_at_top() {
    let backend = backend();
    let app = admin_app(Arc::clone(&backend));
    let cookie = sign_in(&app, "admin@example.org").await;

    send(&app, get("/projects", Some(&cookie))).await;
    let fetches = backend.project_fetches();

    let response = send(
        &app,
        htmx(post_form(
            "/projects",
            "title=Warm+coats&summary=Coats+for+the+winter&goal_amount=800&published=on",
            Some(&cookie),
        )),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let fragment = body_text(response).await;
    let coats = fragment.find("Warm coats").unwrap();
    let boots = fragment.find("Winter boots").unwrap();
    assert!(coats < boots);
    assert_eq!(backend.project_fetches(), fetches);
}

#[tokio::test]
async fn test_duplicate_slug_reports_conflict() {
    let backend = backend();
    let app = admin_app(Arc::clone(&backend));
    let cookie = sign_in(&app, "admin@example.org").await;

    send(&app, get("/projects", Some(&cookie))).await;

    let response = send(
        &app,
        htmx(post_form(
            "/projects",
            "title=Boots+again&slug=winter-boots&goal_amount=100",
            Some(&cookie),
        )),
    )
    .await;
    assert_eq!(
        response.headers().get("HX-Trigger").unwrap(),
        "projects-error"
    );
    let fragment = body_text(response).await;
    assert!(fragment.contains("could not be saved"));
    assert!(!fragment.contains("Boots again"));
}
