//! Locale resolution through the public site router.

use std::sync::Arc;

use axum::http::{Request, StatusCode, header};
use axum::body::Body;

use winter_gifts_core::{Locale, LocaleConfig, LocaleResolver};
use winter_gifts_integration_tests::{FakeBackend, body_text, get, send, site_app};

fn root_with_accept_language(value: &str) -> Request<Body> {
    Request::get("/")
        .header(header::ACCEPT_LANGUAGE, value)
        .body(Body::empty())
        .unwrap()
}

fn location(response: &axum::http::Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap()
}

#[tokio::test]
async fn test_root_redirects_to_negotiated_locale() {
    let app = site_app(Arc::new(FakeBackend::new()));

    let response = send(&app, get("/", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/en");

    let response = send(&app, root_with_accept_language("zh-CN,zh;q=0.9,en;q=0.8")).await;
    assert_eq!(location(&response), "/zh");

    let response = send(&app, root_with_accept_language("uk-UA, en;q=0.5")).await;
    assert_eq!(location(&response), "/ua");

    let response = send(&app, root_with_accept_language("fr-FR, de;q=0.9")).await;
    assert_eq!(location(&response), "/en");
}

#[tokio::test]
async fn test_supported_locale_renders_its_catalog() {
    let app = site_app(Arc::new(FakeBackend::new()));

    let body = body_text(send(&app, get("/ua", None)).await).await;
    assert!(body.contains(r#"<html lang="uk">"#));
    assert!(body.contains("Кожна дитина заслуговує на зимовий подарунок"));

    let body = body_text(send(&app, get("/zh", None)).await).await;
    assert!(body.contains(r#"<html lang="zh">"#));
}

#[tokio::test]
async fn test_unsupported_locale_falls_back_to_default() {
    let app = site_app(Arc::new(FakeBackend::new()));

    for path in ["/fr", "/EN", "/en-US"] {
        let response = send(&app, get(path, None)).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        let body = body_text(response).await;
        assert!(body.contains(r#"<html lang="en">"#), "{path}");
        assert!(body.contains("Every child deserves a winter gift"), "{path}");
    }
}

#[test]
fn test_resolver_with_custom_default() {
    let config = LocaleConfig::new(&[Locale::En, Locale::Ua], Locale::Ua).unwrap();
    let resolver = LocaleResolver::new(config);

    assert_eq!(resolver.resolve(None), Locale::Ua);
    assert_eq!(resolver.resolve(Some("en")), Locale::En);
    // Known but not enabled
    assert_eq!(resolver.resolve(Some("zh")), Locale::Ua);
    assert_eq!(resolver.negotiate(Some("zh-CN")), Locale::Ua);
}
