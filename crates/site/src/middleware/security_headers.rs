//! Security headers for every site response.
//!
//! The policy is locked down: scripts only from self and the HTMX CDN, and
//! inline styles only with the per-request nonce from [`CspNonce`].

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

use super::csp::CspNonce;

/// Content-Security-Policy for a given style nonce source.
#[must_use]
pub fn content_security_policy(style_nonce: Option<&str>) -> String {
    let style_src = style_nonce.map_or_else(|| "'self'".to_string(), |n| format!("'self' {n}"));
    format!(
        "default-src 'none'; \
         script-src 'self' https://unpkg.com; \
         style-src {style_src}; \
         font-src 'self'; \
         img-src 'self'; \
         connect-src 'self'; \
         frame-src 'none'; \
         object-src 'none'; \
         base-uri 'self'; \
         form-action 'self'; \
         frame-ancestors 'none'"
    )
}

/// Add security headers to all responses.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let nonce = request
        .extensions()
        .get::<CspNonce>()
        .filter(|n| !n.value().is_empty())
        .map(CspNonce::source);

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(
        REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    if let Ok(policy) = HeaderValue::from_str(&content_security_policy(nonce.as_deref())) {
        headers.insert(CONTENT_SECURITY_POLICY, policy);
    }

    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(
            "camera=(), geolocation=(), microphone=(), payment=(), usb=(), \
             interest-cohort=()",
        ),
    );

    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_allows_only_nonced_inline_styles() {
        let policy = content_security_policy(Some("'nonce-abc'"));
        assert!(policy.contains("style-src 'self' 'nonce-abc';"));
        assert!(!policy.contains("unsafe-inline"));

        let policy = content_security_policy(None);
        assert!(policy.contains("style-src 'self';"));
    }
}
