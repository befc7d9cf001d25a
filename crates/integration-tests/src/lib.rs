//! Integration tests for Stride.
//!
//! The suites drive the storefront router in-process via `tower`, so they
//! run hermetically: no listening socket, no external services. Session
//! continuity is simulated by carrying the session cookie between requests,
//! which also lets tests act as distinct visitors by using distinct clients.

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use secrecy::SecretString;
use tower::ServiceExt;

use stride_storefront::config::StorefrontConfig;
use stride_storefront::routes;
use stride_storefront::state::AppState;

/// Configuration for an in-process storefront.
///
/// The secret only has to satisfy the entropy validation shape; nothing is
/// signed with it in tests.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from("kP8v#mQ2xR9$wL4nT7&jB1zC5!hF3dG6"),
        sentry_dsn: None,
    }
}

/// A fully assembled storefront router with fresh state.
#[must_use]
pub fn test_app() -> Router {
    routes::app(AppState::new(test_config()))
}

/// One browser's view of the storefront: a router plus its session cookie.
///
/// Each client gets its own application instance (and therefore its own
/// session store and cart vault); use [`TestClient::sibling`] for a second
/// browser against the same instance.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// A client against a fresh storefront instance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            app: test_app(),
            cookie: None,
        }
    }

    /// Another browser against the same storefront instance, with its own
    /// (empty) cookie jar.
    #[must_use]
    pub fn sibling(&self) -> Self {
        Self {
            app: self.app.clone(),
            cookie: None,
        }
    }

    /// Send a GET request.
    pub async fn get(&mut self, uri: &str) -> Response<Body> {
        self.request("GET", uri, None).await
    }

    /// Send a POST request with an urlencoded form body.
    pub async fn post(&mut self, uri: &str, form: &str) -> Response<Body> {
        self.request("POST", uri, Some(form)).await
    }

    async fn request(&mut self, method: &str, uri: &str, form: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie.clone());
        }

        let request = match form {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_owned())),
            None => builder.body(Body::empty()),
        }
        .expect("request must build");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        // Carry the session cookie forward like a browser would
        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let raw = set_cookie.to_str().expect("cookie must be ascii");
            if let Some(pair) = raw.split(';').next() {
                self.cookie = Some(pair.to_string());
            }
        }

        response
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a response body to a string.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body must be readable");
    String::from_utf8(bytes.to_vec()).expect("body must be utf-8")
}

/// The `HX-Trigger` response header, if present.
#[must_use]
pub fn hx_trigger(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get("hx-trigger")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
