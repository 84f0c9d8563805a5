use crate::{
    api::handlers::{auth, health, pages, posts},
    auth::AuthGate,
    data::RestDataProvider,
    routes::{guest_only, require_auth, Resources},
};
use anyhow::{anyhow, Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method, Request},
    middleware,
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use url::Url;

pub mod handlers;
mod openapi;

pub use openapi::openapi;

/// Shared state handed to every route group.
#[derive(Clone, Debug)]
pub struct Panel {
    pub gate: Arc<AuthGate>,
    pub data: Arc<RestDataProvider>,
    pub resources: Arc<Resources>,
}

impl Panel {
    #[must_use]
    pub fn new(gate: AuthGate, data: RestDataProvider) -> Self {
        Self {
            gate: Arc::new(gate),
            data: Arc::new(data),
            resources: Arc::new(Resources::declared()),
        }
    }
}

/// Build the full router: auth API, guest pages, protected pages and the
/// protected catch-all.
pub fn router(panel: &Panel) -> Router {
    let api = Router::new()
        .route("/health", get(health::health))
        .route("/api-docs/openapi.json", get(openapi::spec))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/update-password", post(auth::update_password))
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/check", get(auth::check))
        .route("/api/auth/identity", get(auth::identity))
        .route("/api/auth/permissions", get(auth::permissions))
        .route("/api/auth/error", post(auth::on_error));

    let guest = Router::new()
        .route("/login", get(pages::login))
        .route("/register", get(pages::register))
        .route("/forgot-password", get(pages::forgot_password))
        .route("/update-password", get(pages::update_password))
        .layer(middleware::from_fn(guest_only));

    let protected = Router::new()
        .route("/", get(pages::dashboard))
        .route("/posts", get(posts::list))
        .route("/posts/edit/:id", get(posts::edit).post(posts::update))
        .route("/posts/show/:id", get(posts::show))
        .fallback(pages::not_found)
        .layer(middleware::from_fn(require_auth));

    api.merge(guest)
        .merge(protected)
        .layer(Extension(panel.gate.clone()))
        .layer(Extension(panel.data.clone()))
        .layer(Extension(panel.resources.clone()))
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, panel: Panel, frontend_url: Option<String>) -> Result<()> {
    let mut app = router(&panel).layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span)),
    );

    if let Some(frontend_url) = frontend_url {
        let cors = CorsLayer::new()
            .allow_headers([CONTENT_TYPE])
            .allow_methods([Method::GET, Method::POST])
            .allow_origin(AllowOrigin::exact(frontend_origin(&frontend_url)?))
            .allow_credentials(true);
        app = app.layer(cors);
    }

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);
    info!("Data provider: {}", panel.data.api_url());

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {err}");
            }
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

fn frontend_origin(frontend_url: &str) -> Result<HeaderValue> {
    let parsed =
        Url::parse(frontend_url).with_context(|| format!("Invalid frontend URL: {frontend_url}"))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| anyhow!("Frontend URL must include a valid host: {frontend_url}"))?;
    let port = parsed
        .port()
        .map_or_else(String::new, |port| format!(":{port}"));
    let origin = format!("{}://{}{}", parsed.scheme(), host, port);
    HeaderValue::from_str(&origin).context("Failed to build frontend origin header")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontend_origin_strips_path() {
        let origin = frontend_origin("https://panel.dev:3000/app/").ok();
        assert_eq!(
            origin.as_ref().and_then(|v| v.to_str().ok()),
            Some("https://panel.dev:3000")
        );
    }

    #[test]
    fn frontend_origin_requires_host() {
        assert!(frontend_origin("not a url").is_err());
    }
}
