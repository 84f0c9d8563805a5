//! Integration tests for the admin panel router.
//!
//! Each test:
//! 1. Starts a fake REST API on an ephemeral local port.
//! 2. Builds the panel router against it with a short session check delay.
//! 3. Drives the router in-process and follows the session cookie by hand.

use admin_panel::{
    api::{self, Panel},
    auth::{AuthConfig, AuthGate, Credentials, ProviderRegistry},
    data::RestDataProvider,
};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Path, Query},
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::{collections::HashMap, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

async fn upstream_list(Query(query): Query<HashMap<String, String>>) -> Response {
    let mut posts = vec![
        json!({ "id": 2, "title": "Second post", "status": "draft" }),
        json!({ "id": 1, "title": "First post", "status": "published" }),
    ];
    if query.get("_order").map(String::as_str) == Some("asc") {
        posts.reverse();
    }
    let mut headers = HeaderMap::new();
    headers.insert("x-total-count", "42".parse().unwrap());
    (headers, Json(posts)).into_response()
}

async fn upstream_one(Path(id): Path<String>) -> Response {
    if id == "1" {
        Json(json!({ "id": 1, "title": "First post", "status": "published" })).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn upstream_patch(Path(id): Path<String>, Json(changes): Json<Value>) -> Response {
    if id != "1" {
        return StatusCode::NOT_FOUND.into_response();
    }
    let mut record = json!({ "id": 1, "title": "First post", "status": "published" });
    if let (Some(record), Some(changes)) = (record.as_object_mut(), changes.as_object()) {
        for (key, value) in changes {
            record.insert(key.clone(), value.clone());
        }
    }
    Json(record).into_response()
}

async fn start_upstream() -> Result<Url> {
    let app = Router::new()
        .route("/posts", get(upstream_list))
        .route("/posts/:id", get(upstream_one).patch(upstream_patch));
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Url::parse(&format!("http://{addr}")).context("invalid upstream url")
}

async fn panel() -> Result<Router> {
    let config = AuthConfig::new(Credentials::default()).with_check_delay(Duration::from_millis(5));
    let gate = AuthGate::new(config, ProviderRegistry::with_defaults());
    let data = RestDataProvider::new(start_upstream().await?)?;
    Ok(api::router(&Panel::new(gate, data)))
}

async fn send(router: &Router, request: Request<Body>) -> Result<Response> {
    Ok(router.clone().oneshot(request).await?)
}

fn get_with(uri: &str, cookie: Option<&str>) -> Result<Request<Body>> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    Ok(builder.body(Body::empty())?)
}

fn post_json(uri: &str, cookie: Option<&str>, body: &Value) -> Result<Request<Body>> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    Ok(builder.body(Body::from(serde_json::to_vec(body)?))?)
}

async fn json_body(response: Response) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// The `name=value` pair of the first Set-Cookie header.
fn set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

async fn login(router: &Router) -> Result<String> {
    let response = send(
        router,
        post_json(
            "/api/auth/login",
            None,
            &json!({ "email": "demo@refine.dev", "password": "demodemo" }),
        )?,
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    set_cookie(&response).context("login did not set the session cookie")
}

#[tokio::test]
async fn protected_pages_redirect_to_login() -> Result<()> {
    let router = panel().await?;

    for uri in ["/", "/posts", "/posts/show/1", "/posts/edit/1", "/nope"] {
        let response = send(&router, get_with(uri, None)?).await?;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), Some("/login"), "{uri}");
    }
    Ok(())
}

#[tokio::test]
async fn login_sets_session_and_unlocks_pages() -> Result<()> {
    let router = panel().await?;

    let response = send(
        &router,
        post_json(
            "/api/auth/login",
            None,
            &json!({ "email": "demo@refine.dev", "password": "demodemo" }),
        )?,
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = set_cookie(&response).context("missing cookie")?;
    assert_eq!(cookie, "email=demo%40refine.dev");
    let body = json_body(response).await?;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["redirectTo"], json!("/page"));

    let response = send(&router, get_with("/", Some(&cookie))?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["page"], json!("dashboard"));
    assert_eq!(body["layout"]["identity"]["name"], json!("Jane Doe"));

    let response = send(&router, get_with("/api/auth/check", Some(&cookie))?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await?["authenticated"], json!(true));
    Ok(())
}

#[tokio::test]
async fn unknown_email_is_rejected() -> Result<()> {
    let router = panel().await?;

    let response = send(
        &router,
        post_json(
            "/api/auth/login",
            None,
            &json!({ "email": "someone@else.dev", "password": "demodemo" }),
        )?,
    )
    .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let body = json_body(response).await?;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["name"], json!("Invalid email or password"));
    assert_eq!(body["error"]["message"], json!("Login failed"));
    Ok(())
}

#[tokio::test]
async fn provider_login_returns_authorization_url() -> Result<()> {
    let router = panel().await?;

    let response = send(
        &router,
        post_json("/api/auth/login", None, &json!({ "providerName": "google" }))?,
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let body = json_body(response).await?;
    assert_eq!(body["success"], json!(true));
    assert!(body["redirectTo"]
        .as_str()
        .is_some_and(|url| url.starts_with("https://accounts.google.com")));
    Ok(())
}

#[tokio::test]
async fn guest_pages_redirect_authenticated_users() -> Result<()> {
    let router = panel().await?;
    let cookie = login(&router).await?;

    for uri in ["/login", "/register", "/forgot-password", "/update-password"] {
        let response = send(&router, get_with(uri, Some(&cookie))?).await?;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), Some("/posts"), "{uri}");

        let response = send(&router, get_with(uri, None)?).await?;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
    Ok(())
}

#[tokio::test]
async fn logout_clears_session() -> Result<()> {
    let router = panel().await?;
    let cookie = login(&router).await?;

    let response = send(&router, post_json("/api/auth/logout", Some(&cookie), &json!({}))?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .context("logout did not clear the cookie")?;
    assert!(cleared.starts_with("email=;"));
    assert!(cleared.contains("Max-Age=0"));
    assert_eq!(json_body(response).await?["redirectTo"], json!("/login"));

    let response = send(&router, get_with("/api/auth/check", None)?).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await?;
    assert_eq!(body["authenticated"], json!(false));
    assert_eq!(body["logout"], json!(true));
    assert_eq!(body["redirectTo"], json!("/login"));
    Ok(())
}

#[tokio::test]
async fn posts_list_forwards_pagination_and_sorting() -> Result<()> {
    let router = panel().await?;
    let cookie = login(&router).await?;

    let response = send(
        &router,
        get_with("/posts?current=2&pageSize=5&sort=title&order=asc", Some(&cookie))?,
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["title"], json!("Posts | refine"));
    assert_eq!(body["page"], json!("posts.list"));
    assert_eq!(body["total"], json!(42));
    assert_eq!(body["current"], json!(2));
    assert_eq!(body["pageSize"], json!(5));
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["data"][0]["id"], json!(1));
    Ok(())
}

#[tokio::test]
async fn posts_show_and_edit_load_the_record() -> Result<()> {
    let router = panel().await?;
    let cookie = login(&router).await?;

    let response = send(&router, get_with("/posts/show/1", Some(&cookie))?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["page"], json!("posts.show"));
    assert_eq!(body["record"]["title"], json!("First post"));

    let response = send(&router, get_with("/posts/edit/1", Some(&cookie))?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["page"], json!("posts.edit"));
    assert_eq!(body["title"], json!("#1 Edit Post | refine"));

    let response = send(&router, get_with("/posts/show/99", Some(&cookie))?).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await?;
    assert_eq!(body["statusCode"], json!(404));
    Ok(())
}

#[tokio::test]
async fn posts_update_patches_and_points_to_list() -> Result<()> {
    let router = panel().await?;
    let cookie = login(&router).await?;

    let response = send(
        &router,
        post_json("/posts/edit/1", Some(&cookie), &json!({ "title": "Renamed" }))?,
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["data"]["title"], json!("Renamed"));
    assert_eq!(body["data"]["status"], json!("published"));
    assert_eq!(body["redirectTo"], json!("/posts"));
    Ok(())
}

#[tokio::test]
async fn unknown_path_renders_not_found_when_authenticated() -> Result<()> {
    let router = panel().await?;
    let cookie = login(&router).await?;

    let response = send(&router, get_with("/does/not/exist", Some(&cookie))?).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await?;
    assert_eq!(body["page"], json!("error"));
    Ok(())
}

#[tokio::test]
async fn api_docs_are_public() -> Result<()> {
    let router = panel().await?;

    let response = send(&router, get_with("/api-docs/openapi.json", None)?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert!(body["paths"]["/api/auth/login"].is_object());

    let response = send(&router, get_with("/health", None)?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn posts_list_survives_out_of_range_paging() -> Result<()> {
    let router = panel().await?;
    let cookie = login(&router).await?;

    let response = send(
        &router,
        get_with("/posts?current=18446744073709551615&pageSize=2", Some(&cookie))?,
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["current"], json!(u64::MAX));
    assert_eq!(body["pageSize"], json!(2));

    let response = send(&router, get_with("/posts?current=0&pageSize=0", Some(&cookie))?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["current"], json!(1));
    assert_eq!(body["pageSize"], json!(1));
    Ok(())
}

#[tokio::test]
async fn register_then_browse() -> Result<()> {
    let router = panel().await?;

    let response = send(
        &router,
        post_json(
            "/api/auth/register",
            None,
            &json!({ "email": "demo@refine.dev", "password": "new-password" }),
        )?,
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = set_cookie(&response).context("register did not set the session cookie")?;
    assert_eq!(json_body(response).await?["redirectTo"], json!("/"));

    let response = send(&router, get_with("/posts", Some(&cookie))?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn identity_and_permissions_are_public() -> Result<()> {
    let router = panel().await?;

    let response = send(&router, get_with("/api/auth/identity", None)?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await?["name"], json!("Jane Doe"));

    let response = send(&router, get_with("/api/auth/permissions", None)?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await?, json!(["admin"]));

    let response = send(
        &router,
        post_json("/api/auth/update-password", None, &json!({ "password": "nope" }))?,
    )
    .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
