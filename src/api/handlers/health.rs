use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::GIT_COMMIT_HASH;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
}

/// `name:version:short-hash`, or `None` if it does not fit in a header.
fn x_app_header(health: &Health) -> Option<HeaderValue> {
    let short_hash = health.commit.get(..7).unwrap_or_default();
    match HeaderValue::from_str(&format!("{}:{}:{short_hash}", health.name, health.version)) {
        Ok(value) => Some(value),
        Err(err) => {
            error!("Failed to build X-App header: {err}");
            None
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Panel is up", body = Health),
    ),
    tag = "health"
)]
pub async fn health(method: Method) -> impl IntoResponse {
    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let mut headers = HeaderMap::new();
    if let Some(value) = x_app_header(&health) {
        debug!("X-App header: {:?}", value);
        headers.insert("X-App", value);
    }

    // HEAD probes only need the status and header.
    let body = if method == Method::HEAD {
        Body::empty().into_response()
    } else {
        Json(&health).into_response()
    };

    (StatusCode::OK, headers, body)
}
