use axum::Json;
use utoipa::OpenApi;

use super::handlers::{auth, health};
use crate::auth::{
    CheckResponse, ErrorBody, ForgotPasswordParams, Identity, LoginParams, RegisterParams,
    UpdatePasswordParams,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::login,
        auth::register,
        auth::update_password,
        auth::forgot_password,
        auth::logout,
        auth::check,
        auth::identity,
        auth::permissions,
        auth::on_error,
    ),
    components(schemas(
        health::Health,
        auth::AuthResponse,
        auth::ErrorEnvelope,
        CheckResponse,
        ErrorBody,
        Identity,
        LoginParams,
        RegisterParams,
        UpdatePasswordParams,
        ForgotPasswordParams,
    )),
    tags(
        (name = "health", description = "Service health"),
        (name = "auth", description = "Mock authentication callbacks"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub async fn spec() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi())
}
