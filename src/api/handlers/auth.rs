//! JSON endpoints for the auth callbacks.
//!
//! Each endpoint builds a cookie session from the request, runs the gate and
//! returns `{ success, redirectTo?, error? }`. Session writes travel back as
//! `Set-Cookie` headers.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

use crate::auth::{
    AuthError, AuthGate, AuthSuccess, CheckResponse, CookieSession, ErrorBody,
    ForgotPasswordParams, Identity, LoginParams, RegisterParams, UpdatePasswordParams,
};

#[derive(ToSchema, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<ErrorBody>)]
    pub error: Option<AuthError>,
}

impl From<Result<AuthSuccess, AuthError>> for AuthResponse {
    fn from(result: Result<AuthSuccess, AuthError>) -> Self {
        match result {
            Ok(success) => Self {
                success: true,
                redirect_to: success.redirect_to,
                error: None,
            },
            Err(err) => Self {
                success: false,
                redirect_to: None,
                error: Some(err),
            },
        }
    }
}

/// Error payload echoed by `onError`.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorEnvelope {
    #[schema(value_type = Object)]
    pub error: Value,
}

pub(crate) fn error_status(err: AuthError) -> StatusCode {
    match err {
        AuthError::InvalidCredentials { .. } | AuthError::NotAuthenticated => {
            StatusCode::UNAUTHORIZED
        }
        AuthError::InvalidPassword | AuthError::InvalidEmail => StatusCode::BAD_REQUEST,
    }
}

fn respond(session: &CookieSession, result: Result<AuthSuccess, AuthError>) -> Response {
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(err) => error_status(*err),
    };
    (
        status,
        session.response_headers(),
        Json(AuthResponse::from(result)),
    )
        .into_response()
}

fn cookie_session(headers: &HeaderMap, gate: &AuthGate) -> CookieSession {
    CookieSession::from_headers(headers, gate.config().cookie_secure())
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginParams,
    responses(
        (status = 200, description = "Logged in, or redirected to an identity provider", body = AuthResponse),
        (status = 401, description = "Invalid email or password", body = AuthResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    headers: HeaderMap,
    gate: Extension<Arc<AuthGate>>,
    payload: Option<Json<LoginParams>>,
) -> impl IntoResponse {
    let params = payload.map(|Json(p)| p).unwrap_or_default();
    let mut session = cookie_session(&headers, &gate);
    let result = gate.login(&mut session, &params);
    respond(&session, result)
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterParams,
    responses(
        (status = 200, description = "Registered and logged in", body = AuthResponse),
        (status = 401, description = "Invalid email or password", body = AuthResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn register(
    headers: HeaderMap,
    gate: Extension<Arc<AuthGate>>,
    payload: Option<Json<RegisterParams>>,
) -> impl IntoResponse {
    let params = payload.map(|Json(p)| p).unwrap_or_default();
    let mut session = cookie_session(&headers, &gate);
    let result = gate.register(&mut session, &params);
    respond(&session, result)
}

#[utoipa::path(
    post,
    path = "/api/auth/update-password",
    request_body = UpdatePasswordParams,
    responses(
        (status = 200, description = "Password accepted", body = AuthResponse),
        (status = 400, description = "Invalid password", body = AuthResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn update_password(
    headers: HeaderMap,
    gate: Extension<Arc<AuthGate>>,
    payload: Option<Json<UpdatePasswordParams>>,
) -> impl IntoResponse {
    let params = payload.map(|Json(p)| p).unwrap_or_default();
    respond(&cookie_session(&headers, &gate), gate.update_password(&params))
}

#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordParams,
    responses(
        (status = 200, description = "Reset requested", body = AuthResponse),
        (status = 400, description = "Invalid email", body = AuthResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn forgot_password(
    headers: HeaderMap,
    gate: Extension<Arc<AuthGate>>,
    payload: Option<Json<ForgotPasswordParams>>,
) -> impl IntoResponse {
    let params = payload.map(|Json(p)| p).unwrap_or_default();
    respond(&cookie_session(&headers, &gate), gate.forgot_password(&params))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session flag cleared", body = AuthResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn logout(headers: HeaderMap, gate: Extension<Arc<AuthGate>>) -> impl IntoResponse {
    let mut session = cookie_session(&headers, &gate);
    let result = gate.logout(&mut session);
    respond(&session, Ok(result))
}

#[utoipa::path(
    get,
    path = "/api/auth/check",
    responses(
        (status = 200, description = "Session flag present", body = CheckResponse),
        (status = 401, description = "No session flag", body = CheckResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn check(headers: HeaderMap, gate: Extension<Arc<AuthGate>>) -> impl IntoResponse {
    let session = cookie_session(&headers, &gate);
    let response = gate.check(&session).await;
    let status = if response.authenticated {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };
    (status, Json(response))
}

#[utoipa::path(
    get,
    path = "/api/auth/identity",
    responses(
        (status = 200, description = "Current identity", body = Identity)
    ),
    tag = "auth"
)]
pub async fn identity(gate: Extension<Arc<AuthGate>>) -> Json<Identity> {
    Json(gate.identity())
}

#[utoipa::path(
    get,
    path = "/api/auth/permissions",
    responses(
        (status = 200, description = "Granted permissions", body = Vec<String>)
    ),
    tag = "auth"
)]
pub async fn permissions(gate: Extension<Arc<AuthGate>>) -> Json<Vec<String>> {
    Json(gate.permissions())
}

#[utoipa::path(
    post,
    path = "/api/auth/error",
    request_body = ErrorEnvelope,
    responses(
        (status = 200, description = "Error logged and echoed", body = ErrorEnvelope)
    ),
    tag = "auth"
)]
pub async fn on_error(
    gate: Extension<Arc<AuthGate>>,
    Json(envelope): Json<ErrorEnvelope>,
) -> Json<ErrorEnvelope> {
    Json(ErrorEnvelope {
        error: gate.on_error(envelope.error),
    })
}
