//! Page payloads for the dashboard, the auth pages and the error page.
//!
//! Protected pages embed the layout (identity and menu) so the UI can render
//! the header and sidebar without extra requests.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use secrecy::ExposeSecret;
use serde::Serialize;
use std::sync::Arc;

use crate::{
    auth::{AuthGate, Identity, ProviderOption},
    routes::{resources::DASHBOARD, Action, MenuItem, Resources},
};

const TITLE_SUFFIX: &str = "refine";

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Layout {
    pub identity: Identity,
    pub menu: Vec<MenuItem>,
}

impl Layout {
    #[must_use]
    pub fn new(gate: &AuthGate, resources: &Resources) -> Self {
        Self {
            identity: gate.identity(),
            menu: resources.menu(),
        }
    }
}

/// A rendered page: title, page kind, optional layout and page content.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub title: String,
    pub page: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    #[serde(flatten)]
    pub content: T,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub resource: &'static str,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthPage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub providers: Vec<ProviderOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_values: Option<InitialValues>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct InitialValues {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPage {
    pub status_code: u16,
    pub message: &'static str,
}

fn auth_title(label: &str) -> String {
    format!("{label} | {TITLE_SUFFIX}")
}

pub async fn dashboard(
    gate: Extension<Arc<AuthGate>>,
    resources: Extension<Arc<Resources>>,
) -> impl IntoResponse {
    let title = resources.get(DASHBOARD).map_or_else(
        || auth_title("Dashboard"),
        |r| r.title(Action::List, None),
    );
    Json(Page {
        title,
        page: "dashboard",
        layout: Some(Layout::new(&gate, &resources)),
        content: Dashboard {
            resource: DASHBOARD,
        },
    })
}

/// Login form prefilled with the demo credentials.
pub async fn login(gate: Extension<Arc<AuthGate>>) -> impl IntoResponse {
    let credentials = gate.config().credentials();
    Json(Page {
        title: auth_title("Login"),
        page: "login",
        layout: None,
        content: AuthPage {
            kind: "login",
            providers: gate.provider_options(),
            initial_values: Some(InitialValues {
                email: credentials.email().to_string(),
                password: credentials.password().expose_secret().to_string(),
            }),
        },
    })
}

pub async fn register(gate: Extension<Arc<AuthGate>>) -> impl IntoResponse {
    Json(Page {
        title: auth_title("Register"),
        page: "register",
        layout: None,
        content: AuthPage {
            kind: "register",
            providers: gate.provider_options(),
            initial_values: None,
        },
    })
}

pub async fn forgot_password() -> impl IntoResponse {
    Json(Page {
        title: auth_title("Forgot password"),
        page: "forgot-password",
        layout: None,
        content: AuthPage {
            kind: "forgotPassword",
            providers: Vec::new(),
            initial_values: None,
        },
    })
}

pub async fn update_password() -> impl IntoResponse {
    Json(Page {
        title: auth_title("Update password"),
        page: "update-password",
        layout: None,
        content: AuthPage {
            kind: "updatePassword",
            providers: Vec::new(),
            initial_values: None,
        },
    })
}

/// Catch-all page, only reached by authenticated visitors.
pub async fn not_found(
    gate: Extension<Arc<AuthGate>>,
    resources: Extension<Arc<Resources>>,
) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(Page {
            title: auth_title("Not found"),
            page: "error",
            layout: Some(Layout::new(&gate, &resources)),
            content: ErrorPage {
                status_code: StatusCode::NOT_FOUND.as_u16(),
                message: "Sorry, the page you visited does not exist.",
            },
        }),
    )
}
