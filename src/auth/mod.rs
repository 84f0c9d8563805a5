//! Mock authentication: a single credential pair, a session flag and the
//! callbacks the panel routes and API use to gate access.

pub mod credentials;
pub mod error;
pub mod gate;
pub mod identity;
pub mod providers;
pub mod store;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use credentials::Credentials;
pub use error::{AuthError, CredentialOperation};
pub use gate::{
    AuthConfig, AuthGate, AuthSuccess, CheckResponse, ForgotPasswordParams, LoginParams,
    RegisterParams, UpdatePasswordParams,
};
pub use identity::Identity;
pub use providers::{GitHub, Google, IdentityProvider, ProviderOption, ProviderRegistry};
pub use store::{CookieSession, MemoryStore, SessionStore, SESSION_KEY};

/// Wire shape of an [`AuthError`], documented for the OpenAPI schema.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub name: String,
    pub message: String,
}
