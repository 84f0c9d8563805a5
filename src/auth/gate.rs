//! Auth callbacks: login, register, password flows, logout and the session check.
//!
//! Flow Overview: every operation receives the caller's [`SessionStore`]
//! explicitly. Successful `login`/`register` write the flag, `logout` removes
//! it and `check` only reads it. Identity and permissions are static and do not
//! consult the store at all.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

use super::{
    credentials::Credentials,
    error::{AuthError, CredentialOperation},
    identity::{self, Identity},
    providers::{ProviderOption, ProviderRegistry},
    store::{SessionStore, SESSION_KEY},
};

pub const LOGIN_PATH: &str = "/login";
pub const DEFAULT_LOGIN_LANDING: &str = "/page";
pub const REGISTER_LANDING: &str = "/";
pub const DEFAULT_CHECK_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone, Debug)]
pub struct AuthConfig {
    credentials: Credentials,
    login_landing: String,
    check_delay: Duration,
    cookie_secure: bool,
}

impl AuthConfig {
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            login_landing: DEFAULT_LOGIN_LANDING.to_string(),
            check_delay: DEFAULT_CHECK_DELAY,
            cookie_secure: false,
        }
    }

    #[must_use]
    pub fn with_login_landing(mut self, path: String) -> Self {
        self.login_landing = path;
        self
    }

    #[must_use]
    pub fn with_check_delay(mut self, delay: Duration) -> Self {
        self.check_delay = delay;
        self
    }

    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    #[must_use]
    pub fn login_landing(&self) -> &str {
        &self.login_landing
    }

    #[must_use]
    pub fn check_delay(&self) -> Duration {
        self.check_delay
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new(Credentials::default())
    }
}

#[derive(ToSchema, Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginParams {
    pub provider_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(ToSchema, Deserialize, Debug, Default, Clone)]
pub struct RegisterParams {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(ToSchema, Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordParams {
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(ToSchema, Deserialize, Debug, Default, Clone)]
pub struct ForgotPasswordParams {
    pub email: Option<String>,
}

/// Successful outcome of a mutating auth callback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSuccess {
    pub redirect_to: Option<String>,
}

impl AuthSuccess {
    fn redirect(path: impl Into<String>) -> Self {
        Self {
            redirect_to: Some(path.into()),
        }
    }
}

#[derive(ToSchema, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<super::ErrorBody>)]
    pub error: Option<AuthError>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub logout: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

impl CheckResponse {
    #[must_use]
    pub fn authenticated() -> Self {
        Self {
            authenticated: true,
            error: None,
            logout: false,
            redirect_to: None,
        }
    }

    #[must_use]
    pub fn unauthenticated() -> Self {
        Self {
            authenticated: false,
            error: Some(AuthError::NotAuthenticated),
            logout: true,
            redirect_to: Some(LOGIN_PATH.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthGate {
    config: AuthConfig,
    providers: ProviderRegistry,
    identity: Identity,
}

impl AuthGate {
    #[must_use]
    pub fn new(config: AuthConfig, providers: ProviderRegistry) -> Self {
        Self {
            config,
            providers,
            identity: Identity::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn provider_options(&self) -> Vec<ProviderOption> {
        self.providers.options()
    }

    /// # Errors
    /// [`AuthError::InvalidCredentials`] when no provider matched and the email
    /// is not the configured one. The password is never compared.
    #[instrument(skip_all, fields(provider = params.provider_name.as_deref()))]
    pub fn login<S: SessionStore + ?Sized>(
        &self,
        store: &mut S,
        params: &LoginParams,
    ) -> Result<AuthSuccess, AuthError> {
        if let Some(provider) = params
            .provider_name
            .as_deref()
            .and_then(|name| self.providers.get(name))
        {
            let url = provider.authorization_url();
            info!("Redirecting to {} authorization endpoint", provider.name());
            return Ok(AuthSuccess::redirect(url.as_str()));
        }

        match params.email.as_deref() {
            Some(email) if self.config.credentials.matches_email(email) => {
                store.set(SESSION_KEY, email);
                info!("Login succeeded");
                Ok(AuthSuccess::redirect(self.config.login_landing.as_str()))
            }
            _ => {
                warn!("Login rejected");
                Err(AuthError::InvalidCredentials {
                    operation: CredentialOperation::Login,
                })
            }
        }
    }

    /// # Errors
    /// [`AuthError::InvalidCredentials`] unless the email matches and a
    /// non-empty password is present. The password value itself is not checked.
    #[instrument(skip_all)]
    pub fn register<S: SessionStore + ?Sized>(
        &self,
        store: &mut S,
        params: &RegisterParams,
    ) -> Result<AuthSuccess, AuthError> {
        let has_password = params.password.as_deref().is_some_and(|p| !p.is_empty());
        match params.email.as_deref() {
            Some(email) if has_password && self.config.credentials.matches_email(email) => {
                store.set(SESSION_KEY, email);
                info!("Registration succeeded");
                Ok(AuthSuccess::redirect(REGISTER_LANDING))
            }
            _ => {
                warn!("Registration rejected");
                Err(AuthError::InvalidCredentials {
                    operation: CredentialOperation::Register,
                })
            }
        }
    }

    /// Validates the password against the stored one. Nothing is persisted.
    ///
    /// # Errors
    /// [`AuthError::InvalidPassword`] when the password differs.
    #[instrument(skip_all)]
    pub fn update_password(&self, params: &UpdatePasswordParams) -> Result<AuthSuccess, AuthError> {
        match params.password.as_deref() {
            Some(password) if self.config.credentials.matches_password(password) => {
                debug!("Password update accepted");
                Ok(AuthSuccess::default())
            }
            _ => Err(AuthError::InvalidPassword),
        }
    }

    /// # Errors
    /// [`AuthError::InvalidEmail`] when the email is not the configured one.
    #[instrument(skip_all)]
    pub fn forgot_password(&self, params: &ForgotPasswordParams) -> Result<AuthSuccess, AuthError> {
        match params.email.as_deref() {
            Some(email) if self.config.credentials.matches_email(email) => {
                // No mail transport; a reset link would be sent here.
                info!("Password reset requested");
                Ok(AuthSuccess::default())
            }
            _ => Err(AuthError::InvalidEmail),
        }
    }

    #[instrument(skip_all)]
    pub fn logout<S: SessionStore + ?Sized>(&self, store: &mut S) -> AuthSuccess {
        store.clear(SESSION_KEY);
        info!("Logged out");
        AuthSuccess::redirect(LOGIN_PATH)
    }

    /// Resolves immediately when no flag is stored. Otherwise waits for the
    /// simulated fetch; the wait cannot be cancelled and has no timeout.
    #[instrument(skip_all)]
    pub async fn check<S: SessionStore + Sync + ?Sized>(&self, store: &S) -> CheckResponse {
        if store.get(SESSION_KEY).is_none() {
            debug!("No session flag");
            return CheckResponse::unauthenticated();
        }

        match self.emulate_fetch().await {
            Ok(()) => CheckResponse::authenticated(),
            Err(err) => {
                error!("Session check failed: {err}");
                CheckResponse::unauthenticated()
            }
        }
    }

    #[must_use]
    pub fn permissions(&self) -> Vec<String> {
        identity::permissions()
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        self.identity.clone()
    }

    /// Logs the error and hands it back untouched.
    pub fn on_error<E: std::fmt::Display>(&self, error: E) -> E {
        error!("{error}");
        error
    }

    // Stands in for a round trip to an auth backend. Always resolves.
    async fn emulate_fetch(&self) -> anyhow::Result<()> {
        tokio::time::sleep(self.config.check_delay).await;
        Ok(())
    }
}

impl Default for AuthGate {
    fn default() -> Self {
        Self::new(AuthConfig::default(), ProviderRegistry::with_defaults())
    }
}
