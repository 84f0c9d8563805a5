//! External identity providers offered on the login and register pages.
//!
//! Signing in through a provider only redirects to its authorization endpoint;
//! no callback is handled, so nothing is verified and no session flag is set.

use serde::Serialize;
use std::sync::Arc;
use url::Url;

const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";

pub trait IdentityProvider: Send + Sync {
    /// Name sent by the client as `providerName`.
    fn name(&self) -> &str;

    /// Button label shown on the auth pages.
    fn label(&self) -> &str;

    /// Where the user agent is sent to start the sign-in.
    fn authorization_url(&self) -> Url;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Google;

impl IdentityProvider for Google {
    fn name(&self) -> &str {
        "google"
    }

    fn label(&self) -> &str {
        "Sign in with Google"
    }

    fn authorization_url(&self) -> Url {
        parse_static(GOOGLE_AUTHORIZE_URL)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GitHub;

impl IdentityProvider for GitHub {
    fn name(&self) -> &str {
        "github"
    }

    fn label(&self) -> &str {
        "Sign in with GitHub"
    }

    fn authorization_url(&self) -> Url {
        parse_static(GITHUB_AUTHORIZE_URL)
    }
}

#[allow(clippy::expect_used)]
fn parse_static(url: &'static str) -> Url {
    Url::parse(url).expect("static provider URL must be valid")
}

/// Provider entry as listed on the auth pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderOption {
    pub name: String,
    pub label: String,
}

/// Registered providers, looked up by name in registration order.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn IdentityProvider>>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the Google and GitHub providers.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new().with_provider(Google).with_provider(GitHub)
    }

    /// Adds a provider, replacing any existing one with the same name.
    #[must_use]
    pub fn with_provider<P: IdentityProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.retain(|p| p.name() != provider.name());
        self.providers.push(Arc::new(provider));
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn IdentityProvider>> {
        self.providers.iter().find(|p| p.name() == name).cloned()
    }

    #[must_use]
    pub fn options(&self) -> Vec<ProviderOption> {
        self.providers
            .iter()
            .map(|p| ProviderOption {
                name: p.name().to_string(),
                label: p.label().to_string(),
            })
            .collect()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|p| p.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gitlab;

    impl IdentityProvider for Gitlab {
        fn name(&self) -> &str {
            "gitlab"
        }

        fn label(&self) -> &str {
            "Sign in with GitLab"
        }

        fn authorization_url(&self) -> Url {
            parse_static("https://gitlab.com/oauth/authorize")
        }
    }

    #[test]
    fn defaults_resolve_authorization_urls() {
        let registry = ProviderRegistry::with_defaults();
        let google = registry.get("google").map(|p| p.authorization_url());
        let github = registry.get("github").map(|p| p.authorization_url());
        assert_eq!(
            google.as_ref().map(Url::as_str),
            Some("https://accounts.google.com/o/oauth2/v2/auth")
        );
        assert_eq!(
            github.as_ref().map(Url::as_str),
            Some("https://github.com/login/oauth/authorize")
        );
    }

    #[test]
    fn unknown_provider_is_none() {
        let registry = ProviderRegistry::with_defaults();
        assert!(registry.get("facebook").is_none());
        assert!(registry.get("Google").is_none());
    }

    #[test]
    fn new_providers_register_without_touching_defaults() {
        let registry = ProviderRegistry::with_defaults().with_provider(Gitlab);
        let names: Vec<String> = registry.options().into_iter().map(|o| o.name).collect();
        assert_eq!(names, vec!["google", "github", "gitlab"]);
    }

    #[test]
    fn re_registering_replaces() {
        let registry = ProviderRegistry::new()
            .with_provider(Google)
            .with_provider(Google);
        assert_eq!(registry.options().len(), 1);
    }

    #[test]
    fn options_carry_labels() {
        let options = ProviderRegistry::with_defaults().options();
        assert_eq!(
            options.first(),
            Some(&ProviderOption {
                name: "google".to_string(),
                label: "Sign in with Google".to_string(),
            })
        );
    }
}
