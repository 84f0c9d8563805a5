//! The single identity the panel accepts.

use anyhow::{anyhow, Result};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

pub const DEFAULT_EMAIL: &str = "demo@refine.dev";
pub const DEFAULT_PASSWORD: &str = "demodemo";

/// Hardcoded email/password pair, fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct Credentials {
    email: String,
    password: SecretString,
}

impl Credentials {
    /// # Errors
    /// Returns an error if `email` is not a basic `user@host.tld` address or
    /// `password` is empty.
    pub fn new(email: String, password: SecretString) -> Result<Self> {
        if !valid_email(&email) {
            return Err(anyhow!("Invalid credential email: {email}"));
        }
        if password.expose_secret().is_empty() {
            return Err(anyhow!("Credential password must not be empty"));
        }
        Ok(Self { email, password })
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &SecretString {
        &self.password
    }

    #[must_use]
    pub fn matches_email(&self, email: &str) -> bool {
        self.email == email
    }

    #[must_use]
    pub fn matches_password(&self, password: &str) -> bool {
        self.password.expose_secret() == password
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            email: DEFAULT_EMAIL.to_string(),
            password: SecretString::from(DEFAULT_PASSWORD.to_string()),
        }
    }
}

pub(crate) fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}
