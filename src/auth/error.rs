//! Failure taxonomy for the auth callbacks.

use serde::{ser::SerializeStruct, Serialize, Serializer};
use thiserror::Error;

/// Operation that rejected a credential pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialOperation {
    Login,
    Register,
}

/// A labelled auth failure with a static user-facing message.
///
/// `Display` yields the label (`name`); [`AuthError::message`] yields the
/// operation-specific message shown next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials { operation: CredentialOperation },
    #[error("Invalid password")]
    InvalidPassword,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Not authenticated")]
    NotAuthenticated,
}

impl AuthError {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InvalidCredentials { .. } => "Invalid email or password",
            Self::InvalidPassword => "Invalid password",
            Self::InvalidEmail => "Invalid email",
            Self::NotAuthenticated => "Not authenticated",
        }
    }

    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials {
                operation: CredentialOperation::Login,
            } => "Login failed",
            Self::InvalidCredentials {
                operation: CredentialOperation::Register,
            } => "Register failed",
            Self::InvalidPassword => "Update password failed",
            Self::InvalidEmail => "Forgot password failed",
            Self::NotAuthenticated => "Check failed",
        }
    }
}

// Serialized as `{ "name": ..., "message": ... }`, the shape the frontend reads.
impl Serialize for AuthError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AuthError", 2)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("message", self.message())?;
        state.end()
    }
}
