//! Caller identity types for the domain layer.
//!
//! These types describe who is making a request once the identity
//! collaborator has verified their credentials. Credential issuance lives
//! outside this service; any provider able to produce a `UserId` can
//! populate them through the `Identity` port.

use super::UserId;
use thiserror::Error;

/// Caller resolved from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the identity provider.
    pub id: UserId,

    /// Email claim, when the token carries one.
    pub email: Option<String>,

    /// Display name, when the token carries one.
    pub display_name: Option<String>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, email: Option<String>, display_name: Option<String>) -> Self {
        Self {
            id,
            email,
            display_name,
        }
    }

    /// Creates a user that only carries an identifier.
    pub fn anonymous_profile(id: UserId) -> Self {
        Self::new(id, None, None)
    }

    /// Returns the display name, falling back to email and then the user id.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or_else(|| self.id.as_str())
    }
}

/// Authentication errors that can occur during token verification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,

    /// The identity service is unavailable.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user_id() -> UserId {
        UserId::new("user-123").unwrap()
    }

    #[test]
    fn label_prefers_display_name() {
        let user = AuthenticatedUser::new(
            test_user_id(),
            Some("alice@example.com".to_string()),
            Some("Alice".to_string()),
        );
        assert_eq!(user.label(), "Alice");
    }

    #[test]
    fn label_falls_back_to_email_then_id() {
        let user = AuthenticatedUser::new(test_user_id(), Some("bob@example.com".to_string()), None);
        assert_eq!(user.label(), "bob@example.com");

        let user = AuthenticatedUser::anonymous_profile(test_user_id());
        assert_eq!(user.label(), "user-123");
    }

    #[test]
    fn auth_error_displays_correctly() {
        assert_eq!(AuthError::InvalidToken.to_string(), "Invalid or expired token");
        assert_eq!(AuthError::TokenExpired.to_string(), "Token expired");
        assert_eq!(
            AuthError::service_unavailable("Connection refused").to_string(),
            "Auth service unavailable: Connection refused"
        );
    }

    #[test]
    fn only_service_errors_are_transient() {
        assert!(AuthError::service_unavailable("timeout").is_transient());
        assert!(!AuthError::InvalidToken.is_transient());
        assert!(!AuthError::TokenExpired.is_transient());
    }
}
