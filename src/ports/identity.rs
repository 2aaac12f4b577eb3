//! Identity port for resolving the caller behind a request.
//!
//! Credential issuance lives outside this service. This port only checks a
//! presented token and says who it belongs to.
//!
//! # Contract
//!
//! Implementations must:
//! - Validate the token signature and expiry
//! - Return `AuthError::InvalidToken` for malformed or badly signed tokens
//! - Return `AuthError::TokenExpired` for expired tokens
//! - Return `AuthError::ServiceUnavailable` for transient errors

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Resolves a presented token to the user it was issued for.
#[async_trait]
pub trait Identity: Send + Sync {
    /// Validate `token` (without any "Bearer " prefix).
    async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use std::collections::HashMap;
    use std::sync::RwLock;

    struct TableIdentity {
        tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    }

    #[async_trait]
    impl Identity for TableIdentity {
        async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
            self.tokens
                .read()
                .unwrap()
                .get(token)
                .cloned()
                .ok_or(AuthError::InvalidToken)
        }
    }

    #[tokio::test]
    async fn identity_works_through_trait_object() {
        let user = AuthenticatedUser::anonymous_profile(UserId::new("alice").unwrap());
        let identity: Box<dyn Identity> = Box::new(TableIdentity {
            tokens: RwLock::new(HashMap::from([("t-1".to_string(), user.clone())])),
        });

        assert_eq!(identity.authenticate("t-1").await.unwrap().id, user.id);
        assert_eq!(
            identity.authenticate("nope").await.unwrap_err(),
            AuthError::InvalidToken
        );
    }
}
