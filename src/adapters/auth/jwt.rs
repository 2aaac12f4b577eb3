//! HS256 JWT identity adapter.
//!
//! Validates tokens signed with a shared secret by the service that issues
//! credentials. The `sub` claim is the user id.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::Identity;

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the user ID
    pub sub: String,

    /// Expiry timestamp (Unix epoch seconds)
    pub exp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Identity backed by HS256-signed JWTs.
pub struct JwtIdentity {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentity {
    pub fn new(secret: &SecretString, issuer: Option<&str>, leeway_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_secs;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation,
        }
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("Token expired");
                        AuthError::TokenExpired
                    }
                    ErrorKind::InvalidIssuer => {
                        tracing::warn!("Invalid issuer in token");
                        AuthError::InvalidToken
                    }
                    _ => {
                        tracing::debug!("Token validation failed: {}", e);
                        AuthError::InvalidToken
                    }
                }
            })
    }
}

#[async_trait]
impl Identity for JwtIdentity {
    async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.decode_claims(token)?;
        let id = UserId::new(claims.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthenticatedUser::new(id, claims.email, claims.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-signing-secret";

    fn identity(issuer: Option<&str>) -> JwtIdentity {
        JwtIdentity::new(&SecretString::new(SECRET.to_string()), issuer, 0)
    }

    fn token(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(sub: &str, expires_in_secs: i64) -> Claims {
        Claims {
            sub: sub.to_string(),
            exp: Utc::now().timestamp() + expires_in_secs,
            iss: None,
            email: Some(format!("{}@example.com", sub)),
            name: Some("Dana".to_string()),
        }
    }

    #[tokio::test]
    async fn valid_token_yields_user() {
        let user = identity(None)
            .authenticate(&token(&claims("user-42", 3600), SECRET))
            .await
            .unwrap();

        assert_eq!(user.id.as_str(), "user-42");
        assert_eq!(user.email.as_deref(), Some("user-42@example.com"));
        assert_eq!(user.display_name.as_deref(), Some("Dana"));
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let err = identity(None)
            .authenticate(&token(&claims("user-42", -3600), SECRET))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::TokenExpired);
    }

    #[tokio::test]
    async fn wrong_secret_is_invalid() {
        let err = identity(None)
            .authenticate(&token(&claims("user-42", 3600), "other-secret"))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn issuer_is_enforced_when_configured() {
        let mut c = claims("user-42", 3600);
        c.iss = Some("someone-else".to_string());

        let err = identity(Some("game-night-auth"))
            .authenticate(&token(&c, SECRET))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn blank_subject_is_invalid() {
        let err = identity(None)
            .authenticate(&token(&claims("  ", 3600), SECRET))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn garbage_is_invalid() {
        assert_eq!(
            identity(None).authenticate("not-a-jwt").await.unwrap_err(),
            AuthError::InvalidToken
        );
    }
}
