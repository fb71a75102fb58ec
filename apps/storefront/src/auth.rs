//! JWT authentication module.
//!
//! Turns an `Authorization: Bearer <token>` header into an
//! [`AuthenticatedUser`]. Sign-up, login and password storage live outside
//! this crate; tokens are issued here only for tooling and tests.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{StorefrontError, StorefrontResult};
use platter_core::{AuthenticatedUser, UserRole};

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    pub email: String,

    pub role: UserRole,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        AuthenticatedUser {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// JWT token manager (HS256).
#[derive(Clone)]
pub struct JwtManager {
    secret: String,
    lifetime_secs: i64,
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: impl Into<String>, lifetime_secs: i64) -> Self {
        JwtManager {
            secret: secret.into(),
            lifetime_secs,
        }
    }

    /// Issue a token for `user`.
    pub fn issue_token(&self, user: &AuthenticatedUser) -> StorefrontResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| StorefrontError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> StorefrontResult<Claims> {
        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| StorefrontError::InvalidToken(e.to_string()))?;

        Ok(token_data.claims)
    }

    /// Validate a token and return the identity it carries.
    pub fn authenticate(&self, token: &str) -> StorefrontResult<AuthenticatedUser> {
        self.validate_token(token).map(AuthenticatedUser::from)
    }

    /// Resolve the caller from an optional `Authorization` header value.
    ///
    /// A missing header, a non-bearer scheme, a bad signature or an expired
    /// token all resolve to `None`; callers that need an identity turn that
    /// into an authentication error themselves.
    pub fn resolve_identity(&self, authorization: Option<&str>) -> Option<AuthenticatedUser> {
        let token = extract_bearer_token(authorization?)?;

        match self.authenticate(token) {
            Ok(user) => Some(user),
            Err(e) => {
                debug!(error = %e, "Ignoring invalid bearer token");
                None
            }
        }
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> AuthenticatedUser {
        AuthenticatedUser {
            id: "user-001".to_string(),
            email: "asha@example.com".to_string(),
            role: UserRole::Customer,
        }
    }

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret", 3600);

        let token = manager.issue_token(&customer()).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "user-001");
        assert_eq!(claims.email, "asha@example.com");
        assert_eq!(claims.role, UserRole::Customer);
        assert_eq!(manager.authenticate(&token).unwrap(), customer());
    }

    #[test]
    fn test_resolve_identity() {
        let manager = JwtManager::new("test-secret", 3600);
        let token = manager.issue_token(&customer()).unwrap();

        let header = format!("Bearer {}", token);
        assert_eq!(manager.resolve_identity(Some(&header)), Some(customer()));
        assert_eq!(manager.resolve_identity(None), None);
        assert_eq!(manager.resolve_identity(Some(&token)), None);
        assert_eq!(manager.resolve_identity(Some("Bearer not-a-jwt")), None);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = JwtManager::new("one-secret", 3600);
        let verifier = JwtManager::new("another-secret", 3600);

        let token = issuer.issue_token(&customer()).unwrap();
        assert!(matches!(
            verifier.validate_token(&token),
            Err(StorefrontError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Past the default 60s leeway
        let manager = JwtManager::new("test-secret", -3600);
        let token = manager.issue_token(&customer()).unwrap();
        assert!(manager.validate_token(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
    }
}
