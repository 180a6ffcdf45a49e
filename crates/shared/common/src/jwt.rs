//! HS256 tokens shared by every service.
//!
//! The auth service issues tokens; the other services only verify access
//! tokens with the same secret.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain::{User, UserRole};

use crate::error::{AppError, AppResult};

/// Which secret a token belongs to. Stored in the `typ` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub name: String,
    pub roles: Vec<UserRole>,
    pub exp: i64,
    pub iat: i64,
    /// Unique per token, so two tokens issued in the same second differ.
    pub jti: Uuid,
    pub typ: TokenKind,
}

/// Signing and verification keys for one secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    kind: TokenKind,
}

impl TokenKeys {
    /// Keys for access tokens, the only kind `auth_middleware` accepts.
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self::with_kind(secret, ttl, TokenKind::Access)
    }

    /// Keys for refresh tokens.
    pub fn refresh(secret: &str, ttl: Duration) -> Self {
        Self::with_kind(secret, ttl, TokenKind::Refresh)
    }

    fn with_kind(secret: &str, ttl: Duration, kind: TokenKind) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
            kind,
        }
    }

    /// Sign a token for `user`.
    pub fn issue(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            roles: user.roles.clone(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4(),
            typ: self.kind,
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Check signature, expiry and token kind and return the claims.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        if data.claims.typ != self.kind {
            return Err(AppError::Unauthorized);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "an-access-secret-that-is-long-enough!";

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "org@example.com".into(),
            password_hash: String::new(),
            name: "Org".into(),
            roles: vec![UserRole::Organizer],
            refresh_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn issued_token_verifies_with_same_secret() {
        let keys = TokenKeys::new(SECRET, Duration::hours(24));
        let user = user();
        let claims = keys.verify(&keys.issue(&user).unwrap()).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.roles, vec![UserRole::Organizer]);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn other_secret_is_rejected() {
        let access = TokenKeys::new(SECRET, Duration::hours(24));
        let other = TokenKeys::new("a-refresh-secret-that-is-long-enough!", Duration::days(7));

        let token = other.issue(&user()).unwrap();
        assert!(access.verify(&token).is_err());
    }

    #[test]
    fn refresh_token_is_not_an_access_token_even_with_shared_secret() {
        let access = TokenKeys::new(SECRET, Duration::hours(24));
        let refresh = TokenKeys::refresh(SECRET, Duration::days(7));

        let token = refresh.issue(&user()).unwrap();
        assert!(matches!(access.verify(&token), Err(AppError::Unauthorized)));
        assert_eq!(refresh.verify(&token).unwrap().typ, TokenKind::Refresh);

        let token = access.issue(&user()).unwrap();
        assert!(refresh.verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = TokenKeys::new(SECRET, Duration::hours(-2));
        let token = keys.issue(&user()).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn tokens_issued_together_differ() {
        let keys = TokenKeys::new(SECRET, Duration::days(7));
        let user = user();
        assert_ne!(keys.issue(&user).unwrap(), keys.issue(&user).unwrap());
    }
}
