pub mod password;
pub mod policy;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{Role, User};

pub const TOKEN_ISSUER: &str = "perftrack-api";
pub const TOKEN_EXPIRY_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub needs_password_change: bool,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

impl Claims {
    pub fn for_user(user: &User) -> Self {
        let now = Utc::now();
        Self {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            is_active: user.is_active,
            needs_password_change: user.needs_password_change,
            exp: (now + Duration::hours(TOKEN_EXPIRY_HOURS)).timestamp(),
            iat: now.timestamp(),
            iss: TOKEN_ISSUER.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token generation failed: {0}")]
    Generation(String),
    #[error("invalid token")]
    Invalid,
}

/// Sign a fresh 24h token for the user. Rotating the secret invalidates
/// every outstanding token; there is no revocation list.
pub fn issue_token(user: &User, secret: &str) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::Generation("empty JWT secret".into()));
    }
    encode(
        &Header::default(),
        &Claims::for_user(user),
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Generation(e.to_string()))
}

/// Verify signature, expiry and issuer; bad tokens all collapse into
/// `TokenError::Invalid`.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[TOKEN_ISSUER]);

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|_| TokenError::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const SECRET: &str = "test-secret";

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "gerente@empresa.com".into(),
            password: "hash".into(),
            name: "Gerente".into(),
            role: Role::Manager,
            company_id: Some(Uuid::new_v4()),
            needs_password_change: false,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn token_round_trip() {
        let user = sample_user();
        let token = issue_token(&user, SECRET).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, Role::Manager);
        assert!(claims.is_active);
        assert!(!claims.needs_password_change);
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = issue_token(&sample_user(), SECRET).unwrap();
        assert!(matches!(verify_token(&token, "other-secret"), Err(TokenError::Invalid)));
    }

    #[test]
    fn garbage_rejected() {
        assert!(verify_token("not.a.token", SECRET).is_err());
        assert!(verify_token("", SECRET).is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let user = sample_user();
        let now = Utc::now();
        let claims = Claims {
            exp: (now - Duration::hours(2)).timestamp(),
            iat: (now - Duration::hours(26)).timestamp(),
            ..Claims::for_user(&user)
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(matches!(verify_token(&token, SECRET), Err(TokenError::Invalid)));
    }

    #[test]
    fn foreign_issuer_rejected() {
        let user = sample_user();
        let claims = Claims { iss: "someone-else".into(), ..Claims::for_user(&user) };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(&token, SECRET).is_err());
    }

    #[test]
    fn empty_secret_refused_at_issue() {
        assert!(issue_token(&sample_user(), "").is_err());
    }
}
