//! Signed identity tokens.
//!
//! Tokens are stateless HS256 JWTs: the server keeps no token table, so a token
//! stays valid until it expires or the signing key changes.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MIN_TOKEN_SECRET_LEN;
use crate::domain::UserId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,

    #[error("Token has expired")]
    Expired,

    #[error("Token signature does not match")]
    BadSignature,

    #[error("Failed to encode token: {0}")]
    Encoding(String),

    #[error("Signing key must be at least {} bytes", MIN_TOKEN_SECRET_LEN)]
    WeakKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a decimal string.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, ttl_hours: u32) -> Result<Self, TokenError> {
        if secret.len() < MIN_TOKEN_SECRET_LEN {
            return Err(TokenError::WeakKey);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::hours(i64::from(ttl_hours)),
        })
    }

    /// Issues a token for `user_id` valid from now until now + TTL.
    pub fn issue(&self, user_id: UserId) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: UserId, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Checks signature and expiry and returns the user the token was issued to.
    ///
    /// Whether that user still exists is for the caller to decide.
    pub fn validate(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            }
        })?;

        data.claims
            .sub
            .parse::<i32>()
            .map(UserId::new)
            .map_err(|_| TokenError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_A: &str = "an-hs256-test-key-that-is-long-enough-a";
    const KEY_B: &str = "an-hs256-test-key-that-is-long-enough-b";

    fn service(key: &str) -> TokenService {
        TokenService::new(key, 24).unwrap()
    }

    #[test]
    fn issued_token_validates_to_same_user() {
        let tokens = service(KEY_A);
        let token = tokens.issue(UserId::new(17)).unwrap();
        assert_eq!(tokens.validate(&token).unwrap(), UserId::new(17));
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = service(KEY_A);
        let token = tokens
            .issue_at(UserId::new(1), Utc::now() - Duration::hours(48))
            .unwrap();
        assert_eq!(tokens.validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let token = service(KEY_B).issue(UserId::new(1)).unwrap();
        assert_eq!(service(KEY_A).validate(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn swapped_payload_breaks_signature() {
        let tokens = service(KEY_A);
        let first = tokens.issue(UserId::new(1)).unwrap();
        let second = tokens.issue(UserId::new(2)).unwrap();

        let first_parts: Vec<&str> = first.split('.').collect();
        let second_parts: Vec<&str> = second.split('.').collect();
        let forged = format!("{}.{}.{}", first_parts[0], second_parts[1], first_parts[2]);

        assert_eq!(tokens.validate(&forged), Err(TokenError::BadSignature));
    }

    #[test]
    fn garbage_is_malformed() {
        let tokens = service(KEY_A);
        assert_eq!(tokens.validate("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(tokens.validate(""), Err(TokenError::Malformed));
    }

    #[test]
    fn non_numeric_subject_is_malformed() {
        let now = Utc::now();
        let claims = Claims {
            sub: "alice".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(KEY_A.as_bytes()),
        )
        .unwrap();

        assert_eq!(service(KEY_A).validate(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn short_key_is_refused() {
        assert!(matches!(
            TokenService::new("short", 24),
            Err(TokenError::WeakKey)
        ));
    }
}
