//! # HS256 bearer tokens
//!
//! Tokens carry the username plus issue and expiry timestamps. Only HS256 is
//! accepted on verification; a token signed with any other algorithm fails.

use chrono::{Duration, Utc};
use domains::{DomainError, DomainResult, TokenService};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    username: String,
    iat: i64,
    exp: i64,
}

pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    fn sign(&self, claims: &Claims) -> DomainResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|err| DomainError::internal("sign token", err))
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, username: &str) -> DomainResult<String> {
        let now = Utc::now();
        self.sign(&Claims {
            username: username.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        })
    }

    fn verify(&self, token: &str) -> DomainResult<String> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims.username)
            .map_err(|err| {
                debug!(error = %err, "bearer token rejected");
                DomainError::Unauthorized("invalid or expired token".into())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtTokenService {
        JwtTokenService::new(b"test-secret", Duration::hours(24))
    }

    #[test]
    fn issued_token_verifies_to_its_username() {
        let service = service();
        let token = service.issue("alice").unwrap();
        assert_eq!(service.verify(&token).unwrap(), "alice");
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let service = service();
        let past = Utc::now() - Duration::hours(2);
        let token = service
            .sign(&Claims {
                username: "alice".into(),
                iat: (past - Duration::hours(24)).timestamp(),
                exp: past.timestamp(),
            })
            .unwrap();
        assert!(matches!(
            service.verify(&token),
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[test]
    fn tampered_token_is_unauthorized() {
        let service = service();
        let token = service.issue("alice").unwrap();
        let (unsigned, signature) = token.rsplit_once('.').unwrap();
        let flipped = if signature.starts_with('A') { 'B' } else { 'A' };
        let tampered = format!("{unsigned}.{flipped}{}", &signature[1..]);
        assert!(service.verify(&tampered).is_err());
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let other = JwtTokenService::new(b"another-secret", Duration::hours(24));
        let token = other.issue("alice").unwrap();
        assert!(service().verify(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(service().verify("not.a.token").is_err());
        assert!(service().verify("").is_err());
    }
}
