//! Signed-token verification.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use crate::{JwtClaims, TokenValidationError, validate_claims};

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("malformed or badly signed token: {0}")]
    Decode(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Verifies a bearer token and yields its claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, JwtError>;
}

/// HMAC-SHA256 shared-secret validator.
pub struct Hs256JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(secret: Vec<u8>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry lives in our own `expires_at` claim, checked by `validate_claims`.
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        Self {
            key: DecodingKey::from_secret(&secret),
            validation,
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, JwtError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.key, &self.validation)?;
        validate_claims(&data.claims, now)?;
        tracing::debug!(sub = %data.claims.sub, "token accepted");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use escola_core::UserId;
    use jsonwebtoken::{EncodingKey, Header};

    fn mint(secret: &str, claims: &JwtClaims) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn fresh_claims() -> JwtClaims {
        let now = Utc::now();
        JwtClaims {
            sub: UserId::new(),
            issued_at: now - Duration::seconds(5),
            expires_at: now + Duration::minutes(10),
        }
    }

    #[test]
    fn accepts_token_signed_with_same_secret() {
        let claims = fresh_claims();
        let token = mint("s3cret", &claims);
        let validator = Hs256JwtValidator::new(b"s3cret".to_vec());

        let decoded = validator.validate(&token, Utc::now()).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = mint("other", &fresh_claims());
        let validator = Hs256JwtValidator::new(b"s3cret".to_vec());

        assert!(matches!(
            validator.validate(&token, Utc::now()),
            Err(JwtError::Decode(_))
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let claims = fresh_claims();
        let token = mint("s3cret", &claims);
        let validator = Hs256JwtValidator::new(b"s3cret".to_vec());

        let later = claims.expires_at + Duration::seconds(1);
        assert!(matches!(
            validator.validate(&token, later),
            Err(JwtError::Claims(TokenValidationError::Expired))
        ));
    }

    #[test]
    fn rejects_garbage() {
        let validator = Hs256JwtValidator::new(b"s3cret".to_vec());
        assert!(validator.validate("not.a.jwt", Utc::now()).is_err());
    }
}
