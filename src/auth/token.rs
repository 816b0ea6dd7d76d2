use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;
const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The user id, as a decimal string.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// The authenticated user id; fails closed on a non-numeric or non-positive subject.
    pub fn user_id(&self) -> Result<i64> {
        match self.sub.parse::<i64>() {
            Ok(id) if id > 0 => Ok(id),
            _ => Err(Error::InvalidToken),
        }
    }
}

/// Issues and verifies HS256 session tokens with a symmetric secret.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issues a token for `user_id` valid for 24 hours from now.
    pub fn issue(&self, user_id: i64) -> Result<String> {
        self.issue_at(user_id, Utc::now())
    }

    pub(crate) fn issue_at(&self, user_id: i64, issued_at: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp(),
        };

        Ok(encode(
            &Header::new(TOKEN_ALGORITHM),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Verifies signature, algorithm and expiry, returning the user id.
    pub fn verify(&self, token: &str) -> Result<i64> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => Error::TokenExpired,
                _ => Error::InvalidToken,
            }
        })?;

        data.claims.user_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn test_issue_and_verify() {
        let issuer = TokenIssuer::new(SECRET);
        let token = issuer.issue(42).unwrap();

        assert_eq!(issuer.verify(&token).unwrap(), 42);
    }

    #[test]
    fn test_token_expires_after_a_day() {
        let issuer = TokenIssuer::new(SECRET);
        let token = issuer
            .issue_at(42, Utc::now() - Duration::hours(25))
            .unwrap();

        assert!(matches!(issuer.verify(&token), Err(Error::TokenExpired)));
    }

    #[test]
    fn test_token_still_valid_within_a_day() {
        let issuer = TokenIssuer::new(SECRET);
        let token = issuer
            .issue_at(42, Utc::now() - Duration::hours(23))
            .unwrap();

        assert_eq!(issuer.verify(&token).unwrap(), 42);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = TokenIssuer::new(b"other-secret").issue(42).unwrap();

        let result = TokenIssuer::new(SECRET).verify(&token);
        assert!(matches!(result, Err(Error::InvalidToken)));
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let claims = Claims {
            sub: "42".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let result = TokenIssuer::new(SECRET).verify(&token);
        assert!(matches!(result, Err(Error::InvalidToken)));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let issuer = TokenIssuer::new(SECRET);

        assert!(matches!(issuer.verify("not.a.token"), Err(Error::InvalidToken)));
        assert!(matches!(issuer.verify(""), Err(Error::InvalidToken)));
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let claims = Claims {
            sub: "alice".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(TOKEN_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let result = TokenIssuer::new(SECRET).verify(&token);
        assert!(matches!(result, Err(Error::InvalidToken)));
    }
}
