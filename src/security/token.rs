//! Bearer token issuance and validation.
//!
//! Tokens are HMAC-signed JWTs carrying `sub` and `exp`. They prove only that
//! the holder called the issuance endpoint; there is no revocation, audience
//! or issuer check.

use axum::http::{header, HeaderMap};
use chrono::{DateTime, SecondsFormat, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Validity window of every issued token, in seconds.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    /// Expiry as unix seconds.
    pub exp: i64,
}

/// A freshly signed token.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    #[serde(serialize_with = "rfc3339")]
    pub expires_at: DateTime<Utc>,
}

fn rfc3339<S: serde::Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Secs, true))
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("subject must not be empty")]
    EmptySubject,

    #[error("missing or non-bearer Authorization header")]
    MissingBearer,

    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Signs and verifies tokens with the process-wide shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        // Only the HMAC family is accepted; anything else in the token
        // header fails with InvalidAlgorithm.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token for `subject`, valid for [`TOKEN_TTL_SECS`].
    pub fn issue(&self, subject: &str) -> Result<IssuedToken, TokenError> {
        let expires_at = Utc::now() + chrono::Duration::seconds(TOKEN_TTL_SECS);
        self.issue_until(subject, expires_at)
    }

    /// Issue a token expiring at `expires_at` (whole seconds).
    pub fn issue_until(
        &self,
        subject: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        if subject.is_empty() {
            return Err(TokenError::EmptySubject);
        }

        let claims = Claims {
            sub: subject.to_string(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;

        Ok(IssuedToken {
            token,
            expires_at,
        })
    }

    /// Verify signature, algorithm and expiry of a raw token.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        Ok(decode::<Claims>(token, &self.decoding, &self.validation)?.claims)
    }

    /// Verify the `Authorization: Bearer <token>` header of a request.
    pub fn verify_headers(&self, headers: &HeaderMap) -> Result<Claims, TokenError> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix(BEARER_PREFIX))
            .ok_or(TokenError::MissingBearer)?;
        self.verify(token)
    }

    /// Auth gate: true when the request carries a valid bearer token.
    pub fn validate(&self, headers: &HeaderMap) -> bool {
        match self.verify_headers(headers) {
            Ok(claims) => {
                tracing::debug!(sub = %claims.sub, "Bearer token accepted");
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "Bearer token rejected");
                false
            }
        }
    }
}
