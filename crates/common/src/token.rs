//! Bearer token issuance and verification.
//!
//! Tokens are HS256-signed JWTs carrying the user id (`sub`), email, role,
//! and a random `jti`, with a fixed expiry (24 hours by default). There is
//! no refresh flow and no revocation list; logout is purely client-side
//! token deletion.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult, IdGenerator, config::AuthConfig};

/// Claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: String,
    /// Email of the user.
    pub email: String,
    /// Role claim ("Teacher", "Student" or "Admin").
    pub role: String,
    /// Random token id.
    pub jti: String,
    /// Expiry as a unix timestamp.
    pub exp: i64,
    /// Issued-at as a unix timestamp.
    pub iat: i64,
}

/// Issues and verifies bearer tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
    id_gen: IdGenerator,
}

impl TokenIssuer {
    /// Create a token issuer from the auth configuration.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            expiry_hours: config.token_expiry_hours,
            id_gen: IdGenerator::new(),
        }
    }

    /// Issue a token for the given user.
    pub fn issue(&self, user_id: &str, email: &str, role: &str) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            jti: self.id_gen.generate_jti(),
            exp: (now + Duration::hours(self.expiry_hours)).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Verify a token and return its claims.
    ///
    /// Expired or tampered tokens are rejected as [`AppError::Unauthorized`].
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }
}
