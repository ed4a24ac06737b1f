//! Access tokens and refresh tokens.
//!
//! An access token is an HS256 JWT whose `tv` claim must equal the user's
//! current `token_version`. A refresh token is 64 random alphanumeric
//! characters; the server keeps only its SHA-256 digest.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::distr::{Alphanumeric, SampleString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sitebook_core::roles::Role;
use sitebook_core::types::DbId;
use uuid::Uuid;

const REFRESH_TOKEN_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: DbId,
    /// Role at issue time. Authorization reads the role from the user row.
    pub role: Role,
    pub tv: i32,
    pub iat: i64,
    pub exp: i64,
    pub jti: Uuid,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl JwtConfig {
    /// `JWT_SECRET` is required. `JWT_ACCESS_EXPIRY_MINS` defaults to 60 and
    /// `JWT_REFRESH_EXPIRY_DAYS` to 7.
    ///
    /// # Panics
    ///
    /// Panics when the secret is missing or empty, or a lifetime is not a
    /// positive integer.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.trim().is_empty(), "JWT_SECRET must be set and non-empty");

        Self {
            secret,
            access_ttl: Duration::minutes(positive_env("JWT_ACCESS_EXPIRY_MINS", 60)),
            refresh_ttl: Duration::days(positive_env("JWT_REFRESH_EXPIRY_DAYS", 7)),
        }
    }

    /// Sign an access token for `user_id` at `token_version`.
    pub fn issue_access_token(
        &self,
        user_id: DbId,
        role: Role,
        token_version: i32,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let issued_at = Utc::now();
        let claims = AccessClaims {
            sub: user_id,
            role,
            tv: token_version,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.access_ttl).timestamp(),
            jti: Uuid::now_v7(),
        };
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Check signature and expiry. The `tv` claim is compared against the
    /// database by the request extractor.
    pub fn decode_access_token(
        &self,
        token: &str,
    ) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        jsonwebtoken::decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
    }

    /// Value of `expires_in` in auth responses.
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl.num_seconds()
    }
}

fn positive_env(name: &str, default: i64) -> i64 {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse::<i64>() {
            Ok(v) if v > 0 => v,
            _ => panic!("{name} must be a positive integer, got '{raw}'"),
        },
        Err(_) => default,
    }
}

/// A freshly generated refresh token. Only `hash` is persisted.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub plaintext: String,
    pub hash: String,
}

impl RefreshToken {
    pub fn generate() -> Self {
        let plaintext = Alphanumeric.sample_string(&mut rand::rng(), REFRESH_TOKEN_LENGTH);
        let hash = hash_refresh_token(&plaintext);
        Self { plaintext, hash }
    }
}

/// Lowercase hex SHA-256 of a refresh token.
pub fn hash_refresh_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
