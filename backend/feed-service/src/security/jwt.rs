//! HS256 access-token handling
//!
//! Tokens are issued by the identity service with a shared secret and carry
//! the user id in the `user_id` claim.

use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 60;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID as a UUID string
    pub user_id: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// "access" for tokens accepted here
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Signing and verification keys derived from one shared secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Issue an access token for `user_id`.
    pub fn generate_access_token(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            user_id: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(ACCESS_TOKEN_EXPIRY_MINUTES)).timestamp(),
            token_type: Some("access".to_string()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| anyhow!("Failed to encode access token: {}", e))
    }

    /// Verify signature and expiry, returning the user id.
    pub fn validate_token(&self, token: &str) -> Result<Uuid> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| anyhow!("Invalid token: {}", e))?;

        if let Some(kind) = data.claims.token_type.as_deref() {
            if kind != "access" {
                return Err(anyhow!("Unexpected token type: {}", kind));
            }
        }

        Uuid::parse_str(&data.claims.user_id).map_err(|_| anyhow!("Invalid user ID in token"))
    }
}
