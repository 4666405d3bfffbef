use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::models::auth::Identity;

/// JWT claims.
///
/// `sub` carries the identity as a JSON-encoded string rather than inline
/// fields; existing clients decode this nested format, so it is part of the
/// wire contract.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// Sign a session token for an identity.
///
/// The identity (id + role) is frozen into the token for its whole
/// lifetime; later role changes do not affect it.
pub fn sign(identity: &Identity, secret: &str, ttl_hours: i64) -> Result<String> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::hours(ttl_hours))
        .ok_or_else(|| anyhow::anyhow!("token expiry out of range"))?;

    let claims = Claims {
        sub: serde_json::to_string(identity)?,
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify a session token and decode the identity it carries.
///
/// Fails on a bad signature, expiry, or an undecodable payload; signature
/// comparison is left entirely to `jsonwebtoken`.
pub fn verify(token: &str, secret: &str) -> Result<Identity> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    let identity: Identity = serde_json::from_str(&token_data.claims.sub)?;
    Ok(identity)
}
