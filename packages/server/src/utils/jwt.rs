use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Role required for every admin endpoint.
pub const ADMIN_ROLE: &str = "admin";

/// JWT claims issued by the identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Account identifier
    pub role: String,
    pub exp: usize, // Expiration timestamp
}

/// Sign a token for `subject` valid for `days`. Used by operator tooling and tests.
pub fn sign(secret: &str, subject: &str, role: &str, days: i64) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(days))
        .context("token expiry out of range")?
        .timestamp();

    let claims = Claims {
        sub: subject.to_owned(),
        role: role.to_owned(),
        exp: usize::try_from(expiration).context("token expiry before the epoch")?,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a token signed with `secret`.
pub fn verify(secret: &str, token: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
