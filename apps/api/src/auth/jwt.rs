use anyhow::Result;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Audience the identity provider's backend JWT template stamps on every token.
pub const AUDIENCE: &str = "authenticated";

/// Claims issued by the identity provider's JWT template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Identity provider user id
    pub exp: usize,
    #[serde(default)]
    pub role: Option<String>,
    /// Session id, present on session-bound tokens.
    #[serde(default)]
    pub sid: Option<String>,
}

/// Verify and decode an HS256 token signed with the shared template secret.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[AUDIENCE]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}
