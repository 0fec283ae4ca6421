use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the cookie carrying the session token
pub const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Owner email: the source of truth for resource ownership
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(email: String, expiry_hours: i64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours)).timestamp();

        Self {
            email,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token generation error: {0}")]
    Generation(String),

    #[error("JWT secret not configured")]
    MissingSecret,
}

/// Sign claims into a session token. The secret is an explicit dependency,
/// never module-level state.
pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| TokenError::Generation(e.to_string()))
}

/// Verify a session token's signature and expiry and return its claims
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, String> {
    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Invalid token: {}", e))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn token_round_trips_email_claim() {
        let claims = Claims::new("a@x.com".to_string(), 6);
        let token = generate_jwt(&claims, SECRET).unwrap();

        let decoded = verify_jwt(&token, SECRET).unwrap();
        assert_eq!(decoded.email, "a@x.com");
        assert_eq!(decoded.exp, claims.exp);
    }

    #[test]
    fn expiry_is_six_hours_out() {
        let claims = Claims::new("a@x.com".to_string(), 6);
        let lifetime = claims.exp - claims.iat;
        assert_eq!(lifetime, 6 * 3600);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let claims = Claims::new("a@x.com".to_string(), 6);
        let token = generate_jwt(&claims, SECRET).unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(verify_jwt(&tampered, SECRET).is_err());
        assert!(verify_jwt(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_claims_fail_verification() {
        // exp in the past, beyond the default leeway
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            email: "a@x.com".to_string(),
            iat: now - 7 * 3600,
            exp: now - 3600,
        };
        let token = generate_jwt(&claims, SECRET).unwrap();
        assert!(verify_jwt(&token, SECRET).is_err());
    }

    #[test]
    fn empty_secret_is_an_error() {
        let claims = Claims::new("a@x.com".to_string(), 6);
        assert!(matches!(
            generate_jwt(&claims, ""),
            Err(TokenError::MissingSecret)
        ));
    }
}
