pub mod resolver;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::str::FromStr;
use thiserror::Error;

use crate::config::SecurityConfig;

pub use resolver::{resolver_for, AuthResolver, BearerResolver, HeaderResolver};

/// How requests identify their admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// `Authorization: Bearer <jwt>`
    Bearer,
    /// `X-Admin-Id: <id>`
    Header,
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bearer" | "jwt" => Ok(AuthMode::Bearer),
            "header" => Ok(AuthMode::Header),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("token expired")]
    Expired,

    #[error("token signature mismatch")]
    InvalidSignature,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin id, as a decimal string
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(admin_id: i64, email: &str, ttl_minutes: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::minutes(ttl_minutes as i64)).timestamp();

        Self {
            sub: admin_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp,
        }
    }

    pub fn admin_id(&self) -> Result<i64, JwtError> {
        self.sub
            .parse()
            .map_err(|_| JwtError::Invalid(format!("subject '{}' is not an admin id", self.sub)))
    }
}

/// A freshly signed access token
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
    /// Lifetime in seconds
    pub expires_in: u64,
}

pub fn issue_token(
    security: &SecurityConfig,
    admin_id: i64,
    email: &str,
) -> Result<IssuedToken, JwtError> {
    if security.auth_secret.is_empty() {
        return Err(JwtError::TokenGeneration("signing secret is empty".to_string()));
    }

    let claims = Claims::new(admin_id, email, security.access_token_exp_minutes);
    let encoding_key = EncodingKey::from_secret(security.auth_secret.as_bytes());

    let access_token = encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))?;

    Ok(IssuedToken {
        access_token,
        token_type: "bearer",
        expires_in: security.access_token_exp_minutes * 60,
    })
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, JwtError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            _ => JwtError::Invalid(e.to_string()),
        })
}

/// Hex-encoded SHA-256 of the password
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    hash_password(password) == password_hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn password_hash_is_sha256_hex() {
        assert_eq!(
            hash_password("secret"),
            "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
        );
        assert!(verify_password("secret", &hash_password("secret")));
        assert!(!verify_password("Secret", &hash_password("secret")));
    }

    #[test]
    fn issued_token_decodes_to_admin() {
        let config = AppConfig::development();
        let issued = issue_token(&config.security, 42, "boss@example.com").unwrap();
        assert_eq!(issued.token_type, "bearer");
        assert_eq!(issued.expires_in, config.security.access_token_exp_minutes * 60);

        let claims = decode_token(&config.security.auth_secret, &issued.access_token).unwrap();
        assert_eq!(claims.admin_id().unwrap(), 42);
        assert_eq!(claims.email, "boss@example.com");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = AppConfig::development();
        let issued = issue_token(&config.security, 1, "a@example.com").unwrap();
        let err = decode_token("another-secret", &issued.access_token).unwrap_err();
        assert!(matches!(err, JwtError::InvalidSignature));
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = AppConfig::development();
        let mut claims = Claims::new(1, "a@example.com", 1);
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.security.auth_secret.as_bytes()),
        )
        .unwrap();

        let err = decode_token(&config.security.auth_secret, &token).unwrap_err();
        assert!(matches!(err, JwtError::Expired));
    }

    #[test]
    fn auth_mode_parses_case_insensitively() {
        assert_eq!("Bearer".parse::<AuthMode>().unwrap(), AuthMode::Bearer);
        assert_eq!("header".parse::<AuthMode>().unwrap(), AuthMode::Header);
        assert!("cookie".parse::<AuthMode>().is_err());
    }
}
