//! JWT token handling

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum JwtError {
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Malformed authorization header")]
    MalformedHeader,
    #[error("Token creation failed: {0}")]
    CreationError(String),
    #[error("Token validation failed: {0}")]
    ValidationError(String),
    #[error("Token expired")]
    TokenExpired,
}

/// Identity claims. Identity-provider style names are accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, alias = "cognito:username", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, alias = "custom:userRole", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

pub struct JwtService {
    secret: String,
    audience: Option<String>,
    token_expiry: i64,
}

impl JwtService {
    pub fn new(secret: String, audience: Option<String>, token_expiry: i64) -> Self {
        Self {
            secret,
            audience,
            token_expiry,
        }
    }

    /// Mints an HS256 token for `subject` carrying `role`.
    pub fn issue(&self, subject: &str, username: Option<&str>, role: &str) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            username: username.map(str::to_string),
            role: Some(role.to_string()),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.token_expiry)).timestamp(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| JwtError::CreationError(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        match &self.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            _ => JwtError::ValidationError(e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test-secret".to_string(), None, 3600)
    }

    #[test]
    fn test_issue_and_validate() {
        let jwt = service();
        let token = jwt.issue("user-1", Some("alice"), "SystemAdmin").unwrap();

        let claims = jwt.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.username.as_deref(), Some("alice"));
        assert_eq!(claims.role.as_deref(), Some("SystemAdmin"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service().issue("user-1", None, "SystemAdmin").unwrap();
        let other = JwtService::new("other-secret".to_string(), None, 3600);
        assert!(matches!(other.validate_token(&token), Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let jwt = JwtService::new("test-secret".to_string(), None, -3600);
        let token = jwt.issue("user-1", None, "SystemAdmin").unwrap();
        assert_eq!(jwt.validate_token(&token), Err(JwtError::TokenExpired));
    }

    #[test]
    fn test_audience_enforced() {
        let issuer = JwtService::new("test-secret".to_string(), Some("other".to_string()), 3600);
        let token = issuer.issue("user-1", None, "SystemAdmin").unwrap();

        let jwt = JwtService::new("test-secret".to_string(), Some("control-plane".to_string()), 3600);
        assert!(jwt.validate_token(&token).is_err());
    }

    #[test]
    fn test_provider_claim_names_accepted() {
        let claims: Claims = serde_json::from_value(serde_json::json!({
            "sub": "user-1",
            "cognito:username": "alice",
            "custom:userRole": "SystemAdmin",
            "iat": 0,
            "exp": 0
        }))
        .unwrap();
        assert_eq!(claims.username.as_deref(), Some("alice"));
        assert_eq!(claims.role.as_deref(), Some("SystemAdmin"));
    }
}
