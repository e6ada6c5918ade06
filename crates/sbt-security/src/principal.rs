//! The authenticated caller

use serde::Serialize;

use crate::jwt::{Claims, JwtError};

/// Caller identity taken from a validated token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Principal {
    pub subject: String,
    pub username: Option<String>,
    pub role: Option<String>,
}

impl Principal {
    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, JwtError> {
    let header = header.ok_or(JwtError::MissingToken)?;
    let (scheme, token) = header.trim().split_once(' ').ok_or(JwtError::MalformedHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(JwtError::MalformedHeader);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(JwtError::MalformedHeader);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(Some("Bearer abc.def")), Ok("abc.def"));
        assert_eq!(bearer_token(Some("bearer abc")), Ok("abc"));
        assert_eq!(bearer_token(None), Err(JwtError::MissingToken));
        assert_eq!(bearer_token(Some("Basic abc")), Err(JwtError::MalformedHeader));
        assert_eq!(bearer_token(Some("Bearer")), Err(JwtError::MalformedHeader));
        assert_eq!(bearer_token(Some("Bearer   ")), Err(JwtError::MalformedHeader));
    }

    #[test]
    fn test_has_role() {
        let principal = Principal {
            subject: "u1".to_string(),
            username: None,
            role: Some("SystemAdmin".to_string()),
        };
        assert!(principal.has_role("SystemAdmin"));
        assert!(!principal.has_role("TenantAdmin"));
    }
}
