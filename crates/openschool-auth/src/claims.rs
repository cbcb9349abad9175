//! Verified token claims.
//!
//! Access tokens issued by the identity provider carry the granted scopes as
//! one space-separated `scope` string, e.g. `"get:students-1 post:school"`.

use serde::{Deserialize, Serialize};

/// The `aud` claim, which identity providers emit either as a string or as an
/// array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

/// Claims of a verified access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Caller identity (subject claim)
    pub sub: String,
    /// Token issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Intended audience(s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    #[serde(default)]
    pub iat: usize,
    /// Space-separated granted scopes
    #[serde(default)]
    pub scope: String,
}

impl Claims {
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scope.split_whitespace()
    }

    /// Exact match against one scope token; no prefix or wildcard matching.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes().any(|granted| granted == scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with_scope(scope: &str) -> Claims {
        Claims {
            sub: "auth0|principal1".to_string(),
            iss: None,
            aud: None,
            exp: 9999999999,
            iat: 1234567890,
            scope: scope.to_string(),
        }
    }

    #[test]
    fn test_has_scope_exact() {
        let claims = claims_with_scope("email get:students-1");

        assert!(claims.has_scope("get:students-1"));
        assert!(claims.has_scope("email"));
        assert!(!claims.has_scope("get:students"));
        assert!(!claims.has_scope("get:students-10"));
    }

    #[test]
    fn test_scope_prefix_does_not_match() {
        let claims = claims_with_scope("get:students-12");
        assert!(!claims.has_scope("get:students-1"));
    }

    #[test]
    fn test_empty_scope() {
        let claims = claims_with_scope("");
        assert_eq!(claims.scopes().count(), 0);
        assert!(!claims.has_scope(""));
    }

    #[test]
    fn test_deserialize_auth0_token_with_audience_array() {
        let json = r#"{
            "iss": "https://openschool.eu.auth0.com/",
            "sub": "auth0|superintendent",
            "aud": ["openschool", "https://openschool.eu.auth0.com/userinfo"],
            "iat": 1600000000,
            "exp": 9999999999,
            "azp": "client-id",
            "scope": "openid email get:students post:school modify:school"
        }"#;
        let claims: Claims = serde_json::from_str(json).unwrap();

        assert!(matches!(claims.aud, Some(Audience::Multiple(ref a)) if a.len() == 2));
        assert!(claims.has_scope("modify:school"));
        assert_eq!(claims.scopes().count(), 5);
    }

    #[test]
    fn test_deserialize_without_scope() {
        let json = r#"{"sub":"auth0|public","aud":"openschool","exp":9999999999}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();

        assert_eq!(claims.aud, Some(Audience::Single("openschool".to_string())));
        assert!(claims.scope.is_empty());
        assert_eq!(claims.iat, 0);
    }
}
