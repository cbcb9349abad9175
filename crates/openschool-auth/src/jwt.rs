//! HS256 token issuing.
//!
//! Production tokens come from the identity provider. This is for running the
//! server in shared-secret mode locally (`openschool-cli issue-token`) and for
//! the test suites.

use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use openschool_config::AuthConfig;
use openschool_core::AppError;

use crate::claims::{Audience, Claims};

/// Issues a token for `subject` granting `scopes`, valid for `ttl_secs`.
///
/// Audience and issuer are taken from `config` so the token passes the
/// server's own verification.
///
/// # Errors
///
/// Fails if `JWT_SECRET` is not configured or encoding fails.
pub fn issue_token(
    subject: &str,
    scopes: &[String],
    ttl_secs: i64,
    config: &AuthConfig,
) -> Result<String, AppError> {
    let secret = config
        .secret
        .as_deref()
        .ok_or_else(|| AppError::internal(anyhow!("JWT_SECRET must be set to issue tokens")))?;

    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: subject.to_string(),
        iss: config.issuer.clone(),
        aud: config.audience.clone().map(Audience::Single),
        exp: (now + ttl_secs).max(0) as usize,
        iat: now as usize,
        scope: scopes.join(" "),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow!("Failed to create token: {e}")))
}
