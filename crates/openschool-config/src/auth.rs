//! Bearer token verification settings.
//!
//! Tokens are issued by an external OAuth/OIDC identity provider. In
//! production they are RS256 JWTs verified against the provider's JWKS; for
//! local development a shared HS256 secret can be configured instead.
//!
//! # Environment Variables
//!
//! - `AUTH0_DOMAIN`: identity provider domain, e.g. `openschool.eu.auth0.com`
//! - `AUTH0_AUDIENCE`: required `aud` claim
//! - `AUTH0_ISSUER`: required `iss` claim (default: `https://{AUTH0_DOMAIN}/`)
//! - `JWKS_CACHE_TTL`: seconds a fetched key set stays valid (default: 600)
//! - `JWT_SECRET`: when set, verify HS256 tokens with this secret instead of JWKS

use std::time::Duration;

use crate::env_lookup;

const DEFAULT_JWKS_CACHE_TTL: u64 = 600;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthConfig {
    pub domain: Option<String>,
    pub audience: Option<String>,
    pub issuer: Option<String>,
    pub jwks_cache_ttl: u64,
    pub secret: Option<String>,
}

/// How bearer tokens are verified, derived from [`AuthConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerificationMode {
    /// RS256 against the key set published at `jwks_url`.
    Jwks { jwks_url: String, cache_ttl: Duration },
    /// HS256 with a shared secret.
    SharedSecret { secret: String },
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let domain = lookup("AUTH0_DOMAIN").map(|d| normalize_domain(&d));
        let issuer = lookup("AUTH0_ISSUER").or_else(|| {
            domain
                .as_ref()
                .map(|domain| format!("https://{domain}/"))
        });

        Self {
            domain,
            audience: lookup("AUTH0_AUDIENCE"),
            issuer,
            jwks_cache_ttl: lookup("JWKS_CACHE_TTL")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_JWKS_CACHE_TTL),
            secret: lookup("JWT_SECRET"),
        }
    }

    /// Shared-secret mode wins when `JWT_SECRET` is set. Returns `None` when
    /// neither a secret nor a domain is configured.
    pub fn verification_mode(&self) -> Option<VerificationMode> {
        if let Some(secret) = &self.secret {
            return Some(VerificationMode::SharedSecret {
                secret: secret.clone(),
            });
        }

        self.jwks_url().map(|jwks_url| VerificationMode::Jwks {
            jwks_url,
            cache_ttl: Duration::from_secs(self.jwks_cache_ttl),
        })
    }

    pub fn jwks_url(&self) -> Option<String> {
        self.domain
            .as_ref()
            .map(|domain| format!("https://{domain}/.well-known/jwks.json"))
    }
}

// Accept both `tenant.auth0.com` and `https://tenant.auth0.com/`.
fn normalize_domain(raw: &str) -> String {
    raw.trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_string()
}
