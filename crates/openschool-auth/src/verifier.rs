//! Bearer token verification.
//!
//! Two verifiers implement [`TokenVerifier`]:
//!
//! - [`JwksVerifier`]: RS256 tokens signed by the identity provider. The key
//!   set is fetched from the provider's JWKS endpoint and cached for the
//!   configured TTL. An unknown `kid` triggers a refetch, at most once per
//!   [`MIN_REFRESH_INTERVAL`], and concurrent requests share one fetch.
//! - [`SecretVerifier`]: HS256 tokens signed with a shared secret.
//!
//! Both check signature, expiry and, when configured, audience and issuer.
//! All token failures map to 401 with the codes in
//! [`openschool_core::codes`].

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use openschool_config::{AuthConfig, VerificationMode};
use openschool_core::{AppError, codes};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::claims::Claims;

#[async_trait]
pub trait TokenVerifier: Send + Sync + fmt::Debug {
    /// Verifies `token` (without the `Bearer ` prefix) and returns its claims.
    async fn verify(&self, token: &str) -> Result<Claims, AppError>;
}

/// Builds the verifier selected by the configuration.
///
/// # Errors
///
/// Fails when neither `JWT_SECRET` nor `AUTH0_DOMAIN` is configured.
pub fn verifier_from_config(config: &AuthConfig) -> anyhow::Result<Arc<dyn TokenVerifier>> {
    match config.verification_mode() {
        Some(VerificationMode::SharedSecret { secret }) => {
            warn!("Verifying bearer tokens with a shared secret (HS256); use JWKS in production");
            Ok(Arc::new(SecretVerifier::new(
                &secret,
                config.audience.as_deref(),
                config.issuer.as_deref(),
            )))
        }
        Some(VerificationMode::Jwks {
            jwks_url,
            cache_ttl,
        }) => {
            info!(jwks_url = %jwks_url, "Verifying bearer tokens against JWKS");
            Ok(Arc::new(JwksVerifier::new(
                jwks_url,
                cache_ttl,
                config.audience.as_deref(),
                config.issuer.as_deref(),
            )))
        }
        None => Err(anyhow!(
            "Either AUTH0_DOMAIN or JWT_SECRET must be set to verify bearer tokens"
        )),
    }
}

fn validation(algorithm: Algorithm, audience: Option<&str>, issuer: Option<&str>) -> Validation {
    let mut validation = Validation::new(algorithm);
    match audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }
    if let Some(issuer) = issuer {
        validation.set_issuer(&[issuer]);
    }
    validation
}

fn invalid_header(description: &str) -> AppError {
    AppError::unauthorized_token(codes::INVALID_HEADER, anyhow!("{description}"))
}

/// Maps a decoding failure onto the 401 taxonomy.
pub(crate) fn map_decode_error(err: jsonwebtoken::errors::Error) -> AppError {
    match err.kind() {
        ErrorKind::ExpiredSignature => {
            AppError::unauthorized_token(codes::TOKEN_EXPIRED, anyhow!("Token expired."))
        }
        ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer | ErrorKind::MissingRequiredClaim(_) => {
            AppError::unauthorized_token(
                codes::INVALID_CLAIMS,
                anyhow!("Incorrect claims. Please, check the audience and issuer."),
            )
        }
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => invalid_header("Unable to parse authentication token."),
        _ => {
            debug!(error = %err, "Token rejected");
            AppError::unauthorized_token(
                codes::INVALID_TOKEN,
                anyhow!("Unable to verify authentication token."),
            )
        }
    }
}

pub struct SecretVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SecretVerifier {
    pub fn new(secret: &str, audience: Option<&str>, issuer: Option<&str>) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: validation(Algorithm::HS256, audience, issuer),
        }
    }
}

impl fmt::Debug for SecretVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretVerifier")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenVerifier for SecretVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(map_decode_error)
    }
}

/// Minimum time between two JWKS fetches. Tokens with an unknown `kid`
/// inside this window are rejected without contacting the provider.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Default)]
struct KeyCache {
    keys: Option<JwkSet>,
    fetched_at: Option<Instant>,
    /// Last fetch attempt, successful or not.
    last_refresh: Option<Instant>,
}

#[derive(Debug)]
pub struct JwksVerifier {
    jwks_url: String,
    client: reqwest::Client,
    cache_ttl: Duration,
    min_refresh_interval: Duration,
    validation: Validation,
    cache: RwLock<KeyCache>,
    /// `false` for a fixed key set that is never fetched.
    refresh: bool,
}

fn key_for(keys: Option<&JwkSet>, kid: &str) -> Result<DecodingKey, AppError> {
    let jwk = keys.and_then(|keys| keys.find(kid)).ok_or_else(|| {
        warn!(kid = %kid, "Token signed with unknown key id");
        invalid_header("Unable to find appropriate key.")
    })?;
    DecodingKey::from_jwk(jwk).map_err(|_| invalid_header("Unable to find appropriate key."))
}

impl JwksVerifier {
    pub fn new(
        jwks_url: impl Into<String>,
        cache_ttl: Duration,
        audience: Option<&str>,
        issuer: Option<&str>,
    ) -> Self {
        Self {
            jwks_url: jwks_url.into(),
            client: reqwest::Client::new(),
            cache_ttl,
            min_refresh_interval: MIN_REFRESH_INTERVAL,
            validation: validation(Algorithm::RS256, audience, issuer),
            cache: RwLock::new(KeyCache::default()),
            refresh: true,
        }
    }

    /// A verifier over a fixed key set; nothing is fetched.
    pub fn with_key_set(keys: JwkSet, audience: Option<&str>, issuer: Option<&str>) -> Self {
        let now = Instant::now();
        Self {
            jwks_url: String::new(),
            client: reqwest::Client::new(),
            cache_ttl: Duration::MAX,
            min_refresh_interval: Duration::MAX,
            validation: validation(Algorithm::RS256, audience, issuer),
            cache: RwLock::new(KeyCache {
                keys: Some(keys),
                fetched_at: Some(now),
                last_refresh: Some(now),
            }),
            refresh: false,
        }
    }

    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    async fn fetch_keys(&self) -> Result<JwkSet, AppError> {
        debug!(jwks_url = %self.jwks_url, "Fetching JWKS");

        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                error!(jwks_url = %self.jwks_url, error = %e, "Failed to fetch JWKS");
                AppError::internal(e)
            })?;

        response.json::<JwkSet>().await.map_err(|e| {
            error!(jwks_url = %self.jwks_url, error = %e, "Failed to parse JWKS");
            AppError::internal(e)
        })
    }

    /// Answers from the cache, or `None` when a fetch is due.
    ///
    /// A stale key is still served while the last fetch attempt is inside
    /// the refresh window.
    fn cached_key(&self, cache: &KeyCache, kid: &str) -> Option<Result<DecodingKey, AppError>> {
        let known = cache.keys.as_ref().is_some_and(|keys| keys.find(kid).is_some());
        let fresh = !self.refresh
            || cache
                .fetched_at
                .is_some_and(|at| at.elapsed() < self.cache_ttl);
        let cooling_down = !self.refresh
            || cache
                .last_refresh
                .is_some_and(|at| at.elapsed() < self.min_refresh_interval);

        if (known && fresh) || cooling_down {
            Some(key_for(cache.keys.as_ref(), kid))
        } else {
            None
        }
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AppError> {
        let cached = {
            let cache = self.cache.read().await;
            self.cached_key(&cache, kid)
        };
        if let Some(key) = cached {
            return key;
        }

        // Holding the write lock across the fetch makes concurrent requests
        // wait for this one instead of fetching themselves.
        let mut cache = self.cache.write().await;
        if let Some(key) = self.cached_key(&cache, kid) {
            return key;
        }

        cache.last_refresh = Some(Instant::now());
        match self.fetch_keys().await {
            Ok(keys) => {
                cache.keys = Some(keys);
                cache.fetched_at = Some(Instant::now());
            }
            Err(e) if cache.keys.is_none() => return Err(e),
            Err(_) => warn!("Serving previously fetched JWKS after a failed refresh"),
        }

        key_for(cache.keys.as_ref(), kid)
    }
}

#[async_trait]
impl TokenVerifier for JwksVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let header = decode_header(token).map_err(map_decode_error)?;

        if header.alg != Algorithm::RS256 {
            return Err(invalid_header("Unsupported token algorithm."));
        }

        let kid = header
            .kid
            .ok_or_else(|| invalid_header("Authorization malformed."))?;
        let key = self.decoding_key(&kid).await?;

        decode::<Claims>(token, &key, &self.validation)
            .map(|data| data.claims)
            .map_err(map_decode_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::Audience;
    use axum::extract::State;
    use axum::http::header::CONTENT_TYPE;
    use axum::{Router, routing::get};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SECRET: &str = "test_secret_key_for_testing_purposes";
    const AUDIENCE: &str = "openschool";
    const ISSUER: &str = "https://openschool.test/";

    fn claims(exp_offset: i64, aud: &str, iss: &str) -> Claims {
        let now = chrono::Utc::now().timestamp();
        Claims {
            sub: "auth0|tester".to_string(),
            iss: Some(iss.to_string()),
            aud: Some(Audience::Single(aud.to_string())),
            exp: (now + exp_offset) as usize,
            iat: now as usize,
            scope: "get:students".to_string(),
        }
    }

    fn sign(claims: &Claims, header: &Header, secret: &str) -> String {
        encode(header, claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn secret_verifier() -> SecretVerifier {
        SecretVerifier::new(SECRET, Some(AUDIENCE), Some(ISSUER))
    }

    #[tokio::test]
    async fn test_secret_verifier_accepts_valid_token() {
        let token = sign(&claims(3600, AUDIENCE, ISSUER), &Header::default(), SECRET);
        let verified = secret_verifier().verify(&token).await.unwrap();

        assert_eq!(verified.sub, "auth0|tester");
        assert!(verified.has_scope("get:students"));
    }

    #[tokio::test]
    async fn test_wrong_secret_is_invalid_token() {
        let token = sign(&claims(3600, AUDIENCE, ISSUER), &Header::default(), "other");
        let err = secret_verifier().verify(&token).await.unwrap_err();

        assert_eq!(err.status.as_u16(), 401);
        assert_eq!(err.code, codes::INVALID_TOKEN);
    }

    #[tokio::test]
    async fn test_expired_token() {
        // Beyond the default 60s leeway.
        let token = sign(&claims(-3600, AUDIENCE, ISSUER), &Header::default(), SECRET);
        let err = secret_verifier().verify(&token).await.unwrap_err();

        assert_eq!(err.code, codes::TOKEN_EXPIRED);
    }

    #[tokio::test]
    async fn test_wrong_audience_and_issuer() {
        let verifier = secret_verifier();

        let token = sign(&claims(3600, "someone-else", ISSUER), &Header::default(), SECRET);
        assert_eq!(
            verifier.verify(&token).await.unwrap_err().code,
            codes::INVALID_CLAIMS
        );

        let token = sign(&claims(3600, AUDIENCE, "https://evil.test/"), &Header::default(), SECRET);
        assert_eq!(
            verifier.verify(&token).await.unwrap_err().code,
            codes::INVALID_CLAIMS
        );
    }

    #[tokio::test]
    async fn test_garbage_token_is_invalid_header() {
        let err = secret_verifier().verify("not-a-jwt").await.unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
        assert_eq!(err.code, codes::INVALID_HEADER);
    }

    #[tokio::test]
    async fn test_jwks_rejects_non_rs256() {
        let verifier = JwksVerifier::with_key_set(JwkSet { keys: vec![] }, Some(AUDIENCE), None);
        let token = sign(&claims(3600, AUDIENCE, ISSUER), &Header::default(), SECRET);

        let err = verifier.verify(&token).await.unwrap_err();
        assert_eq!(err.code, codes::INVALID_HEADER);
    }

    // RS256 headers over an unsigned body; verification stops at the header.
    const RS256_NO_KID: &str =
        "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiJ4IiwiZXhwIjo5OTk5OTk5OTk5fQ.c2ln";
    const RS256_UNKNOWN_KID: &str = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCIsImtpZCI6InJvdGF0ZWQtYXdheSJ9.eyJzdWIiOiJ4IiwiZXhwIjo5OTk5OTk5OTk5fQ.c2ln";

    #[tokio::test]
    async fn test_jwks_requires_kid() {
        let verifier = JwksVerifier::with_key_set(JwkSet { keys: vec![] }, Some(AUDIENCE), None);

        let err = verifier.verify(RS256_NO_KID).await.unwrap_err();
        assert_eq!(err.code, codes::INVALID_HEADER);
    }

    #[tokio::test]
    async fn test_jwks_unknown_kid_with_fixed_key_set() {
        let verifier = JwksVerifier::with_key_set(JwkSet { keys: vec![] }, Some(AUDIENCE), None);

        let err = verifier.verify(RS256_UNKNOWN_KID).await.unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
        assert_eq!(err.code, codes::INVALID_HEADER);
    }

    const TEST_KID: &str = "openschool-test-key";
    const RSA_PRIVATE_PEM: &str = include_str!("../testdata/rs256_private.pem");
    const TEST_JWKS: &str = include_str!("../testdata/jwks.json");

    fn test_key_set() -> JwkSet {
        serde_json::from_str(TEST_JWKS).unwrap()
    }

    fn sign_rs256(claims: &Claims, kid: &str) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(kid.to_string());
        let key = EncodingKey::from_rsa_pem(RSA_PRIVATE_PEM.as_bytes()).unwrap();
        encode(&header, claims, &key).unwrap()
    }

    /// Serves `body` as a JWKS document on a random local port and counts
    /// the requests it receives.
    async fn serve_jwks(body: &'static str) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route(
                "/.well-known/jwks.json",
                get(move |State(hits): State<Arc<AtomicUsize>>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    ([(CONTENT_TYPE, "application/json")], body)
                }),
            )
            .with_state(hits.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/.well-known/jwks.json"), hits)
    }

    #[tokio::test]
    async fn test_jwks_accepts_valid_rs256_token() {
        let verifier = JwksVerifier::with_key_set(test_key_set(), Some(AUDIENCE), Some(ISSUER));
        let token = sign_rs256(&claims(3600, AUDIENCE, ISSUER), TEST_KID);

        let verified = verifier.verify(&token).await.unwrap();
        assert_eq!(verified.sub, "auth0|tester");
        assert!(verified.has_scope("get:students"));
    }

    #[tokio::test]
    async fn test_jwks_checks_claims_of_rs256_token() {
        let verifier = JwksVerifier::with_key_set(test_key_set(), Some(AUDIENCE), Some(ISSUER));

        let token = sign_rs256(&claims(3600, "someone-else", ISSUER), TEST_KID);
        assert_eq!(
            verifier.verify(&token).await.unwrap_err().code,
            codes::INVALID_CLAIMS
        );

        let token = sign_rs256(&claims(-3600, AUDIENCE, ISSUER), TEST_KID);
        assert_eq!(
            verifier.verify(&token).await.unwrap_err().code,
            codes::TOKEN_EXPIRED
        );
    }

    #[tokio::test]
    async fn test_jwks_fetches_keys_on_first_use() {
        let (url, hits) = serve_jwks(TEST_JWKS).await;
        let verifier =
            JwksVerifier::new(url, Duration::from_secs(600), Some(AUDIENCE), Some(ISSUER));
        let token = sign_rs256(&claims(3600, AUDIENCE, ISSUER), TEST_KID);

        for _ in 0..5 {
            verifier.verify(&token).await.unwrap();
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_jwks_unknown_kid_refetches_once_per_window() {
        let (url, hits) = serve_jwks(r#"{"keys":[]}"#).await;
        let verifier =
            JwksVerifier::new(url, Duration::from_secs(600), Some(AUDIENCE), None);

        for _ in 0..50 {
            let err = verifier.verify(RS256_UNKNOWN_KID).await.unwrap_err();
            assert_eq!(err.status.as_u16(), 401);
            assert_eq!(err.code, codes::INVALID_HEADER);
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_jwks_stale_cache_is_refetched() {
        let (url, hits) = serve_jwks(TEST_JWKS).await;
        let verifier = JwksVerifier::new(url, Duration::ZERO, Some(AUDIENCE), Some(ISSUER))
            .with_min_refresh_interval(Duration::ZERO);
        let token = sign_rs256(&claims(3600, AUDIENCE, ISSUER), TEST_KID);

        verifier.verify(&token).await.unwrap();
        verifier.verify(&token).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_jwks_concurrent_requests_share_one_fetch() {
        let (url, hits) = serve_jwks(TEST_JWKS).await;
        let verifier = Arc::new(JwksVerifier::new(
            url,
            Duration::from_secs(600),
            Some(AUDIENCE),
            Some(ISSUER),
        ));
        let token = sign_rs256(&claims(3600, AUDIENCE, ISSUER), TEST_KID);

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..20 {
            let verifier = verifier.clone();
            let token = token.clone();
            tasks.spawn(async move { verifier.verify(&token).await });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap().unwrap();
        }

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_jwks_unreachable_provider_is_internal_error() {
        // Nothing listens on the discard port.
        let verifier = JwksVerifier::new(
            "http://127.0.0.1:9/.well-known/jwks.json",
            Duration::from_secs(600),
            Some(AUDIENCE),
            None,
        );
        let token = sign_rs256(&claims(3600, AUDIENCE, ISSUER), TEST_KID);

        let err = verifier.verify(&token).await.unwrap_err();
        assert_eq!(err.status.as_u16(), 500);
    }

    #[test]
    fn test_verifier_from_config_requires_mode() {
        let config = AuthConfig {
            domain: None,
            audience: None,
            issuer: None,
            jwks_cache_ttl: 600,
            secret: None,
        };
        assert!(verifier_from_config(&config).is_err());
    }
}
