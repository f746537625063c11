//! Bearer token authentication against an OpenID Connect authority
//!
//! Signing keys come from the authority's JWKS, located through its discovery
//! document. Keys are cached process-wide and refetched when a token names a
//! key id the cache does not know, at most once per `key_refresh_cooldown`.

use super::error::Problem;
use crate::config::AuthConfig;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{jwk::Jwk, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Claims the service reads from an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    pub iss: String,
    pub exp: u64,
    #[serde(default)]
    pub client_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid authorization format. Expected 'Bearer <token>'")]
    MalformedHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("No signing key matches key id '{0}'")]
    UnknownKey(String),

    #[error("Authority metadata unavailable: {0}")]
    Metadata(String),

    #[error("Authority '{0}' must use https")]
    InsecureAuthority(String),
}

/// Verifies a raw bearer token and returns its claims
#[async_trait::async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<Claims, AuthError>;
}

#[derive(Debug, Deserialize)]
struct DiscoveryDocument {
    issuer: String,
    jwks_uri: String,
}

struct SigningKeys {
    issuer: String,
    keys: JwkSet,
}

/// Validator backed by the authority's discovery metadata and JWKS
pub struct OidcTokenValidator {
    http: reqwest::Client,
    discovery_url: Url,
    audience: String,
    cooldown: Duration,
    cache: RwLock<Option<SigningKeys>>,
    /// Start of the last refresh; the lock also keeps refreshes single-flight
    last_refresh: tokio::sync::Mutex<Option<Instant>>,
}

impl OidcTokenValidator {
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let mut authority = Url::parse(&config.authority)
            .map_err(|e| AuthError::Metadata(format!("invalid authority URL: {e}")))?;

        if config.require_https_metadata && authority.scheme() != "https" {
            return Err(AuthError::InsecureAuthority(config.authority.clone()));
        }

        // `join` replaces the last path segment unless the base ends with '/'
        if !authority.path().ends_with('/') {
            let path = format!("{}/", authority.path());
            authority.set_path(&path);
        }
        let discovery_url = authority
            .join(".well-known/openid-configuration")
            .map_err(|e| AuthError::Metadata(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(config.metadata_timeout)
            .build()
            .map_err(|e| AuthError::Metadata(e.to_string()))?;

        Ok(Self {
            http,
            discovery_url,
            audience: config.audience.clone(),
            cooldown: config.key_refresh_cooldown,
            cache: RwLock::new(None),
            last_refresh: tokio::sync::Mutex::new(None),
        })
    }

    pub fn discovery_url(&self) -> &Url {
        &self.discovery_url
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, AuthError> {
        self.http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AuthError::Metadata(e.to_string()))?
            .json::<T>()
            .await
            .map_err(|e| AuthError::Metadata(e.to_string()))
    }

    async fn refresh(&self) -> Result<(), AuthError> {
        let discovery: DiscoveryDocument = self.fetch(self.discovery_url.as_str()).await?;
        let keys: JwkSet = self.fetch(&discovery.jwks_uri).await?;

        tracing::info!(
            issuer = %discovery.issuer,
            keys = keys.keys.len(),
            "Loaded signing keys from authority"
        );

        *self.cache.write() = Some(SigningKeys {
            issuer: discovery.issuer,
            keys,
        });
        Ok(())
    }

    /// Refetch keys unless a refresh already started within the cooldown.
    /// Callers queue on the lock, so a burst of unknown key ids costs one fetch.
    async fn refresh_throttled(&self) -> Result<(), AuthError> {
        let mut last = self.last_refresh.lock().await;
        if let Some(at) = *last {
            if at.elapsed() < self.cooldown {
                tracing::debug!("Signing keys refreshed recently, not refetching");
                return Ok(());
            }
        }
        *last = Some(Instant::now());
        self.refresh().await
    }

    fn missing_key(&self, kid: Option<&str>) -> AuthError {
        if self.cache.read().is_none() {
            return AuthError::Metadata("signing keys not loaded".to_string());
        }
        AuthError::UnknownKey(kid.unwrap_or_default().to_string())
    }

    /// Cached key for `kid` (first key when the token names none) plus the issuer
    fn lookup(&self, kid: Option<&str>) -> Option<(Jwk, String)> {
        let cache = self.cache.read();
        let signing = cache.as_ref()?;
        let jwk = match kid {
            Some(kid) => signing.keys.find(kid),
            None => signing.keys.keys.first(),
        }?;
        Some((jwk.clone(), signing.issuer.clone()))
    }
}

#[async_trait::async_trait]
impl TokenValidator for OidcTokenValidator {
    async fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let header =
            jsonwebtoken::decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if matches!(header.alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(AuthError::InvalidToken(
                "symmetric signing algorithms are not accepted".to_string(),
            ));
        }

        let kid = header.kid.as_deref();
        let (jwk, issuer) = match self.lookup(kid) {
            Some(found) => found,
            None => {
                self.refresh_throttled().await?;
                self.lookup(kid).ok_or_else(|| self.missing_key(kid))?
            }
        };

        let key = DecodingKey::from_jwk(&jwk).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let mut validation = Validation::new(header.alg);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&issuer]);

        jsonwebtoken::decode::<Claims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    let (scheme, token) = value.split_once(' ').ok_or(AuthError::MalformedHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token)
}

/// Middleware rejecting requests without a valid bearer token
///
/// On success the [`Claims`] are stored in the request extensions.
pub async fn require_bearer(
    State(validator): State<Arc<dyn TokenValidator>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let token = match bearer_token(request.headers()) {
        Ok(token) => token.to_string(),
        Err(e) => {
            tracing::debug!(error = %e, %path, "Request without usable bearer token");
            return Problem::unauthorized(e.to_string())
                .with_instance(path)
                .into_response();
        }
    };

    match validator.validate(&token).await {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(error = %e, %path, "Rejected bearer token");
            Problem::unauthorized(e.to_string())
                .with_instance(path)
                .into_response()
        }
    }
}
