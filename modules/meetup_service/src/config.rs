//! Configuration for meetup service module

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Meetup service configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub seed: SeedConfig,

    /// Where change notices go
    #[serde(default)]
    pub publisher: PublisherKind,
}

/// Relational store connection
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SeaORM connection URL (`sqlite://...` or `postgres://...`)
    #[serde(default = "default_database_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_connect_timeout", with = "humantime_serde")]
    pub connect_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

/// OpenID Connect token validation
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Issuer base URL; discovery lives under `/.well-known/openid-configuration`
    #[serde(default = "default_authority")]
    pub authority: String,

    /// Expected `aud` claim (the API resource name)
    #[serde(default = "default_audience")]
    pub audience: String,

    /// Refuse an authority that is not served over https
    #[serde(default)]
    pub require_https_metadata: bool,

    /// Minimum gap between two fetches of the authority's signing keys
    #[serde(default = "default_key_refresh_cooldown", with = "humantime_serde")]
    pub key_refresh_cooldown: Duration,

    /// Timeout for discovery and JWKS requests
    #[serde(default = "default_metadata_timeout", with = "humantime_serde")]
    pub metadata_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            authority: default_authority(),
            audience: default_audience(),
            require_https_metadata: false,
            key_refresh_cooldown: default_key_refresh_cooldown(),
            metadata_timeout: default_metadata_timeout(),
        }
    }
}

/// Startup migration and baseline data
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SeedConfig {
    /// Insert the preconfigured events into an empty database
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Retries after the first failed attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Pause between attempts
    #[serde(default, with = "humantime_serde")]
    pub retry_delay: Duration,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retries: default_max_retries(),
            retry_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublisherKind {
    #[default]
    None,
    Log,
}

fn default_database_url() -> String {
    "sqlite://meetup.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(8)
}

fn default_authority() -> String {
    "http://localhost:5443".to_string()
}

fn default_audience() -> String {
    "myApi".to_string()
}

fn default_key_refresh_cooldown() -> Duration {
    Duration::from_secs(30)
}

fn default_metadata_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_max_retries() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.auth.audience, "myApi");
        assert!(!config.auth.require_https_metadata);
        assert_eq!(config.auth.key_refresh_cooldown, Duration::from_secs(30));
        assert_eq!(config.auth.metadata_timeout, Duration::from_secs(5));
        assert_eq!(config.seed.max_retries, 10);
        assert!(config.seed.retry_delay.is_zero());
        assert_eq!(config.publisher, PublisherKind::None);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: Config = serde_json::from_value(serde_json::json!({
            "seed": { "retry_delay": "2s" },
            "publisher": "log"
        }))
        .unwrap();

        assert_eq!(config.seed.retry_delay, Duration::from_secs(2));
        assert!(config.seed.enabled);
        assert_eq!(config.publisher, PublisherKind::Log);
        assert_eq!(config.database.url, default_database_url());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<Config, _> =
            serde_json::from_value(serde_json::json!({ "auth": { "issuer": "x" } }));
        assert!(result.is_err());
    }
}
