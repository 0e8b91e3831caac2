//! Configuration module for the event service.
//!
//! Loads configuration from YAML files and environment variables.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

use crate::auth::ConfiguredUser;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Token authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign bearer tokens.
    pub jwt_secret: String,
    /// Issuer claim written into and required from tokens.
    #[serde(default = "default_issuer")]
    pub jwt_issuer: String,
    /// Token lifetime.
    #[serde(default = "default_token_duration")]
    pub token_duration_hours: i64,
    /// Accounts allowed to log in.
    #[serde(default)]
    pub users: Vec<ConfiguredUser>,
}

fn default_issuer() -> String {
    "event-service".to_string()
}

fn default_token_duration() -> i64 {
    24
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (EVENTS__*)
    /// 2. config/local.yaml (if exists)
    /// 3. config/default.yaml
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("EVENTS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_auth_defaults() {
        let yaml = r#"
server:
  host: 127.0.0.1
  port: 8080
database:
  url: "sqlite::memory:"
auth:
  jwt_secret: secret
"#;
        let config: Config = ConfigLoader::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.jwt_issuer, "event-service");
        assert_eq!(config.auth.token_duration_hours, 24);
        assert!(config.auth.users.is_empty());
    }

    #[test]
    fn test_configured_users() {
        let yaml = r#"
server:
  host: 0.0.0.0
  port: 3000
database:
  url: "sqlite://events.db"
auth:
  jwt_secret: secret
  users:
    - id: admin
      email: admin@example.com
      password_hash: abc
      role: superuser
"#;
        let config: Config = ConfigLoader::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.auth.users.len(), 1);
        assert!(config.auth.users[0].role.is_superuser());
    }
}
