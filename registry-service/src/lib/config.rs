use std::env;

use auth::Algorithm;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,
    #[serde(default = "default_access_token_expire_minutes")]
    pub access_token_expire_minutes: i64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_algorithm() -> Algorithm {
    Algorithm::HS256
}

fn default_access_token_expire_minutes() -> i64 {
    30
}

/// One year.
const MAX_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 365 * 24 * 60;

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (REGISTRY__DATABASE__URL, REGISTRY__JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        Self::sources(&run_mode)?
            .try_deserialize::<Self>()?
            .validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let minutes = self.jwt.access_token_expire_minutes;
        if !(1..=MAX_ACCESS_TOKEN_EXPIRE_MINUTES).contains(&minutes) {
            return Err(ConfigError::Message(format!(
                "jwt.access_token_expire_minutes must be between 1 and {}, got {}",
                MAX_ACCESS_TOKEN_EXPIRE_MINUTES, minutes
            )));
        }
        Ok(self)
    }

    fn sources(run_mode: &str) -> Result<ConfigBuilder, ConfigError> {
        ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(
                Environment::with_prefix("REGISTRY")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(toml: &str) -> Result<Config, ConfigError> {
        ConfigBuilder::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize::<Config>()?
            .validated()
    }

    fn with_expire_minutes(minutes: &str) -> Result<Config, ConfigError> {
        from_toml(&format!(
            r#"
            [database]
            url = "postgres://localhost/registry"

            [server]
            http_port = 8000

            [jwt]
            secret = "change-me"
            access_token_expire_minutes = {}
            "#,
            minutes
        ))
    }

    #[test]
    fn test_defaults_apply_when_keys_are_missing() {
        let config = from_toml(
            r#"
            [database]
            url = "postgres://localhost/registry"

            [server]
            http_port = 8000

            [jwt]
            secret = "change-me"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.jwt.algorithm, Algorithm::HS256);
        assert_eq!(config.jwt.access_token_expire_minutes, 30);
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let config = from_toml(
            r#"
            [database]
            url = "postgres://localhost/registry"
            max_connections = 20

            [server]
            http_port = 9000

            [jwt]
            secret = "change-me"
            algorithm = "HS512"
            access_token_expire_minutes = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.server.http_port, 9000);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.jwt.algorithm, Algorithm::HS512);
        assert_eq!(config.jwt.access_token_expire_minutes, 60);
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let result = from_toml(
            r#"
            [database]
            url = "postgres://localhost/registry"

            [server]
            http_port = 8000
            "#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_token_lifetime_must_be_positive() {
        for minutes in ["0", "-30"] {
            let result = with_expire_minutes(minutes);

            assert!(
                matches!(result, Err(ConfigError::Message(ref msg)) if msg.contains("access_token_expire_minutes")),
                "{} minutes accepted",
                minutes
            );
        }
    }

    #[test]
    fn test_token_lifetime_is_capped() {
        assert!(with_expire_minutes("525600").is_ok());
        assert!(with_expire_minutes("525601").is_err());
        assert!(with_expire_minutes("9223372036854775807").is_err());
    }
}
