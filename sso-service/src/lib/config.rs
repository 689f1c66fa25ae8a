use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub env: Env,
    pub storage: StorageConfig,
    pub grpc: GrpcConfig,
    pub token: TokenConfig,
}

/// Deployment environment; selects log format and verbosity.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Env {
    Local,
    Dev,
    Prod,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct GrpcConfig {
    pub port: u16,
    pub timeout_ms: u64,
}

impl GrpcConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    pub ttl_seconds: i64,
}

impl TokenConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.ttl_seconds)
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SSO_STORAGE__URL, SSO_GRPC__PORT, etc.)
    /// 2. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 3. Base config file: `CONFIG_PATH` if set, else config/default.toml
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        let base_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name(&base_path).required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: SSO_GRPC__PORT=50051 overrides grpc.port
            .add_source(
                Environment::with_prefix("SSO")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        configuration.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    #[test]
    fn test_deserialize_with_defaults() {
        let config: Config = ConfigBuilder::builder()
            .add_source(File::from_str(
                r#"
                env = "prod"

                [storage]
                url = "sqlite://sso.db"

                [grpc]
                port = 44044
                timeout_ms = 2500

                [token]
                ttl_seconds = 900
                "#,
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.env, Env::Prod);
        assert_eq!(config.storage.max_connections, 5);
        assert_eq!(config.grpc.timeout(), Duration::from_millis(2500));
        assert_eq!(config.token.ttl(), chrono::Duration::minutes(15));
    }

    #[test]
    fn test_unknown_env_rejected() {
        let result: Result<Config, _> = ConfigBuilder::builder()
            .add_source(File::from_str(
                r#"
                env = "staging"

                [storage]
                url = "sqlite://sso.db"

                [grpc]
                port = 44044
                timeout_ms = 2500

                [token]
                ttl_seconds = 900
                "#,
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize();

        assert!(result.is_err());
    }
}
