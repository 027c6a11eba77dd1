use crate::error::ConfigError;
use rust_decimal::Decimal;
use std::net::SocketAddr;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    LogFormat, LoggingSettings, MiningSettings, ServerSettings, Settings, SnapshotSettings,
};

/// Environment variables with this prefix override file settings,
/// e.g. `MOONMINING__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "MOONMINING";

/// Loads the application configuration.
///
/// Reads the TOML file at `path` if it exists, layers environment overrides on top,
/// deserializes into `Settings` and validates the result. Missing sections fall back
/// to their defaults.
pub fn load_config(path: &Path) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}

impl Settings {
    /// Rejects values the reports cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mining.volume_per_month <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "mining.volume_per_month must be positive".to_string(),
            ));
        }
        if !(1..=12).contains(&self.mining.user_mining_months) {
            return Err(ConfigError::ValidationError(format!(
                "mining.user_mining_months must be between 1 and 12, got {}",
                self.mining.user_mining_months
            )));
        }
        if self.server.body_limit_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "server.body_limit_bytes must not be zero".to_string(),
            ));
        }
        self.server.socket_addr()?;
        Ok(())
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                ConfigError::ValidationError(format!(
                    "invalid server address {}:{}: {e}",
                    self.host, self.port
                ))
            })
    }
}
