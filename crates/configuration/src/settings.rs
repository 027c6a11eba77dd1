use core_types::constants;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub snapshot: SnapshotSettings,
    pub mining: MiningSettings,
    pub logging: LoggingSettings,
}

/// Where and how the HTTP feeds are served.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body, mainly relevant for survey uploads.
    pub body_limit_bytes: usize,
}

/// The JSON snapshot the feeds are computed from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SnapshotSettings {
    pub path: PathBuf,
}

/// Parameters of the mining reports.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MiningSettings {
    /// Expected ore volume a moon yields per month, in m³.
    pub volume_per_month: Decimal,
    /// Number of calendar months shown in the user mining report.
    pub user_mining_months: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

// --- Default Implementations ---
// Every section may be omitted from config.toml.

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("snapshot.json"),
        }
    }
}

impl Default for MiningSettings {
    fn default() -> Self {
        Self {
            volume_per_month: Decimal::from(constants::DEFAULT_VOLUME_PER_MONTH),
            user_mining_months: constants::USER_MINING_REPORT_MONTHS,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            directory: None,
            file_prefix: "moonmining.log".to_string(),
        }
    }
}
