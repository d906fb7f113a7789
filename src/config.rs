//! Configuration management

use anyhow::{Context, Result};

use crate::defaults::{DEFAULT_AVG_SPEED_KMH, DEFAULT_SERVICE_MINUTES, DEFAULT_START_TIME};
use crate::services::clock::parse_clock;
use crate::services::SequencerConfig;
use crate::types::LoadMode;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// NATS server URL
    pub nats_url: String,

    /// Directory for rolling log files
    pub logs_dir: String,

    /// Values used when a request leaves them out
    pub engine: EngineDefaults,
}

/// Fallbacks for optional request fields
#[derive(Debug, Clone, PartialEq)]
pub struct EngineDefaults {
    /// "HH:MM" departure from the origin
    pub start_time: String,
    pub avg_speed_kmh: f64,
    pub default_service_minutes: f64,
    pub load_mode: LoadMode,
}

impl Default for EngineDefaults {
    fn default() -> Self {
        Self {
            start_time: DEFAULT_START_TIME.to_string(),
            avg_speed_kmh: DEFAULT_AVG_SPEED_KMH,
            default_service_minutes: DEFAULT_SERVICE_MINUTES,
            load_mode: LoadMode::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let nats_url = std::env::var("NATS_URL")
            .unwrap_or_else(|_| "nats://localhost:4222".to_string());

        let logs_dir = std::env::var("LOGS_DIR")
            .unwrap_or_else(|_| "../logs".to_string());

        let engine = EngineDefaults::from_env()?;

        Ok(Self {
            nats_url,
            logs_dir,
            engine,
        })
    }
}

impl EngineDefaults {
    /// Read `DISPATCH_*` overrides; anything unset keeps its default.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let start_time = std::env::var("DISPATCH_START_TIME")
            .unwrap_or(defaults.start_time);
        parse_clock("DISPATCH_START_TIME", &start_time)?;

        let avg_speed_kmh = match std::env::var("DISPATCH_AVG_SPEED_KMH") {
            Ok(raw) => raw
                .parse::<f64>()
                .with_context(|| format!("DISPATCH_AVG_SPEED_KMH is not a number: {}", raw))?,
            Err(_) => defaults.avg_speed_kmh,
        };

        let default_service_minutes = match std::env::var("DISPATCH_DEFAULT_SERVICE_MINUTES") {
            Ok(raw) => raw
                .parse::<f64>()
                .with_context(|| format!("DISPATCH_DEFAULT_SERVICE_MINUTES is not a number: {}", raw))?,
            Err(_) => defaults.default_service_minutes,
        };

        SequencerConfig::with_speed_and_service(avg_speed_kmh, default_service_minutes)
            .validate()
            .context("Invalid route defaults")?;

        let load_mode = std::env::var("DISPATCH_LOAD_MODE")
            .map(|raw| LoadMode::from_name(Some(raw.as_str())))
            .unwrap_or(defaults.load_mode);

        Ok(Self {
            start_time,
            avg_speed_kmh,
            default_service_minutes,
            load_mode,
        })
    }
}
