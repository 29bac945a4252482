use anyhow::{Context, Result};
use common::calendar::HolidayCalendar;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::registry::ModelName;

pub const DEFAULT_CONFIG_PATH: &str = "config/energy.toml";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub models: ModelsConfig,
    pub defaults: DefaultsConfig,
    pub holidays: HolidaysConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// What to do when an artifact cannot be loaded at startup.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MissingModelPolicy {
    /// Refuse to start.
    #[default]
    Abort,
    /// Start anyway; endpoints needing the model answer 500.
    Guard,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ModelsConfig {
    /// Base directory for relative artifact paths.
    pub dir: PathBuf,
    pub on_missing: MissingModelPolicy,
    pub pax: PathBuf,
    pub terminal: PathBuf,
    pub kantor: PathBuf,
    pub terminal_classifier: PathBuf,
    pub kantor_classifier: PathBuf,
    pub usage_classifier: PathBuf,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("models"),
            on_missing: MissingModelPolicy::default(),
            pax: PathBuf::from("model_pax.json"),
            terminal: PathBuf::from("model_terminal.json"),
            kantor: PathBuf::from("model_kantor.json"),
            terminal_classifier: PathBuf::from("classifier_terminal.json"),
            kantor_classifier: PathBuf::from("classifier_kantor.json"),
            usage_classifier: PathBuf::from("classifier_usage.json"),
        }
    }
}

impl ModelsConfig {
    pub fn path_for(&self, name: ModelName) -> PathBuf {
        let file = match name {
            ModelName::Pax => &self.pax,
            ModelName::Terminal => &self.terminal,
            ModelName::Kantor => &self.kantor,
            ModelName::TerminalClassifier => &self.terminal_classifier,
            ModelName::KantorClassifier => &self.kantor_classifier,
            ModelName::UsageClassifier => &self.usage_classifier,
        };
        if file.is_absolute() {
            file.clone()
        } else {
            self.dir.join(file)
        }
    }
}

/// Temperatures used when a forecast request leaves them out.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct DefaultsConfig {
    pub suhu_rata: f64,
    pub suhu_max: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            suhu_rata: 28.0,
            suhu_max: 32.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct HolidaysConfig {
    /// JSON array of extra `YYYY-MM-DD` days off.
    pub extra_file: Option<PathBuf>,
}

impl GatewayConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config: GatewayConfig = toml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `explicit` if given, otherwise the default path when it exists,
    /// otherwise fall back to built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH),
            None => {
                info!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.defaults.suhu_rata.is_finite() || !self.defaults.suhu_max.is_finite() {
            anyhow::bail!("default temperatures must be finite numbers");
        }
        Ok(())
    }

    pub fn calendar(&self) -> Result<HolidayCalendar> {
        let calendar = HolidayCalendar::indonesia()?;
        match &self.holidays.extra_file {
            Some(path) => calendar.extend_from_file(path),
            None => Ok(calendar),
        }
    }
}
