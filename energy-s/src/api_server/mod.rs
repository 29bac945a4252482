pub mod errors;
pub mod evaluate;
pub mod handle_api;
pub mod predict;

use anyhow::Result;
use common::calendar::HolidayCalendar;
use tracing::info;

use crate::pipeline::Temperatures;
use crate::registry::ModelRegistry;
use crate::util::config::{DefaultsConfig, GatewayConfig};

/// Read-only state shared by every request.
pub struct ApiServer {
    pub registry: ModelRegistry,
    pub calendar: HolidayCalendar,
    pub defaults: DefaultsConfig,
}

impl ApiServer {
    /// Load the calendar and every artifact. Fails before anything is bound
    /// when the missing-model policy is `abort`.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let calendar = config.calendar()?;
        let registry = ModelRegistry::load(&config.models)?;
        info!(
            "Model registry ready: loaded {:?}, missing {:?}",
            registry.loaded(),
            registry.missing()
        );
        Ok(Self::from_parts(registry, calendar, config.defaults))
    }

    pub fn from_parts(
        registry: ModelRegistry,
        calendar: HolidayCalendar,
        defaults: DefaultsConfig,
    ) -> Self {
        ApiServer {
            registry,
            calendar,
            defaults,
        }
    }

    pub(crate) fn temperatures(&self, suhu_rata: Option<f64>, suhu_max: Option<f64>) -> Temperatures {
        Temperatures {
            suhu_rata: suhu_rata.unwrap_or(self.defaults.suhu_rata),
            suhu_max: suhu_max.unwrap_or(self.defaults.suhu_max),
        }
    }
}
