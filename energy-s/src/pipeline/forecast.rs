use common::calendar::DateFeatures;
use common::schema;

use super::{flag, regress};
use crate::artifact::FeatureRow;
use crate::error::GatewayError;
use crate::registry::{ModelName, ModelRegistry};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperatures {
    pub suhu_rata: f64,
    pub suhu_max: f64,
}

/// Raw, unrounded model outputs for one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forecast {
    pub features: DateFeatures,
    pub pax: f64,
    pub kwh_terminal: f64,
    pub kwh_kantor: f64,
}

pub fn predict_pax(registry: &ModelRegistry, features: &DateFeatures) -> Result<f64, GatewayError> {
    let row = FeatureRow::new()
        .with(schema::MONTH, features.month as f64)
        .with(schema::DAYOFWEEK, features.dayofweek as f64)
        .with(schema::DAYOFYEAR, features.dayofyear as f64)
        .with(schema::IS_WORKDAY, flag(features.is_workday))
        .with(schema::IS_HOLIDAY, flag(features.is_holiday));
    regress(registry, ModelName::Pax, &row)
}

pub fn predict_terminal(
    registry: &ModelRegistry,
    pax: f64,
    temps: Temperatures,
) -> Result<f64, GatewayError> {
    let row = FeatureRow::new()
        .with(schema::PAX, pax)
        .with(schema::SUHU_RATA, temps.suhu_rata)
        .with(schema::SUHU_MAX, temps.suhu_max);
    regress(registry, ModelName::Terminal, &row)
}

/// Office consumption does not depend on passengers.
pub fn predict_kantor(
    registry: &ModelRegistry,
    is_workday: bool,
    temps: Temperatures,
) -> Result<f64, GatewayError> {
    let row = FeatureRow::new()
        .with(schema::IS_WORKDAY, flag(is_workday))
        .with(schema::SUHU_RATA, temps.suhu_rata)
        .with(schema::SUHU_MAX, temps.suhu_max);
    regress(registry, ModelName::Kantor, &row)
}

/// Passengers first, then the terminal model fed with that prediction.
pub fn forecast_all(
    registry: &ModelRegistry,
    features: DateFeatures,
    temps: Temperatures,
) -> Result<Forecast, GatewayError> {
    let pax = predict_pax(registry, &features)?;
    let kwh_terminal = predict_terminal(registry, pax, temps)?;
    let kwh_kantor = predict_kantor(registry, features.is_workday, temps)?;
    Ok(Forecast {
        features,
        pax,
        kwh_terminal,
        kwh_kantor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures;
    use common::calendar::{parse_date, HolidayCalendar};

    const TEMPS: Temperatures = Temperatures {
        suhu_rata: 28.0,
        suhu_max: 32.0,
    };

    fn features(date: &str) -> DateFeatures {
        let cal = HolidayCalendar::indonesia().unwrap();
        DateFeatures::derive(parse_date(date).unwrap(), &cal)
    }

    #[test]
    fn test_holiday_forecast() {
        let registry = fixtures::registry();
        let forecast = forecast_all(&registry, features("2024-01-01"), TEMPS).unwrap();

        assert!(!forecast.features.is_workday);
        assert!((forecast.pax - 950.4).abs() < 1e-9);
        assert!((forecast.kwh_terminal - (100.0 + 475.2 + 280.0 + 64.0)).abs() < 1e-9);
        assert!((forecast.kwh_kantor - (50.0 + 140.0 + 32.0)).abs() < 1e-9);
    }

    #[test]
    fn test_workday_forecast() {
        let registry = fixtures::registry();
        let forecast = forecast_all(&registry, features("2024-01-02"), TEMPS).unwrap();
        assert!((forecast.pax - 1100.4).abs() < 1e-9);
        assert!((forecast.kwh_kantor - 422.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_model() {
        let registry = ModelRegistry::default();
        let err = predict_kantor(&registry, true, TEMPS).unwrap_err();
        assert!(matches!(err, GatewayError::ModelUnavailable(ModelName::Kantor)));
    }
}
