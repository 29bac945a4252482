//! Feature assembly and model sequencing behind the HTTP handlers.

pub mod evaluate;
pub mod forecast;

use tracing::debug;

use crate::artifact::{ClassLabel, FeatureRow};
use crate::error::GatewayError;
use crate::registry::{ModelName, ModelRegistry};

pub use evaluate::{classify_usage, deviation_percent, evaluate_kantor, evaluate_terminal};
pub use forecast::{forecast_all, predict_kantor, predict_pax, predict_terminal, Temperatures};

/// Two decimal places, without ever producing `-0.0`.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}

/// Nearest whole passenger, ties to even.
pub fn round_pax(value: f64) -> i64 {
    value.round_ties_even() as i64
}

pub(crate) fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

fn regress(registry: &ModelRegistry, name: ModelName, row: &FeatureRow) -> Result<f64, GatewayError> {
    let model = registry.get(name)?;
    let value = model
        .predict_value(row)
        .map_err(|source| GatewayError::Inference { model: name, source })?;
    debug!("{} model -> {}", name, value);
    Ok(value)
}

fn classify(
    registry: &ModelRegistry,
    name: ModelName,
    row: &FeatureRow,
) -> Result<ClassLabel, GatewayError> {
    let model = registry.get(name)?;
    let label = model
        .predict_class(row)
        .map_err(|source| GatewayError::Inference { model: name, source })?;
    debug!("{} model -> {:?}", name, label);
    Ok(label)
}
