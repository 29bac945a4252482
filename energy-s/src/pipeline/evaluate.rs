use common::labels::Area;
use common::schema;

use super::forecast::{predict_kantor, predict_terminal, Temperatures};
use super::{classify, flag};
use crate::artifact::{ClassLabel, FeatureRow};
use crate::error::GatewayError;
use crate::registry::{ModelName, ModelRegistry};

/// Signed percentage of `actual` above `predicted`; zero when there is no
/// positive benchmark to compare against.
pub fn deviation_percent(actual: f64, predicted: f64) -> f64 {
    if predicted <= 0.0 {
        return 0.0;
    }
    (actual - predicted) / predicted * 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub benchmark: f64,
    pub deviation: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsageClassification {
    pub delta_kwh: f64,
    pub delta_pax: f64,
    pub label: ClassLabel,
}

fn decode(area: Area, label: ClassLabel) -> String {
    match label {
        ClassLabel::Code(code) => area.decode(code).to_string(),
        ClassLabel::Text(text) => text,
    }
}

pub fn evaluate_terminal(
    registry: &ModelRegistry,
    pax: f64,
    temps: Temperatures,
    actual: f64,
) -> Result<Evaluation, GatewayError> {
    let benchmark = predict_terminal(registry, pax, temps)?;
    let deviation = deviation_percent(actual, benchmark);
    let row = FeatureRow::new()
        .with(schema::PAX, pax)
        .with(schema::SUHU_MAX, temps.suhu_max)
        .with(schema::DEVIASI_TERMINAL, deviation);
    let label = classify(registry, ModelName::TerminalClassifier, &row)?;
    Ok(Evaluation {
        benchmark,
        deviation,
        label: decode(Area::Terminal, label),
    })
}

pub fn evaluate_kantor(
    registry: &ModelRegistry,
    is_workday: bool,
    temps: Temperatures,
    actual: f64,
) -> Result<Evaluation, GatewayError> {
    let benchmark = predict_kantor(registry, is_workday, temps)?;
    let deviation = deviation_percent(actual, benchmark);
    let row = FeatureRow::new()
        .with(schema::IS_WORKDAY, flag(is_workday))
        .with(schema::SUHU_MAX, temps.suhu_max)
        .with(schema::DEVIASI_KANTOR, deviation);
    let label = classify(registry, ModelName::KantorClassifier, &row)?;
    Ok(Evaluation {
        benchmark,
        deviation,
        label: decode(Area::Kantor, label),
    })
}

/// Day-over-day change classification. The label is returned as the
/// classifier produced it.
pub fn classify_usage(
    registry: &ModelRegistry,
    kwh_today: f64,
    kwh_yesterday: f64,
    pax_today: f64,
    pax_yesterday: f64,
) -> Result<UsageClassification, GatewayError> {
    let delta_kwh = kwh_today - kwh_yesterday;
    let delta_pax = pax_today - pax_yesterday;
    let row = FeatureRow::new()
        .with(schema::DELTA_KWH, delta_kwh)
        .with(schema::DELTA_PAX, delta_pax);
    let label = classify(registry, ModelName::UsageClassifier, &row)?;
    Ok(UsageClassification {
        delta_kwh,
        delta_pax,
        label,
    })
}
