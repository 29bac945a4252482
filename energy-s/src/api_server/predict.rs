use axum::{extract::State, Json};
use common::calendar::{parse_date, DateFeatures, DATE_FORMAT};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api_server::ApiServer;
use crate::error::GatewayError;
use crate::pipeline::{self, round2, round_pax};

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub tanggal: String,
    pub suhu_rata: Option<f64>,
    pub suhu_max: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct PredictTerminalRequest {
    pub tanggal: String,
    pub suhu_rata: Option<f64>,
    pub suhu_max: Option<f64>,
    /// Known passenger count. The pax model is skipped when present.
    pub pax: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub tanggal_prediksi: String,
    pub prediksi_pax: i64,
    pub prediksi_kwh_terminal: f64,
    pub prediksi_kwh_kantor: f64,
}

#[derive(Debug, Serialize)]
pub struct TerminalPredictionResponse {
    pub prediksi_kwh_terminal: f64,
}

#[derive(Debug, Serialize)]
pub struct KantorPredictionResponse {
    pub prediksi_kwh_kantor: f64,
}

/// Parsed date plus its calendar features. Dates in a year without lunar
/// holiday data are still served, with only the computable holidays.
fn date_features(
    server: &ApiServer,
    tanggal: &str,
) -> Result<(String, DateFeatures), GatewayError> {
    let date = parse_date(tanggal)?;
    if !server.calendar.covers_date(date) {
        warn!(
            "No lunar holiday data for {}, moving holidays are treated as workdays",
            date
        );
    }
    let features = DateFeatures::derive(date, &server.calendar);
    Ok((date.format(DATE_FORMAT).to_string(), features))
}

/// Passengers, terminal and office consumption for one day.
pub async fn predict(
    State(server): State<Arc<ApiServer>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, GatewayError> {
    info!("Received prediction request for {}", request.tanggal);
    let (tanggal, features) = date_features(&server, &request.tanggal)?;
    let temps = server.temperatures(request.suhu_rata, request.suhu_max);

    let forecast = pipeline::forecast_all(&server.registry, features, temps)?;
    Ok(Json(PredictResponse {
        tanggal_prediksi: tanggal,
        prediksi_pax: round_pax(forecast.pax),
        prediksi_kwh_terminal: round2(forecast.kwh_terminal),
        prediksi_kwh_kantor: round2(forecast.kwh_kantor),
    }))
}

pub async fn predict_terminal(
    State(server): State<Arc<ApiServer>>,
    Json(request): Json<PredictTerminalRequest>,
) -> Result<Json<TerminalPredictionResponse>, GatewayError> {
    info!("Received terminal prediction request for {}", request.tanggal);
    let (_, features) = date_features(&server, &request.tanggal)?;
    let temps = server.temperatures(request.suhu_rata, request.suhu_max);

    let pax = match request.pax {
        Some(pax) => pax,
        None => pipeline::predict_pax(&server.registry, &features)?,
    };
    let kwh = pipeline::predict_terminal(&server.registry, pax, temps)?;
    Ok(Json(TerminalPredictionResponse {
        prediksi_kwh_terminal: round2(kwh),
    }))
}

pub async fn predict_kantor(
    State(server): State<Arc<ApiServer>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<KantorPredictionResponse>, GatewayError> {
    info!("Received office prediction request for {}", request.tanggal);
    let (_, features) = date_features(&server, &request.tanggal)?;
    let temps = server.temperatures(request.suhu_rata, request.suhu_max);

    let kwh = pipeline::predict_kantor(&server.registry, features.is_workday, temps)?;
    Ok(Json(KantorPredictionResponse {
        prediksi_kwh_kantor: round2(kwh),
    }))
}
