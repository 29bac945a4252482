use axum::{extract::State, Json};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::api_server::ApiServer;
use crate::artifact::ClassLabel;
use crate::error::GatewayError;
use crate::pipeline::{self, round2, Temperatures};

/// Accepts `true`/`false` as well as the `0`/`1` the models were trained on.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(f64),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Number(n) if n == 1.0 => Ok(true),
        Flag::Number(n) if n == 0.0 => Ok(false),
        Flag::Number(n) => Err(serde::de::Error::custom(format!(
            "expected 0 or 1 for a workday flag, got {n}"
        ))),
    }
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub pax: f64,
    pub suhu_rata: f64,
    pub suhu_max: f64,
    #[serde(deserialize_with = "deserialize_flag")]
    pub is_hari_kerja: bool,
    pub aktual_kwh_terminal: f64,
    pub aktual_kwh_kantor: f64,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateTerminalRequest {
    pub pax: f64,
    pub suhu_rata: f64,
    pub suhu_max: f64,
    pub aktual_kwh_terminal: f64,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateKantorRequest {
    pub suhu_rata: f64,
    pub suhu_max: f64,
    #[serde(deserialize_with = "deserialize_flag")]
    pub is_hari_kerja: bool,
    pub aktual_kwh_kantor: f64,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub kinerja_terminal: String,
    pub deviasi_persen_terminal: f64,
    pub benchmark_kwh_terminal: f64,
    pub kinerja_kantor: String,
    pub deviasi_persen_kantor: f64,
    pub benchmark_kwh_kantor: f64,
}

#[derive(Debug, Serialize)]
pub struct TerminalEvaluationResponse {
    pub kinerja_terminal: String,
    pub deviasi_persen_terminal: f64,
    pub benchmark_kwh_terminal: f64,
}

#[derive(Debug, Serialize)]
pub struct KantorEvaluationResponse {
    pub kinerja_kantor: String,
    pub deviasi_persen_kantor: f64,
    pub benchmark_kwh_kantor: f64,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub kwh_today: f64,
    pub kwh_yesterday: f64,
    pub pax_today: f64,
    pub pax_yesterday: f64,
}

#[derive(Debug, Serialize)]
pub struct ClassifyInputData {
    pub perubahan_listrik_kwh: f64,
    pub perubahan_pax: f64,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub klasifikasi: ClassLabel,
    pub input_data: ClassifyInputData,
}

/// Both areas for one day.
pub async fn evaluate(
    State(server): State<Arc<ApiServer>>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, GatewayError> {
    info!("Received evaluation request for both areas");
    let temps = Temperatures {
        suhu_rata: request.suhu_rata,
        suhu_max: request.suhu_max,
    };
    let terminal = pipeline::evaluate_terminal(
        &server.registry,
        request.pax,
        temps,
        request.aktual_kwh_terminal,
    )?;
    let kantor = pipeline::evaluate_kantor(
        &server.registry,
        request.is_hari_kerja,
        temps,
        request.aktual_kwh_kantor,
    )?;

    Ok(Json(EvaluateResponse {
        kinerja_terminal: terminal.label,
        deviasi_persen_terminal: round2(terminal.deviation),
        benchmark_kwh_terminal: round2(terminal.benchmark),
        kinerja_kantor: kantor.label,
        deviasi_persen_kantor: round2(kantor.deviation),
        benchmark_kwh_kantor: round2(kantor.benchmark),
    }))
}

pub async fn evaluate_terminal(
    State(server): State<Arc<ApiServer>>,
    Json(request): Json<EvaluateTerminalRequest>,
) -> Result<Json<TerminalEvaluationResponse>, GatewayError> {
    info!("Received terminal evaluation request");
    let temps = Temperatures {
        suhu_rata: request.suhu_rata,
        suhu_max: request.suhu_max,
    };
    let eval = pipeline::evaluate_terminal(
        &server.registry,
        request.pax,
        temps,
        request.aktual_kwh_terminal,
    )?;
    Ok(Json(TerminalEvaluationResponse {
        kinerja_terminal: eval.label,
        deviasi_persen_terminal: round2(eval.deviation),
        benchmark_kwh_terminal: round2(eval.benchmark),
    }))
}

pub async fn evaluate_kantor(
    State(server): State<Arc<ApiServer>>,
    Json(request): Json<EvaluateKantorRequest>,
) -> Result<Json<KantorEvaluationResponse>, GatewayError> {
    info!("Received office evaluation request");
    let temps = Temperatures {
        suhu_rata: request.suhu_rata,
        suhu_max: request.suhu_max,
    };
    let eval = pipeline::evaluate_kantor(
        &server.registry,
        request.is_hari_kerja,
        temps,
        request.aktual_kwh_kantor,
    )?;
    Ok(Json(KantorEvaluationResponse {
        kinerja_kantor: eval.label,
        deviasi_persen_kantor: round2(eval.deviation),
        benchmark_kwh_kantor: round2(eval.benchmark),
    }))
}

/// Day-over-day usage classification.
pub async fn classify(
    State(server): State<Arc<ApiServer>>,
    Json(request): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, GatewayError> {
    info!("Received classification request");
    let result = pipeline::classify_usage(
        &server.registry,
        request.kwh_today,
        request.kwh_yesterday,
        request.pax_today,
        request.pax_yesterday,
    )?;
    Ok(Json(ClassifyResponse {
        klasifikasi: result.label,
        input_data: ClassifyInputData {
            perubahan_listrik_kwh: round2(result.delta_kwh),
            perubahan_pax: round2(result.delta_pax),
        },
    }))
}
