use serde::Serialize;

pub const INTERNAL_ERROR: &str = "Internal Server Error";
pub const INTERNAL_ERROR_MESSAGE: &str = "Terjadi kesalahan internal pada server.";

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// Body of every 500. Never carries internal detail.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: &'static str,
}

impl ErrorResponse {
    pub fn internal() -> Self {
        Self {
            error: INTERNAL_ERROR,
            message: INTERNAL_ERROR_MESSAGE,
        }
    }
}

/// Body of a 400, with a message meant for the caller.
#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub detail: String,
}
