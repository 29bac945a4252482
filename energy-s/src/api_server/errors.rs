use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::any::Any;
use tracing::{error, warn};

use crate::error::GatewayError;
use crate::util::msg::{DetailResponse, ErrorResponse};

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            GatewayError::InvalidArgument(detail) => {
                warn!("Rejected request: {}", detail);
                (StatusCode::BAD_REQUEST, Json(DetailResponse { detail })).into_response()
            }
            other => {
                error!("Request failed: {:?}: {}", other, other);
                internal_error()
            }
        }
    }
}

pub fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::internal())).into_response()
}

/// Panics inside a handler get the same opaque 500.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!("Handler panicked: {}", detail);
    internal_error()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::InferenceError;
    use crate::registry::ModelName;
    use crate::util::msg::{INTERNAL_ERROR, INTERNAL_ERROR_MESSAGE};
    use axum::{body::Body, http::Request, routing::get, Router};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    async fn body_of(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn internal_body() -> serde_json::Value {
        serde_json::json!({ "error": INTERNAL_ERROR, "message": INTERNAL_ERROR_MESSAGE })
    }

    #[tokio::test]
    async fn test_inference_failure_is_opaque() {
        let err = GatewayError::Inference {
            model: ModelName::Terminal,
            source: InferenceError::NonFinite(f64::INFINITY),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body, internal_body());
        assert!(!body.to_string().contains("terminal"));
    }

    #[tokio::test]
    async fn test_handler_panic_gets_fixed_body() {
        async fn boom() -> &'static str {
            panic!("index out of range in model slot")
        }

        let app = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(panic_response));
        let request = Request::builder().uri("/boom").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, internal_body());
    }
}
