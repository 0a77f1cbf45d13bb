#![forbid(unsafe_code)]

pub mod config;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;

use reit_calc_core::development::analyze_project_cost;
use reit_calc_core::reit::{calculate_with, InvestmentInput, RegulationTable, StandardRegulations};
use reit_calc_core::ReitCalcError;

pub use config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub regulations: Arc<dyn RegulationTable>,
}

impl AppState {
    pub fn new(regulations: Arc<dyn RegulationTable>) -> Self {
        Self { regulations }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(StandardRegulations::default()))
    }
}

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: &'static str,
    pub message: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl ApiError {
    fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: StatusCode::BAD_REQUEST,
        }
    }
}

impl From<ReitCalcError> for ApiError {
    fn from(err: ReitCalcError) -> Self {
        if err.is_validation() {
            Self::bad_request("invalid_input", err.to_string())
        } else {
            Self {
                code: "calculation_failed",
                message: err.to_string(),
                status: StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("invalid_json", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(json!({ "error": self }))).into_response()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/calculate", post(calculate_handler))
        .route("/v1/project-cost", post(project_cost_handler))
        .route("/v1/regulations", get(regulations_handler))
        .with_state(state)
}

async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn calculate_handler(
    State(state): State<AppState>,
    body: Result<Json<InvestmentInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(input) = body?;
    match calculate_with(state.regulations.as_ref(), &input) {
        Ok(output) => {
            tracing::info!(
                country = %output.result.parameters.country,
                elapsed_us = output.metadata.computation_time_us,
                "calculation served"
            );
            Ok(Json(output).into_response())
        }
        Err(err) => {
            tracing::warn!(error = %err, "calculation rejected");
            Err(err.into())
        }
    }
}

async fn project_cost_handler(
    body: Result<Json<InvestmentInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(input) = body?;
    let output = analyze_project_cost(&input)?;
    Ok(Json(output).into_response())
}

async fn regulations_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "regulations": state.regulations.all() }))
}
