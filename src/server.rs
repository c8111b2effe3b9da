use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info, warn};
use serde::Serialize;
use tower::limit::ConcurrencyLimitLayer;

use crate::config::ServerConfig;
use crate::data::{SchedulingInput, SchedulingOutput};
use crate::error::SolveError;
use crate::solver;
use crate::validation::{self, ValidationError};

/// Error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationError>>,
}

/// Ways a solve request can fail.
#[derive(Debug)]
pub enum AppError {
    /// The snapshot violates scheduling preconditions.
    Validation(Vec<ValidationError>),
    /// The solver could not run on this input.
    Solve(SolveError),
    Internal(String),
}

impl From<SolveError> for AppError {
    fn from(e: SolveError) -> Self {
        AppError::Solve(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError {
                    code: "VALIDATION_FAILED",
                    message: format!("{} precondition(s) violated", errors.len()),
                    details: Some(errors),
                },
            ),
            AppError::Solve(e) => (
                StatusCode::BAD_REQUEST,
                ApiError {
                    code: "BAD_REQUEST",
                    message: e.to_string(),
                    details: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError {
                    code: "INTERNAL_ERROR",
                    message: msg,
                    details: None,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

async fn solve_handler(
    Json(input): Json<SchedulingInput>,
) -> Result<Json<SchedulingOutput>, AppError> {
    if !input.skip_validation {
        if let Err(errors) = validation::validate_input(&input) {
            warn!("Rejecting schedule request: {} precondition(s) violated.", errors.len());
            return Err(AppError::Validation(errors));
        }
    }

    let output = tokio::task::spawn_blocking(move || solver::solve(&input))
        .await
        .map_err(|e| {
            error!("Solver task failed: {e}");
            AppError::Internal(e.to_string())
        })??;
    Ok(Json(output))
}

async fn health_handler() -> &'static str {
    "ok"
}

pub fn create_router(config: &ServerConfig) -> Router {
    Router::new()
        .route(
            "/v1/schedule/solve",
            post(solve_handler).layer(ConcurrencyLimitLayer::new(config.max_concurrent_solves)),
        )
        .route("/health", get(health_handler))
}

pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let addr = config
        .socket_addr()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let app = create_router(&config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
