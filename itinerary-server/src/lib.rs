//! HTTP layer for the travel planner: `POST /plan` and `GET /health`.
//!
//! One compiled graph is built at startup and shared by every request; each request
//! gets its own run. Failed runs map to a status code and a machine-readable `code`,
//! and the body carries the partial record.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use itinerary::{plan_trip, PlanConfig, PlanRequest, PlanResponse};
use serde::Serialize;
use stategraph::{CompiledStateGraph, ErrorKind, InvokeError, Record};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info_span;

/// Shared state for all routes.
pub struct AppState {
    pub graph: CompiledStateGraph,
    /// Node invocations allowed per request.
    pub step_budget: usize,
}

/// Server config: listen address plus the planner config. Filled from env / .env.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub plan: PlanConfig,
}

impl ServerConfig {
    /// `BIND_ADDR` (default `127.0.0.1:8000`) and the `ITINERARY_*` planner variables.
    pub fn from_env() -> Result<Self, itinerary::Error> {
        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string()),
            plan: PlanConfig::from_env()?,
        })
    }
}

/// Routes with request tracing and permissive CORS.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/plan", post(plan))
        .layer(
            TraceLayer::new_for_http().make_span_with(
                |req: &axum::http::Request<axum::body::Body>| {
                    info_span!("request", method = %req.method(), uri = %req.uri())
                },
            ),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn plan(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, ServerError> {
    let plan = plan_trip(&state.graph, request, state.step_budget).await?;
    Ok(Json(plan))
}

/// A failed `/plan` request.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Invoke(InvokeError),
    #[error("{0}")]
    Internal(String),
}

impl From<itinerary::Error> for ServerError {
    fn from(e: itinerary::Error) -> Self {
        match e {
            itinerary::Error::Invoke(e) => ServerError::Invoke(e),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

/// 508 for an exhausted step budget, 500 for everything else.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::StepBudgetExceeded => StatusCode::LOOP_DETECTED,
        ErrorKind::NodeFailure
        | ErrorKind::MergeConflict
        | ErrorKind::IncompleteJoin
        | ErrorKind::InvalidHistory
        | ErrorKind::UnroutableLabel => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<&'a Record>,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ServerError::Invoke(e) => {
                tracing::warn!(code = e.kind().as_str(), error = %e, "plan failed");
                (
                    status_for(e.kind()),
                    ErrorBody {
                        code: e.kind().as_str(),
                        message: e.to_string(),
                        record: Some(e.record()),
                    },
                )
            }
            ServerError::Internal(msg) => {
                tracing::error!(error = %msg, "plan failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "internal",
                        message: msg.clone(),
                        record: None,
                    },
                )
            }
        };
        (status, Json(serde_json::json!({ "error": body }))).into_response()
    }
}
