//! HTTP routes exposing the metric catalog, templates and condition validation.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::condition::{Condition, ConditionDraft};
use crate::feedback::render_feedback_html;
use crate::metric::{catalog, MetricDefinition};
use crate::strategy::{prepare_submission, StrategyDraft, SubmissionError};
use crate::templates::{all_templates, template_by_key, StrategyTemplate};
use crate::validator::{StrategyValidator, ValidationResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub conditions: Vec<ConditionDraft>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRequest {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
}

/// Paths served by [`strategy_router`], in registration order.
pub const STRATEGY_ROUTES: [&str; 6] = [
    "/metrics",
    "/templates",
    "/templates/{key}",
    "/strategies/validate",
    "/strategies/validate/feedback",
    "/strategies/preflight",
];

pub fn strategy_router(validator: Arc<StrategyValidator>) -> Router {
    Router::new()
        .route("/metrics", get(get_metrics))
        .route("/templates", get(get_templates))
        .route("/templates/{key}", get(get_template))
        .route("/strategies/validate", post(post_validate))
        .route("/strategies/validate/feedback", post(post_validate_feedback))
        .route("/strategies/preflight", post(post_preflight))
        .with_state(StrategyAppState { validator })
}

/// Converts form drafts into typed conditions, stopping at the first bad one.
pub fn parse_conditions(drafts: Vec<ConditionDraft>) -> Result<Vec<Condition>, RejectedRequest> {
    drafts
        .into_iter()
        .enumerate()
        .map(|(idx, draft)| {
            Condition::try_from(draft).map_err(|err| RejectedRequest {
                error: err.to_string(),
                condition_index: Some(idx),
                validation: None,
            })
        })
        .collect()
}

#[derive(Clone)]
struct StrategyAppState {
    validator: Arc<StrategyValidator>,
}

async fn get_metrics() -> Json<Vec<MetricDefinition>> {
    Json(catalog())
}

async fn get_templates() -> Json<Vec<StrategyTemplate>> {
    Json(all_templates())
}

async fn get_template(Path(key): Path<String>) -> Response {
    match template_by_key(&key) {
        Some(template) => Json(template).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(RejectedRequest {
                error: format!("unknown template: {key}"),
                condition_index: None,
                validation: None,
            }),
        )
            .into_response(),
    }
}

async fn post_validate(
    State(state): State<StrategyAppState>,
    Json(request): Json<ValidateRequest>,
) -> Response {
    match validate_request(&state, request) {
        Ok(result) => Json(result).into_response(),
        Err(rejected) => unprocessable(rejected),
    }
}

async fn post_validate_feedback(
    State(state): State<StrategyAppState>,
    Json(request): Json<ValidateRequest>,
) -> Response {
    match validate_request(&state, request) {
        Ok(result) => Html(render_feedback_html(&result)).into_response(),
        Err(rejected) => unprocessable(rejected),
    }
}

async fn post_preflight(
    State(state): State<StrategyAppState>,
    Json(draft): Json<StrategyDraft>,
) -> Response {
    info!(
        component = "strategy_server",
        event = "http.preflight.request",
        conditions = draft.conditions.len()
    );

    match prepare_submission(&state.validator, draft) {
        Ok(submission) => Json(submission).into_response(),
        Err(SubmissionError::Blocked(result)) => unprocessable(RejectedRequest {
            error: SubmissionError::Blocked(result.clone()).to_string(),
            condition_index: None,
            validation: Some(result),
        }),
        Err(err) => unprocessable(RejectedRequest {
            error: err.to_string(),
            condition_index: None,
            validation: None,
        }),
    }
}

fn validate_request(
    state: &StrategyAppState,
    request: ValidateRequest,
) -> Result<ValidationResult, RejectedRequest> {
    info!(
        component = "strategy_server",
        event = "http.validate.request",
        conditions = request.conditions.len()
    );

    let conditions = parse_conditions(request.conditions)?;
    Ok(state.validator.validate(&conditions))
}

fn unprocessable(rejected: RejectedRequest) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Json(rejected)).into_response()
}
