//! API routes for jurisd.
//!
//! Thin HTTP binding over the lifecycle engine: every handler resolves ids,
//! delegates, and maps the typed lifecycle errors onto status codes. No
//! handler touches case state directly.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use juris_common::{
    Advocate, Case, CaseStatus, Classification, IntakeHints, LifecycleError, RankingOutcome,
    UrgencyAssessment,
};

use crate::lifecycle::CaseOutcome;
use crate::server::AppState;

type AppStateArc = Arc<AppState>;

// ============================================================================
// Error mapping
// ============================================================================

/// Wire shape for failures
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

pub struct ApiError(LifecycleError);

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            LifecycleError::InvalidTransition { .. }
            | LifecycleError::StaleState { .. }
            | LifecycleError::AlreadyClaimed => StatusCode::CONFLICT,
            LifecycleError::ProviderUnavailable => StatusCode::UNPROCESSABLE_ENTITY,
            LifecycleError::NotClaimant => StatusCode::FORBIDDEN,
            LifecycleError::CaseNotFound(_) | LifecycleError::AdvocateNotFound(_) => {
                StatusCode::NOT_FOUND
            }
        };
        let body = ErrorBody {
            code: self.0.code(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Case routes
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SubmitCaseRequest {
    pub client_id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitCaseResponse {
    pub case: Case,
    pub classification: Classification,
    pub urgency: UrgencyAssessment,
}

/// Case plus the derived staleness observables
#[derive(Debug, Serialize)]
pub struct CaseView {
    #[serde(flatten)]
    pub case: Case,
    /// Seconds since the last recorded transition
    pub idle_seconds: i64,
    /// True when a pending_acceptance claim has idled past the configured
    /// threshold; expiring it is the caller's transition to make
    pub claim_stale: bool,
}

#[derive(Debug, Deserialize)]
pub struct HireRequest {
    pub advocate_id: Uuid,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RespondAction {
    Accept,
    Reject,
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub advocate_id: Uuid,
    pub action: RespondAction,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    /// The status the caller last read; guards against lost updates
    pub expected: CaseStatus,
    pub status: CaseStatus,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

pub fn case_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/cases", post(submit_case).get(list_cases))
        .route("/v1/cases/:id", get(get_case))
        .route("/v1/cases/:id/recommendations", get(recommendations))
        .route("/v1/cases/:id/hire", post(hire))
        .route("/v1/cases/:id/respond", post(respond))
        .route("/v1/cases/:id/status", put(update_status))
}

async fn submit_case(
    State(state): State<AppStateArc>,
    Json(req): Json<SubmitCaseRequest>,
) -> Json<SubmitCaseResponse> {
    let hints = IntakeHints {
        category: req.category,
        location: req.location,
    };
    let outcome = state
        .engine
        .submit(req.client_id, req.title, req.description, hints)
        .await;
    Json(SubmitCaseResponse {
        case: outcome.case,
        classification: outcome.classification,
        urgency: outcome.urgency,
    })
}

async fn list_cases(State(state): State<AppStateArc>) -> Json<Vec<Case>> {
    Json(state.engine.list_cases().await)
}

async fn get_case(
    State(state): State<AppStateArc>,
    Path(id): Path<Uuid>,
) -> Result<Json<CaseView>, ApiError> {
    let case = state.engine.get_case(id).await?;
    Ok(Json(state.case_view(case)))
}

async fn recommendations(
    State(state): State<AppStateArc>,
    Path(id): Path<Uuid>,
) -> Result<Json<RankingOutcome>, ApiError> {
    let outcome = state.engine.recommendations(id).await?;
    Ok(Json(outcome))
}

async fn hire(
    State(state): State<AppStateArc>,
    Path(id): Path<Uuid>,
    Json(req): Json<HireRequest>,
) -> Result<Json<CaseView>, ApiError> {
    let case = state
        .engine
        .request_assignment(id, req.advocate_id, "client")
        .await?;
    Ok(Json(state.case_view(case)))
}

async fn respond(
    State(state): State<AppStateArc>,
    Path(id): Path<Uuid>,
    Json(req): Json<RespondRequest>,
) -> Result<Json<CaseView>, ApiError> {
    let accept = matches!(req.action, RespondAction::Accept);
    let case = state
        .engine
        .respond_to_assignment(id, req.advocate_id, accept)
        .await?;
    Ok(Json(state.case_view(case)))
}

async fn update_status(
    State(state): State<AppStateArc>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<CaseView>, ApiError> {
    let actor = req.actor.as_deref().unwrap_or("advocate");
    let case = match req.status {
        CaseStatus::Resolved => {
            state
                .engine
                .complete(id, req.expected, CaseOutcome::Resolved, actor, req.note)
                .await?
        }
        CaseStatus::Completed => {
            state
                .engine
                .complete(id, req.expected, CaseOutcome::Completed, actor, req.note)
                .await?
        }
        other => {
            state
                .engine
                .transition(id, req.expected, other, actor, req.note)
                .await?
        }
    };
    Ok(Json(state.case_view(case)))
}

// ============================================================================
// Advocate routes
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterAdvocateRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub specializations: Vec<String>,
    #[serde(default)]
    pub years_experience: u32,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub success_rate: f32,
    #[serde(default)]
    pub accepting_cases: bool,
    #[serde(default)]
    pub verified: bool,
}

pub fn advocate_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/advocates", post(register_advocate).get(list_advocates))
        .route("/v1/advocates/:id", get(get_advocate))
}

async fn register_advocate(
    State(state): State<AppStateArc>,
    Json(req): Json<RegisterAdvocateRequest>,
) -> Json<Advocate> {
    let mut advocate = Advocate::new(req.user_id);
    advocate.specializations = req.specializations;
    advocate.years_experience = req.years_experience;
    advocate.rating = req.rating.clamp(0.0, 5.0);
    advocate.success_rate = req.success_rate.clamp(0.0, 100.0);
    advocate.accepting_cases = req.accepting_cases;
    advocate.verified = req.verified;

    state.engine.register_advocate(advocate.clone()).await;
    Json(advocate)
}

async fn list_advocates(State(state): State<AppStateArc>) -> Json<Vec<Advocate>> {
    Json(state.engine.advocate_pool().await)
}

async fn get_advocate(
    State(state): State<AppStateArc>,
    Path(id): Path<Uuid>,
) -> Result<Json<Advocate>, ApiError> {
    let advocate = state.engine.advocate_view(id).await?;
    Ok(Json(advocate))
}

// ============================================================================
// Health routes
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health))
}

async fn health(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

impl AppState {
    /// Attach the staleness observables to a case for the wire
    pub fn case_view(&self, case: Case) -> CaseView {
        let idle_seconds = case.seconds_since_last_event(Utc::now());
        let claim_stale = case.status == CaseStatus::PendingAcceptance
            && idle_seconds > self.config.stale_claim_secs();
        CaseView {
            case,
            idle_seconds,
            claim_stale,
        }
    }
}
