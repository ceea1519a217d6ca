//! HTTP request handlers for the claims API.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use claims_store::{Claim, ClaimFields, ClaimId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult, MISSING_FIELDS_MESSAGE};
use crate::extract::ClaimBody;
use crate::state::AppState;

/// Body of `POST /submit-claim`, as JSON or a URL-encoded form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitClaimRequest {
    /// Claim date.
    pub claim_date: Option<String>,
    /// Claim category.
    pub category: Option<String>,
    /// Claim description.
    pub description: Option<String>,
}

/// Body of `PUT /claims/{id}`.
///
/// The date travels as `date`; `claimDate` is accepted too.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateClaimRequest {
    /// Claim date.
    #[serde(alias = "claimDate")]
    pub date: Option<String>,
    /// Claim category.
    pub category: Option<String>,
    /// Claim description.
    pub description: Option<String>,
}

/// Response carrying only a status message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Response to a successful submission.
#[derive(Debug, Serialize)]
pub struct SubmitClaimResponse {
    /// Human-readable outcome.
    pub message: String,
    /// The stored claim with its assigned id.
    pub claim: Claim,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status message.
    pub status: String,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
}

/// Absent, null and empty fields all count as missing.
fn required_fields(
    claim_date: Option<String>,
    category: Option<String>,
    description: Option<String>,
) -> ApiResult<ClaimFields> {
    let present = |field: Option<String>| field.filter(|value| !value.is_empty());
    match (present(claim_date), present(category), present(description)) {
        (Some(claim_date), Some(category), Some(description)) => {
            Ok(ClaimFields::new(claim_date, category, description))
        }
        _ => Err(ApiError::InvalidRequest(MISSING_FIELDS_MESSAGE.to_string())),
    }
}

/// Ids that are not non-negative integers can never match a stored claim.
fn parse_claim_id(raw: &str) -> ApiResult<ClaimId> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(raw.to_string()))
}

/// Handle GET /health - health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.uptime_secs(),
    })
}

/// Handle GET /claims - list every stored claim in file order.
pub async fn list_claims(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Claim>>> {
    let claims = state.with_store(|store| store.list()).await?;
    Ok(Json(claims))
}

/// Handle GET /claims/{id} - fetch one claim.
pub async fn get_claim(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Claim>> {
    let claim_id = parse_claim_id(&id)?;

    state
        .with_store(move |store| store.get(claim_id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

/// Handle POST /submit-claim - store a new claim.
pub async fn submit_claim(
    State(state): State<Arc<AppState>>,
    ClaimBody(body): ClaimBody<SubmitClaimRequest>,
) -> ApiResult<Json<SubmitClaimResponse>> {
    let fields = required_fields(body.claim_date, body.category, body.description)?;

    let claim = state.with_store(move |store| store.append(fields)).await?;
    info!(id = %claim.id, category = %claim.category, "claim submitted");

    Ok(Json(SubmitClaimResponse {
        message: "Claim submitted successfully.".to_string(),
        claim,
    }))
}

/// Handle PUT /claims/{id} - replace a claim's fields.
pub async fn update_claim(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ClaimBody(body): ClaimBody<UpdateClaimRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let fields = required_fields(body.date, body.category, body.description)?;
    let claim_id = parse_claim_id(&id)?;

    state
        .with_store(move |store| store.update_by_id(claim_id, fields))
        .await?;
    info!(id = %claim_id, "claim updated");

    Ok(MessageResponse::new("Claim updated successfully."))
}

/// Handle DELETE /claims/{id} - remove a claim.
pub async fn delete_claim(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let claim_id = parse_claim_id(&id)?;

    state
        .with_store(move |store| store.delete_by_id(claim_id))
        .await?;
    info!(id = %claim_id, "claim deleted");

    Ok(MessageResponse::new("Claim deleted successfully."))
}
