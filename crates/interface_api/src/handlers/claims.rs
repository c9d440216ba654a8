//! Claims handlers
//!
//! Handlers translate HTTP into workflow calls and back. They make no role
//! decisions; the workflow service refuses what the caller may not do.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    Extension, Json,
};

use core_kernel::{Actor, ClaimId};

use crate::dto::claims::{ClaimResponse, CreateClaimRequest, RejectRequest, ReviewRequest, UpdateClaimRequest};
use crate::dto::{ApiResponse, Paginated, PaginationQuery};
use crate::error::ApiError;
use crate::extract::{optional_json, ApiJson, ApiPath, ApiQuery};
use crate::AppState;

type ClaimResult = Result<Json<ApiResponse<ClaimResponse>>, ApiError>;

/// Files a new draft claim for the caller
pub async fn create_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ApiJson(request): ApiJson<CreateClaimRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ClaimResponse>>), ApiError> {
    let claim = state.claims.create_claim(&actor, request.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(claim.into()).with_message("claim created")),
    ))
}

/// Lists the caller's own claims
pub async fn list_own_claims(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ApiQuery(query): ApiQuery<PaginationQuery>,
) -> Result<Json<ApiResponse<Paginated<ClaimResponse>>>, ApiError> {
    let page = state.claims.list_own_claims(&actor, query.to_request()?).await?;
    Ok(Json(ApiResponse::ok(Paginated::from_page(page, ClaimResponse::from))))
}

/// Lists every claim the caller's role may see
pub async fn list_all_claims(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ApiQuery(query): ApiQuery<PaginationQuery>,
) -> Result<Json<ApiResponse<Paginated<ClaimResponse>>>, ApiError> {
    let page = state.claims.list_visible_claims(&actor, query.to_request()?).await?;
    Ok(Json(ApiResponse::ok(Paginated::from_page(page, ClaimResponse::from))))
}

/// Gets a claim by ID
pub async fn get_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ApiPath(id): ApiPath<ClaimId>,
) -> ClaimResult {
    let claim = state.claims.get_claim(&actor, id).await?;
    Ok(Json(ApiResponse::ok(claim.into())))
}

/// Edits a draft claim
pub async fn update_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ApiPath(id): ApiPath<ClaimId>,
    ApiJson(request): ApiJson<UpdateClaimRequest>,
) -> ClaimResult {
    let claim = state.claims.update_claim(&actor, id, request.into()).await?;
    Ok(Json(ApiResponse::ok(claim.into()).with_message("claim updated")))
}

/// Deletes a draft claim
pub async fn delete_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ApiPath(id): ApiPath<ClaimId>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.claims.delete_claim(&actor, id).await?;
    Ok(Json(ApiResponse::message("claim deleted")))
}

pub async fn submit_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ApiPath(id): ApiPath<ClaimId>,
) -> ClaimResult {
    let claim = state.claims.submit_claim(&actor, id).await?;
    Ok(Json(ApiResponse::ok(claim.into()).with_message("claim submitted")))
}

/// Marks a submitted claim reviewed; body `{"note": ...}` is optional
pub async fn review_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ApiPath(id): ApiPath<ClaimId>,
    body: Bytes,
) -> ClaimResult {
    let ReviewRequest { note } = optional_json(&body)?;
    let claim = state.claims.review_claim(&actor, id, note).await?;
    Ok(Json(ApiResponse::ok(claim.into()).with_message("claim reviewed")))
}

pub async fn approve_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ApiPath(id): ApiPath<ClaimId>,
) -> ClaimResult {
    let claim = state.claims.approve_claim(&actor, id).await?;
    Ok(Json(ApiResponse::ok(claim.into()).with_message("claim approved")))
}

/// Rejects a reviewed claim; body `{"reason": ...}` is optional
pub async fn reject_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ApiPath(id): ApiPath<ClaimId>,
    body: Bytes,
) -> ClaimResult {
    let RejectRequest { reason } = optional_json(&body)?;
    let claim = state.claims.reject_claim(&actor, id, reason).await?;
    Ok(Json(ApiResponse::ok(claim.into()).with_message("claim rejected")))
}
