//! Login handler

use axum::{extract::State, Json};
use tracing::info;

use domain_identity::LoginRequest;

use crate::auth::create_token;
use crate::dto::auth::LoginResponse;
use crate::dto::ApiResponse;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::AppState;

/// Exchanges a username and password for a bearer token
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let user = state.login.authenticate(&request).await?;

    let token = create_token(
        &user.actor(),
        &state.config.jwt_secret,
        state.config.jwt_expiration_secs,
    )?;

    info!(user_id = %user.id, role = %user.role, "Token issued");
    Ok(Json(ApiResponse::ok(LoginResponse {
        token,
        user: (&user).into(),
    })))
}
