// ABOUTME: Endpoints for verified social account connections
// ABOUTME: One connection per platform per profile; an external account links to one profile only

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth_helpers::validate_session;
use crate::error::{AppError, Result};
use crate::types::{DataResponse, SocialConnectionRequest, SocialConnectionResponse, SuccessResponse};
use crate::AppState;

pub async fn list_social_connections(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<DataResponse<Vec<SocialConnectionResponse>>>> {
    let session_data = validate_session(&jar, &state)?;

    let connections = state
        .storage
        .list_social_connections(&session_data.user_id)
        .await?
        .into_iter()
        .map(SocialConnectionResponse::from)
        .collect();

    Ok(Json(DataResponse::new(connections)))
}

pub async fn create_social_connection(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<SocialConnectionRequest>,
) -> Result<Json<DataResponse<SocialConnectionResponse>>> {
    let session_data = validate_session(&jar, &state)?;

    if req.platform.trim().is_empty()
        || req.platform_user_id.trim().is_empty()
        || req.platform_username.trim().is_empty()
    {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    }

    let connection = state
        .storage
        .upsert_social_connection(&session_data.user_id, &req)
        .await?;

    Ok(Json(DataResponse::new(connection.into())))
}

pub async fn delete_social_connection(
    State(state): State<AppState>,
    Path(platform): Path<String>,
    jar: CookieJar,
) -> Result<Json<SuccessResponse>> {
    let session_data = validate_session(&jar, &state)?;

    state
        .storage
        .delete_social_connection(&session_data.user_id, &platform)
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}
