// ABOUTME: Profile endpoints: username availability, claiming, owner edits and the public page
// ABOUTME: The public page read is the only profile route that needs no session

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth_helpers::{require_owner, validate_session};
use crate::error::{AppError, Result};
use crate::object_store::remove_avatar_best_effort;
use crate::social::normalize_links;
use crate::types::{
    payment_method_responses, CheckUsernameRequest, CheckUsernameResponse, CreateProfileRequest,
    DataResponse, ProfileResponse, PublicProfileResponse, UpdateProfileRequest,
    UpdateSocialLinksRequest,
};
use crate::username::{self, UsernameRejection};
use crate::AppState;

const CHECK_FAILED_MESSAGE: &str = "Error checking username";

/// Availability hint for the username form. Always answers 200.
pub async fn check_username(
    State(state): State<AppState>,
    Json(req): Json<CheckUsernameRequest>,
) -> Json<CheckUsernameResponse> {
    let candidate = req.username.unwrap_or_default();

    // Full claim rules: an available name must be claimable
    let normalized = match username::validate_claim(candidate.trim()) {
        Ok(normalized) => normalized,
        Err(rejection) => {
            return Json(CheckUsernameResponse::unavailable(rejection.message()));
        }
    };

    match state.storage.username_exists(&normalized).await {
        Ok(true) => Json(CheckUsernameResponse::unavailable(None)),
        Ok(false) => Json(CheckUsernameResponse::available()),
        Err(e) => {
            tracing::error!("Username lookup failed for {}: {}", normalized, e);
            Json(CheckUsernameResponse::unavailable(Some(CHECK_FAILED_MESSAGE)))
        }
    }
}

pub async fn create_profile(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<CreateProfileRequest>,
) -> Result<Json<DataResponse<ProfileResponse>>> {
    let (Some(name), Some(user_id), Some(email)) = (
        req.username.filter(|v| !v.trim().is_empty()),
        req.user_id.filter(|v| !v.trim().is_empty()),
        req.email.filter(|v| !v.trim().is_empty()),
    ) else {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    };

    let session_data = require_owner(&jar, &state, Some(user_id.as_str()))?;

    let normalized = username::validate_claim(name.trim()).map_err(|rejection| match rejection {
        UsernameRejection::Reserved => {
            AppError::Conflict(crate::storage::USERNAME_TAKEN_MESSAGE.to_string())
        }
        other => AppError::BadRequest(other.message().unwrap_or_default().to_string()),
    })?;

    let profile = state
        .storage
        .claim_username(&session_data.user_id, email.trim(), &normalized)
        .await?;

    Ok(Json(DataResponse::with_message(
        profile.into(),
        "Profile created successfully",
    )))
}

pub async fn update_social_links(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<UpdateSocialLinksRequest>,
) -> Result<Json<DataResponse<ProfileResponse>>> {
    let session_data = require_owner(&jar, &state, req.user_id.as_deref())?;

    let links = normalize_links(&req.social_links)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let profile = state
        .storage
        .update_social_links(&session_data.user_id, &links)
        .await?;

    Ok(Json(DataResponse::with_message(
        profile.into(),
        "Social links updated successfully",
    )))
}

pub async fn get_own_profile(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<DataResponse<ProfileResponse>>> {
    let session_data = validate_session(&jar, &state)?;

    let profile = state
        .storage
        .get_profile(&session_data.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(DataResponse::new(profile.into())))
}

pub async fn update_profile(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut req): Json<UpdateProfileRequest>,
) -> Result<Json<DataResponse<ProfileResponse>>> {
    let session_data = validate_session(&jar, &state)?;

    if let Some(links) = req.social_links.take() {
        let normalized =
            normalize_links(&links).map_err(|e| AppError::BadRequest(e.to_string()))?;
        req.social_links = Some(normalized);
    }

    let update = state
        .storage
        .update_profile(&session_data.user_id, &req)
        .await?;

    if let Some(old_avatar) = update.replaced_avatar.as_deref() {
        remove_avatar_best_effort(
            state.objects.as_ref(),
            state.config.project_url(),
            &session_data.user_id,
            old_avatar,
        )
        .await;
    }

    Ok(Json(DataResponse::with_message(
        update.profile.into(),
        "Profile updated successfully",
    )))
}

/// Public page data. Unknown usernames get a 404 and nothing else.
pub async fn public_profile(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<PublicProfileResponse>> {
    let (profile, methods) = state
        .storage
        .get_public_profile(&name)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(PublicProfileResponse {
        profile: profile.into(),
        payment_methods: payment_method_responses(methods),
    }))
}
