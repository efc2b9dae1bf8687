// ABOUTME: Session exchange, refresh and logout endpoints
// ABOUTME: Trades a provider access token for an HttpOnly session cookie and creates the profile on first login

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;

use crate::error::{AppError, Result};
use crate::session;
use crate::types::{SessionRequest, SessionResponse, SuccessResponse};
use crate::AppState;

pub async fn create_session(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<SessionRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let identity = state.identity.verify_access_token(&req.access_token).await?;
    let email = identity.email.unwrap_or_default();

    // First authentication creates the profile row
    let profile = state.storage.ensure_profile(&identity.id, &email).await?;

    let session_id = state
        .sessions
        .create_session(identity.id.clone(), profile.email.clone());
    let cookie = session::create_session_cookie(
        session_id,
        state.config.secure_cookies,
        state.config.session_max_age_secs,
    );
    let jar = jar.add(cookie);

    tracing::info!("Session created for user {}", identity.id);

    Ok((
        jar,
        Json(SessionResponse {
            success: true,
            user_id: profile.id,
            email: profile.email,
            needs_username: profile.username.is_none(),
            username: profile.username,
        }),
    ))
}

pub async fn refresh_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<SuccessResponse>)> {
    let session_id = session::session_id_from_jar(&jar)?;

    state
        .sessions
        .refresh_session(&session_id, state.config.session_max_age_secs)
        .ok_or_else(|| AppError::Unauthorized("Invalid session".to_string()))?;

    let cookie = session::create_session_cookie(
        session_id,
        state.config.secure_cookies,
        state.config.session_max_age_secs,
    );

    Ok((jar.add(cookie), Json(SuccessResponse { success: true })))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<SuccessResponse>)> {
    if let Ok(session_id) = session::session_id_from_jar(&jar) {
        state.sessions.remove_session(&session_id);
    }

    // Expire the cookie whether or not the session was still live
    let logout_cookie = session::create_logout_cookie(state.config.secure_cookies);
    let jar = jar.add(logout_cookie);

    Ok((jar, Json(SuccessResponse { success: true })))
}
