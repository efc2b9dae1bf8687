// ABOUTME: Authentication helper functions for session validation in endpoints
// ABOUTME: Resolves the session owner and checks client-supplied user ids against it

use crate::{error, session, AppState};
use axum_extra::extract::cookie::CookieJar;

pub fn validate_session(jar: &CookieJar, state: &AppState) -> error::Result<session::SessionData> {
    session::extract_session_from_jar(
        jar,
        &state.sessions,
        state.config.session_max_age_secs,
    )
}

/// Session owner, rejecting a body/query user id that names someone else.
pub fn require_owner(
    jar: &CookieJar,
    state: &AppState,
    claimed_user_id: Option<&str>,
) -> error::Result<session::SessionData> {
    let session_data = validate_session(jar, state)?;

    if let Some(claimed) = claimed_user_id {
        if claimed != session_data.user_id {
            return Err(error::AppError::Forbidden(format!(
                "User {} attempted to act as {}",
                session_data.user_id, claimed
            )));
        }
    }

    Ok(session_data)
}
