//! Admin authorization extractors.
//!
//! A session holds the signed-in [`UserProfile`]. That alone is not enough:
//! [`RequireAdmin`] refreshes the gate from the stored allow-list and asks it
//! on every request, so an address removed from the list (for example with
//! `twinkle allow-list remove`) loses access on its next request.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use twinkle_core::UserProfile;

use crate::models::session_keys;
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/auth/login";

/// Extractor for routes that need an allow-listed, signed-in admin.
pub struct RequireAdmin(pub UserProfile);

/// Why [`RequireAdmin`] refused the request.
#[derive(Debug)]
pub enum AdminRejection {
    /// HTML pages are sent to the login form.
    RedirectToLogin,
    /// `/api` callers get a bare 401.
    Unauthorized,
}

impl AdminRejection {
    fn for_path(path: &str) -> Self {
        if path.starts_with("/api/") {
            Self::Unauthorized
        } else {
            Self::RedirectToLogin
        }
    }
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let rejection = || AdminRejection::for_path(parts.uri.path());

        let session = parts.extensions.get::<Session>().ok_or_else(rejection)?;
        let profile: UserProfile = session
            .get(session_keys::CURRENT_PROFILE)
            .await
            .ok()
            .flatten()
            .ok_or_else(rejection)?;

        state.gate().reload(state.allow_lists()).await;
        if !state.gate().is_admin(&profile).await {
            tracing::warn!(uid = %profile.uid, "Session no longer allow-listed");
            return Err(rejection());
        }

        Ok(Self(profile))
    }
}

/// The signed-in profile, if any, without the allow-list check.
pub struct OptionalProfile(pub Option<UserProfile>);

impl<S> FromRequestParts<S> for OptionalProfile
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let profile = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<UserProfile>(session_keys::CURRENT_PROFILE)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(profile))
    }
}

/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_profile(
    session: &Session,
    profile: &UserProfile,
) -> Result<(), tower_sessions::session::Error> {
    // New id on privilege change
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_PROFILE, profile).await
}

/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_profile(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
