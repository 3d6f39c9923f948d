//! Login and logout.
//!
//! Every failure, from a malformed email to a valid account that is not
//! allow-listed, renders the same message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use twinkle_core::{Email, UserProfile, UserRole};

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalProfile, clear_current_profile, set_current_profile};
use crate::services::{AuthError, SessionEvent};
use crate::state::AppState;

pub const LOGIN_FAILED: &str = "Invalid credentials or unauthorized access.";

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub error: Option<&'static str>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", post(logout))
}

/// GET /auth/login
async fn login_page(
    State(state): State<AppState>,
    OptionalProfile(profile): OptionalProfile,
) -> Response {
    if let Some(profile) = profile
        && state.gate().is_admin(&profile).await
    {
        return Redirect::to("/").into_response();
    }

    LoginTemplate {
        email: String::new(),
        error: None,
    }
    .into_response()
}

/// POST /auth/login
#[instrument(skip(state, session))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    // Pick up allow-list edits made since startup
    state.gate().reload(state.allow_lists()).await;

    match authenticate(&state, &form).await {
        Ok(profile) => {
            set_current_profile(&session, &profile).await?;
            set_sentry_user(
                profile.uid.as_str(),
                profile.email.as_ref().map(Email::as_str),
            );
            if let Some(email) = profile.email {
                state.gate().publish(SessionEvent::SignedIn(email));
            }
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            match &e {
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    tracing::error!(error = %e, "Login failed");
                }
                _ => tracing::warn!(reason = %e, "Login rejected"),
            }
            Ok((
                StatusCode::UNAUTHORIZED,
                LoginTemplate {
                    email: form.email,
                    error: Some(LOGIN_FAILED),
                },
            )
                .into_response())
        }
    }
}

async fn authenticate(state: &AppState, form: &LoginForm) -> std::result::Result<UserProfile, AuthError> {
    let email = Email::parse(form.email.trim()).map_err(|_| AuthError::InvalidCredentials)?;
    let mut profile = state.identity().sign_in(&email, &form.password).await?;

    if !state.gate().is_admin(&profile).await {
        return Err(AuthError::NotAllowListed);
    }

    profile.role = Some(UserRole::Admin);
    Ok(profile)
}

/// POST /auth/logout
async fn logout(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    if let Err(e) = clear_current_profile(&session).await {
        tracing::warn!(error = %e, "Failed to clear session on logout");
    }
    clear_sentry_user();
    state.gate().publish(SessionEvent::SignedOut);

    Redirect::to("/auth/login")
}
