//! Authentication route handlers.
//!
//! Handles login, registration and logout with username/password accounts.
//! A successful registration logs the new user in.

use axum::{Form, Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use corner_shop_core::forms::SignupInput;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::AuthService;
use crate::state::AppState;

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Who is logged in on this session.
#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub user: Option<CurrentUser>,
}

/// Report the session's login state.
pub async fn status(auth: OptionalAuth) -> Json<SessionStatus> {
    Json(SessionStatus {
        authenticated: auth.0.is_some(),
        user: auth.0,
    })
}

/// Handle login form submission.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Json<CurrentUser>> {
    let user = match AuthService::new(state.pool())
        .login(&form.username, &form.password)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            return Err(e.into());
        }
    };

    let current = start_session(&session, &user).await?;
    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(current))
}

/// Handle registration form submission.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignupInput>,
) -> Result<(StatusCode, Json<CurrentUser>)> {
    let user = AuthService::new(state.pool()).register(&form).await?;

    let current = start_session(&session, &user).await?;
    Ok((StatusCode::CREATED, Json(current)))
}

/// Handle logout.
#[instrument(skip(session, auth))]
pub async fn logout(session: Session, auth: OptionalAuth) -> Result<StatusCode> {
    if let Some(user) = auth.0 {
        clear_current_user(&session).await?;
        clear_sentry_user();
        tracing::info!(user_id = %user.id, "User logged out");
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn start_session(session: &Session, user: &User) -> Result<CurrentUser> {
    let current = CurrentUser::from(user);
    set_current_user(session, &current).await?;
    set_sentry_user(&user.id, &user.username);
    Ok(current)
}
