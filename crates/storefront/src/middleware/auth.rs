//! Authentication extractor and session helpers.
//!
//! Handlers never reject at the extractor level: they pass the optional
//! viewer into the service, which decides between unauthenticated, forbidden
//! and allowed. `AppError` turns the unauthenticated case into a redirect to
//! [`LOGIN_PATH`].

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use corner_shop_core::Viewer;

use crate::models::{CurrentUser, session_keys};

/// Where unauthenticated browsers are sent.
pub const LOGIN_PATH: &str = "/auth/login";

/// Extractor that optionally gets the current user.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(auth: OptionalAuth, State(state): State<AppState>) -> Result<Json<CartView>> {
///     Ok(Json(CartService::new(state.pool()).view(auth.viewer()).await?))
/// }
/// ```
pub struct OptionalAuth(pub Option<CurrentUser>);

impl OptionalAuth {
    /// The caller identity to hand to services.
    #[must_use]
    pub fn viewer(&self) -> Option<Viewer> {
        self.0.as_ref().map(CurrentUser::viewer)
    }
}

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Helper to set the current user in the session.
///
/// The session ID is cycled first so a pre-login session cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to end the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;
    use corner_shop_core::{Role, UserId};

    use super::*;

    #[tokio::test]
    async fn test_no_session_means_no_viewer() {
        let (mut parts, ()) = Request::builder()
            .uri("/cart")
            .body(())
            .unwrap()
            .into_parts();

        let Ok(auth) = OptionalAuth::from_request_parts(&mut parts, &()).await;
        assert!(auth.viewer().is_none());
    }

    #[test]
    fn test_viewer_from_session_user() {
        let auth = OptionalAuth(Some(CurrentUser {
            id: UserId::new(7),
            username: "shopper_1".to_owned(),
            role: Role::EndUser,
        }));
        assert_eq!(
            auth.viewer(),
            Some(Viewer::new(UserId::new(7), Role::EndUser))
        );
    }
}
