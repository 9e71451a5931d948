use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Redirect;
use tracing::warn;

use crate::db::{resolve_session, DbPool};
use crate::models::User;
use crate::AppState;

/// Represents the authenticated caller; requests without a valid session are
/// redirected to the login page before the handler body runs.
pub struct CurrentUser(pub User);

/// Marks pages meant for anonymous callers only; an authenticated caller is
/// redirected to their task list instead.
pub struct RequireAnonymous;

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = session_user(parts, &state.db) {
            return Ok(CurrentUser(user));
        }

        warn!("Unauthenticated access to a protected route");
        Err(Redirect::to(&state.path("/users/login")))
    }
}

impl FromRequestParts<AppState> for RequireAnonymous {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if session_user(parts, &state.db).is_some() {
            return Err(Redirect::to(&state.path("/users/todolist")));
        }

        Ok(RequireAnonymous)
    }
}

fn session_user(parts: &Parts, db: &DbPool) -> Option<User> {
    let token = cookie_value(parts, "session")?;
    match resolve_session(db, &token) {
        Ok(user) => user,
        Err(err) => {
            warn!(?err, "Session lookup failed");
            None
        }
    }
}

fn cookie_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get_all("cookie")
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|s| s.split(';'))
        .filter_map(|s| {
            let mut parts = s.trim().splitn(2, '=');
            Some((parts.next()?, parts.next()?))
        })
        .find(|(n, _)| *n == name)
        .map(|(_, v)| v.to_string())
}
