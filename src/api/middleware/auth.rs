//! Session authentication middleware.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::api::flash::FlashRedirect;
use crate::api::AppState;
use crate::config::{BEARER_TOKEN_PREFIX, LOGIN_PAGE, SESSION_COOKIE};
use crate::domain::Actor;
use crate::errors::AppResult;

pub const LOGIN_REQUIRED: &str = "Please log in to access this page.";

/// Session token from the cookie, falling back to a Bearer header.
pub fn session_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::to_string)
}

/// The HttpOnly session cookie carrying `token`.
pub fn session_cookie(token: impl Into<String>) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.into()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Resolve the caller, if the request carries a live session.
pub async fn resolve_actor(
    state: &AppState,
    jar: &CookieJar,
    headers: &HeaderMap,
) -> AppResult<Option<Actor>> {
    match session_token(jar, headers) {
        Some(token) => state.identity.current_user(&token).await,
        None => Ok(None),
    }
}

/// Require a logged-in user.
///
/// Resolves the session to an [`Actor`] and inserts it into the request
/// extensions. Without one, the client is sent to the login page and
/// any stale session cookie is dropped. Nothing is audited: there is no
/// actor to attribute it to.
pub async fn require_login(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let actor = match resolve_actor(&state, &jar, request.headers()).await {
        Ok(actor) => actor,
        Err(e) => return e.into_response(),
    };

    match actor {
        Some(actor) => {
            tracing::debug!(actor_id = actor.id, "Session resolved");
            request.extensions_mut().insert(actor);
            next.run(request).await
        }
        None => (
            jar.remove(session_cookie("")),
            FlashRedirect::warning(LOGIN_PAGE, LOGIN_REQUIRED),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_token_from_cookie_preferred() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "from-cookie"));
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));

        assert_eq!(session_token(&jar, &headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_token_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));

        assert_eq!(session_token(&CookieJar::new(), &headers).as_deref(), Some("abc.def"));
    }

    #[test]
    fn test_no_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));

        assert!(session_token(&CookieJar::new(), &headers).is_none());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("token");
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }
}
