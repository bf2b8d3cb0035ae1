//! API middleware.

mod auth;

pub use auth::{require_login, resolve_actor, session_cookie, session_token, LOGIN_REQUIRED};
