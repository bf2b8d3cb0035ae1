//! API layer - HTTP handlers and middleware
//!
//! This module contains all HTTP-related concerns:
//! - Request handlers
//! - Session middleware
//! - Form extractors
//! - Redirect and flash responses
//! - Route definitions

pub mod extractors;
pub mod flash;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use flash::{Flash, FlashCategory, FlashRedirect, RedirectBody};
pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
