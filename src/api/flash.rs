//! Redirect responses carrying a one-shot status message.
//!
//! Every mutation answers `303 See Other` pointing back at the list it
//! came from, with a JSON body naming the target and the flash message.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Outcome;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Info,
    Danger,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Flash {
    pub category: FlashCategory,
    #[schema(example = "Asset updated")]
    pub message: String,
}

/// Body of every redirect response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RedirectBody {
    #[schema(example = "/assets")]
    pub redirect: String,
    pub flash: Option<Flash>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashRedirect {
    pub location: String,
    pub flash: Option<Flash>,
}

impl FlashRedirect {
    /// Redirect without a message.
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            flash: None,
        }
    }

    pub fn with(
        location: impl Into<String>,
        category: FlashCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            flash: Some(Flash {
                category,
                message: message.into(),
            }),
        }
    }

    pub fn success(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with(location, FlashCategory::Success, message)
    }

    pub fn info(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with(location, FlashCategory::Info, message)
    }

    pub fn danger(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with(location, FlashCategory::Danger, message)
    }

    pub fn warning(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with(location, FlashCategory::Warning, message)
    }

    /// Turn a service result into a redirect back to `location`.
    ///
    /// Failures the user can act on become `danger` or `info` messages;
    /// anything else (database, internal) propagates.
    pub fn settle<T>(
        location: &str,
        result: AppResult<T>,
        not_found: &str,
        on_ok: impl FnOnce(T) -> FlashRedirect,
    ) -> AppResult<FlashRedirect> {
        match result {
            Ok(value) => Ok(on_ok(value)),
            Err(AppError::NotFound) => Ok(Self::danger(location, not_found)),
            Err(AppError::Forbidden) => Ok(Self::danger(location, AppError::Forbidden.to_string())),
            Err(AppError::Validation(message)) => Ok(Self::danger(location, message)),
            Err(e @ AppError::Conflict(_)) => Ok(Self::info(location, e.user_message())),
            Err(e) => Err(e),
        }
    }

    /// `success` when applied, `info` with the reason when declined.
    pub fn outcome<T>(
        location: &str,
        outcome: Outcome<T>,
        on_applied: impl FnOnce(T) -> String,
    ) -> FlashRedirect {
        match outcome {
            Outcome::Applied(value) => Self::success(location, on_applied(value)),
            Outcome::Declined(reason) => Self::info(location, reason),
        }
    }
}

impl IntoResponse for FlashRedirect {
    fn into_response(self) -> Response {
        let body = RedirectBody {
            redirect: self.location.clone(),
            flash: self.flash,
        };

        (
            StatusCode::SEE_OTHER,
            [(header::LOCATION, self.location)],
            Json(body),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_maps_recoverable_errors() {
        let denied = FlashRedirect::settle::<()>("/assets", Err(AppError::Forbidden), "Asset not found", |_| {
            FlashRedirect::to("/assets")
        })
        .unwrap();
        assert_eq!(denied, FlashRedirect::danger("/assets", "Unauthorised Access"));

        let missing = FlashRedirect::settle::<()>("/assets", Err(AppError::NotFound), "Asset not found", |_| {
            FlashRedirect::to("/assets")
        })
        .unwrap();
        assert_eq!(missing, FlashRedirect::danger("/assets", "Asset not found"));

        let conflict = FlashRedirect::settle::<()>(
            "/assets",
            Err(AppError::conflict("An asset with this serial number")),
            "Asset not found",
            |_| FlashRedirect::to("/assets"),
        )
        .unwrap();
        assert_eq!(conflict.flash.unwrap().category, FlashCategory::Info);
    }

    #[test]
    fn test_settle_propagates_internal_errors() {
        let result = FlashRedirect::settle::<()>("/assets", Err(AppError::internal("boom")), "", |_| {
            FlashRedirect::to("/assets")
        });
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_outcome_categories() {
        let applied = FlashRedirect::outcome("/users", Outcome::Applied("jdoe"), |u| format!("User {} created", u));
        assert_eq!(applied, FlashRedirect::success("/users", "User jdoe created"));

        let declined = FlashRedirect::outcome::<&str>("/users", Outcome::declined("exists"), |_| String::new());
        assert_eq!(declined, FlashRedirect::info("/users", "exists"));
    }

    #[test]
    fn test_redirect_response() {
        let response = FlashRedirect::success("/assets", "Asset approved").into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/assets");
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&FlashCategory::Danger).unwrap();
        assert_eq!(json, "\"danger\"");
    }
}
