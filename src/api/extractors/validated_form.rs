//! Form extractors that answer a bad submission with a flash redirect
//! back to the page the form lives on.

use axum::{
    async_trait,
    extract::{rejection::FormRejection, FromRequest, Request},
    Form,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use std::{fmt, str::FromStr};
use validator::Validate;

use crate::api::flash::FlashRedirect;

/// The page a form is submitted from, and where a rejection sends the user.
pub trait FormPage {
    const PAGE: &'static str;
}

/// URL-encoded form extractor with no field rules.
///
/// Forms behind the access policy keep every field a string, so this
/// only rejects a body that is not a form at all. Field checks belong to
/// the service, after the policy has had its say.
pub struct FlashForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for FlashForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + FormPage,
    Form<T>: FromRequest<S, Rejection = FormRejection>,
{
    type Rejection = FlashRedirect;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!(page = T::PAGE, "Rejected form body: {}", e.body_text());
            FlashRedirect::danger(T::PAGE, e.body_text())
        })?;

        Ok(FlashForm(value))
    }
}

/// URL-encoded form extractor that also runs the form's `validator` rules.
///
/// # Example
///
/// ```rust,ignore
/// use serde::Deserialize;
/// use validator::Validate;
/// use asset_tracker::api::extractors::{FormPage, ValidatedForm};
///
/// #[derive(Deserialize, Validate)]
/// struct RegisterForm {
///     #[validate(length(max = 150))]
///     username: String,
/// }
///
/// impl FormPage for RegisterForm {
///     const PAGE: &'static str = "/register";
/// }
///
/// async fn register(ValidatedForm(form): ValidatedForm<RegisterForm>) {
///     // form is already validated
/// }
/// ```
pub struct ValidatedForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + FormPage,
    Form<T>: FromRequest<S, Rejection = FormRejection>,
{
    type Rejection = FlashRedirect;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let FlashForm(value) = FlashForm::<T>::from_request(req, state).await?;

        value
            .validate()
            .map_err(|e| FlashRedirect::danger(T::PAGE, format_validation_errors(&e)))?;

        Ok(ValidatedForm(value))
    }
}

/// Format validation errors into a user-friendly string
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Blank form fields deserialize as `None` instead of failing to parse.
pub fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => FromStr::from_str(s)
            .map_err(serde::de::Error::custom)
            .map(Some),
    }
}

/// Read a checkbox-style field. Absent means unchecked.
pub fn flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "on" | "yes")
    )
}
