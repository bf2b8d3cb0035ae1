//! Asset handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::extractors::{empty_string_as_none, flag, FlashForm, FormPage};
use crate::api::flash::{FlashRedirect, RedirectBody};
use crate::api::AppState;
use crate::config::ASSETS_PAGE;
use crate::domain::{Actor, AssetDraft, AssetView};
use crate::errors::AppResult;

const ASSET_NOT_FOUND: &str = "Asset not found";

/// Asset create/edit form
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssetForm {
    #[serde(default)]
    #[schema(example = "Laptop1")]
    pub name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "empty_string_as_none")]
    #[schema(example = "Laptop")]
    pub asset_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[schema(example = "SN1")]
    pub serial_number: Option<String>,
    /// Checkbox; "on", "true" or "1" when ticked
    #[serde(default)]
    pub in_use: Option<String>,
    /// Checkbox; only an Admin's edit applies it
    #[serde(default)]
    pub approved: Option<String>,
    /// User id; parsed by the service once the edit is allowed
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[schema(example = "2")]
    pub owner_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[schema(example = "1")]
    pub department_id: Option<String>,
}

impl FormPage for AssetForm {
    const PAGE: &'static str = ASSETS_PAGE;
}

impl AssetForm {
    /// Fields for a new asset. `in_use` defaults to ticked.
    fn for_create(self) -> AssetDraft {
        let in_use = self.in_use.as_deref().map_or(true, |v| flag(Some(v)));
        self.into_draft(in_use)
    }

    /// Fields for an edit. Unticked checkboxes are simply absent.
    fn for_edit(self) -> AssetDraft {
        let in_use = flag(self.in_use.as_deref());
        self.into_draft(in_use)
    }

    fn into_draft(self, in_use: bool) -> AssetDraft {
        AssetDraft {
            approved: flag(self.approved.as_deref()),
            name: self.name,
            description: self.description,
            asset_type: self.asset_type,
            serial_number: self.serial_number,
            in_use,
            owner_id: self.owner_id,
            department_id: self.department_id,
        }
    }
}

/// Create asset routes
pub fn asset_routes() -> Router<AppState> {
    Router::new()
        .route("/assets", get(list_assets))
        .route("/asset/create", post(create_asset))
        .route("/asset/edit/:id", post(edit_asset))
        .route("/asset/delete/:id", post(delete_asset))
        .route("/asset/approve/:id", post(approve_asset))
}

/// List the assets visible to the caller
#[utoipa::path(
    get,
    path = "/assets",
    tag = "Assets",
    responses(
        (status = 200, description = "All assets for an Admin, otherwise the caller's own", body = Vec<AssetView>),
        (status = 303, description = "Not logged in")
    ),
    security(("session_cookie" = []))
)]
pub async fn list_assets(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> AppResult<Json<Vec<AssetView>>> {
    let assets = state.assets.list_assets(&actor).await?;
    Ok(Json(assets))
}

/// Create an asset awaiting approval
#[utoipa::path(
    post,
    path = "/asset/create",
    tag = "Assets",
    request_body(content = AssetForm, content_type = "application/x-www-form-urlencoded"),
    responses((status = 303, description = "Back to /assets", body = RedirectBody)),
    security(("session_cookie" = []))
)]
pub async fn create_asset(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    FlashForm(form): FlashForm<AssetForm>,
) -> AppResult<FlashRedirect> {
    let result = state.assets.create_asset(&actor, form.for_create()).await;

    FlashRedirect::settle(ASSETS_PAGE, result, ASSET_NOT_FOUND, |_| {
        FlashRedirect::success(ASSETS_PAGE, "Asset created and awaiting approval")
    })
}

/// Edit an asset the caller owns (any asset for an Admin)
#[utoipa::path(
    post,
    path = "/asset/edit/{id}",
    tag = "Assets",
    params(("id" = i32, Path, description = "Asset ID")),
    request_body(content = AssetForm, content_type = "application/x-www-form-urlencoded"),
    responses((status = 303, description = "Back to /assets", body = RedirectBody)),
    security(("session_cookie" = []))
)]
pub async fn edit_asset(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    FlashForm(form): FlashForm<AssetForm>,
) -> AppResult<FlashRedirect> {
    let result = state.assets.edit_asset(&actor, id, form.for_edit()).await;

    FlashRedirect::settle(ASSETS_PAGE, result, ASSET_NOT_FOUND, |_| {
        FlashRedirect::success(ASSETS_PAGE, "Asset updated")
    })
}

/// Delete an asset the caller owns (any asset for an Admin)
#[utoipa::path(
    post,
    path = "/asset/delete/{id}",
    tag = "Assets",
    params(("id" = i32, Path, description = "Asset ID")),
    responses((status = 303, description = "Back to /assets", body = RedirectBody)),
    security(("session_cookie" = []))
)]
pub async fn delete_asset(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> AppResult<FlashRedirect> {
    let result = state.assets.delete_asset(&actor, id).await;

    FlashRedirect::settle(ASSETS_PAGE, result, ASSET_NOT_FOUND, |_| {
        FlashRedirect::info(ASSETS_PAGE, "Asset deleted")
    })
}

/// Approve an asset (Admin only)
#[utoipa::path(
    post,
    path = "/asset/approve/{id}",
    tag = "Assets",
    params(("id" = i32, Path, description = "Asset ID")),
    responses((status = 303, description = "Back to /assets", body = RedirectBody)),
    security(("session_cookie" = []))
)]
pub async fn approve_asset(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> AppResult<FlashRedirect> {
    let result = state.assets.approve_asset(&actor, id).await;

    FlashRedirect::settle(ASSETS_PAGE, result, ASSET_NOT_FOUND, |_| {
        FlashRedirect::success(ASSETS_PAGE, "Asset approved")
    })
}
