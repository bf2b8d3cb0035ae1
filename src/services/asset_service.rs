//! Asset service - The asset registry and its approval workflow.

use async_trait::async_trait;
use sea_orm::ConnectionTrait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::audit_service::refuse;
use super::checks;
use crate::config::NAME_MAX_LENGTH;
use crate::domain::{
    AccessPolicy, Action, Actor, Asset, AssetDraft, AssetFields, AssetView, Dashboard, Metrics,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{
    AssetFilter, AssetStore, DepartmentStore, TransactionContext, UnitOfWork, UserStore,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AssetService: Send + Sync {
    /// Assets visible to the actor, with owner and department names.
    async fn list_assets(&self, actor: &Actor) -> AppResult<Vec<AssetView>>;

    /// Create an asset. It always starts unapproved.
    async fn create_asset(&self, actor: &Actor, draft: AssetDraft) -> AppResult<Asset>;

    async fn edit_asset(&self, actor: &Actor, id: i32, draft: AssetDraft) -> AppResult<Asset>;

    async fn delete_asset(&self, actor: &Actor, id: i32) -> AppResult<Asset>;

    /// Mark an asset approved. Admin only; approving twice is fine.
    async fn approve_asset(&self, actor: &Actor, id: i32) -> AppResult<Asset>;

    /// Unapproved assets in the actor's scope plus global counters.
    async fn dashboard(&self, actor: &Actor) -> AppResult<Dashboard>;
}

pub struct AssetRegistry {
    uow: Arc<dyn UnitOfWork>,
}

impl AssetRegistry {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }
}

/// Attach current owner usernames and department names.
///
/// References that no longer resolve are left as `None`.
async fn annotate<C: ConnectionTrait>(
    users: UserStore<'_, C>,
    departments: DepartmentStore<'_, C>,
    assets: Vec<Asset>,
) -> AppResult<Vec<AssetView>> {
    let owner_ids: BTreeSet<i32> = assets.iter().filter_map(|a| a.owner_id).collect();
    let department_ids: BTreeSet<i32> = assets.iter().filter_map(|a| a.department_id).collect();

    let usernames: HashMap<i32, String> = users
        .find_many(owner_ids.into_iter().collect())
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();
    let department_names: HashMap<i32, String> = departments
        .find_many(department_ids.into_iter().collect())
        .await?
        .into_iter()
        .map(|d| (d.id, d.name))
        .collect();

    Ok(assets
        .into_iter()
        .map(|asset| AssetView {
            owner_username: asset.owner_id.and_then(|id| usernames.get(&id).cloned()),
            department_name: asset
                .department_id
                .and_then(|id| department_names.get(&id).cloned()),
            asset,
        })
        .collect())
}

/// Check a submission and resolve it into storable fields.
///
/// Name is required, lengths are bounded, and the referenced owner and
/// department must exist.
async fn check_fields(tx: &TransactionContext, draft: AssetDraft) -> AppResult<AssetFields> {
    let name = checks::required(
        draft.name,
        NAME_MAX_LENGTH,
        "Asset name is required",
        "Asset name is too long",
    )?;
    checks::bounded(&draft.serial_number, NAME_MAX_LENGTH, "Serial number is too long")?;

    let owner_id = checks::reference(draft.owner_id.as_deref(), "Assigned user does not exist")?;
    if let Some(owner_id) = owner_id {
        if tx.users().find_by_id(owner_id).await?.is_none() {
            return Err(AppError::validation("Assigned user does not exist"));
        }
    }
    let department_id =
        checks::reference(draft.department_id.as_deref(), "Department does not exist")?;
    if let Some(department_id) = department_id {
        if tx.departments().find_by_id(department_id).await?.is_none() {
            return Err(AppError::validation("Department does not exist"));
        }
    }

    Ok(AssetFields {
        name,
        description: draft.description,
        asset_type: draft.asset_type,
        serial_number: draft.serial_number,
        in_use: draft.in_use,
        approved: draft.approved,
        owner_id,
        department_id,
    })
}

#[async_trait]
impl AssetService for AssetRegistry {
    async fn list_assets(&self, actor: &Actor) -> AppResult<Vec<AssetView>> {
        let tx = self.uow.begin().await?;

        let filter = AssetFilter::scoped(AccessPolicy::asset_scope(actor));
        let assets = tx.assets().list(filter).await?;
        let views = annotate(tx.users(), tx.departments(), assets).await?;

        tx.audit()
            .record(actor.id, format!("Assets viewed by {}", actor))
            .await?;
        tx.commit().await?;

        Ok(views)
    }

    async fn create_asset(&self, actor: &Actor, draft: AssetDraft) -> AppResult<Asset> {
        let tx = self.uow.begin().await?;
        let fields = check_fields(&tx, draft).await?;

        let asset = tx
            .assets()
            .insert(AssetFields {
                approved: false,
                ..fields
            })
            .await?;

        tx.audit()
            .record(
                actor.id,
                format!(
                    "Asset (ID: {}, Name: {}) created by {}",
                    asset.id, asset.name, actor
                ),
            )
            .await?;
        tx.commit().await?;

        Ok(asset)
    }

    async fn edit_asset(&self, actor: &Actor, id: i32, draft: AssetDraft) -> AppResult<Asset> {
        let tx = self.uow.begin().await?;
        let current = tx.assets().find_by_id(id).await?.ok_or(AppError::NotFound)?;

        let action = Action::EditAsset {
            owner_id: current.owner_id,
        };
        if let Err(denial) = AccessPolicy::decide(actor, action).into_result() {
            let message = format!(
                "Asset (ID: {}, Name: {}) tried to be updated by {}",
                current.id, current.name, actor
            );
            return refuse(tx, actor, denial, message).await;
        }

        let fields = check_fields(&tx, draft).await?;

        // Non-admin submissions of the flag are ignored, not rejected
        let approved = if AccessPolicy::may_set_approval(actor) {
            fields.approved
        } else {
            current.approved
        };
        let asset = tx
            .assets()
            .update(id, AssetFields { approved, ..fields })
            .await?;

        tx.audit()
            .record(
                actor.id,
                format!(
                    "Asset (ID: {}, Name: {}) updated by {}",
                    asset.id, asset.name, actor
                ),
            )
            .await?;
        tx.commit().await?;

        Ok(asset)
    }

    async fn delete_asset(&self, actor: &Actor, id: i32) -> AppResult<Asset> {
        let tx = self.uow.begin().await?;
        let asset = tx.assets().find_by_id(id).await?.ok_or(AppError::NotFound)?;

        let action = Action::DeleteAsset {
            owner_id: asset.owner_id,
        };
        if let Err(denial) = AccessPolicy::decide(actor, action).into_result() {
            let message = format!(
                "Asset (ID: {}, Name: {}) tried to be deleted by {}",
                asset.id, asset.name, actor
            );
            return refuse(tx, actor, denial, message).await;
        }

        tx.assets().delete(id).await?;
        tx.audit()
            .record(
                actor.id,
                format!(
                    "Asset (ID: {}, Name: {}) deleted by {}",
                    asset.id, asset.name, actor
                ),
            )
            .await?;
        tx.commit().await?;

        Ok(asset)
    }

    async fn approve_asset(&self, actor: &Actor, id: i32) -> AppResult<Asset> {
        let tx = self.uow.begin().await?;

        // Checked before the lookup: a denied approve is logged even for unknown ids
        if let Err(denial) = AccessPolicy::decide(actor, Action::ApproveAsset).into_result() {
            let message = format!("Asset (ID: {}) tried to be approved by {}", id, actor);
            return refuse(tx, actor, denial, message).await;
        }

        let asset = tx.assets().set_approved(id, true).await?;
        tx.audit()
            .record(
                actor.id,
                format!(
                    "Asset (ID: {}, Name: {}) approved by {}",
                    asset.id, asset.name, actor
                ),
            )
            .await?;
        tx.commit().await?;

        Ok(asset)
    }

    async fn dashboard(&self, actor: &Actor) -> AppResult<Dashboard> {
        let conn = self.uow.connection();
        let assets = AssetStore::new(conn);

        let scoped = AssetFilter::scoped(AccessPolicy::asset_scope(actor));
        let pending = assets.list(scoped.approved(false)).await?;

        // Counters cover every asset regardless of who is looking
        let metrics = Metrics {
            total_assets: assets.count(AssetFilter::default()).await?,
            pending_assets: assets.count(AssetFilter::default().approved(false)).await?,
            total_users: UserStore::new(conn).count().await?,
            total_departments: DepartmentStore::new(conn).count().await?,
        };
        let pending = annotate(UserStore::new(conn), DepartmentStore::new(conn), pending).await?;

        Ok(Dashboard { pending, metrics })
    }
}
