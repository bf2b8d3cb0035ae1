//! Migration: Index the columns used for ownership scoping, cascades
//! and newest-first log listing.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_tables::{Assets, Logs};

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEXES: &[&str] = &[
    "idx_assets_owner_id",
    "idx_assets_department_id",
    "idx_logs_timestamp",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name(INDEXES[0])
                    .table(Assets::Table)
                    .col(Assets::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(INDEXES[1])
                    .table(Assets::Table)
                    .col(Assets::DepartmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(INDEXES[2])
                    .table(Logs::Table)
                    .col(Logs::Timestamp)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(INDEXES[0]).table(Assets::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name(INDEXES[1]).table(Assets::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name(INDEXES[2]).table(Logs::Table).to_owned())
            .await
    }
}
