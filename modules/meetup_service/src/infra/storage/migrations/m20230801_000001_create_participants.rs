//! Speakers and sponsors tables

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Speakers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Speakers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Speakers::Name).string_len(50).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sponsors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sponsors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sponsors::Name).string_len(50).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sponsors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Speakers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum Speakers {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub(super) enum Sponsors {
    Table,
    Id,
    Name,
}
