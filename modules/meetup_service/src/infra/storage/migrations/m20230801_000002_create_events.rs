//! Events table and its junction tables

use super::m20230801_000001_create_participants::{Speakers, Sponsors};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Events::Description).text().not_null())
                    .col(ColumnDef::new(Events::Plan).text().not_null())
                    .col(ColumnDef::new(Events::Date).date_time().not_null())
                    .col(ColumnDef::new(Events::Location).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EventSponsors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EventSponsors::EventId).integer().not_null())
                    .col(ColumnDef::new(EventSponsors::SponsorId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(EventSponsors::EventId)
                            .col(EventSponsors::SponsorId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_sponsors_event")
                            .from(EventSponsors::Table, EventSponsors::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_sponsors_sponsor")
                            .from(EventSponsors::Table, EventSponsors::SponsorId)
                            .to(Sponsors::Table, Sponsors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EventSpeakers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EventSpeakers::EventId).integer().not_null())
                    .col(ColumnDef::new(EventSpeakers::SpeakerId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(EventSpeakers::EventId)
                            .col(EventSpeakers::SpeakerId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_speakers_event")
                            .from(EventSpeakers::Table, EventSpeakers::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_speakers_speaker")
                            .from(EventSpeakers::Table, EventSpeakers::SpeakerId)
                            .to(Speakers::Table, Speakers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Reverse lookups: which events does a sponsor/speaker appear in
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_event_sponsors_sponsor")
                    .table(EventSponsors::Table)
                    .col(EventSponsors::SponsorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_event_speakers_speaker")
                    .table(EventSpeakers::Table)
                    .col(EventSpeakers::SpeakerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventSpeakers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EventSponsors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    Name,
    Description,
    Plan,
    Date,
    Location,
}

#[derive(DeriveIden)]
enum EventSponsors {
    Table,
    EventId,
    SponsorId,
}

#[derive(DeriveIden)]
enum EventSpeakers {
    Table,
    EventId,
    SpeakerId,
}
