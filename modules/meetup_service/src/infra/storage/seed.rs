//! Schema migration and baseline data at startup

use super::entity::{event, speaker, sponsor};
use super::migrations::Migrator;
use super::repositories::{link_speakers, link_sponsors};
use crate::config::SeedConfig;
use crate::contract::{Event, Speaker, Sponsor};
use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, TransactionTrait};
use sea_orm_migration::MigratorTrait;

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| anyhow!("invalid seed date {year}-{month}-{day} {hour}:{minute}"))
}

/// The two events every fresh database starts with
pub fn preconfigured_events() -> Result<Vec<Event>> {
    Ok(vec![
        Event {
            id: 0,
            name: "CLEAN ARCHITECTURE MASTERCLASS".to_string(),
            description: "Certification masterclasses for .NET software engineers".to_string(),
            plan: ".NET conference Online, practice.".to_string(),
            date: at(2023, 9, 9, 12, 12)?,
            location: "Online".to_string(),
            sponsors: vec![Sponsor::new("Apple"), Sponsor::new("Microsoft")],
            speakers: vec![Speaker::new("John Smith"), Speaker::new("Kate John")],
        },
        Event {
            id: 0,
            name: ".NET DEVELOPER CONFERENCE".to_string(),
            description: "With a variety of talks, workshops, the conference offers developers \
                          a wide range of opportunities to learn about important topics in .NET."
                .to_string(),
            plan: "One working day, lunch break and coffee breaks.".to_string(),
            date: at(2023, 8, 8, 10, 10)?,
            location: "Cologne, Germany. Pullman Cologne Hotel in Cologne.".to_string(),
            sponsors: vec![Sponsor::new("Google"), Sponsor::new("Intel")],
            speakers: vec![Speaker::new("Emily Criss"), Speaker::new("Taylor Grand")],
        },
    ])
}

/// Insert the preconfigured events when the events table is empty
///
/// Returns `true` when rows were written. Everything goes in one transaction.
pub async fn seed(db: &DatabaseConnection) -> Result<bool> {
    if event::Entity::find().count(db).await? > 0 {
        tracing::debug!("Events present, skipping seed");
        return Ok(false);
    }

    let txn = db.begin().await?;

    for preset in preconfigured_events()? {
        let row = event::Entity::insert(event::ActiveModel::from(&preset))
            .exec_with_returning(&txn)
            .await?;

        let mut sponsor_ids = Vec::with_capacity(preset.sponsors.len());
        for s in &preset.sponsors {
            let inserted = sponsor::Entity::insert(sponsor::ActiveModel::from(s))
                .exec_with_returning(&txn)
                .await?;
            sponsor_ids.push(inserted.id);
        }

        let mut speaker_ids = Vec::with_capacity(preset.speakers.len());
        for s in &preset.speakers {
            let inserted = speaker::Entity::insert(speaker::ActiveModel::from(s))
                .exec_with_returning(&txn)
                .await?;
            speaker_ids.push(inserted.id);
        }

        link_sponsors(&txn, row.id, &sponsor_ids).await?;
        link_speakers(&txn, row.id, &speaker_ids).await?;

        tracing::info!(id = row.id, name = %row.name, "Seeded event");
    }

    txn.commit().await?;
    Ok(true)
}

async fn migrate_and_seed_once(db: &DatabaseConnection, config: &SeedConfig) -> Result<()> {
    Migrator::up(db, None).await?;
    if config.enabled {
        seed(db).await?;
    }
    Ok(())
}

/// Apply migrations and seed, retrying up to `max_retries` times after the first failure
pub async fn migrate_and_seed(db: &DatabaseConnection, config: &SeedConfig) -> Result<()> {
    let mut retries = 0;
    loop {
        match migrate_and_seed_once(db, config).await {
            Ok(()) => return Ok(()),
            Err(e) if retries < config.max_retries => {
                retries += 1;
                tracing::error!(
                    retry = retries,
                    max_retries = config.max_retries,
                    error = %e,
                    "Migration or seed failed, retrying"
                );
                if !config.retry_delay.is_zero() {
                    tokio::time::sleep(config.retry_delay).await;
                }
            }
            Err(e) => return Err(e),
        }
    }
}
