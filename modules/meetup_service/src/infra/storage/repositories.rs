//! SeaORM repository implementations

use crate::contract::{Event, NamedEntity};
use crate::domain::repository::{dedup_ids, EventRepository, Filter, Repository};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, LoaderTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    TransactionTrait,
};
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;

use super::entity::{event, event_speaker, event_sponsor, speaker, sponsor, NamedTable};
use super::mapper::event_from_rows;

fn named_condition<E: NamedTable>(filter: Option<Filter>) -> Condition {
    match filter {
        None => Condition::all(),
        Some(Filter::Id(id)) => Condition::all().add(E::id_column().eq(id)),
        Some(Filter::Ids(ids)) => Condition::all().add(E::id_column().is_in(ids)),
        Some(Filter::Name(name)) => Condition::all().add(E::name_column().eq(name)),
    }
}

fn event_condition(filter: Option<Filter>) -> Condition {
    match filter {
        None => Condition::all(),
        Some(Filter::Id(id)) => Condition::all().add(event::Column::Id.eq(id)),
        Some(Filter::Ids(ids)) => Condition::all().add(event::Column::Id.is_in(ids)),
        Some(Filter::Name(name)) => Condition::all().add(event::Column::Name.eq(name)),
    }
}

// ===== Speaker / Sponsor Repository =====

/// Repository for any table shaped like `(id, name)`
pub struct SeaOrmNamedRepository<E: NamedTable> {
    db: Arc<DatabaseConnection>,
    _table: PhantomData<fn() -> E>,
}

pub type SeaOrmSpeakerRepository = SeaOrmNamedRepository<speaker::Entity>;
pub type SeaOrmSponsorRepository = SeaOrmNamedRepository<sponsor::Entity>;

impl<E: NamedTable> SeaOrmNamedRepository<E> {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            _table: PhantomData,
        }
    }
}

#[async_trait]
impl<E> Repository<E::Record> for SeaOrmNamedRepository<E>
where
    E: NamedTable,
    E::Model: IntoActiveModel<E::Active>,
{
    async fn get_all(
        &self,
        _include_related: bool,
        filter: Option<Filter>,
    ) -> Result<Option<Vec<E::Record>>> {
        let rows = E::find()
            .filter(named_condition::<E>(filter))
            .order_by_asc(E::id_column())
            .all(&*self.db)
            .await?;

        Ok(Some(rows.into_iter().map(E::to_record).collect()))
    }

    async fn get_one(
        &self,
        _include_related: bool,
        filter: Option<Filter>,
    ) -> Result<Option<E::Record>> {
        let row = E::find()
            .filter(named_condition::<E>(filter))
            .order_by_asc(E::id_column())
            .one(&*self.db)
            .await?;

        Ok(row.map(E::to_record))
    }

    async fn create(&self, entity: &E::Record) -> Result<E::Record> {
        let row = E::insert(E::to_active(entity))
            .exec_with_returning(&*self.db)
            .await?;

        Ok(E::to_record(row))
    }

    async fn update(&self, entity: &E::Record) -> Result<bool> {
        let result = E::update_many()
            .col_expr(E::name_column(), Expr::value(entity.name().to_string()))
            .filter(E::id_column().eq(entity.id()))
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, entity: &E::Record) -> Result<bool> {
        let txn = self.db.begin().await?;

        // Memberships first; the events themselves stay
        let unlink = txn.get_database_backend().build(&E::unlink_events(entity.id()));
        txn.execute(unlink).await?;
        let result = E::delete_many()
            .filter(E::id_column().eq(entity.id()))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }
}

// ===== Event Repository =====

pub struct SeaOrmEventRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmEventRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

async fn load_events(
    db: &impl ConnectionTrait,
    query: Select<event::Entity>,
    include_related: bool,
) -> Result<Vec<Event>> {
    let rows = query.order_by_asc(event::Column::Id).all(db).await?;

    if !include_related {
        return Ok(rows
            .into_iter()
            .map(|row| event_from_rows(row, Vec::new(), Vec::new()))
            .collect());
    }

    let sponsors = rows
        .load_many_to_many(sponsor::Entity, event_sponsor::Entity, db)
        .await?;
    let speakers = rows
        .load_many_to_many(speaker::Entity, event_speaker::Entity, db)
        .await?;

    Ok(rows
        .into_iter()
        .zip(sponsors)
        .zip(speakers)
        .map(|((row, sponsors), speakers)| event_from_rows(row, sponsors, speakers))
        .collect())
}

async fn load_event(db: &impl ConnectionTrait, id: i32) -> Result<Option<Event>> {
    let query = event::Entity::find().filter(event::Column::Id.eq(id)).limit(1);
    Ok(load_events(db, query, true).await?.into_iter().next())
}

/// Requested ids (deduplicated, request order kept) that exist in table `E`
async fn known_ids<E: NamedTable>(db: &impl ConnectionTrait, requested: &[i32]) -> Result<Vec<i32>> {
    let requested = dedup_ids(requested);
    if requested.is_empty() {
        return Ok(requested);
    }

    let found: HashSet<i32> = E::find()
        .filter(E::id_column().is_in(requested.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|row| E::to_record(row).id())
        .collect();

    Ok(requested.into_iter().filter(|id| found.contains(id)).collect())
}

/// Split into (ids to unlink, ids to link)
fn diff_ids(current: &[i32], wanted: &[i32]) -> (Vec<i32>, Vec<i32>) {
    let stale = current
        .iter()
        .copied()
        .filter(|id| !wanted.contains(id))
        .collect();
    let missing = wanted
        .iter()
        .copied()
        .filter(|id| !current.contains(id))
        .collect();
    (stale, missing)
}

pub(super) async fn link_sponsors(db: &impl ConnectionTrait, event_id: i32, ids: &[i32]) -> Result<()> {
    use sea_orm::ActiveValue::Set;

    if ids.is_empty() {
        return Ok(());
    }

    event_sponsor::Entity::insert_many(ids.iter().map(|&sponsor_id| event_sponsor::ActiveModel {
        event_id: Set(event_id),
        sponsor_id: Set(sponsor_id),
    }))
    .exec_without_returning(db)
    .await?;

    Ok(())
}

pub(super) async fn link_speakers(db: &impl ConnectionTrait, event_id: i32, ids: &[i32]) -> Result<()> {
    use sea_orm::ActiveValue::Set;

    if ids.is_empty() {
        return Ok(());
    }

    event_speaker::Entity::insert_many(ids.iter().map(|&speaker_id| event_speaker::ActiveModel {
        event_id: Set(event_id),
        speaker_id: Set(speaker_id),
    }))
    .exec_without_returning(db)
    .await?;

    Ok(())
}

async fn reconcile_sponsors(db: &impl ConnectionTrait, event_id: i32, requested: &[i32]) -> Result<()> {
    let wanted = known_ids::<sponsor::Entity>(db, requested).await?;
    let current: Vec<i32> = event_sponsor::Entity::find()
        .filter(event_sponsor::Column::EventId.eq(event_id))
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.sponsor_id)
        .collect();

    let (stale, missing) = diff_ids(&current, &wanted);
    tracing::debug!(event_id, ?stale, ?missing, "Reconciling event sponsors");

    if !stale.is_empty() {
        event_sponsor::Entity::delete_many()
            .filter(event_sponsor::Column::EventId.eq(event_id))
            .filter(event_sponsor::Column::SponsorId.is_in(stale))
            .exec(db)
            .await?;
    }
    link_sponsors(db, event_id, &missing).await
}

async fn reconcile_speakers(db: &impl ConnectionTrait, event_id: i32, requested: &[i32]) -> Result<()> {
    let wanted = known_ids::<speaker::Entity>(db, requested).await?;
    let current: Vec<i32> = event_speaker::Entity::find()
        .filter(event_speaker::Column::EventId.eq(event_id))
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.speaker_id)
        .collect();

    let (stale, missing) = diff_ids(&current, &wanted);
    tracing::debug!(event_id, ?stale, ?missing, "Reconciling event speakers");

    if !stale.is_empty() {
        event_speaker::Entity::delete_many()
            .filter(event_speaker::Column::EventId.eq(event_id))
            .filter(event_speaker::Column::SpeakerId.is_in(stale))
            .exec(db)
            .await?;
    }
    link_speakers(db, event_id, &missing).await
}

async fn update_columns(db: &impl ConnectionTrait, event: &Event) -> Result<bool> {
    let result = event::Entity::update_many()
        .set(event::ActiveModel::from(event))
        .filter(event::Column::Id.eq(event.id))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

#[async_trait]
impl Repository<Event> for SeaOrmEventRepository {
    async fn get_all(
        &self,
        include_related: bool,
        filter: Option<Filter>,
    ) -> Result<Option<Vec<Event>>> {
        let query = event::Entity::find().filter(event_condition(filter));
        Ok(Some(load_events(&*self.db, query, include_related).await?))
    }

    async fn get_one(&self, include_related: bool, filter: Option<Filter>) -> Result<Option<Event>> {
        let query = event::Entity::find()
            .filter(event_condition(filter))
            .limit(1);
        Ok(load_events(&*self.db, query, include_related)
            .await?
            .into_iter()
            .next())
    }

    /// Insert the event row and one junction row per attached sponsor/speaker
    async fn create(&self, event: &Event) -> Result<Event> {
        let txn = self.db.begin().await?;

        let row = event::Entity::insert(event::ActiveModel::from(event))
            .exec_with_returning(&txn)
            .await?;
        link_sponsors(&txn, row.id, &dedup_ids(&event.sponsor_ids())).await?;
        link_speakers(&txn, row.id, &dedup_ids(&event.speaker_ids())).await?;

        let created = load_event(&txn, row.id)
            .await?
            .ok_or_else(|| anyhow!("event {} missing right after insert", row.id))?;

        txn.commit().await?;
        Ok(created)
    }

    /// Scalar columns only; association sets are left as stored
    async fn update(&self, event: &Event) -> Result<bool> {
        update_columns(&*self.db, event).await
    }

    async fn delete(&self, event: &Event) -> Result<bool> {
        let txn = self.db.begin().await?;

        // Junction rows first, so backends without FK enforcement stay consistent
        event_sponsor::Entity::delete_many()
            .filter(event_sponsor::Column::EventId.eq(event.id))
            .exec(&txn)
            .await?;
        event_speaker::Entity::delete_many()
            .filter(event_speaker::Column::EventId.eq(event.id))
            .exec(&txn)
            .await?;
        let result = event::Entity::delete_many()
            .filter(event::Column::Id.eq(event.id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl EventRepository for SeaOrmEventRepository {
    async fn update_associations(
        &self,
        event: &Event,
        sponsor_ids: &[i32],
        speaker_ids: &[i32],
    ) -> Result<Option<Event>> {
        let txn = self.db.begin().await?;

        // Dropping `txn` without commit rolls back
        if !update_columns(&txn, event).await? {
            return Ok(None);
        }
        reconcile_sponsors(&txn, event.id, sponsor_ids).await?;
        reconcile_speakers(&txn, event.id, speaker_ids).await?;

        let updated = load_event(&txn, event.id).await?;
        txn.commit().await?;
        Ok(updated)
    }
}
