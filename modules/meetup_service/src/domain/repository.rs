//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs

use crate::contract::Event;
use anyhow::Result;
use async_trait::async_trait;

/// Row filter understood by every repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Identity equals
    Id(i32),
    /// Identity is one of
    Ids(Vec<i32>),
    /// Name equals
    Name(String),
}

/// Generic data access for one entity type
///
/// Every mutating call flushes immediately; there is no deferred unit of work.
#[async_trait]
pub trait Repository<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    /// All rows matching `filter`, ordered by identity
    ///
    /// `None` means the store could not produce a result set at all,
    /// which is not the same as zero matching rows.
    async fn get_all(&self, include_related: bool, filter: Option<Filter>)
        -> Result<Option<Vec<T>>>;

    /// First row (lowest identity) matching `filter`
    async fn get_one(&self, include_related: bool, filter: Option<Filter>) -> Result<Option<T>>;

    /// Fetch a row that is about to be attached to another entity's collection
    async fn get_one_for_association(
        &self,
        include_related: bool,
        filter: Option<Filter>,
    ) -> Result<Option<T>> {
        self.get_one(include_related, filter).await
    }

    /// Insert a new row and return it with its assigned identity
    async fn create(&self, entity: &T) -> Result<T>;

    /// Overwrite the row with the entity's identity; `true` if a row changed
    async fn update(&self, entity: &T) -> Result<bool>;

    /// Remove the row with the entity's identity; `true` if a row was removed
    async fn delete(&self, entity: &T) -> Result<bool>;
}

/// Event storage with association reconciliation
#[async_trait]
pub trait EventRepository: Repository<Event> {
    /// Overwrite the event's scalar fields and rebuild both association sets
    ///
    /// Unknown sponsor/speaker ids are skipped. Runs as one transaction.
    /// Returns `None` when the event row does not exist.
    async fn update_associations(
        &self,
        event: &Event,
        sponsor_ids: &[i32],
        speaker_ids: &[i32],
    ) -> Result<Option<Event>>;
}

/// Drop repeated ids, keeping the first occurrence
pub fn dedup_ids(ids: &[i32]) -> Vec<i32> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
