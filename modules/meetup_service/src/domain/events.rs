//! Change notices for meetup service
//!
//! Published after every successful mutation through a [`ChangePublisher`].
//! Publishing is fire-and-forget: a failed publish is logged and the
//! mutation still succeeds.

use crate::contract::model::EntityKind;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Change notice types
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change_type", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// Entity was created
    Created(ChangeRecord),
    /// Entity was updated
    Updated(ChangeRecord),
    /// Entity was deleted
    Deleted(ChangeRecord),
}

/// Payload shared by all change notices
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRecord {
    /// Entity kind ("event", "speaker", "sponsor")
    pub entity: &'static str,
    /// Entity identifier
    pub id: i32,
    /// Entity name at the time of the change
    pub name: String,
    /// Timestamp of the change
    pub timestamp: DateTime<Utc>,
}

impl ChangeRecord {
    fn new(kind: EntityKind, id: i32, name: &str) -> Self {
        Self {
            entity: kind.as_str(),
            id,
            name: name.to_string(),
            timestamp: Utc::now(),
        }
    }
}

impl ChangeEvent {
    pub fn created(kind: EntityKind, id: i32, name: &str) -> Self {
        Self::Created(ChangeRecord::new(kind, id, name))
    }

    pub fn updated(kind: EntityKind, id: i32, name: &str) -> Self {
        Self::Updated(ChangeRecord::new(kind, id, name))
    }

    pub fn deleted(kind: EntityKind, id: i32, name: &str) -> Self {
        Self::Deleted(ChangeRecord::new(kind, id, name))
    }

    pub fn record(&self) -> &ChangeRecord {
        match self {
            Self::Created(r) | Self::Updated(r) | Self::Deleted(r) => r,
        }
    }
}

/// Side channel for change notices (message queue, audit log, ...)
#[async_trait::async_trait]
pub trait ChangePublisher: Send + Sync {
    async fn publish(&self, event: ChangeEvent) -> anyhow::Result<()>;
}

/// No-op publisher for testing or when notices are disabled
pub struct NoOpChangePublisher;

#[async_trait::async_trait]
impl ChangePublisher for NoOpChangePublisher {
    async fn publish(&self, _event: ChangeEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Publisher that writes each notice as JSON to the `meetup::changes` log target
pub struct LogChangePublisher;

#[async_trait::async_trait]
impl ChangePublisher for LogChangePublisher {
    async fn publish(&self, event: ChangeEvent) -> anyhow::Result<()> {
        let payload = serde_json::to_string(&event)?;
        tracing::info!(target: "meetup::changes", %payload, "change published");
        Ok(())
    }
}

/// Publish without letting a publisher failure reach the caller
pub async fn publish_quietly(publisher: &dyn ChangePublisher, event: ChangeEvent) {
    let record = event.record().clone();
    if let Err(e) = publisher.publish(event).await {
        tracing::warn!(
            entity = record.entity,
            id = record.id,
            error = %e,
            "Failed to publish change notice"
        );
    }
}
