//! Common test utilities: in-memory repositories, publishers and token validators

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};
use meetup_service::api::rest::auth::{AuthError, Claims, TokenValidator};
use meetup_service::contract::{Event, EventDto, NamedEntity, Speaker, Sponsor};
use meetup_service::domain::events::{ChangeEvent, ChangePublisher};
use meetup_service::domain::repository::{dedup_ids, EventRepository, Filter, Repository};
use meetup_service::domain::{EventService, NamedEntityService, NamedResource, NoOpChangePublisher};
use parking_lot::RwLock;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::Arc;

pub const VALID_TOKEN: &str = "valid-token";

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

/// Noon, `days` from today (negative for the past)
pub fn days_from_today(days: i64) -> NaiveDateTime {
    (Utc::now().date_naive() + Duration::days(days))
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

pub fn event_dto(name: &str, sponsors_ids: Vec<i32>, speakers_ids: Vec<i32>) -> EventDto {
    EventDto {
        id: 0,
        name: Some(name.to_string()),
        description: Some("An evening of talks".to_string()),
        plan: Some("Doors 18:00, talks 18:30".to_string()),
        date: Some(days_from_today(30)),
        location: Some("Berlin".to_string()),
        sponsors_ids,
        speakers_ids,
    }
}

/// Fresh in-memory SQLite database (one pooled connection keeps it alive)
pub async fn sqlite_connection() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    Database::connect(options).await.unwrap()
}

fn matches_filter<T: NamedEntity>(entity: &T, filter: &Option<Filter>) -> bool {
    match filter {
        None => true,
        Some(Filter::Id(id)) => entity.id() == *id,
        Some(Filter::Ids(ids)) => ids.contains(&entity.id()),
        Some(Filter::Name(name)) => entity.name() == name,
    }
}

// Mock repository implementations for testing
pub mod mocks {
    use super::*;

    /// In-memory repository for speakers or sponsors
    pub struct MockNamedRepo<T: NamedEntity> {
        data: RwLock<BTreeMap<i32, T>>,
        next_id: AtomicI32,
        create_calls: AtomicUsize,
        unavailable: AtomicBool,
    }

    impl<T: NamedEntity> MockNamedRepo<T> {
        pub fn new() -> Self {
            Self {
                data: RwLock::new(BTreeMap::new()),
                next_id: AtomicI32::new(1),
                create_calls: AtomicUsize::new(0),
                unavailable: AtomicBool::new(false),
            }
        }

        /// Insert directly, bypassing the service
        pub fn insert(&self, name: &str) -> T {
            let mut entity = T::default();
            entity.set_id(self.next_id.fetch_add(1, Ordering::SeqCst));
            entity.set_name(name.to_string());
            self.data.write().insert(entity.id(), entity.clone());
            entity
        }

        pub fn create_calls(&self) -> usize {
            self.create_calls.load(Ordering::SeqCst)
        }

        pub fn len(&self) -> usize {
            self.data.read().len()
        }

        /// Make `get_all` report that no result set could be produced
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        pub fn print_state(&self, context: &str) {
            let data = self.data.read();
            println!("\n========== {} Repository State: {} ==========", T::KIND, context);
            for entity in data.values() {
                println!("  #{} {}", entity.id(), entity.name());
            }
        }
    }

    #[async_trait]
    impl<T: NamedEntity> Repository<T> for MockNamedRepo<T> {
        async fn get_all(&self, _include_related: bool, filter: Option<Filter>) -> anyhow::Result<Option<Vec<T>>> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Ok(None);
            }
            let data = self.data.read();
            Ok(Some(
                data.values()
                    .filter(|e| matches_filter(*e, &filter))
                    .cloned()
                    .collect(),
            ))
        }

        async fn get_one(&self, _include_related: bool, filter: Option<Filter>) -> anyhow::Result<Option<T>> {
            let data = self.data.read();
            Ok(data.values().find(|e| matches_filter(*e, &filter)).cloned())
        }

        async fn create(&self, entity: &T) -> anyhow::Result<T> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            let mut stored = entity.clone();
            stored.set_id(self.next_id.fetch_add(1, Ordering::SeqCst));
            self.data.write().insert(stored.id(), stored.clone());
            Ok(stored)
        }

        async fn update(&self, entity: &T) -> anyhow::Result<bool> {
            let mut data = self.data.write();
            match data.get_mut(&entity.id()) {
                Some(existing) => {
                    *existing = entity.clone();
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete(&self, entity: &T) -> anyhow::Result<bool> {
            Ok(self.data.write().remove(&entity.id()).is_some())
        }
    }

    /// In-memory event repository resolving associations against the participant mocks
    pub struct MockEventRepo {
        data: RwLock<BTreeMap<i32, Event>>,
        next_id: AtomicI32,
        sponsors: Arc<MockNamedRepo<Sponsor>>,
        speakers: Arc<MockNamedRepo<Speaker>>,
    }

    impl MockEventRepo {
        pub fn new(sponsors: Arc<MockNamedRepo<Sponsor>>, speakers: Arc<MockNamedRepo<Speaker>>) -> Self {
            Self {
                data: RwLock::new(BTreeMap::new()),
                next_id: AtomicI32::new(1),
                sponsors,
                speakers,
            }
        }

        pub fn len(&self) -> usize {
            self.data.read().len()
        }

        fn project(event: &Event, include_related: bool) -> Event {
            let mut event = event.clone();
            if !include_related {
                event.sponsors.clear();
                event.speakers.clear();
            }
            event
        }
    }

    #[async_trait]
    impl Repository<Event> for MockEventRepo {
        async fn get_all(&self, include_related: bool, filter: Option<Filter>) -> anyhow::Result<Option<Vec<Event>>> {
            let data = self.data.read();
            Ok(Some(
                data.values()
                    .filter(|e| match &filter {
                        None => true,
                        Some(Filter::Id(id)) => e.id == *id,
                        Some(Filter::Ids(ids)) => ids.contains(&e.id),
                        Some(Filter::Name(name)) => &e.name == name,
                    })
                    .map(|e| Self::project(e, include_related))
                    .collect(),
            ))
        }

        async fn get_one(&self, include_related: bool, filter: Option<Filter>) -> anyhow::Result<Option<Event>> {
            Ok(self
                .get_all(include_related, filter)
                .await?
                .and_then(|events| events.into_iter().next()))
        }

        async fn create(&self, event: &Event) -> anyhow::Result<Event> {
            let mut stored = event.clone();
            stored.id = self.next_id.fetch_add(1, Ordering::SeqCst);
            self.data.write().insert(stored.id, stored.clone());
            Ok(stored)
        }

        async fn update(&self, event: &Event) -> anyhow::Result<bool> {
            let mut data = self.data.write();
            match data.get_mut(&event.id) {
                Some(existing) => {
                    let sponsors = std::mem::take(&mut existing.sponsors);
                    let speakers = std::mem::take(&mut existing.speakers);
                    *existing = Event {
                        sponsors,
                        speakers,
                        ..event.clone()
                    };
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete(&self, event: &Event) -> anyhow::Result<bool> {
            Ok(self.data.write().remove(&event.id).is_some())
        }
    }

    #[async_trait]
    impl EventRepository for MockEventRepo {
        async fn update_associations(
            &self,
            event: &Event,
            sponsor_ids: &[i32],
            speaker_ids: &[i32],
        ) -> anyhow::Result<Option<Event>> {
            if !self.data.read().contains_key(&event.id) {
                return Ok(None);
            }

            let mut sponsors = Vec::new();
            for id in dedup_ids(sponsor_ids) {
                if let Some(s) = self.sponsors.get_one(false, Some(Filter::Id(id))).await? {
                    sponsors.push(s);
                }
            }
            let mut speakers = Vec::new();
            for id in dedup_ids(speaker_ids) {
                if let Some(s) = self.speakers.get_one(false, Some(Filter::Id(id))).await? {
                    speakers.push(s);
                }
            }

            let updated = Event {
                sponsors,
                speakers,
                ..event.clone()
            };
            self.data.write().insert(updated.id, updated.clone());
            Ok(Some(updated))
        }
    }

    /// Publisher remembering every notice it was handed
    #[derive(Default)]
    pub struct RecordingPublisher {
        events: RwLock<Vec<ChangeEvent>>,
    }

    impl RecordingPublisher {
        pub fn events(&self) -> Vec<ChangeEvent> {
            self.events.read().clone()
        }
    }

    #[async_trait]
    impl ChangePublisher for RecordingPublisher {
        async fn publish(&self, event: ChangeEvent) -> anyhow::Result<()> {
            self.events.write().push(event);
            Ok(())
        }
    }

    pub struct FailingPublisher;

    #[async_trait]
    impl ChangePublisher for FailingPublisher {
        async fn publish(&self, _event: ChangeEvent) -> anyhow::Result<()> {
            anyhow::bail!("broker unavailable")
        }
    }

    /// Accepts exactly [`VALID_TOKEN`]
    pub struct StaticTokenValidator;

    #[async_trait]
    impl TokenValidator for StaticTokenValidator {
        async fn validate(&self, token: &str) -> Result<Claims, AuthError> {
            if token == VALID_TOKEN {
                Ok(Claims {
                    sub: Some("alice".to_string()),
                    iss: "http://localhost:5443".to_string(),
                    exp: u64::MAX,
                    client_id: Some("client".to_string()),
                })
            } else {
                Err(AuthError::InvalidToken("signature mismatch".to_string()))
            }
        }
    }
}

use mocks::{MockEventRepo, MockNamedRepo};

/// Services over in-memory repositories, plus handles on those repositories
pub struct TestContext {
    pub events: EventService,
    pub speakers: NamedEntityService<Speaker>,
    pub sponsors: NamedEntityService<Sponsor>,
    pub event_repo: Arc<MockEventRepo>,
    pub speaker_repo: Arc<MockNamedRepo<Speaker>>,
    pub sponsor_repo: Arc<MockNamedRepo<Sponsor>>,
}

pub fn create_test_context() -> TestContext {
    create_test_context_with(Arc::new(NoOpChangePublisher))
}

pub fn create_test_context_with(publisher: Arc<dyn ChangePublisher>) -> TestContext {
    let speaker_repo = Arc::new(MockNamedRepo::<Speaker>::new());
    let sponsor_repo = Arc::new(MockNamedRepo::<Sponsor>::new());
    let event_repo = Arc::new(MockEventRepo::new(sponsor_repo.clone(), speaker_repo.clone()));

    TestContext {
        events: EventService::new(
            event_repo.clone(),
            sponsor_repo.clone(),
            speaker_repo.clone(),
            publisher.clone(),
        ),
        speakers: NamedEntityService::new(speaker_repo.clone(), publisher.clone()),
        sponsors: NamedEntityService::new(sponsor_repo.clone(), publisher),
        event_repo,
        speaker_repo,
        sponsor_repo,
    }
}

/// Name-only DTO for either participant kind
pub fn named_dto<T: NamedResource>(name: &str) -> T::Dto {
    let mut entity = T::default();
    entity.set_name(name.to_string());
    entity.to_dto()
}
