//! Domain services - business logic orchestration
//!
//! Each operation validates, maps, talks to the repository, logs and publishes
//! a change notice. Store failures collapse into [`MeetupError::Internal`].

use super::events::{publish_quietly, ChangeEvent, ChangePublisher};
use super::repository::{dedup_ids, EventRepository, Filter, Repository};
use super::validation::{self, ValidationErrors};
use crate::contract::{
    EntityKind, Event, EventDto, MeetupError, NamedEntity, Speaker, SpeakerDto, Sponsor,
    SponsorDto,
};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

/// DTO pairing and validation for the name-only entities
pub trait NamedResource: NamedEntity {
    type Dto: Clone + Send + Sync + 'static;

    fn to_dto(self) -> Self::Dto;

    fn from_dto(dto: Self::Dto) -> Self;

    fn dto_id(dto: &Self::Dto) -> i32;

    fn validate(dto: &Self::Dto) -> Result<(), ValidationErrors>;
}

impl NamedResource for Speaker {
    type Dto = SpeakerDto;

    fn to_dto(self) -> SpeakerDto {
        self.into()
    }

    fn from_dto(dto: SpeakerDto) -> Self {
        dto.into()
    }

    fn dto_id(dto: &SpeakerDto) -> i32 {
        dto.id
    }

    fn validate(dto: &SpeakerDto) -> Result<(), ValidationErrors> {
        validation::validate_speaker(dto)
    }
}

impl NamedResource for Sponsor {
    type Dto = SponsorDto;

    fn to_dto(self) -> SponsorDto {
        self.into()
    }

    fn from_dto(dto: SponsorDto) -> Self {
        dto.into()
    }

    fn dto_id(dto: &SponsorDto) -> i32 {
        dto.id
    }

    fn validate(dto: &SponsorDto) -> Result<(), ValidationErrors> {
        validation::validate_sponsor(dto)
    }
}

fn rejected(kind: EntityKind, errors: ValidationErrors) -> MeetupError {
    tracing::error!(entity = kind.as_str(), %errors, "Validation failed");
    errors.into()
}

fn missing(kind: EntityKind, id: i32, action: &str) -> MeetupError {
    tracing::error!(entity = kind.as_str(), id, "Failed finding {} while {action}", kind.as_str());
    MeetupError::not_found(kind, id)
}

/// Service for speakers and sponsors
pub struct NamedEntityService<T: NamedResource> {
    repo: Arc<dyn Repository<T>>,
    publisher: Arc<dyn ChangePublisher>,
}

pub type SpeakerService = NamedEntityService<Speaker>;
pub type SponsorService = NamedEntityService<Sponsor>;

impl<T: NamedResource> NamedEntityService<T> {
    /// Create a new service instance
    pub fn new(repo: Arc<dyn Repository<T>>, publisher: Arc<dyn ChangePublisher>) -> Self {
        Self { repo, publisher }
    }

    /// All entities, sorted by name
    pub async fn get_all(&self) -> Result<Vec<T::Dto>, MeetupError> {
        let kind = T::KIND;
        let Some(mut entities) = self
            .repo
            .get_all(false, None)
            .await
            .map_err(|e| MeetupError::internal("Failed loading entity list", e))?
        else {
            tracing::error!(entity = kind.as_str(), "Failed loading {} list", kind.as_str());
            return Err(MeetupError::none_found(kind));
        };

        tracing::info!(entity = kind.as_str(), count = entities.len(), "Entities are loaded");

        entities.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(entities.into_iter().map(T::to_dto).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<T::Dto, MeetupError> {
        self.find(id, "loading").await.map(T::to_dto)
    }

    /// Validate and insert; returns the persisted entity including its new id
    pub async fn create(&self, dto: T::Dto) -> Result<T::Dto, MeetupError> {
        T::validate(&dto).map_err(|errors| rejected(T::KIND, errors))?;

        let entity = T::from_dto(dto);
        let created = self
            .repo
            .create(&entity)
            .await
            .map_err(|e| MeetupError::internal("Failed creating entity", e))?;

        tracing::info!(
            entity = T::KIND.as_str(),
            id = created.id(),
            name = created.name(),
            "Created successfully"
        );
        publish_quietly(
            self.publisher.as_ref(),
            ChangeEvent::created(T::KIND, created.id(), created.name()),
        )
        .await;

        Ok(created.to_dto())
    }

    /// Overwrite the name of an existing entity
    pub async fn update(&self, id: i32, dto: T::Dto) -> Result<T::Dto, MeetupError> {
        T::validate(&dto).map_err(|errors| rejected(T::KIND, errors))?;

        let mut existing = self.find(id, "updating data").await?;
        existing.set_name(T::from_dto(dto).name().to_string());

        let changed = self
            .repo
            .update(&existing)
            .await
            .map_err(|e| MeetupError::internal("Failed updating entity", e))?;
        if !changed {
            return Err(missing(T::KIND, id, "updating data"));
        }

        tracing::info!(entity = T::KIND.as_str(), id, "Data has been updated");
        publish_quietly(
            self.publisher.as_ref(),
            ChangeEvent::updated(T::KIND, id, existing.name()),
        )
        .await;

        Ok(existing.to_dto())
    }

    /// Remove an entity and return what was removed
    pub async fn delete(&self, id: i32) -> Result<T::Dto, MeetupError> {
        let existing = self.find(id, "deleting").await?;

        let removed = self
            .repo
            .delete(&existing)
            .await
            .map_err(|e| MeetupError::internal("Failed deleting entity", e))?;
        if !removed {
            return Err(missing(T::KIND, id, "deleting"));
        }

        tracing::info!(entity = T::KIND.as_str(), id, "Removed");
        publish_quietly(
            self.publisher.as_ref(),
            ChangeEvent::deleted(T::KIND, id, existing.name()),
        )
        .await;

        Ok(existing.to_dto())
    }

    async fn find(&self, id: i32, action: &str) -> Result<T, MeetupError> {
        match self
            .repo
            .get_one(false, Some(Filter::Id(id)))
            .await
            .map_err(|e| MeetupError::internal("Failed loading entity", e))?
        {
            Some(entity) if entity.id() == id => Ok(entity),
            _ => Err(missing(T::KIND, id, action)),
        }
    }
}

/// Service for events and their sponsor/speaker associations
pub struct EventService {
    events: Arc<dyn EventRepository>,
    sponsors: Arc<dyn Repository<Sponsor>>,
    speakers: Arc<dyn Repository<Speaker>>,
    publisher: Arc<dyn ChangePublisher>,
}

impl EventService {
    /// Create a new service instance
    pub fn new(
        events: Arc<dyn EventRepository>,
        sponsors: Arc<dyn Repository<Sponsor>>,
        speakers: Arc<dyn Repository<Speaker>>,
        publisher: Arc<dyn ChangePublisher>,
    ) -> Self {
        Self {
            events,
            sponsors,
            speakers,
            publisher,
        }
    }

    /// All events with their associations, sorted by date
    pub async fn get_all(&self) -> Result<Vec<EventDto>, MeetupError> {
        let Some(mut events) = self
            .events
            .get_all(true, None)
            .await
            .map_err(|e| MeetupError::internal("Failed loading events", e))?
        else {
            tracing::error!("Failed loading events list");
            return Err(MeetupError::none_found(EntityKind::Event));
        };

        tracing::info!(count = events.len(), "Events are loaded");

        events.sort_by_key(|e| e.date);
        Ok(events.into_iter().map(EventDto::from).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<EventDto, MeetupError> {
        self.find(id, "loading").await.map(EventDto::from)
    }

    /// Validate, resolve association ids and insert
    ///
    /// Ids that do not resolve to a stored sponsor/speaker are dropped.
    pub async fn create(&self, dto: EventDto) -> Result<EventDto, MeetupError> {
        validation::validate_event(&dto, today())
            .map_err(|errors| rejected(EntityKind::Event, errors))?;

        let sponsor_ids = dedup_ids(&dto.sponsors_ids);
        let speaker_ids = dedup_ids(&dto.speakers_ids);

        let mut event = Event::from(dto);
        event.sponsors.clear();
        event.speakers.clear();

        for id in sponsor_ids {
            match self
                .sponsors
                .get_one_for_association(false, Some(Filter::Id(id)))
                .await
                .map_err(|e| MeetupError::internal("Failed resolving sponsor", e))?
            {
                Some(sponsor) => event.sponsors.push(sponsor),
                None => tracing::debug!(sponsor_id = id, "Skipping unknown sponsor"),
            }
        }

        for id in speaker_ids {
            match self
                .speakers
                .get_one_for_association(false, Some(Filter::Id(id)))
                .await
                .map_err(|e| MeetupError::internal("Failed resolving speaker", e))?
            {
                Some(speaker) => event.speakers.push(speaker),
                None => tracing::debug!(speaker_id = id, "Skipping unknown speaker"),
            }
        }

        let created = self
            .events
            .create(&event)
            .await
            .map_err(|e| MeetupError::internal("Failed creating event", e))?;

        tracing::info!(
            id = created.id,
            sponsors = created.sponsors.len(),
            speakers = created.speakers.len(),
            "An event is created successfully"
        );
        publish_quietly(
            self.publisher.as_ref(),
            ChangeEvent::created(EntityKind::Event, created.id, &created.name),
        )
        .await;

        Ok(created.into())
    }

    /// Overwrite every scalar field and rebuild both association sets
    pub async fn update(&self, id: i32, dto: EventDto) -> Result<EventDto, MeetupError> {
        validation::validate_event(&dto, today())
            .map_err(|errors| rejected(EntityKind::Event, errors))?;

        let existing = self.find(id, "updating data").await?;

        let sponsor_ids = dto.sponsors_ids.clone();
        let speaker_ids = dto.speakers_ids.clone();
        let mut event = Event::from(dto);
        event.id = existing.id;

        let updated = self
            .events
            .update_associations(&event, &sponsor_ids, &speaker_ids)
            .await
            .map_err(|e| MeetupError::internal("Failed updating event", e))?
            .ok_or_else(|| missing(EntityKind::Event, id, "updating data"))?;

        tracing::info!(
            id,
            sponsors = updated.sponsors.len(),
            speakers = updated.speakers.len(),
            "Data for event has been updated"
        );
        publish_quietly(
            self.publisher.as_ref(),
            ChangeEvent::updated(EntityKind::Event, id, &updated.name),
        )
        .await;

        Ok(updated.into())
    }

    /// Remove an event (its association rows go with it) and return what was removed
    pub async fn delete(&self, id: i32) -> Result<EventDto, MeetupError> {
        let existing = self.find(id, "deleting").await?;

        let removed = self
            .events
            .delete(&existing)
            .await
            .map_err(|e| MeetupError::internal("Failed deleting event", e))?;
        if !removed {
            return Err(missing(EntityKind::Event, id, "deleting"));
        }

        tracing::info!(id, "Event is removed");
        publish_quietly(
            self.publisher.as_ref(),
            ChangeEvent::deleted(EntityKind::Event, id, &existing.name),
        )
        .await;

        Ok(existing.into())
    }

    async fn find(&self, id: i32, action: &str) -> Result<Event, MeetupError> {
        match self
            .events
            .get_one(true, Some(Filter::Id(id)))
            .await
            .map_err(|e| MeetupError::internal("Failed loading event", e))?
        {
            Some(event) if event.id == id => Ok(event),
            _ => Err(missing(EntityKind::Event, id, action)),
        }
    }
}

/// The three services, shared by the REST layer
#[derive(Clone)]
pub struct MeetupServices {
    pub events: Arc<EventService>,
    pub speakers: Arc<SpeakerService>,
    pub sponsors: Arc<SponsorService>,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
