//! Domain layer - business logic and services

pub mod events;
pub mod repository;
pub mod service;
pub mod validation;

pub use events::{ChangeEvent, ChangePublisher, LogChangePublisher, NoOpChangePublisher};
pub use repository::{EventRepository, Filter, Repository};
pub use service::{
    EventService, MeetupServices, NamedEntityService, NamedResource, SpeakerService, SponsorService,
};
