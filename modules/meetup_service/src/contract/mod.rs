//! Contract layer - public models, DTOs and errors
//!
//! `model` holds the transport-agnostic entities, `dto` the serde-facing shapes,
//! `mapper` the conversions between the two.

pub mod dto;
pub mod error;
pub mod mapper;
pub mod model;

pub use dto::{EventDto, SpeakerDto, SponsorDto};
pub use error::MeetupError;
pub use model::{EntityKind, Event, NamedEntity, Speaker, Sponsor};
