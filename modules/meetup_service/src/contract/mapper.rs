//! Mapper implementations for converting between DTOs and contract models
//!
//! Plain field copies. Unmapped target fields keep their defaults:
//! DTO -> Event leaves the association collections empty, the service resolves them.

use super::dto::{EventDto, SpeakerDto, SponsorDto};
use super::model::{Event, Speaker, Sponsor};

// ===== Event conversions =====

impl From<Event> for EventDto {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            sponsors_ids: event.sponsor_ids(),
            speakers_ids: event.speaker_ids(),
            name: Some(event.name),
            description: Some(event.description),
            plan: Some(event.plan),
            date: Some(event.date),
            location: Some(event.location),
        }
    }
}

impl From<EventDto> for Event {
    fn from(dto: EventDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name.unwrap_or_default(),
            description: dto.description.unwrap_or_default(),
            plan: dto.plan.unwrap_or_default(),
            date: dto.date.unwrap_or_default(),
            location: dto.location.unwrap_or_default(),
            sponsors: Vec::new(),
            speakers: Vec::new(),
        }
    }
}

// ===== Speaker conversions =====

impl From<Speaker> for SpeakerDto {
    fn from(speaker: Speaker) -> Self {
        Self {
            id: speaker.id,
            name: Some(speaker.name),
        }
    }
}

impl From<SpeakerDto> for Speaker {
    fn from(dto: SpeakerDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name.unwrap_or_default(),
        }
    }
}

// ===== Sponsor conversions =====

impl From<Sponsor> for SponsorDto {
    fn from(sponsor: Sponsor) -> Self {
        Self {
            id: sponsor.id,
            name: Some(sponsor.name),
        }
    }
}

impl From<SponsorDto> for Sponsor {
    fn from(dto: SponsorDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name.unwrap_or_default(),
        }
    }
}
