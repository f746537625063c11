//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity::{event, speaker, sponsor};
use crate::contract::{Event, Speaker, Sponsor};
use sea_orm::ActiveValue::{NotSet, Set};

// ===== Speaker / Sponsor Conversions =====

impl From<speaker::Model> for Speaker {
    fn from(model: speaker::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

impl From<&Speaker> for speaker::ActiveModel {
    fn from(record: &Speaker) -> Self {
        Self {
            id: NotSet,
            name: Set(record.name.clone()),
        }
    }
}

impl From<sponsor::Model> for Sponsor {
    fn from(model: sponsor::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

impl From<&Sponsor> for sponsor::ActiveModel {
    fn from(record: &Sponsor) -> Self {
        Self {
            id: NotSet,
            name: Set(record.name.clone()),
        }
    }
}

// ===== Event Conversions =====

/// Assemble an event from its row and the rows reached through the junction tables
pub(super) fn event_from_rows(
    model: event::Model,
    sponsors: Vec<sponsor::Model>,
    speakers: Vec<speaker::Model>,
) -> Event {
    Event {
        id: model.id,
        name: model.name,
        description: model.description,
        plan: model.plan,
        date: model.date,
        location: model.location,
        sponsors: sponsors.into_iter().map(Sponsor::from).collect(),
        speakers: speakers.into_iter().map(Speaker::from).collect(),
    }
}

/// Scalar columns only; associations live in the junction tables
impl From<&Event> for event::ActiveModel {
    fn from(record: &Event) -> Self {
        Self {
            id: NotSet,
            name: Set(record.name.clone()),
            description: Set(record.description.clone()),
            plan: Set(record.plan.clone()),
            date: Set(record.date),
            location: Set(record.location.clone()),
        }
    }
}
