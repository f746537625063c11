//! Contract models for meetup service
//!
//! These models are transport-agnostic and used by the domain and storage layers.
//! NO serde derives - these are pure domain models.

use chrono::NaiveDateTime;

/// Kind of entity managed by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Event,
    Speaker,
    Sponsor,
}

impl EntityKind {
    /// Lowercase name used in logs and change notices
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Speaker => "speaker",
            Self::Sponsor => "sponsor",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Event => write!(f, "Event"),
            Self::Speaker => write!(f, "Speaker"),
            Self::Sponsor => write!(f, "Sponsor"),
        }
    }
}

/// Meetup event with its sponsors and speakers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    /// Store-assigned identity (0 until persisted)
    pub id: i32,
    pub name: String,
    pub description: String,
    pub plan: String,
    pub date: NaiveDateTime,
    pub location: String,
    /// Associated sponsors, order irrelevant
    pub sponsors: Vec<Sponsor>,
    /// Associated speakers, order irrelevant
    pub speakers: Vec<Speaker>,
}

impl Event {
    pub fn sponsor_ids(&self) -> Vec<i32> {
        self.sponsors.iter().map(|s| s.id).collect()
    }

    pub fn speaker_ids(&self) -> Vec<i32> {
        self.speakers.iter().map(|s| s.id).collect()
    }
}

/// Person giving a talk at one or more events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Speaker {
    pub id: i32,
    pub name: String,
}

impl Speaker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }
}

/// Organisation backing one or more events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sponsor {
    pub id: i32,
    pub name: String,
}

impl Sponsor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }
}

/// Shape shared by the entities that only carry a name (speakers and sponsors)
pub trait NamedEntity: Clone + Default + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> i32;

    fn name(&self) -> &str;

    fn set_id(&mut self, id: i32);

    fn set_name(&mut self, name: String);
}

impl NamedEntity for Speaker {
    const KIND: EntityKind = EntityKind::Speaker;

    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl NamedEntity for Sponsor {
    const KIND: EntityKind = EntityKind::Sponsor;

    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}
