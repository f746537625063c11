//! Meetup Service Module
//!
//! CRUD API for meetup events, the speakers who talk at them and the sponsors
//! who back them. Every route sits behind OpenID Connect bearer authentication.

// Public exports
pub mod contract;
pub use contract::{
    EntityKind, Event, EventDto, MeetupError, Speaker, SpeakerDto, Sponsor, SponsorDto,
};

pub mod config;
pub use config::Config;

pub mod module;
pub use module::MeetupModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
