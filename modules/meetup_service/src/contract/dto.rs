//! Transport DTOs shared by the services and the REST layer
//!
//! Associations travel as id lists (`SponsorsIds` / `SpeakersIds`), never as nested objects.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Event transport representation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase", default)]
pub struct EventDto {
    /// Store-assigned identifier (ignored on input)
    #[schema(read_only)]
    pub id: i32,

    #[schema(example = "RUST MEETUP")]
    pub name: Option<String>,

    pub description: Option<String>,

    pub plan: Option<String>,

    /// Start of the event; an RFC 3339 offset such as `Z` is accepted and folded into UTC
    #[schema(value_type = Option<String>, example = "2030-09-09T12:00:00")]
    #[serde(with = "event_date")]
    pub date: Option<NaiveDateTime>,

    #[schema(example = "Online")]
    pub location: Option<String>,

    /// Identifiers of the sponsors backing the event
    pub sponsors_ids: Vec<i32>,

    /// Identifiers of the speakers at the event
    pub speakers_ids: Vec<i32>,
}

/// Speaker transport representation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase", default)]
pub struct SpeakerDto {
    #[schema(read_only)]
    pub id: i32,

    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
}

/// Sponsor transport representation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase", default)]
pub struct SponsorDto {
    #[schema(read_only)]
    pub id: i32,

    #[schema(example = "Ferrous Systems")]
    pub name: Option<String>,
}

mod event_date {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        date.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        if let Ok(date) = raw.parse::<NaiveDateTime>() {
            return Ok(Some(date));
        }
        DateTime::parse_from_rfc3339(&raw)
            .map(|date| Some(date.naive_utc()))
            .map_err(|e| de::Error::custom(format!("invalid date '{raw}': {e}")))
    }
}
