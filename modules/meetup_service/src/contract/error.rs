//! Contract error types for meetup service
//!
//! These errors are transport-agnostic; the REST layer maps them to problem responses.

use super::model::EntityKind;

/// Meetup service domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeetupError {
    /// Entity (or the whole collection, when `id` is `None`) not found
    #[error("{}", not_found_message(.kind, .id))]
    NotFound {
        /// Entity kind that was requested
        kind: EntityKind,
        /// Requested identifier
        id: Option<i32>,
    },

    /// Incoming data failed validation
    #[error("Invalid value: {detail}")]
    InvalidValue {
        /// Formatted rule violations
        detail: String,
    },

    /// Internal error (store failures and anything unclassified)
    #[error("Internal error")]
    Internal,
}

impl MeetupError {
    pub fn not_found(kind: EntityKind, id: i32) -> Self {
        Self::NotFound { kind, id: Some(id) }
    }

    pub fn none_found(kind: EntityKind) -> Self {
        Self::NotFound { kind, id: None }
    }

    /// Log the underlying cause and collapse it into [`MeetupError::Internal`]
    pub fn internal(context: &str, cause: anyhow::Error) -> Self {
        tracing::error!(error = ?cause, "{context}");
        Self::Internal
    }
}

fn not_found_message(kind: &EntityKind, id: &Option<i32>) -> String {
    match id {
        Some(id) => format!("{kind} with Id: {id} was not found"),
        None => format!("No {} records were found", kind.as_str()),
    }
}
