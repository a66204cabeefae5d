//! Snapshot build and load errors.

use std::path::PathBuf;

use crate::domain::{DomainError, InvalidId, TimeError};
use crate::flex::FlexError;
use crate::schedule::ScheduleError;
use crate::search::SlackError;
use crate::transfer::TransferError;

/// Errors that abort a snapshot build.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Id(#[from] InvalidId),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Time(#[from] TimeError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Slack(#[from] SlackError),

    /// A transfer rule is malformed
    #[error("transfer #{index}: {source}")]
    Transfer {
        index: usize,
        #[source]
        source: TransferError,
    },

    /// A flex trip is malformed
    #[error("flex trip {trip}: {source}")]
    Flex {
        trip: String,
        #[source]
        source: FlexError,
    },

    /// No window start was configured and the calendar is empty
    #[error("cannot derive a window start from an empty calendar")]
    EmptyCalendar,

    /// Replacement targets a pattern the snapshot does not have
    #[error("unknown pattern: {0}")]
    UnknownPattern(String),

    /// Replacement trip does not run the pattern's stop sequence
    #[error("trip {trip} does not belong to pattern {pattern}")]
    ForeignTrip { trip: String, pattern: String },
}

/// Errors reading a network definition from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
