//! Import issues: references dropped during the build pass.

/// A definition entry dropped because it refers to something that does
/// not exist (or no longer exists after calendar limiting).
///
/// Issues never fail a build; they are collected on the snapshot and
/// logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportIssue {
    #[error("stop {stop} refers to unknown station {station}; parent station dropped")]
    UnknownParentStation { stop: String, station: String },

    #[error("trip {trip} refers to unknown route {route}; trip dropped")]
    UnknownRoute { trip: String, route: String },

    #[error("trip {trip} refers to unknown service {service}; trip dropped")]
    UnknownService { trip: String, service: String },

    #[error("trip {trip} calls at unknown stop {stop}; trip dropped")]
    UnknownStop { trip: String, stop: String },

    #[error("trip {trip} has fewer than two stop times; trip dropped")]
    TooFewStopTimes { trip: String },

    #[error("transfer #{index} refers to missing {point}; transfer dropped")]
    DanglingTransfer { index: usize, point: String },

    #[error("flex trip {trip} refers to missing {what}; flex trip dropped")]
    DanglingFlexTrip { trip: String, what: String },
}
