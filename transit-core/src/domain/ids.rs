//! Identifier types for catalog entities.
//!
//! Every entity imported from a feed carries an opaque string identifier.
//! The newtypes here keep the different kinds apart at compile time and
//! guarantee that an identifier is non-empty and has no surrounding
//! whitespace. They are backed by `Arc<str>` so cloning is cheap.

use std::fmt;
use std::sync::Arc;

/// Error returned when an identifier fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} id: {reason}")]
pub struct InvalidId {
    kind: &'static str,
    reason: &'static str,
}

fn validate(kind: &'static str, s: &str) -> Result<(), InvalidId> {
    if s.is_empty() {
        return Err(InvalidId {
            kind,
            reason: "cannot be empty",
        });
    }
    if s.trim() != s {
        return Err(InvalidId {
            kind,
            reason: "must not have leading or trailing whitespace",
        });
    }
    Ok(())
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Arc<str>);

        impl $name {
            /// Create a new identifier, rejecting empty or padded strings.
            pub fn new(s: impl Into<String>) -> Result<Self, InvalidId> {
                let s = s.into();
                validate($kind, &s)?;
                Ok(Self(s.into()))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvalidId;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0.to_string()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a physical stop (platform, quay, bus bay).
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_core::domain::StopId;
    ///
    /// let id = StopId::new("NSR:Quay:1").unwrap();
    /// assert_eq!(id.as_str(), "NSR:Quay:1");
    ///
    /// assert!(StopId::new("").is_err());
    /// assert!(StopId::new(" A").is_err());
    /// ```
    StopId,
    "stop"
);

define_id!(
    /// Identifier of a station grouping one or more stops.
    StationId,
    "station"
);

define_id!(
    /// Identifier of a route (line).
    RouteId,
    "route"
);

define_id!(
    /// Identifier of a scheduled or flexible trip.
    TripId,
    "trip"
);

define_id!(
    /// Identifier of a calendar service (the set of dates a trip runs on).
    ServiceId,
    "service"
);

define_id!(
    /// Identifier of a trip pattern.
    PatternId,
    "pattern"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_valid_ids() {
        assert!(StopId::new("A").is_ok());
        assert!(TripId::new("R1-2").is_ok());
        assert!(RouteId::new("R1").is_ok());
        assert!(StationId::new("NSR:StopPlace:337").is_ok());
        assert!(ServiceId::new("WEEKDAY").is_ok());
    }

    #[test]
    fn reject_empty() {
        let err = TripId::new("").unwrap_err();
        assert_eq!(err.to_string(), "invalid trip id: cannot be empty");
    }

    #[test]
    fn reject_padding() {
        assert!(RouteId::new(" R1").is_err());
        assert!(RouteId::new("R1\n").is_err());
        let err = StopId::new("A ").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid stop id: must not have leading or trailing whitespace"
        );
    }

    #[test]
    fn display_and_debug() {
        let id = StationId::new("B").unwrap();
        assert_eq!(id.to_string(), "B");
        assert_eq!(format!("{id:?}"), "StationId(B)");
    }

    #[test]
    fn serde_validates() {
        let id: TripId = serde_json::from_str("\"R2-1\"").unwrap();
        assert_eq!(id.as_str(), "R2-1");
        assert!(serde_json::from_str::<TripId>("\"\"").is_err());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"R2-1\"");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any trimmed non-empty string is accepted and round-trips.
        #[test]
        fn roundtrip(s in "[A-Za-z0-9:_-]{1,24}") {
            let id = StopId::new(s.clone()).unwrap();
            prop_assert_eq!(id.as_str(), s.as_str());
        }

        /// Leading whitespace is always rejected.
        #[test]
        fn leading_space_rejected(s in " [A-Za-z0-9]{0,10}") {
            prop_assert!(TripId::new(s).is_err());
        }
    }
}
