//! Search direction and direction-aware time comparisons.

use serde::{Deserialize, Serialize};

/// Direction of a time-dependent search.
///
/// A forward search moves later in time (departure-after queries); a
/// reverse search moves earlier (arrive-by queries). Every time comparison
/// in the boarding search goes through these helpers, so the two directions
/// share one implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchDirection {
    #[default]
    Forward,
    Reverse,
}

impl SearchDirection {
    pub fn is_forward(self) -> bool {
        self == SearchDirection::Forward
    }

    /// Strictly before in search order.
    pub fn is_before(self, a: i32, b: i32) -> bool {
        match self {
            SearchDirection::Forward => a < b,
            SearchDirection::Reverse => a > b,
        }
    }

    /// Before or equal in search order.
    pub fn is_before_or_equal(self, a: i32, b: i32) -> bool {
        a == b || self.is_before(a, b)
    }

    /// Move `time` by `delta` seconds in search order, saturating at the
    /// ends of the time axis.
    pub fn plus(self, time: i32, delta: i32) -> i32 {
        match self {
            SearchDirection::Forward => time.saturating_add(delta),
            SearchDirection::Reverse => time.saturating_sub(delta),
        }
    }

    /// Seconds from `from` to `to` in search order.
    pub fn duration(self, from: i32, to: i32) -> i32 {
        match self {
            SearchDirection::Forward => to.saturating_sub(from),
            SearchDirection::Reverse => from.saturating_sub(to),
        }
    }

    /// The later of two times in search order.
    pub fn max(self, a: i32, b: i32) -> i32 {
        match self {
            SearchDirection::Forward => a.max(b),
            SearchDirection::Reverse => a.min(b),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            SearchDirection::Forward => SearchDirection::Reverse,
            SearchDirection::Reverse => SearchDirection::Forward,
        }
    }
}
