//! Transport modes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Transport mode of a route or trip.
///
/// Modes have a dense index so per-mode tables (board/alight slack) can be
/// plain arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitMode {
    Bus,
    Tram,
    Subway,
    Rail,
    Ferry,
    Coach,
    Funicular,
    Gondola,
    Flex,
}

impl TransitMode {
    /// Number of modes; the length of any per-mode table.
    pub const COUNT: usize = 9;

    /// All modes in index order.
    pub const ALL: [TransitMode; Self::COUNT] = [
        TransitMode::Bus,
        TransitMode::Tram,
        TransitMode::Subway,
        TransitMode::Rail,
        TransitMode::Ferry,
        TransitMode::Coach,
        TransitMode::Funicular,
        TransitMode::Gondola,
        TransitMode::Flex,
    ];

    /// Dense index in `[0, COUNT)`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransitMode::Bus => "bus",
            TransitMode::Tram => "tram",
            TransitMode::Subway => "subway",
            TransitMode::Rail => "rail",
            TransitMode::Ferry => "ferry",
            TransitMode::Coach => "coach",
            TransitMode::Funicular => "funicular",
            TransitMode::Gondola => "gondola",
            TransitMode::Flex => "flex",
        }
    }
}

impl fmt::Display for TransitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
