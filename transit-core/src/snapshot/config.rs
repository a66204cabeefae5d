//! Build configuration for transit snapshots.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::TransitMode;
use crate::search::{SlackError, SlackProvider};
use crate::transfer::TransferTimingConfig;

/// Configuration parameters for building a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Feed time zone, a tz database name.
    pub time_zone: String,

    /// First service date of the search window.
    /// Defaults to the earliest calendar date.
    pub window_start: Option<NaiveDate>,

    /// Number of service days in the search window.
    pub window_days: u16,

    /// Board slack for modes without an override (seconds).
    pub board_slack_secs: i32,

    /// Per-mode board slack overrides (seconds).
    pub board_slack_by_mode: HashMap<TransitMode, i32>,

    /// Per-mode alight slack (seconds); missing modes have none.
    pub alight_slack_by_mode: HashMap<TransitMode, i32>,

    /// Extra buffer on every transfer (seconds).
    pub transfer_slack_secs: i32,
}

impl BuildConfig {
    /// Create a configuration for a time zone and window, with default slack.
    pub fn new(
        time_zone: impl Into<String>,
        window_start: Option<NaiveDate>,
        window_days: u16,
    ) -> Self {
        Self {
            time_zone: time_zone.into(),
            window_start,
            window_days,
            ..Self::default()
        }
    }

    /// Returns the default board slack as a Duration.
    pub fn board_slack(&self) -> Duration {
        Duration::seconds(i64::from(self.board_slack_secs))
    }

    /// Returns the transfer slack as a Duration.
    pub fn transfer_slack(&self) -> Duration {
        Duration::seconds(i64::from(self.transfer_slack_secs))
    }

    /// Per-mode slack table for the search.
    ///
    /// # Errors
    ///
    /// Fails if any slack value is negative.
    pub fn slack_provider(&self) -> Result<SlackProvider, SlackError> {
        SlackProvider::new(
            self.board_slack_secs,
            &self.board_slack_by_mode,
            &self.alight_slack_by_mode,
            self.transfer_slack_secs,
        )
    }

    /// Transfer timing for one request.
    ///
    /// # Errors
    ///
    /// Fails if the transfer slack is negative.
    pub fn transfer_timing(
        &self,
        min_transfer_time_definitive: bool,
    ) -> Result<TransferTimingConfig, SlackError> {
        TransferTimingConfig::new(self.transfer_slack_secs, min_transfer_time_definitive)
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            time_zone: "UTC".to_string(),
            window_start: None,
            window_days: 3,
            board_slack_secs: 60,
            board_slack_by_mode: HashMap::new(),
            alight_slack_by_mode: HashMap::new(),
            transfer_slack_secs: 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = BuildConfig::default();

        assert_eq!(config.time_zone, "UTC");
        assert_eq!(config.window_start, None);
        assert_eq!(config.window_days, 3);
        assert_eq!(config.board_slack_secs, 60);
        assert_eq!(config.transfer_slack_secs, 120);
    }

    #[test]
    fn duration_methods() {
        let config = BuildConfig::default();

        assert_eq!(config.board_slack(), Duration::minutes(1));
        assert_eq!(config.transfer_slack(), Duration::minutes(2));
    }

    #[test]
    fn custom_config() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 30).unwrap();
        let config = BuildConfig::new("Europe/Oslo", Some(start), 7);

        assert_eq!(config.time_zone, "Europe/Oslo");
        assert_eq!(config.window_start, Some(start));
        assert_eq!(config.window_days, 7);
        let timing = config.transfer_timing(true).unwrap();
        assert_eq!(timing.transfer_slack_secs(), 120);
        assert!(timing.min_transfer_time_definitive());
    }

    #[test]
    fn slack_overrides() {
        let mut config = BuildConfig::default();
        config.board_slack_by_mode.insert(TransitMode::Ferry, 600);
        config.alight_slack_by_mode.insert(TransitMode::Rail, 30);

        let slack = config.slack_provider().unwrap();
        assert_eq!(slack.board_slack(TransitMode::Ferry), 600);
        assert_eq!(slack.board_slack(TransitMode::Bus), 60);
        assert_eq!(slack.alight_slack(TransitMode::Rail), 30);
        assert_eq!(slack.transfer_slack(), 120);
    }

    #[test]
    fn negative_slack_is_rejected() {
        let config = BuildConfig {
            board_slack_secs: -3_600,
            ..BuildConfig::default()
        };
        assert!(config.slack_provider().is_err());
        assert!(config.transfer_timing(false).is_ok());

        let config = BuildConfig {
            transfer_slack_secs: -600,
            ..BuildConfig::default()
        };
        assert!(config.slack_provider().is_err());
        assert!(config.transfer_timing(false).is_err());

        let mut config = BuildConfig::default();
        config.alight_slack_by_mode.insert(TransitMode::Rail, -30);
        assert!(config.slack_provider().is_err());
    }

    #[test]
    fn deserialize_partial() {
        let config: BuildConfig = serde_json::from_str(
            r#"{"time_zone": "Europe/Oslo", "board_slack_by_mode": {"ferry": 300}}"#,
        )
        .unwrap();
        assert_eq!(config.time_zone, "Europe/Oslo");
        assert_eq!(config.window_days, 3);
        assert_eq!(config.board_slack_by_mode.get(&TransitMode::Ferry), Some(&300));
    }
}
