//! Board, alight and transfer slack per transport mode.

use std::collections::HashMap;
use std::fmt;

use chrono::Duration;

use crate::domain::TransitMode;

/// Fixed slack table indexed by [`TransitMode::index`].
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use transit_core::domain::TransitMode;
/// use transit_core::search::SlackProvider;
///
/// let board = HashMap::from([(TransitMode::Rail, 120)]);
/// let slack = SlackProvider::new(30, &board, &HashMap::new(), 60).unwrap();
///
/// assert_eq!(slack.board_slack(TransitMode::Rail), 120);
/// assert_eq!(slack.board_slack(TransitMode::Bus), 30);
/// assert_eq!(slack.alight_slack(TransitMode::Bus), 0);
///
/// assert!(SlackProvider::new(-60, &board, &HashMap::new(), 60).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackProvider {
    board: [i32; TransitMode::COUNT],
    alight: [i32; TransitMode::COUNT],
    transfer: i32,
}

impl SlackProvider {
    /// Build the table from a default board slack plus per-mode overrides.
    /// Alight slack defaults to zero. All values are seconds.
    ///
    /// # Errors
    ///
    /// Fails on the first negative value.
    pub fn new(
        default_board_slack: i32,
        board_by_mode: &HashMap<TransitMode, i32>,
        alight_by_mode: &HashMap<TransitMode, i32>,
        transfer_slack: i32,
    ) -> Result<Self, SlackError> {
        non_negative(SlackKind::Board, None, default_board_slack)?;
        non_negative(SlackKind::Transfer, None, transfer_slack)?;

        let mut board = [default_board_slack; TransitMode::COUNT];
        let mut alight = [0; TransitMode::COUNT];
        for (mode, secs) in board_by_mode {
            non_negative(SlackKind::Board, Some(*mode), *secs)?;
            board[mode.index()] = *secs;
        }
        for (mode, secs) in alight_by_mode {
            non_negative(SlackKind::Alight, Some(*mode), *secs)?;
            alight[mode.index()] = *secs;
        }
        Ok(Self {
            board,
            alight,
            transfer: transfer_slack,
        })
    }

    pub fn board_slack(&self, mode: TransitMode) -> i32 {
        self.board[mode.index()]
    }

    pub fn alight_slack(&self, mode: TransitMode) -> i32 {
        self.alight[mode.index()]
    }

    pub fn transfer_slack(&self) -> i32 {
        self.transfer
    }

    /// Returns the transfer slack as a Duration.
    pub fn transfer_slack_duration(&self) -> Duration {
        Duration::seconds(i64::from(self.transfer))
    }

    /// Earliest regular boarding time after alighting from a `from` trip
    /// at `arrival` and boarding a `to` trip, with no walking in between.
    pub fn earliest_board_time(&self, arrival: i32, from: TransitMode, to: TransitMode) -> i32 {
        arrival
            .saturating_add(self.alight_slack(from))
            .saturating_add(self.transfer)
            .saturating_add(self.board_slack(to))
    }
}

impl Default for SlackProvider {
    fn default() -> Self {
        Self {
            board: [0; TransitMode::COUNT],
            alight: [0; TransitMode::COUNT],
            transfer: 0,
        }
    }
}

/// Which slack a [`SlackError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlackKind {
    Board,
    Alight,
    Transfer,
}

impl fmt::Display for SlackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SlackKind::Board => "board",
            SlackKind::Alight => "alight",
            SlackKind::Transfer => "transfer",
        })
    }
}

/// Errors building slack settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SlackError {
    /// A slack value is below zero
    #[error(
        "negative {kind} slack{}: {seconds}s",
        .mode.map(|m| format!(" for {m}")).unwrap_or_default()
    )]
    Negative {
        kind: SlackKind,
        mode: Option<TransitMode>,
        seconds: i32,
    },
}

pub(crate) fn non_negative(
    kind: SlackKind,
    mode: Option<TransitMode>,
    seconds: i32,
) -> Result<(), SlackError> {
    if seconds < 0 {
        return Err(SlackError::Negative {
            kind,
            mode,
            seconds,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero() {
        let slack = SlackProvider::default();
        for mode in TransitMode::ALL {
            assert_eq!(slack.board_slack(mode), 0);
            assert_eq!(slack.alight_slack(mode), 0);
        }
        assert_eq!(slack.transfer_slack(), 0);
    }

    #[test]
    fn overrides_per_mode() {
        let board = HashMap::from([(TransitMode::Ferry, 300)]);
        let alight = HashMap::from([(TransitMode::Rail, 45)]);
        let slack = SlackProvider::new(60, &board, &alight, 120).unwrap();

        assert_eq!(slack.board_slack(TransitMode::Ferry), 300);
        assert_eq!(slack.board_slack(TransitMode::Tram), 60);
        assert_eq!(slack.alight_slack(TransitMode::Rail), 45);
        assert_eq!(slack.transfer_slack_duration(), Duration::minutes(2));
        assert_eq!(
            slack.earliest_board_time(1_000, TransitMode::Rail, TransitMode::Ferry),
            1_000 + 45 + 120 + 300
        );
    }

    #[test]
    fn negative_slack_is_rejected() {
        let none = HashMap::new();
        assert_eq!(
            SlackProvider::new(-3_600, &none, &none, 0),
            Err(SlackError::Negative {
                kind: SlackKind::Board,
                mode: None,
                seconds: -3_600,
            })
        );
        assert_eq!(
            SlackProvider::new(0, &none, &none, -600),
            Err(SlackError::Negative {
                kind: SlackKind::Transfer,
                mode: None,
                seconds: -600,
            })
        );

        let board = HashMap::from([(TransitMode::Bus, -1)]);
        assert!(matches!(
            SlackProvider::new(60, &board, &none, 60),
            Err(SlackError::Negative {
                kind: SlackKind::Board,
                mode: Some(TransitMode::Bus),
                ..
            })
        ));
        let alight = HashMap::from([(TransitMode::Rail, -30)]);
        assert!(matches!(
            SlackProvider::new(60, &none, &alight, 60),
            Err(SlackError::Negative {
                kind: SlackKind::Alight,
                ..
            })
        ));
    }

    #[test]
    fn zero_slack_is_allowed() {
        let none = HashMap::new();
        assert_eq!(
            SlackProvider::new(0, &none, &none, 0),
            Ok(SlackProvider::default())
        );
    }

    #[test]
    fn earliest_board_time_saturates() {
        let board = HashMap::from([(TransitMode::Rail, i32::MAX)]);
        let slack = SlackProvider::new(0, &board, &HashMap::new(), 60).unwrap();
        assert_eq!(
            slack.earliest_board_time(36_000, TransitMode::Bus, TransitMode::Rail),
            i32::MAX
        );
    }

    #[test]
    fn error_display() {
        let err = SlackError::Negative {
            kind: SlackKind::Alight,
            mode: Some(TransitMode::Ferry),
            seconds: -30,
        };
        assert_eq!(
            err.to_string(),
            format!("negative alight slack for {}: -30s", TransitMode::Ferry)
        );

        let err = SlackError::Negative {
            kind: SlackKind::Transfer,
            mode: None,
            seconds: -600,
        };
        assert_eq!(err.to_string(), "negative transfer slack: -600s");
    }
}
