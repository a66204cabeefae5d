//! Target time of a constrained transfer.

use chrono::Duration;

use crate::search::{SearchDirection, SlackError, SlackKind};

use super::TransferConstraint;

/// Per-request timing configuration for constrained transfers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTimingConfig {
    /// Extra buffer added on every transfer (seconds).
    transfer_slack_secs: i32,

    /// When set, a rule's minimum transfer time replaces the regular
    /// transfer time instead of acting as a floor on it.
    min_transfer_time_definitive: bool,
}

impl TransferTimingConfig {
    /// Create a new configuration with the given parameters.
    ///
    /// # Errors
    ///
    /// Fails if the transfer slack is negative.
    pub fn new(
        transfer_slack_secs: i32,
        min_transfer_time_definitive: bool,
    ) -> Result<Self, SlackError> {
        crate::search::non_negative(SlackKind::Transfer, None, transfer_slack_secs)?;
        Ok(Self {
            transfer_slack_secs,
            min_transfer_time_definitive,
        })
    }

    pub fn transfer_slack_secs(&self) -> i32 {
        self.transfer_slack_secs
    }

    pub fn min_transfer_time_definitive(&self) -> bool {
        self.min_transfer_time_definitive
    }

    /// Returns the transfer slack as a Duration.
    pub fn transfer_slack(&self) -> Duration {
        Duration::seconds(i64::from(self.transfer_slack_secs))
    }
}

impl Default for TransferTimingConfig {
    fn default() -> Self {
        Self {
            transfer_slack_secs: 60,
            min_transfer_time_definitive: false,
        }
    }
}

impl TransferConstraint {
    /// Earliest (forward) or latest (reverse) time the target trip can be
    /// boarded after arriving at `source_arrival`.
    ///
    /// `regular` computes the time a regular transfer would give; it is
    /// only called when the constraint does not decide on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Duration;
    /// use transit_core::search::SearchDirection;
    /// use transit_core::transfer::{TransferConstraint, TransferTimingConfig};
    ///
    /// let config = TransferTimingConfig::new(60, false).unwrap();
    /// let mtt = TransferConstraint::builder()
    ///     .min_transfer_time(Duration::minutes(5))
    ///     .build()
    ///     .unwrap();
    ///
    /// // The rule is a floor on the regular time.
    /// let forward = SearchDirection::Forward;
    /// let t = mtt.calculate_transfer_target_time(1_000, &config, || 1_200, forward);
    /// assert_eq!(t, 1_360);
    /// let t = mtt.calculate_transfer_target_time(1_000, &config, || 2_000, forward);
    /// assert_eq!(t, 2_000);
    /// ```
    pub fn calculate_transfer_target_time(
        &self,
        source_arrival: i32,
        config: &TransferTimingConfig,
        regular: impl FnOnce() -> i32,
        direction: SearchDirection,
    ) -> i32 {
        if self.is_facilitated() {
            return source_arrival;
        }

        let Some(min_transfer_time) = self.min_transfer_time() else {
            return regular();
        };

        let expected = direction.plus(
            source_arrival,
            config.transfer_slack_secs.saturating_add(min_transfer_time),
        );
        if config.min_transfer_time_definitive {
            expected
        } else {
            direction.max(expected, regular())
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Without definitive mode, forward never yields a time before the
        /// regular one and reverse never after it.
        #[test]
        fn never_tighter_than_regular(
            t0 in 0i32..100_000,
            slack in 0i32..600,
            mtt in 0i64..1_800,
            reg_delta in -3_600i32..3_600,
        ) {
            let config = TransferTimingConfig::new(slack, false).unwrap();
            let c = TransferConstraint::builder()
                .min_transfer_time(Duration::seconds(mtt))
                .build()
                .unwrap();
            let regular = || t0 + reg_delta;
            let forward =
                c.calculate_transfer_target_time(t0, &config, regular, SearchDirection::Forward);
            prop_assert!(forward >= t0 + reg_delta);
            prop_assert!(forward >= t0 + slack + mtt as i32);

            let reverse =
                c.calculate_transfer_target_time(t0, &config, regular, SearchDirection::Reverse);
            prop_assert!(reverse <= t0 + reg_delta);
            prop_assert!(reverse <= t0 - slack - mtt as i32);
        }
    }
}
