//! Transfer constraints: priority, facilitation and timing overrides.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::{SECONDS_PER_DAY, SearchWindow};

use super::TransferError;

/// Longest duration a constraint may carry: the widest search window.
const MAX_DURATION_SECS: i64 = SECONDS_PER_DAY as i64 * SearchWindow::MAX_DAYS as i64;

/// Base cost added to every constrained transfer.
const BASE_COST: i32 = 3_000;

/// Discount for a transfer where the rider stays in the vehicle.
const STAY_SEATED_DISCOUNT: i32 = 2_000;

/// Discount for a transfer where the target vehicle waits.
const GUARANTEED_DISCOUNT: i32 = 1_000;

/// How desirable a transfer is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferPriority {
    Preferred,
    Recommended,
    #[default]
    Allowed,
    /// The transfer must not be used.
    NotAllowed,
}

impl TransferPriority {
    /// Priority part of the transfer cost, in hundredths of a cost unit.
    pub fn cost(self) -> i32 {
        match self {
            TransferPriority::Preferred => 100,
            TransferPriority::Recommended => 200,
            TransferPriority::Allowed => 300,
            TransferPriority::NotAllowed => 100_000,
        }
    }
}

/// Constraint record of a constrained transfer.
///
/// Built with [`TransferConstraint::builder`]; a builder with no calls
/// yields [`TransferConstraint::NO_CONSTRAINTS`].
///
/// # Examples
///
/// ```
/// use chrono::Duration;
/// use transit_core::transfer::TransferConstraint;
///
/// let c = TransferConstraint::builder()
///     .guaranteed()
///     .preferred()
///     .min_transfer_time(Duration::minutes(2))
///     .build()
///     .unwrap();
///
/// assert!(c.is_facilitated());
/// assert!(!c.is_regular_transfer());
/// assert_eq!(c.min_transfer_time(), Some(120));
///
/// let none = TransferConstraint::builder().build().unwrap();
/// assert_eq!(none, TransferConstraint::NO_CONSTRAINTS);
/// assert!(none.is_regular_transfer());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransferConstraint {
    priority: TransferPriority,
    stay_seated: bool,
    guaranteed: bool,
    /// Seconds.
    min_transfer_time: Option<i32>,
    /// Seconds.
    max_wait_time: Option<i32>,
}

impl TransferConstraint {
    /// The value of a transfer without any constraint.
    pub const NO_CONSTRAINTS: TransferConstraint = TransferConstraint {
        priority: TransferPriority::Allowed,
        stay_seated: false,
        guaranteed: false,
        min_transfer_time: None,
        max_wait_time: None,
    };

    pub fn builder() -> TransferConstraintBuilder {
        TransferConstraintBuilder::default()
    }

    pub fn priority(&self) -> TransferPriority {
        self.priority
    }

    pub fn is_stay_seated(&self) -> bool {
        self.stay_seated
    }

    pub fn is_guaranteed(&self) -> bool {
        self.guaranteed
    }

    pub fn is_not_allowed(&self) -> bool {
        self.priority == TransferPriority::NotAllowed
    }

    /// Minimum transfer time in seconds.
    pub fn min_transfer_time(&self) -> Option<i32> {
        self.min_transfer_time
    }

    /// Maximum wait time in seconds.
    pub fn max_wait_time(&self) -> Option<i32> {
        self.max_wait_time
    }

    /// Stay-seated or guaranteed: the connection holds regardless of slack.
    pub fn is_facilitated(&self) -> bool {
        self.stay_seated || self.guaranteed
    }

    /// True if the constraint changes nothing about a regular transfer.
    pub fn is_regular_transfer(&self) -> bool {
        self.priority == TransferPriority::Allowed
            && !self.stay_seated
            && !self.guaranteed
            && self.min_transfer_time.is_none()
            && self.max_wait_time.is_none()
    }

    /// Soft cost used by the search to break ties between transfers.
    ///
    /// `NotAllowed` yields a very large cost; it is returned, not rejected,
    /// so the caller can drop the edge itself.
    pub fn cost(&self) -> i32 {
        let discount = if self.stay_seated {
            STAY_SEATED_DISCOUNT
        } else if self.guaranteed {
            GUARANTEED_DISCOUNT
        } else {
            0
        };
        BASE_COST + self.priority.cost() - discount
    }
}

impl Default for TransferConstraint {
    fn default() -> Self {
        Self::NO_CONSTRAINTS
    }
}

/// Builder for [`TransferConstraint`].
#[derive(Debug, Clone, Default)]
pub struct TransferConstraintBuilder {
    priority: TransferPriority,
    stay_seated: bool,
    guaranteed: bool,
    min_transfer_time: Option<Duration>,
    max_wait_time: Option<Duration>,
}

impl TransferConstraintBuilder {
    pub fn stay_seated(mut self) -> Self {
        self.stay_seated = true;
        self
    }

    pub fn guaranteed(mut self) -> Self {
        self.guaranteed = true;
        self
    }

    pub fn preferred(self) -> Self {
        self.priority(TransferPriority::Preferred)
    }

    pub fn recommended(self) -> Self {
        self.priority(TransferPriority::Recommended)
    }

    pub fn not_allowed(self) -> Self {
        self.priority(TransferPriority::NotAllowed)
    }

    pub fn priority(mut self, priority: TransferPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn min_transfer_time(mut self, duration: Duration) -> Self {
        self.min_transfer_time = Some(duration);
        self
    }

    pub fn max_wait_time(mut self, duration: Duration) -> Self {
        self.max_wait_time = Some(duration);
        self
    }

    /// Build the constraint.
    ///
    /// # Errors
    ///
    /// Negative or oversized durations are rejected rather than clamped.
    pub fn build(self) -> Result<TransferConstraint, TransferError> {
        Ok(TransferConstraint {
            priority: self.priority,
            stay_seated: self.stay_seated,
            guaranteed: self.guaranteed,
            min_transfer_time: to_seconds("min transfer time", self.min_transfer_time)?,
            max_wait_time: to_seconds("max wait time", self.max_wait_time)?,
        })
    }
}

fn to_seconds(
    what: &'static str,
    duration: Option<Duration>,
) -> Result<Option<i32>, TransferError> {
    let Some(duration) = duration else {
        return Ok(None);
    };
    let seconds = duration.num_seconds();
    if seconds < 0 {
        return Err(TransferError::NegativeDuration { what, seconds });
    }
    if seconds > MAX_DURATION_SECS {
        return Err(TransferError::DurationTooLarge { what, seconds });
    }
    i32::try_from(seconds)
        .map(Some)
        .map_err(|_| TransferError::DurationTooLarge { what, seconds })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> TransferConstraintBuilder {
        TransferConstraint::builder()
    }

    #[test]
    fn default_is_no_constraints() {
        let c = builder().build().unwrap();
        assert_eq!(c, TransferConstraint::NO_CONSTRAINTS);
        assert_eq!(c, TransferConstraint::default());
        assert!(c.is_regular_transfer());
        assert!(!c.is_facilitated());
        assert!(!c.is_not_allowed());
    }

    #[test]
    fn facilitated() {
        assert!(builder().stay_seated().build().unwrap().is_facilitated());
        assert!(builder().guaranteed().build().unwrap().is_facilitated());
        assert!(!builder().preferred().build().unwrap().is_facilitated());
    }

    #[test]
    fn regular_transfer_requires_everything_unset() {
        assert!(!builder().preferred().build().unwrap().is_regular_transfer());
        assert!(!builder().not_allowed().build().unwrap().is_regular_transfer());
        assert!(!builder().guaranteed().build().unwrap().is_regular_transfer());
        assert!(
            !builder()
                .min_transfer_time(Duration::seconds(0))
                .build()
                .unwrap()
                .is_regular_transfer()
        );
        assert!(
            !builder()
                .max_wait_time(Duration::minutes(5))
                .build()
                .unwrap()
                .is_regular_transfer()
        );
    }

    #[test]
    fn costs() {
        assert_eq!(builder().build().unwrap().cost(), 3_300);
        assert_eq!(builder().preferred().build().unwrap().cost(), 3_100);
        assert_eq!(builder().recommended().build().unwrap().cost(), 3_200);
        assert_eq!(builder().guaranteed().build().unwrap().cost(), 2_300);
        assert_eq!(builder().stay_seated().build().unwrap().cost(), 1_300);
        // Stay-seated dominates guaranteed; the discounts do not add up.
        assert_eq!(
            builder()
                .stay_seated()
                .guaranteed()
                .preferred()
                .build()
                .unwrap()
                .cost(),
            1_100
        );
        assert_eq!(builder().not_allowed().build().unwrap().cost(), 103_000);
    }

    #[test]
    fn negative_durations_rejected() {
        let err = builder()
            .min_transfer_time(Duration::seconds(-1))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            TransferError::NegativeDuration {
                what: "min transfer time",
                seconds: -1
            }
        );
        assert!(
            builder()
                .max_wait_time(Duration::minutes(-3))
                .build()
                .is_err()
        );
    }

    #[test]
    fn oversized_durations_rejected() {
        let err = builder()
            .min_transfer_time(Duration::seconds(i64::from(i32::MAX)))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            TransferError::DurationTooLarge {
                what: "min transfer time",
                seconds: i64::from(i32::MAX),
            }
        );
        assert!(
            builder()
                .max_wait_time(Duration::days(367))
                .build()
                .is_err()
        );

        let c = builder()
            .min_transfer_time(Duration::days(366))
            .build()
            .unwrap();
        assert_eq!(c.min_transfer_time(), Some(366 * SECONDS_PER_DAY));
    }

    #[test]
    fn priority_serde() {
        let p: TransferPriority = serde_json::from_str("\"not_allowed\"").unwrap();
        assert_eq!(p, TransferPriority::NotAllowed);
        assert_eq!(TransferPriority::default(), TransferPriority::Allowed);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn priority() -> impl Strategy<Value = TransferPriority> {
        prop_oneof![
            Just(TransferPriority::Preferred),
            Just(TransferPriority::Recommended),
            Just(TransferPriority::Allowed),
            Just(TransferPriority::NotAllowed),
        ]
    }

    proptest! {
        /// For equal priority: stay-seated < guaranteed-only < regular.
        #[test]
        fn facilitation_orders_cost(p in priority(), also_guaranteed in any::<bool>()) {
            let mut seated = TransferConstraint::builder().priority(p).stay_seated();
            if also_guaranteed {
                seated = seated.guaranteed();
            }
            let seated = seated.build().unwrap();
            let guaranteed = TransferConstraint::builder()
                .priority(p)
                .guaranteed()
                .build()
                .unwrap();
            let regular = TransferConstraint::builder().priority(p).build().unwrap();

            prop_assert!(seated.cost() < guaranteed.cost());
            prop_assert!(guaranteed.cost() < regular.cost());
        }

        /// Not-allowed dwarfs every facilitated cost.
        #[test]
        fn not_allowed_dominates(p in priority(), seated in any::<bool>()) {
            let mut b = TransferConstraint::builder().priority(p).guaranteed();
            if seated {
                b = b.stay_seated();
            }
            let facilitated = b.build().unwrap();
            let not_allowed = TransferConstraint::builder().not_allowed().build().unwrap();
            if p != TransferPriority::NotAllowed {
                prop_assert!(not_allowed.cost() > 10 * facilitated.cost());
            }
        }

        /// Facilitation is exactly stay-seated or guaranteed.
        #[test]
        fn facilitated_iff_flags(seated in any::<bool>(), guaranteed in any::<bool>()) {
            let mut b = TransferConstraint::builder();
            if seated { b = b.stay_seated(); }
            if guaranteed { b = b.guaranteed(); }
            prop_assert_eq!(b.build().unwrap().is_facilitated(), seated || guaranteed);
        }
    }
}
