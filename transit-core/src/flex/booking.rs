//! Booking rules of flexible trips.
//!
//! A flex trip may require riders to book by a fixed deadline (a time of
//! day some days before the service date) and/or a minimum notice before
//! pickup. Both are checked against the moment the request is made, on the
//! same window-relative time axis as the merged schedules.

use chrono::{Days, NaiveDate};

use crate::domain::{SECONDS_PER_DAY, SearchWindow, TimeError};

use super::FlexError;

/// Book before `time_of_day` on the day `days_prior` days before service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestBookingTime {
    time_of_day: i32,
    days_prior: u32,
}

impl LatestBookingTime {
    /// `time_of_day` is seconds since service-day start.
    pub fn new(time_of_day: i32, days_prior: u32) -> Result<Self, FlexError> {
        if !(0..SECONDS_PER_DAY).contains(&time_of_day) {
            return Err(FlexError::InvalidTimeOfDay(time_of_day));
        }
        Ok(Self {
            time_of_day,
            days_prior,
        })
    }

    pub fn time_of_day(&self) -> i32 {
        self.time_of_day
    }

    pub fn days_prior(&self) -> u32 {
        self.days_prior
    }

    /// The deadline for `service_date` in seconds since the window anchor.
    pub fn deadline(
        &self,
        service_date: NaiveDate,
        window: &SearchWindow,
    ) -> Result<i32, FlexError> {
        let booking_day = service_date
            .checked_sub_days(Days::new(u64::from(self.days_prior)))
            .ok_or(FlexError::Time(TimeError::OutOfRange))?;
        Ok(window.offset_of(booking_day)? + self.time_of_day)
    }
}

/// Booking rules attached to a flex trip; at least one is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    latest_booking_time: Option<LatestBookingTime>,
    /// Seconds.
    minimum_booking_notice: Option<i32>,
}

impl BookingWindow {
    /// # Errors
    ///
    /// Fails if neither rule is set or the notice is negative.
    pub fn new(
        latest_booking_time: Option<LatestBookingTime>,
        minimum_booking_notice: Option<i32>,
    ) -> Result<Self, FlexError> {
        if latest_booking_time.is_none() && minimum_booking_notice.is_none() {
            return Err(FlexError::EmptyBookingWindow);
        }
        if let Some(seconds) = minimum_booking_notice.filter(|s| *s < 0) {
            return Err(FlexError::NegativeDuration {
                what: "minimum booking notice",
                seconds,
            });
        }
        Ok(Self {
            latest_booking_time,
            minimum_booking_notice,
        })
    }

    pub fn latest_booking_time(&self) -> Option<&LatestBookingTime> {
        self.latest_booking_time.as_ref()
    }

    pub fn minimum_booking_notice(&self) -> Option<i32> {
        self.minimum_booking_notice
    }
}

/// Booking rules resolved for one service date on a search window.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use transit_core::domain::{parse_time_zone, SearchWindow};
/// use transit_core::flex::{BookingWindow, LatestBookingTime, RoutingBookingInfo};
///
/// let tz = parse_time_zone("Europe/Oslo").unwrap();
/// let service_date = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
/// let window = SearchWindow::new(service_date, 1, tz).unwrap();
///
/// // Book by 18:00 the day before.
/// let rules = BookingWindow::new(Some(LatestBookingTime::new(64_800, 1).unwrap()), None).unwrap();
/// let info = RoutingBookingInfo::resolve(&rules, service_date, &window).unwrap();
///
/// let deadline = 64_800 - 86_400;
/// assert!(info.is_there_enough_time_to_book(30_000, deadline));
/// assert!(!info.is_there_enough_time_to_book(30_000, deadline + 1));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoutingBookingInfo {
    /// Window seconds.
    deadline: Option<i32>,
    /// Seconds.
    minimum_booking_notice: Option<i32>,
}

impl RoutingBookingInfo {
    /// No booking required.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn resolve(
        booking: &BookingWindow,
        service_date: NaiveDate,
        window: &SearchWindow,
    ) -> Result<Self, FlexError> {
        let deadline = booking
            .latest_booking_time
            .map(|l| l.deadline(service_date, window))
            .transpose()?;
        Ok(Self {
            deadline,
            minimum_booking_notice: booking.minimum_booking_notice,
        })
    }

    /// Latest booking instant in window seconds, if any.
    pub fn deadline(&self) -> Option<i32> {
        self.deadline
    }

    pub fn is_unrestricted(&self) -> bool {
        self.deadline.is_none() && self.minimum_booking_notice.is_none()
    }

    /// Whether a request made at `request_time` can still book a pickup at
    /// `pickup_time`. Both are window seconds; the deadline itself is still
    /// in time.
    pub fn is_there_enough_time_to_book(&self, pickup_time: i32, request_time: i32) -> bool {
        if let Some(deadline) = self.deadline {
            if request_time > deadline {
                return false;
            }
        }
        if let Some(notice) = self.minimum_booking_notice {
            if request_time > pickup_time.saturating_sub(notice) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_time_zone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window(anchor: NaiveDate, days: u16) -> SearchWindow {
        SearchWindow::new(anchor, days, parse_time_zone("Europe/Oslo").unwrap()).unwrap()
    }

    #[test]
    fn booking_window_validation() {
        assert_eq!(
            BookingWindow::new(None, None).unwrap_err(),
            FlexError::EmptyBookingWindow
        );
        assert!(BookingWindow::new(None, Some(-1)).is_err());
        assert!(BookingWindow::new(None, Some(0)).is_ok());
        assert!(LatestBookingTime::new(86_400, 0).is_err());
        assert!(LatestBookingTime::new(-1, 0).is_err());
    }

    #[test]
    fn deadline_on_same_day() {
        let w = window(date(2024, 6, 3), 3);
        let l = LatestBookingTime::new(36_000, 0).unwrap();
        assert_eq!(l.deadline(date(2024, 6, 4), &w).unwrap(), 86_400 + 36_000);
    }

    #[test]
    fn deadline_before_window_is_negative() {
        let w = window(date(2024, 6, 3), 1);
        let l = LatestBookingTime::new(57_600, 2).unwrap();
        assert_eq!(l.deadline(date(2024, 6, 3), &w).unwrap(), -2 * 86_400 + 57_600);
    }

    #[test]
    fn deadline_across_spring_forward() {
        // Service on Monday 2024-04-01, book by 12:00 two days earlier
        // (Saturday). Sunday is 23 hours long in Oslo.
        let w = window(date(2024, 4, 1), 1);
        let l = LatestBookingTime::new(43_200, 2).unwrap();
        let deadline = l.deadline(date(2024, 4, 1), &w).unwrap();
        assert_eq!(deadline, -(2 * 86_400 - 3_600) + 43_200);
    }

    #[test]
    fn deadline_boundary_is_inclusive() {
        let w = window(date(2024, 6, 3), 2);
        let rules =
            BookingWindow::new(Some(LatestBookingTime::new(72_000, 1).unwrap()), None).unwrap();
        let info = RoutingBookingInfo::resolve(&rules, date(2024, 6, 4), &w).unwrap();
        assert_eq!(info.deadline(), Some(72_000));

        let pickup = 86_400 + 36_000;
        assert!(info.is_there_enough_time_to_book(pickup, 71_999));
        assert!(info.is_there_enough_time_to_book(pickup, 72_000));
        assert!(!info.is_there_enough_time_to_book(pickup, 72_001));
    }

    #[test]
    fn minimum_notice() {
        let rules = BookingWindow::new(None, Some(3_600)).unwrap();
        let w = window(date(2024, 6, 3), 1);
        let info = RoutingBookingInfo::resolve(&rules, date(2024, 6, 3), &w).unwrap();
        assert!(info.is_there_enough_time_to_book(36_000, 32_400));
        assert!(!info.is_there_enough_time_to_book(36_000, 32_401));
    }

    #[test]
    fn both_rules_must_hold() {
        let rules = BookingWindow::new(
            Some(LatestBookingTime::new(30_000, 0).unwrap()),
            Some(600),
        )
        .unwrap();
        let w = window(date(2024, 6, 3), 1);
        let info = RoutingBookingInfo::resolve(&rules, date(2024, 6, 3), &w).unwrap();
        assert!(info.is_there_enough_time_to_book(40_000, 29_000));
        // Notice is fine but the deadline has passed.
        assert!(!info.is_there_enough_time_to_book(40_000, 31_000));
        // Deadline is fine but the notice is too short.
        assert!(!info.is_there_enough_time_to_book(29_500, 29_000));
    }

    #[test]
    fn unrestricted_always_books() {
        let info = RoutingBookingInfo::unrestricted();
        assert!(info.is_unrestricted());
        assert!(info.is_there_enough_time_to_book(0, i32::MAX));
    }
}
