//! Service-day time arithmetic.
//!
//! Schedule times are seconds since the start of a service day. Following
//! the GTFS definition, a service day starts at "noon minus 12h" local
//! time, which is local midnight on every day except the days of a
//! daylight-saving transition. A [`SearchWindow`] anchors a run of service
//! days in the feed time zone and converts between dates, instants and
//! signed seconds relative to the anchor's service-day start.
//!
//! Day lengths are never assumed to be 86 400 seconds: a spring-forward day
//! is 23 hours long and a fall-back day is 25 hours long.

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Nominal length of a day, only used for formatting and bounds.
pub const SECONDS_PER_DAY: i32 = 86_400;

/// Errors from time parsing and service-day conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeError {
    /// A schedule time string is not `H:MM:SS` / `HH:MM:SS`
    #[error("invalid time {0:?}: expected HH:MM:SS")]
    InvalidFormat(String),

    /// The configured time zone name is not in the tz database
    #[error("unknown time zone: {0}")]
    UnknownTimeZone(String),

    /// Local noon does not exist on this date in the feed time zone
    #[error("service day {0} has no valid local noon")]
    NoServiceDayStart(NaiveDate),

    /// The search window is malformed
    #[error("invalid search window: {0}")]
    InvalidWindow(&'static str),

    /// A computed second offset does not fit the 32-bit time axis
    #[error("time offset out of range")]
    OutOfRange,
}

/// Parse a schedule time given as `H:MM:SS` or `HH:MM:SS` into seconds.
///
/// Hours may exceed 23 for trips running past midnight of their service
/// day.
///
/// # Examples
///
/// ```
/// use transit_core::domain::parse_service_time;
///
/// assert_eq!(parse_service_time("10:15:00").unwrap(), 36_900);
/// assert_eq!(parse_service_time("7:00:30").unwrap(), 25_230);
/// assert_eq!(parse_service_time("25:10:00").unwrap(), 90_600);
/// assert!(parse_service_time("10:15").is_err());
/// assert!(parse_service_time("10:75:00").is_err());
/// ```
pub fn parse_service_time(s: &str) -> Result<i32, TimeError> {
    let invalid = || TimeError::InvalidFormat(s.to_string());
    let mut parts = s.split(':');
    let (Some(h), Some(m), Some(sec), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    if h.is_empty() || h.len() > 3 || m.len() != 2 || sec.len() != 2 {
        return Err(invalid());
    }
    if !(h.bytes().chain(m.bytes()).chain(sec.bytes())).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: i32 = h.parse().map_err(|_| invalid())?;
    let minutes: i32 = m.parse().map_err(|_| invalid())?;
    let seconds: i32 = sec.parse().map_err(|_| invalid())?;
    if minutes > 59 || seconds > 59 {
        return Err(invalid());
    }

    Ok(hours * 3600 + minutes * 60 + seconds)
}

/// Format signed seconds as `HH:MM:SS`, prefixed with `-` when negative.
///
/// # Examples
///
/// ```
/// use transit_core::domain::format_service_time;
///
/// assert_eq!(format_service_time(36_900), "10:15:00");
/// assert_eq!(format_service_time(90_600), "25:10:00");
/// assert_eq!(format_service_time(-60), "-00:01:00");
/// ```
pub fn format_service_time(seconds: i32) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let abs = seconds.unsigned_abs();
    format!(
        "{sign}{:02}:{:02}:{:02}",
        abs / 3600,
        (abs % 3600) / 60,
        abs % 60
    )
}

/// Parse a time zone name from the tz database.
pub fn parse_time_zone(name: &str) -> Result<Tz, TimeError> {
    name.parse::<Tz>()
        .map_err(|_| TimeError::UnknownTimeZone(name.to_string()))
}

/// Instant at which the service day of `date` starts in `tz`.
///
/// This is local noon minus twelve hours.
pub fn service_day_start(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>, TimeError> {
    let noon = NaiveTime::from_hms_opt(12, 0, 0).ok_or(TimeError::OutOfRange)?;
    let local_noon = tz
        .from_local_datetime(&date.and_time(noon))
        .earliest()
        .ok_or(TimeError::NoServiceDayStart(date))?;
    Ok((local_noon - Duration::hours(12)).with_timezone(&Utc))
}

fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<i32, TimeError> {
    i32::try_from((to - from).num_seconds()).map_err(|_| TimeError::OutOfRange)
}

/// A run of consecutive service days anchored at its first date.
///
/// All merged schedule times and booking deadlines are expressed as signed
/// seconds since the anchor's service-day start.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use transit_core::domain::{parse_time_zone, SearchWindow};
///
/// let tz = parse_time_zone("Europe/Oslo").unwrap();
/// let anchor = NaiveDate::from_ymd_opt(2024, 3, 30).unwrap();
/// let window = SearchWindow::new(anchor, 3, tz).unwrap();
///
/// // 2024-03-31 is only 23 hours long in Oslo.
/// let day3 = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
/// assert_eq!(window.offset_of(day3).unwrap(), 2 * 86_400 - 3_600);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    anchor: NaiveDate,
    days: u16,
    time_zone: Tz,
    anchor_start: DateTime<Utc>,
}

impl SearchWindow {
    /// Longest window that can be built.
    pub const MAX_DAYS: u16 = 366;

    /// Create a window of `days` service days starting at `anchor`.
    pub fn new(anchor: NaiveDate, days: u16, time_zone: Tz) -> Result<Self, TimeError> {
        if days == 0 {
            return Err(TimeError::InvalidWindow("window must span at least one day"));
        }
        if days > Self::MAX_DAYS {
            return Err(TimeError::InvalidWindow("window is longer than 366 days"));
        }
        anchor
            .checked_add_days(Days::new(u64::from(days) - 1))
            .ok_or(TimeError::InvalidWindow("window end is out of range"))?;

        let anchor_start = service_day_start(anchor, time_zone)?;
        Ok(Self {
            anchor,
            days,
            time_zone,
            anchor_start,
        })
    }

    /// The anchor (first) date; its offset is zero.
    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn days(&self) -> u16 {
        self.days
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Instant the anchor's service day starts.
    pub fn anchor_start(&self) -> DateTime<Utc> {
        self.anchor_start
    }

    /// Last date covered by the window.
    pub fn last_date(&self) -> NaiveDate {
        // Checked in `new`.
        self.anchor + Days::new(u64::from(self.days) - 1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.anchor <= date && date <= self.last_date()
    }

    /// Zero-based position of `date` in the window.
    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        if self.contains(date) {
            usize::try_from((date - self.anchor).num_days()).ok()
        } else {
            None
        }
    }

    /// All dates of the window in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let anchor = self.anchor;
        (0..u64::from(self.days)).filter_map(move |i| anchor.checked_add_days(Days::new(i)))
    }

    /// Signed seconds from the anchor's service-day start to the start of
    /// `date`'s service day.
    ///
    /// `date` may lie outside the window (booking deadlines often reference
    /// the day before the first service day).
    pub fn offset_of(&self, date: NaiveDate) -> Result<i32, TimeError> {
        let start = service_day_start(date, self.time_zone)?;
        seconds_between(self.anchor_start, start)
    }

    /// Signed seconds from the anchor's service-day start to `instant`.
    pub fn seconds_since_anchor(&self, instant: DateTime<Utc>) -> Result<i32, TimeError> {
        seconds_between(self.anchor_start, instant)
    }

    /// Instant corresponding to a window-relative time.
    pub fn instant_at(&self, seconds: i32) -> DateTime<Utc> {
        self.anchor_start + Duration::seconds(i64::from(seconds))
    }
}
