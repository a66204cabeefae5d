//! Merging per-date schedules of a pattern into one multi-day timetable.
//!
//! Every date of the search window contributes the trips it runs. Each
//! date gets an offset: the signed number of seconds from the anchor
//! date's service-day start to its own, measured in the feed time zone.
//! A merged time is the trip's local time plus the offset of its date, so
//! all trips of the window live on one time axis and can be addressed by a
//! single index.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::trace;

use crate::domain::{SearchWindow, StopHandle, Trip, TripId, TripPattern, TripTimes};

use super::for_date::check_no_overtaking;
use super::{ScheduleError, TripPatternForDate};

#[derive(Debug, Clone, PartialEq, Eq)]
struct DaySchedule {
    schedule: Arc<TripPatternForDate>,
    offset: i32,
}

/// Position of a merged trip: day entry and trip within that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TripRef {
    day: u32,
    trip: u32,
}

/// All trips of one pattern over a search window, on one time axis.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use chrono::NaiveDate;
/// use transit_core::domain::*;
/// use transit_core::schedule::{MultiDaySchedule, TripPatternForDate};
///
/// let pattern = Arc::new(TripPattern::new(
///     PatternId::new("R1:0").unwrap(),
///     RouteId::new("R1").unwrap(),
///     TransitMode::Bus,
///     vec![StopHandle(0), StopHandle(1)],
/// ).unwrap());
/// let trip = Arc::new(Trip {
///     id: TripId::new("R1-1").unwrap(),
///     route: RouteId::new("R1").unwrap(),
///     service: ServiceId::new("DAILY").unwrap(),
///     mode: TransitMode::Bus,
/// });
/// let times = Arc::new(TripTimes::new(trip, vec![36_000, 36_600], vec![36_000, 36_600]).unwrap());
///
/// let tz = parse_time_zone("Europe/Oslo").unwrap();
/// let anchor = NaiveDate::from_ymd_opt(2024, 3, 30).unwrap();
/// let window = SearchWindow::new(anchor, 3, tz).unwrap();
///
/// let days = window
///     .dates()
///     .map(|d| TripPatternForDate::new(pattern.clone(), d, vec![times.clone()]).map(Arc::new))
///     .collect::<Result<Vec<_>, _>>()
///     .unwrap();
/// let merged = MultiDaySchedule::merge(pattern, window, days).unwrap();
///
/// assert_eq!(merged.num_trips(), 3);
/// // 2024-03-31 starts at 23:00 the evening before (noon minus 12h on a
/// // spring-forward day), so days two and three are an hour early.
/// let third = merged.trip_schedule(2).unwrap();
/// assert_eq!(third.offset(), 2 * 86_400 - 3_600);
/// assert_eq!(third.departure(0), Some(2 * 86_400 - 3_600 + 36_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiDaySchedule {
    pattern: Arc<TripPattern>,
    window: SearchWindow,
    /// Sorted by date.
    days: Vec<DaySchedule>,
    /// Sorted by merged first departure; no trip overtakes another.
    trips: Vec<TripRef>,
}

impl MultiDaySchedule {
    /// Merge per-date schedules of `pattern` over `window`.
    ///
    /// Empty dates are dropped. Dates may be supplied in any order.
    ///
    /// # Errors
    ///
    /// Fails if a schedule belongs to another pattern, lies outside the
    /// window, repeats a date, or if trips of different dates overtake each
    /// other once placed on the merged time axis.
    pub fn merge(
        pattern: Arc<TripPattern>,
        window: SearchWindow,
        schedules: impl IntoIterator<Item = Arc<TripPatternForDate>>,
    ) -> Result<Self, ScheduleError> {
        let mut by_date = BTreeMap::new();
        for schedule in schedules {
            if schedule.pattern().id() != pattern.id() {
                return Err(ScheduleError::PatternMismatch {
                    date: schedule.date(),
                    expected: pattern.id().to_string(),
                    found: schedule.pattern().id().to_string(),
                });
            }
            if !window.contains(schedule.date()) {
                return Err(ScheduleError::DateOutsideWindow(schedule.date()));
            }
            let date = schedule.date();
            if by_date.insert(date, schedule).is_some() {
                return Err(ScheduleError::DuplicateDate(date));
            }
        }

        let mut days = Vec::with_capacity(by_date.len());
        for (date, schedule) in by_date {
            if schedule.is_empty() {
                continue;
            }
            let offset = window.offset_of(date)?;
            days.push(DaySchedule { schedule, offset });
        }

        let mut trips: Vec<TripRef> = days
            .iter()
            .enumerate()
            .flat_map(|(day, d)| {
                (0..d.schedule.num_trips()).map(move |trip| TripRef {
                    day: day as u32,
                    trip: trip as u32,
                })
            })
            .collect();
        // Days are in date order and trips in departure order, so a stable
        // sort keeps same-time trips in (date, index) order.
        trips.sort_by_key(|r| {
            let day = &days[r.day as usize];
            day.offset + day.schedule.trips()[r.trip as usize].first_departure()
        });

        let merged = Self {
            pattern,
            window,
            days,
            trips,
        };
        merged.check_sorted()?;

        trace!(
            pattern = %merged.pattern.id(),
            days = merged.days.len(),
            trips = merged.trips.len(),
            "merged multi-day schedule"
        );
        Ok(merged)
    }

    fn check_sorted(&self) -> Result<(), ScheduleError> {
        for pair in self.trips.windows(2) {
            let (prev, prev_offset) = self.resolve(pair[0]);
            let (next, next_offset) = self.resolve(pair[1]);
            check_no_overtaking(&self.pattern, prev, prev_offset, next, next_offset)?;
        }
        Ok(())
    }

    fn resolve(&self, r: TripRef) -> (&TripTimes, i32) {
        let day = &self.days[r.day as usize];
        (day.schedule.trips()[r.trip as usize].as_ref(), day.offset)
    }

    pub fn pattern(&self) -> &Arc<TripPattern> {
        &self.pattern
    }

    pub fn window(&self) -> &SearchWindow {
        &self.window
    }

    /// Number of trips across all dates.
    pub fn num_trips(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// The trip at merged index `index`.
    pub fn trip_schedule(&self, index: usize) -> Option<MergedTripSchedule<'_>> {
        let r = *self.trips.get(index)?;
        let day = &self.days[r.day as usize];
        Some(MergedTripSchedule {
            index,
            pattern: &self.pattern,
            times: day.schedule.trips()[r.trip as usize].as_ref(),
            date: day.schedule.date(),
            offset: day.offset,
        })
    }

    /// All trips in merged order.
    pub fn trip_schedules(&self) -> impl Iterator<Item = MergedTripSchedule<'_>> {
        (0..self.trips.len()).filter_map(|i| self.trip_schedule(i))
    }

    /// Offset of a date that contributes trips.
    pub fn offset_for(&self, date: NaiveDate) -> Option<i32> {
        self.day(date).map(|d| d.offset)
    }

    /// Dates contributing trips, in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.iter().map(|d| d.schedule.date())
    }

    /// Per-date schedule for `date`, if it contributes trips.
    pub fn schedule_for(&self, date: NaiveDate) -> Option<&Arc<TripPatternForDate>> {
        self.day(date).map(|d| &d.schedule)
    }

    fn day(&self, date: NaiveDate) -> Option<&DaySchedule> {
        self.days
            .binary_search_by_key(&date, |d| d.schedule.date())
            .ok()
            .map(|i| &self.days[i])
    }

    /// Merged index of a trip running on `date`.
    pub fn find_trip(&self, trip: &TripId, date: NaiveDate) -> Option<usize> {
        self.trip_schedules()
            .find(|s| s.service_date() == date && s.trip().id == *trip)
            .map(|s| s.index())
    }

    /// Departure time in window seconds.
    pub fn departure(&self, index: usize, stop_position: usize) -> Option<i32> {
        self.trip_schedule(index)?.departure(stop_position)
    }

    /// Arrival time in window seconds.
    pub fn arrival(&self, index: usize, stop_position: usize) -> Option<i32> {
        self.trip_schedule(index)?.arrival(stop_position)
    }

    /// First merged index whose departure at `stop_position` is at or after
    /// `time`. Equals `num_trips()` if there is none.
    pub fn first_departing_at_or_after(&self, stop_position: usize, time: i32) -> usize {
        self.trips.partition_point(|r| {
            let (times, offset) = self.resolve(*r);
            times
                .departure(stop_position)
                .is_some_and(|t| t + offset < time)
        })
    }

    /// Number of trips whose arrival at `stop_position` is at or before
    /// `time`. The last such trip has index `n - 1`.
    pub fn count_arriving_at_or_before(&self, stop_position: usize, time: i32) -> usize {
        self.trips.partition_point(|r| {
            let (times, offset) = self.resolve(*r);
            times
                .arrival(stop_position)
                .is_some_and(|t| t + offset <= time)
        })
    }

    /// A new schedule with the entry for `date` replaced, or removed when
    /// `replacement` is `None`. `self` is left untouched.
    pub fn with_date_replaced(
        &self,
        date: NaiveDate,
        replacement: Option<Arc<TripPatternForDate>>,
    ) -> Result<Self, ScheduleError> {
        if let Some(r) = &replacement {
            if r.date() != date {
                return Err(ScheduleError::DateMismatch {
                    expected: date,
                    found: r.date(),
                });
            }
        }
        let kept = self
            .days
            .iter()
            .filter(|d| d.schedule.date() != date)
            .map(|d| d.schedule.clone());
        Self::merge(self.pattern.clone(), self.window, kept.chain(replacement))
    }
}

/// One trip of a [`MultiDaySchedule`] with times on the merged axis.
#[derive(Debug, Clone, Copy)]
pub struct MergedTripSchedule<'a> {
    index: usize,
    pattern: &'a TripPattern,
    times: &'a TripTimes,
    date: NaiveDate,
    offset: i32,
}

impl<'a> MergedTripSchedule<'a> {
    /// Merged index.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn trip(&self) -> &'a Trip {
        self.times.trip()
    }

    /// Times in seconds since the trip's own service-day start.
    pub fn trip_times(&self) -> &'a TripTimes {
        self.times
    }

    pub fn service_date(&self) -> NaiveDate {
        self.date
    }

    /// Seconds from the window anchor to this trip's service-day start.
    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn arrival(&self, stop_position: usize) -> Option<i32> {
        self.times.arrival(stop_position).map(|t| t + self.offset)
    }

    pub fn departure(&self, stop_position: usize) -> Option<i32> {
        self.times.departure(stop_position).map(|t| t + self.offset)
    }

    /// Latest position at or before which the trip arrives at `stop`
    /// no later than `time_limit`.
    pub fn find_arrival_stop_position(&self, time_limit: i32, stop: StopHandle) -> Option<usize> {
        self.pattern
            .positions_of(stop)
            .filter(|&pos| self.arrival(pos).is_some_and(|t| t <= time_limit))
            .last()
    }

    /// First position at which the trip departs `stop` no earlier than
    /// `time_limit`.
    pub fn find_departure_stop_position(&self, time_limit: i32, stop: StopHandle) -> Option<usize> {
        self.pattern
            .positions_of(stop)
            .find(|&pos| self.departure(pos).is_some_and(|t| t >= time_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        PatternId, RouteId, ServiceId, StopHandle, TransitMode, TripId, parse_time_zone,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pattern(id: &str) -> Arc<TripPattern> {
        Arc::new(
            TripPattern::new(
                PatternId::new(id).unwrap(),
                RouteId::new("R1").unwrap(),
                TransitMode::Bus,
                vec![StopHandle(0), StopHandle(1), StopHandle(0)],
            )
            .unwrap(),
        )
    }

    fn times(id: &str, t: [i32; 3]) -> Arc<TripTimes> {
        let trip = Arc::new(Trip {
            id: TripId::new(id).unwrap(),
            route: RouteId::new("R1").unwrap(),
            service: ServiceId::new("S").unwrap(),
            mode: TransitMode::Bus,
        });
        Arc::new(TripTimes::new(trip, t.to_vec(), t.to_vec()).unwrap())
    }

    fn day(
        p: &Arc<TripPattern>,
        d: NaiveDate,
        trips: Vec<Arc<TripTimes>>,
    ) -> Arc<TripPatternForDate> {
        Arc::new(TripPatternForDate::new(p.clone(), d, trips).unwrap())
    }

    fn window(anchor: NaiveDate, days: u16, tz: &str) -> SearchWindow {
        SearchWindow::new(anchor, days, parse_time_zone(tz).unwrap()).unwrap()
    }

    fn daily(p: &Arc<TripPattern>, w: &SearchWindow) -> MultiDaySchedule {
        let days: Vec<_> = w
            .dates()
            .map(|d| day(p, d, vec![times("T", [3_600, 4_200, 4_800])]))
            .collect();
        MultiDaySchedule::merge(p.clone(), *w, days).unwrap()
    }

    #[test]
    fn spring_forward_offsets() {
        let p = pattern("P");
        let w = window(date(2024, 3, 30), 3, "Europe/Oslo");
        let merged = daily(&p, &w);

        let offsets: Vec<_> = merged.trip_schedules().map(|s| s.offset()).collect();
        assert_eq!(offsets, vec![0, 82_800, 169_200]);
        // Days 2 and 3 are one hour short of the naive value.
        assert_eq!(offsets[1] - 86_400, -3_600);
        assert_eq!(offsets[2] - 2 * 86_400, -3_600);
        assert_eq!(merged.offset_for(date(2024, 4, 1)), Some(169_200));
    }

    #[test]
    fn fall_back_offsets() {
        let p = pattern("P");
        let w = window(date(2024, 10, 26), 3, "Europe/Oslo");
        let merged = daily(&p, &w);

        let offsets: Vec<_> = merged.trip_schedules().map(|s| s.offset()).collect();
        assert_eq!(offsets, vec![0, 90_000, 176_400]);
    }

    #[test]
    fn utc_has_fixed_days() {
        let p = pattern("P");
        let w = window(date(2024, 3, 30), 4, "UTC");
        let merged = daily(&p, &w);
        let offsets: Vec<_> = merged.trip_schedules().map(|s| s.offset()).collect();
        assert_eq!(offsets, vec![0, 86_400, 172_800, 259_200]);
    }

    #[test]
    fn merged_times_include_offset() {
        let p = pattern("P");
        let w = window(date(2024, 3, 30), 3, "Europe/Oslo");
        let merged = daily(&p, &w);

        let second = merged.trip_schedule(1).unwrap();
        assert_eq!(second.service_date(), date(2024, 3, 31));
        assert_eq!(second.departure(0), Some(82_800 + 3_600));
        assert_eq!(second.arrival(2), Some(82_800 + 4_800));
        assert_eq!(merged.departure(2, 1), Some(169_200 + 4_200));
        assert!(merged.trip_schedule(3).is_none());
    }

    #[test]
    fn late_trips_interleave_with_next_day() {
        let p = pattern("P");
        let w = window(date(2024, 6, 1), 2, "UTC");
        let days = vec![
            day(&p, date(2024, 6, 1), vec![times("late", [86_000, 86_300, 86_600])]),
            day(&p, date(2024, 6, 2), vec![times("early", [600, 900, 1_200])]),
        ];
        let merged = MultiDaySchedule::merge(p, w, days).unwrap();
        let order: Vec<_> = merged.trip_schedules().map(|s| s.trip().id.to_string()).collect();
        assert_eq!(order, vec!["late", "early"]);
    }

    #[test]
    fn cross_day_overtaking_rejected() {
        let p = pattern("P");
        let w = window(date(2024, 6, 1), 2, "UTC");
        let days = vec![
            day(&p, date(2024, 6, 1), vec![times("slow", [86_000, 90_000, 91_000])]),
            day(&p, date(2024, 6, 2), vec![times("fast", [0, 600, 1_200])]),
        ];
        let err = MultiDaySchedule::merge(p, w, days).unwrap_err();
        assert!(matches!(err, ScheduleError::Overtaking { position: 1, .. }));
    }

    #[test]
    fn merge_validates_inputs() {
        let p = pattern("P");
        let w = window(date(2024, 6, 1), 2, "UTC");

        let outside = day(&p, date(2024, 6, 5), vec![]);
        assert_eq!(
            MultiDaySchedule::merge(p.clone(), w, vec![outside]).unwrap_err(),
            ScheduleError::DateOutsideWindow(date(2024, 6, 5))
        );

        let d = date(2024, 6, 1);
        let dup = vec![day(&p, d, vec![]), day(&p, d, vec![])];
        assert_eq!(
            MultiDaySchedule::merge(p.clone(), w, dup).unwrap_err(),
            ScheduleError::DuplicateDate(d)
        );

        let other = pattern("Q");
        let wrong = day(&other, d, vec![]);
        assert!(matches!(
            MultiDaySchedule::merge(p, w, vec![wrong]).unwrap_err(),
            ScheduleError::PatternMismatch { .. }
        ));
    }

    #[test]
    fn replacing_a_date_builds_a_new_schedule() {
        let p = pattern("P");
        let w = window(date(2024, 3, 30), 3, "Europe/Oslo");
        let merged = daily(&p, &w);

        let removed = merged.with_date_replaced(date(2024, 3, 31), None).unwrap();
        assert_eq!(removed.num_trips(), 2);
        assert_eq!(removed.offset_for(date(2024, 3, 31)), None);
        // Other dates keep their offsets.
        assert_eq!(removed.trip_schedule(1).unwrap().offset(), 169_200);
        // The original is untouched.
        assert_eq!(merged.num_trips(), 3);

        let extra = day(
            &p,
            date(2024, 3, 31),
            vec![times("A", [3_600, 4_200, 4_800]), times("B", [7_200, 7_800, 8_400])],
        );
        let replaced = merged.with_date_replaced(date(2024, 3, 31), Some(extra)).unwrap();
        assert_eq!(replaced.num_trips(), 4);
        assert_eq!(
            replaced.find_trip(&TripId::new("B").unwrap(), date(2024, 3, 31)),
            Some(2)
        );
    }

    #[test]
    fn binary_search_helpers() {
        let p = pattern("P");
        let w = window(date(2024, 6, 1), 1, "UTC");
        let days = vec![day(
            &p,
            date(2024, 6, 1),
            vec![
                times("a", [1_000, 1_300, 1_600]),
                times("b", [2_000, 2_300, 2_600]),
                times("c", [3_000, 3_300, 3_600]),
            ],
        )];
        let merged = MultiDaySchedule::merge(p, w, days).unwrap();

        assert_eq!(merged.first_departing_at_or_after(1, 2_300), 1);
        assert_eq!(merged.first_departing_at_or_after(1, 2_301), 2);
        assert_eq!(merged.first_departing_at_or_after(1, 9_999), 3);
        assert_eq!(merged.count_arriving_at_or_before(1, 2_300), 2);
        assert_eq!(merged.count_arriving_at_or_before(1, 100), 0);
    }

    #[test]
    fn stop_position_lookup_on_loops() {
        let p = pattern("P");
        let w = window(date(2024, 6, 1), 1, "UTC");
        let days = vec![day(&p, date(2024, 6, 1), vec![times("loop", [1_000, 1_300, 1_600])])];
        let merged = MultiDaySchedule::merge(p, w, days).unwrap();
        let s = merged.trip_schedule(0).unwrap();

        assert_eq!(s.find_departure_stop_position(900, StopHandle(0)), Some(0));
        assert_eq!(s.find_departure_stop_position(1_100, StopHandle(0)), Some(2));
        assert_eq!(s.find_arrival_stop_position(1_700, StopHandle(0)), Some(2));
        assert_eq!(s.find_arrival_stop_position(1_200, StopHandle(0)), Some(0));
        assert_eq!(s.find_arrival_stop_position(900, StopHandle(0)), None);
    }
}
