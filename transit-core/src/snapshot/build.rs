//! Building an immutable [`TransitSnapshot`] from a [`NetworkDefinition`].

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tracing::{debug, warn};

use crate::domain::{
    DomainError, PatternId, Route, RouteId, SearchWindow, ServiceId, Station, StationId, Stop,
    StopHandle, StopIndex, Trip, TripId, TripPattern, TripTimes, parse_service_time,
    parse_time_zone,
};
use crate::flex::{
    BookingWindow, FlexAccessEgress, FlexError, FlexPathDurations, FlexStopTime, FlexTrip,
    LatestBookingTime, RoutingBookingInfo, TimeWindow,
};
use crate::schedule::{MultiDaySchedule, ScheduleError, TripPatternForDate};
use crate::search::{ConstrainedBoardingSearch, SearchDirection, SlackProvider};
use crate::transfer::{
    ConstrainedTransfer, TransferConstraint, TransferError, TransferForPatternByStopPos,
    TransferPoint, TransferService, TransferTimingConfig,
};

use super::def::{BookingDef, FlexTripDef, TransferDef, TransferPointDef, TripDef};
use super::{BuildConfig, BuildError, ImportIssue, NetworkDefinition};

/// A pattern's merged timetable and the transfers boarding it.
#[derive(Debug, Clone)]
pub struct PatternEntry {
    schedule: Arc<MultiDaySchedule>,
    forward: Option<Arc<TransferForPatternByStopPos>>,
    reverse: Option<Arc<TransferForPatternByStopPos>>,
}

impl PatternEntry {
    pub fn pattern(&self) -> &Arc<TripPattern> {
        self.schedule.pattern()
    }

    pub fn schedule(&self) -> &MultiDaySchedule {
        &self.schedule
    }

    /// Constrained transfers boarding this pattern in `direction`, if any.
    pub fn transfers(&self, direction: SearchDirection) -> Option<&TransferForPatternByStopPos> {
        match direction {
            SearchDirection::Forward => self.forward.as_deref(),
            SearchDirection::Reverse => self.reverse.as_deref(),
        }
    }
}

#[derive(Debug, Clone)]
struct FlexService {
    trip: Arc<FlexTrip>,
    dates: BTreeSet<NaiveDate>,
}

/// An immutable, validated view of the network over one search window.
///
/// Snapshots are built once and shared read-only between searches; updates
/// produce a new snapshot (see [`SnapshotHandle`](super::SnapshotHandle)).
/// Stop handles are only meaningful within the snapshot that issued them.
#[derive(Debug, Clone)]
pub struct TransitSnapshot {
    window: SearchWindow,
    stations: HashMap<StationId, Station>,
    stops: Arc<StopIndex>,
    routes: HashMap<RouteId, Route>,
    patterns: Vec<PatternEntry>,
    pattern_by_id: HashMap<PatternId, usize>,
    trip_patterns: HashMap<TripId, usize>,
    transfers: Arc<TransferService>,
    flex_trips: Vec<FlexService>,
    flex_by_id: HashMap<TripId, usize>,
    slack: SlackProvider,
    issues: Vec<ImportIssue>,
}

impl TransitSnapshot {
    /// Build a snapshot.
    ///
    /// Trips are limited to the services active in the window, grouped into
    /// patterns by route and stop sequence, and merged across days.
    /// References that no longer resolve are dropped and recorded as
    /// [`ImportIssue`]s.
    ///
    /// # Errors
    ///
    /// Malformed input (negative slack, bad time zone or window, duplicate
    /// ids, invalid trip times, overtaking trips, malformed transfer or flex
    /// rules) fails the whole build.
    pub fn build(definition: &NetworkDefinition, config: &BuildConfig) -> Result<Self, BuildError> {
        let mut issues = Vec::new();

        let slack = config.slack_provider()?;
        let time_zone = parse_time_zone(&config.time_zone)?;
        let calendar = collect_calendar(definition);
        let anchor = match config.window_start {
            Some(date) => date,
            None => calendar
                .values()
                .filter_map(|dates| dates.first())
                .min()
                .copied()
                .ok_or(BuildError::EmptyCalendar)?,
        };
        let window = SearchWindow::new(anchor, config.window_days, time_zone)?;

        // Dates each service runs within the window.
        let active: HashMap<&ServiceId, BTreeSet<NaiveDate>> = calendar
            .iter()
            .map(|(id, dates)| {
                let in_window = dates.iter().copied().filter(|d| window.contains(*d));
                (*id, in_window.collect())
            })
            .collect();

        let stations = collect_stations(definition)?;
        let stops = Arc::new(collect_stops(definition, &stations, &mut issues)?);
        let routes = collect_routes(definition)?;

        let mut groups = PatternGroups::default();
        let mut trip_ids = HashSet::new();
        let mut inactive = 0usize;
        for def in &definition.trips {
            if !trip_ids.insert(&def.id) {
                return Err(DomainError::DuplicateId {
                    kind: "trip",
                    id: def.id.to_string(),
                }
                .into());
            }
            let Some(route) = routes.get(&def.route) else {
                record(
                    &mut issues,
                    ImportIssue::UnknownRoute {
                        trip: def.id.to_string(),
                        route: def.route.to_string(),
                    },
                );
                continue;
            };
            let Some(dates) = active.get(&def.service) else {
                record(
                    &mut issues,
                    ImportIssue::UnknownService {
                        trip: def.id.to_string(),
                        service: def.service.to_string(),
                    },
                );
                continue;
            };
            if dates.is_empty() {
                inactive += 1;
                continue;
            }
            if let Some((handles, times)) = trip_times(def, route, &stops, &mut issues)? {
                groups.add(route, handles, times)?;
            }
        }

        let mut patterns = Vec::with_capacity(groups.groups.len());
        let mut pattern_by_id = HashMap::new();
        let mut trip_patterns = HashMap::new();
        for (index, group) in groups.groups.into_iter().enumerate() {
            let mut by_date: BTreeMap<NaiveDate, Vec<Arc<TripTimes>>> = BTreeMap::new();
            for times in group.trips {
                trip_patterns.insert(times.trip().id.clone(), index);
                for date in active.get(&times.trip().service).into_iter().flatten() {
                    by_date.entry(*date).or_default().push(times.clone());
                }
            }
            let days = by_date
                .into_iter()
                .map(|(date, trips)| {
                    TripPatternForDate::new(group.pattern.clone(), date, trips).map(Arc::new)
                })
                .collect::<Result<Vec<_>, _>>()?;
            let schedule = MultiDaySchedule::merge(group.pattern.clone(), window, days)?;

            pattern_by_id.insert(group.pattern.id().clone(), index);
            patterns.push(PatternEntry {
                schedule: Arc::new(schedule),
                forward: None,
                reverse: None,
            });
        }

        let resolver = PointResolver {
            stations: &stations,
            stops: &stops,
            routes: &routes,
            patterns: &patterns,
            trip_patterns: &trip_patterns,
        };
        let mut service = TransferService::new(&stops);
        for (index, def) in definition.transfers.iter().enumerate() {
            if let Some(transfer) = resolver.resolve_transfer(index, def, &mut issues)? {
                service.add(transfer);
            }
        }
        let transfers = Arc::new(service);

        for (index, entry) in patterns.iter_mut().enumerate() {
            let (forward, reverse) =
                index_transfers(entry.pattern(), index, &trip_patterns, &transfers, &stops);
            entry.forward = forward;
            entry.reverse = reverse;
        }

        let mut flex_trips = Vec::new();
        let mut flex_by_id = HashMap::new();
        for def in &definition.flex_trips {
            if flex_by_id.contains_key(&def.id) || trip_patterns.contains_key(&def.id) {
                return Err(DomainError::DuplicateId {
                    kind: "trip",
                    id: def.id.to_string(),
                }
                .into());
            }
            if let Some(flex) = resolve_flex_trip(def, &routes, &active, &stops, &mut issues)? {
                flex_by_id.insert(def.id.clone(), flex_trips.len());
                flex_trips.push(flex);
            }
        }

        let snapshot = Self {
            window,
            stations,
            stops,
            routes,
            patterns,
            pattern_by_id,
            trip_patterns,
            transfers,
            flex_trips,
            flex_by_id,
            slack,
            issues,
        };

        debug!(
            anchor = %window.anchor(),
            days = window.days(),
            stops = snapshot.stops.len(),
            patterns = snapshot.patterns.len(),
            merged_trips = snapshot.num_merged_trips(),
            inactive_trips = inactive,
            transfers = snapshot.transfers.len(),
            flex_trips = snapshot.flex_trips.len(),
            issues = snapshot.issues.len(),
            "built transit snapshot"
        );

        Ok(snapshot)
    }

    /// A new snapshot with the trips of `pattern` on `date` replaced.
    ///
    /// An empty `trips` removes the date. Only that pattern's merged
    /// schedule and transfer indexes are rebuilt; `self` is unchanged.
    ///
    /// # Errors
    ///
    /// Fails for a date outside the window, an unknown pattern, trips of
    /// another pattern, or trips that would overtake each other.
    pub fn with_pattern_date_replaced(
        &self,
        pattern: &PatternId,
        date: NaiveDate,
        trips: Vec<Arc<TripTimes>>,
    ) -> Result<Self, BuildError> {
        if !self.window.contains(date) {
            return Err(ScheduleError::DateOutsideWindow(date).into());
        }
        let unknown = || BuildError::UnknownPattern(pattern.to_string());
        let index = *self.pattern_by_id.get(pattern).ok_or_else(unknown)?;
        let entry = self.patterns.get(index).ok_or_else(unknown)?;
        let trip_pattern = entry.pattern().clone();

        for times in &trips {
            let trip = times.trip();
            let other_pattern = self.trip_patterns.get(&trip.id).is_some_and(|p| *p != index);
            if trip.route != *trip_pattern.route() || other_pattern {
                return Err(BuildError::ForeignTrip {
                    trip: trip.id.to_string(),
                    pattern: pattern.to_string(),
                });
            }
        }

        let replacement = if trips.is_empty() {
            None
        } else {
            Some(Arc::new(TripPatternForDate::new(trip_pattern.clone(), date, trips)?))
        };
        let schedule = entry.schedule.with_date_replaced(date, replacement)?;

        let mut next = self.clone();
        next.trip_patterns.retain(|_, p| *p != index);
        for trip in schedule.trip_schedules() {
            next.trip_patterns.insert(trip.trip().id.clone(), index);
        }
        let (forward, reverse) = index_transfers(
            &trip_pattern,
            index,
            &next.trip_patterns,
            &next.transfers,
            &next.stops,
        );

        debug!(
            pattern = %pattern,
            %date,
            merged_trips = schedule.num_trips(),
            "replaced pattern schedule"
        );

        if let Some(slot) = next.patterns.get_mut(index) {
            *slot = PatternEntry {
                schedule: Arc::new(schedule),
                forward,
                reverse,
            };
        }
        Ok(next)
    }

    pub fn window(&self) -> &SearchWindow {
        &self.window
    }

    pub fn stops(&self) -> &StopIndex {
        &self.stops
    }

    pub fn station(&self, id: &StationId) -> Option<&Station> {
        self.stations.get(id)
    }

    pub fn route(&self, id: &RouteId) -> Option<&Route> {
        self.routes.get(id)
    }

    pub fn num_patterns(&self) -> usize {
        self.patterns.len()
    }

    /// Patterns in build order; the position is the pattern index.
    pub fn patterns(&self) -> &[PatternEntry] {
        &self.patterns
    }

    pub fn pattern(&self, index: usize) -> Option<&PatternEntry> {
        self.patterns.get(index)
    }

    pub fn pattern_index(&self, id: &PatternId) -> Option<usize> {
        self.pattern_by_id.get(id).copied()
    }

    /// Index of the pattern a scheduled trip runs on.
    pub fn pattern_of_trip(&self, trip: &TripId) -> Option<usize> {
        self.trip_patterns.get(trip).copied()
    }

    /// Trips over all patterns and days of the window.
    pub fn num_merged_trips(&self) -> usize {
        self.patterns.iter().map(|p| p.schedule.num_trips()).sum()
    }

    pub fn transfer_service(&self) -> &TransferService {
        &self.transfers
    }

    /// Constrained boarding search onto a pattern.
    pub fn boarding_search<'a>(
        &'a self,
        pattern: usize,
        direction: SearchDirection,
        config: &'a TransferTimingConfig,
    ) -> Option<ConstrainedBoardingSearch<'a>> {
        let entry = self.patterns.get(pattern)?;
        Some(ConstrainedBoardingSearch::new(
            entry.transfers(direction),
            direction,
            config,
        ))
    }

    pub fn slack(&self) -> &SlackProvider {
        &self.slack
    }

    pub fn num_flex_trips(&self) -> usize {
        self.flex_trips.len()
    }

    pub fn flex_trips(&self) -> impl Iterator<Item = &Arc<FlexTrip>> {
        self.flex_trips.iter().map(|f| &f.trip)
    }

    pub fn flex_trip(&self, id: &TripId) -> Option<&Arc<FlexTrip>> {
        let index = *self.flex_by_id.get(id)?;
        self.flex_trips.get(index).map(|f| &f.trip)
    }

    /// A flex leg on the run of `trip` on `service_date`.
    ///
    /// Durations are in seconds; the offset and booking deadline are
    /// resolved against the window. Returns `Ok(None)` if the trip is
    /// unknown or does not run on that date.
    ///
    /// # Errors
    ///
    /// Fails on negative durations or invalid stop positions.
    #[allow(clippy::too_many_arguments)]
    pub fn flex_leg(
        &self,
        trip: &TripId,
        service_date: NaiveDate,
        from_stop_position: usize,
        to_stop_position: usize,
        access: i32,
        trip_duration: i32,
        egress: i32,
    ) -> Result<Option<FlexAccessEgress>, FlexError> {
        let Some(flex) = self.flex_by_id.get(trip).and_then(|i| self.flex_trips.get(*i)) else {
            return Ok(None);
        };
        if !flex.dates.contains(&service_date) {
            return Ok(None);
        }
        let offset = self.window.offset_of(service_date)?;
        let durations = FlexPathDurations::new(access, trip_duration, egress, offset)?;
        let booking = match flex.trip.booking() {
            Some(rules) => RoutingBookingInfo::resolve(rules, service_date, &self.window)?,
            None => RoutingBookingInfo::unrestricted(),
        };
        FlexAccessEgress::new(
            flex.trip.clone(),
            from_stop_position,
            to_stop_position,
            durations,
            booking,
        )
        .map(Some)
    }

    /// References dropped while building.
    pub fn issues(&self) -> &[ImportIssue] {
        &self.issues
    }
}

fn record(issues: &mut Vec<ImportIssue>, issue: ImportIssue) {
    warn!(%issue, "dropped dangling reference");
    issues.push(issue);
}

fn collect_calendar(definition: &NetworkDefinition) -> HashMap<&ServiceId, BTreeSet<NaiveDate>> {
    let mut calendar: HashMap<&ServiceId, BTreeSet<NaiveDate>> = HashMap::new();
    for service in &definition.calendar {
        calendar
            .entry(&service.id)
            .or_default()
            .extend(service.dates.iter().copied());
    }
    calendar
}

fn collect_stations(
    definition: &NetworkDefinition,
) -> Result<HashMap<StationId, Station>, DomainError> {
    let mut stations = HashMap::new();
    for def in &definition.stations {
        let station = Station {
            id: def.id.clone(),
            name: def.name.clone(),
        };
        if stations.insert(def.id.clone(), station).is_some() {
            return Err(DomainError::DuplicateId {
                kind: "station",
                id: def.id.to_string(),
            });
        }
    }
    Ok(stations)
}

fn collect_stops(
    definition: &NetworkDefinition,
    stations: &HashMap<StationId, Station>,
    issues: &mut Vec<ImportIssue>,
) -> Result<StopIndex, DomainError> {
    let stops = definition.stops.iter().map(|def| {
        let stop = Stop::new(def.id.clone(), def.name.clone());
        match &def.parent_station {
            Some(station) if stations.contains_key(station) => {
                stop.with_parent_station(station.clone())
            }
            Some(station) => {
                record(
                    issues,
                    ImportIssue::UnknownParentStation {
                        stop: def.id.to_string(),
                        station: station.to_string(),
                    },
                );
                stop
            }
            None => stop,
        }
    });
    StopIndex::new(stops.collect::<Vec<_>>())
}

fn collect_routes(definition: &NetworkDefinition) -> Result<HashMap<RouteId, Route>, DomainError> {
    let mut routes = HashMap::new();
    for def in &definition.routes {
        let route = Route {
            id: def.id.clone(),
            mode: def.mode,
        };
        if routes.insert(def.id.clone(), route).is_some() {
            return Err(DomainError::DuplicateId {
                kind: "route",
                id: def.id.to_string(),
            });
        }
    }
    Ok(routes)
}

/// Resolve a trip's stops and parse its times; `None` if it was dropped.
fn trip_times(
    def: &TripDef,
    route: &Route,
    stops: &StopIndex,
    issues: &mut Vec<ImportIssue>,
) -> Result<Option<(Vec<StopHandle>, Arc<TripTimes>)>, BuildError> {
    if def.stop_times.len() < 2 {
        record(issues, ImportIssue::TooFewStopTimes { trip: def.id.to_string() });
        return Ok(None);
    }
    let mut handles = Vec::with_capacity(def.stop_times.len());
    for stop_time in &def.stop_times {
        let Some(handle) = stops.handle_of(&stop_time.stop) else {
            record(
                issues,
                ImportIssue::UnknownStop {
                    trip: def.id.to_string(),
                    stop: stop_time.stop.to_string(),
                },
            );
            return Ok(None);
        };
        handles.push(handle);
    }

    let arrivals = def
        .stop_times
        .iter()
        .map(|st| parse_service_time(&st.arrival))
        .collect::<Result<Vec<_>, _>>()?;
    let departures = def
        .stop_times
        .iter()
        .map(|st| parse_service_time(&st.departure))
        .collect::<Result<Vec<_>, _>>()?;

    let trip = Arc::new(Trip {
        id: def.id.clone(),
        route: route.id.clone(),
        service: def.service.clone(),
        mode: route.mode,
    });
    let times = TripTimes::new(trip, arrivals, departures)?;
    Ok(Some((handles, Arc::new(times))))
}

struct PatternGroup {
    pattern: Arc<TripPattern>,
    trips: Vec<Arc<TripTimes>>,
}

/// Trips grouped by route and exact stop sequence, in first-seen order.
#[derive(Default)]
struct PatternGroups {
    by_key: HashMap<(RouteId, Vec<StopHandle>), usize>,
    per_route: HashMap<RouteId, usize>,
    groups: Vec<PatternGroup>,
}

impl PatternGroups {
    fn add(
        &mut self,
        route: &Route,
        stops: Vec<StopHandle>,
        times: Arc<TripTimes>,
    ) -> Result<(), BuildError> {
        let key = (route.id.clone(), stops);
        if let Some(&index) = self.by_key.get(&key) {
            if let Some(group) = self.groups.get_mut(index) {
                group.trips.push(times);
            }
            return Ok(());
        }

        let n = self.per_route.entry(route.id.clone()).or_default();
        let id = PatternId::new(format!("{}:{}", route.id, n))?;
        *n += 1;

        let pattern = TripPattern::new(id, route.id.clone(), route.mode, key.1.clone())?;
        self.by_key.insert(key, self.groups.len());
        self.groups.push(PatternGroup {
            pattern: Arc::new(pattern),
            trips: vec![times],
        });
        Ok(())
    }
}

fn index_transfers(
    pattern: &TripPattern,
    index: usize,
    trip_patterns: &HashMap<TripId, usize>,
    transfers: &TransferService,
    stops: &StopIndex,
) -> (
    Option<Arc<TransferForPatternByStopPos>>,
    Option<Arc<TransferForPatternByStopPos>>,
) {
    let is_pattern_trip = |trip: &TripId| trip_patterns.get(trip) == Some(&index);
    let generate = |direction: SearchDirection| {
        TransferForPatternByStopPos::generate(
            pattern,
            &is_pattern_trip,
            transfers.transfers(),
            stops,
            direction,
        )
        .map(Arc::new)
    };
    (
        generate(SearchDirection::Forward),
        generate(SearchDirection::Reverse),
    )
}

/// Outcome of resolving a transfer point against the built catalog.
enum Resolved {
    Point(TransferPoint),
    Dangling(String),
}

struct PointResolver<'a> {
    stations: &'a HashMap<StationId, Station>,
    stops: &'a StopIndex,
    routes: &'a HashMap<RouteId, Route>,
    patterns: &'a [PatternEntry],
    trip_patterns: &'a HashMap<TripId, usize>,
}

impl PointResolver<'_> {
    fn resolve_transfer(
        &self,
        index: usize,
        def: &TransferDef,
        issues: &mut Vec<ImportIssue>,
    ) -> Result<Option<ConstrainedTransfer>, BuildError> {
        let wrap = |source: TransferError| BuildError::Transfer { index, source };
        let constraint = constraint(def).map_err(wrap)?;

        if constraint.is_stay_seated() {
            for point in [&def.from, &def.to] {
                if let TransferPointDef::Station { .. } | TransferPointDef::Stop { .. } = point {
                    return Err(wrap(TransferError::StaySeatedNeedsTrip(describe(point))));
                }
            }
        }

        let from = self.resolve(&def.from).map_err(wrap)?;
        let to = self.resolve(&def.to).map_err(wrap)?;
        match (from, to) {
            (Resolved::Point(from), Resolved::Point(to)) => {
                Ok(Some(ConstrainedTransfer::new(from, to, constraint)))
            }
            (Resolved::Dangling(point), _) | (_, Resolved::Dangling(point)) => {
                record(issues, ImportIssue::DanglingTransfer { index, point });
                Ok(None)
            }
        }
    }

    fn resolve(&self, def: &TransferPointDef) -> Result<Resolved, TransferError> {
        let dangling =
            || -> Result<Resolved, TransferError> { Ok(Resolved::Dangling(describe(def))) };
        let point = match def {
            TransferPointDef::Station { station } => {
                if !self.stations.contains_key(station) {
                    return dangling();
                }
                TransferPoint::Station {
                    station: station.clone(),
                }
            }
            TransferPointDef::Stop { stop } => match self.stops.handle_of(stop) {
                Some(stop) => TransferPoint::Stop { stop },
                None => return dangling(),
            },
            TransferPointDef::Route { route, stop_position } => {
                if !self.routes.contains_key(route) {
                    return dangling();
                }
                // Longest surviving pattern of the route bounds the position.
                let Some(num_stops) = self
                    .patterns
                    .iter()
                    .filter(|p| p.pattern().route() == route)
                    .map(|p| p.pattern().num_stops())
                    .max()
                else {
                    return dangling();
                };
                check_position(def, *stop_position, num_stops)?;
                TransferPoint::Route {
                    route: route.clone(),
                    stop_position: *stop_position,
                }
            }
            TransferPointDef::Trip { trip, stop_position } => {
                let entry = self.trip_patterns.get(trip).and_then(|i| self.patterns.get(*i));
                let Some(entry) = entry else {
                    return dangling();
                };
                check_position(def, *stop_position, entry.pattern().num_stops())?;
                TransferPoint::Trip {
                    trip: trip.clone(),
                    stop_position: *stop_position,
                }
            }
        };
        Ok(Resolved::Point(point))
    }
}

fn check_position(
    def: &TransferPointDef,
    position: usize,
    num_stops: usize,
) -> Result<(), TransferError> {
    if position < num_stops {
        Ok(())
    } else {
        Err(TransferError::InvalidStopPosition {
            point: describe(def),
            position,
            num_stops,
        })
    }
}

fn describe(def: &TransferPointDef) -> String {
    match def {
        TransferPointDef::Station { station } => format!("station {station}"),
        TransferPointDef::Stop { stop } => format!("stop {stop}"),
        TransferPointDef::Route {
            route,
            stop_position,
        } => format!("route {route} @ {stop_position}"),
        TransferPointDef::Trip { trip, stop_position } => format!("trip {trip} @ {stop_position}"),
    }
}

fn constraint(def: &TransferDef) -> Result<TransferConstraint, TransferError> {
    let mut builder = TransferConstraint::builder().priority(def.priority);
    if def.stay_seated {
        builder = builder.stay_seated();
    }
    if def.guaranteed {
        builder = builder.guaranteed();
    }
    if let Some(seconds) = def.min_transfer_time_secs {
        builder = builder.min_transfer_time(seconds_to_duration("min transfer time", seconds)?);
    }
    if let Some(seconds) = def.max_wait_time_secs {
        builder = builder.max_wait_time(seconds_to_duration("max wait time", seconds)?);
    }
    builder.build()
}

fn seconds_to_duration(what: &'static str, seconds: i64) -> Result<Duration, TransferError> {
    Duration::try_seconds(seconds).ok_or(TransferError::DurationTooLarge { what, seconds })
}

fn resolve_flex_trip(
    def: &FlexTripDef,
    routes: &HashMap<RouteId, Route>,
    active: &HashMap<&ServiceId, BTreeSet<NaiveDate>>,
    stops: &StopIndex,
    issues: &mut Vec<ImportIssue>,
) -> Result<Option<FlexService>, BuildError> {
    let mut dangling = |what: String| -> Result<Option<FlexService>, BuildError> {
        record(
            issues,
            ImportIssue::DanglingFlexTrip {
                trip: def.id.to_string(),
                what,
            },
        );
        Ok(None)
    };
    if !routes.contains_key(&def.route) {
        return dangling(format!("route {}", def.route));
    }
    let Some(dates) = active.get(&def.service) else {
        return dangling(format!("service {}", def.service));
    };
    if dates.is_empty() {
        return Ok(None);
    }

    let flex_err = |source: FlexError| BuildError::Flex {
        trip: def.id.to_string(),
        source,
    };
    let mut stop_times = Vec::with_capacity(def.stops.len());
    for stop in &def.stops {
        let Some(handle) = stops.handle_of(&stop.stop) else {
            return dangling(format!("stop {}", stop.stop));
        };
        let window = TimeWindow::new(
            parse_service_time(&stop.window_start)?,
            parse_service_time(&stop.window_end)?,
        )
        .map_err(flex_err)?;
        stop_times.push(FlexStopTime { stop: handle, window });
    }

    let booking = def
        .booking
        .as_ref()
        .map(booking_window)
        .transpose()
        .map_err(flex_err)?;
    let trip = FlexTrip::new(
        def.id.clone(),
        def.route.clone(),
        def.service.clone(),
        stop_times,
        booking,
    )
    .map_err(flex_err)?;

    Ok(Some(FlexService {
        trip: Arc::new(trip),
        dates: dates.clone(),
    }))
}

fn booking_window(def: &BookingDef) -> Result<BookingWindow, FlexError> {
    let latest = def
        .latest_booking_time
        .as_deref()
        .map(|time| {
            LatestBookingTime::new(parse_service_time(time)?, def.latest_booking_days_prior)
        })
        .transpose()?;
    BookingWindow::new(latest, def.minimum_booking_notice_secs)
}
