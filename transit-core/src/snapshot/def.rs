//! Serializable network definitions, the input of the build pass.
//!
//! Identifiers are validated while deserializing; references between
//! entities are resolved later by [`TransitSnapshot::build`](super::TransitSnapshot::build).
//! Times are `HH:MM:SS` strings relative to the service day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{RouteId, ServiceId, StationId, StopId, TransitMode, TripId};
use crate::transfer::TransferPriority;

use super::BuildConfig;

/// Everything needed to build a [`TransitSnapshot`](super::TransitSnapshot).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDefinition {
    #[serde(default)]
    pub config: BuildConfig,
    #[serde(default)]
    pub stations: Vec<StationDef>,
    pub stops: Vec<StopDef>,
    pub routes: Vec<RouteDef>,
    pub trips: Vec<TripDef>,
    /// Dates on which each service runs.
    #[serde(default)]
    pub calendar: Vec<ServiceDef>,
    #[serde(default)]
    pub transfers: Vec<TransferDef>,
    #[serde(default)]
    pub flex_trips: Vec<FlexTripDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationDef {
    pub id: StationId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopDef {
    pub id: StopId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_station: Option<StationId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDef {
    pub id: RouteId,
    pub mode: TransitMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDef {
    pub id: TripId,
    pub route: RouteId,
    pub service: ServiceId,
    pub stop_times: Vec<StopTimeDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopTimeDef {
    pub stop: StopId,
    pub arrival: String,
    pub departure: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDef {
    pub id: ServiceId,
    pub dates: Vec<NaiveDate>,
}

/// Endpoint of a transfer rule as written in the definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransferPointDef {
    Station { station: StationId },
    Stop { stop: StopId },
    Route { route: RouteId, stop_position: usize },
    Trip { trip: TripId, stop_position: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDef {
    pub from: TransferPointDef,
    pub to: TransferPointDef,
    #[serde(default)]
    pub priority: TransferPriority,
    #[serde(default)]
    pub stay_seated: bool,
    #[serde(default)]
    pub guaranteed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_transfer_time_secs: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_wait_time_secs: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlexTripDef {
    pub id: TripId,
    pub route: RouteId,
    pub service: ServiceId,
    pub stops: Vec<FlexStopDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking: Option<BookingDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlexStopDef {
    pub stop: StopId,
    pub window_start: String,
    pub window_end: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDef {
    /// `HH:MM:SS` on the booking day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_booking_time: Option<String>,
    /// Days before the service date the deadline falls on.
    #[serde(default)]
    pub latest_booking_days_prior: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_booking_notice_secs: Option<i32>,
}
