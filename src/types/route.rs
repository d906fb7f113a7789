//! Route types

use serde::{Deserialize, Serialize};

use super::{effective_priority, Coordinates, ShipmentItem};
use crate::error::ValidationError;

/// A stop offered to the sequencer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StopCandidate {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipment_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    /// "HH:MM"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window_start: Option<String>,
    /// "HH:MM"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window_end: Option<String>,
    /// Minutes spent at the stop
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,

    // Load attributes, carried through only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pallets: Option<u32>,
}

impl StopCandidate {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    pub fn effective_priority(&self) -> f64 {
        effective_priority(self.priority)
    }

    /// Service minutes, falling back to `default_minutes` when unset, zero,
    /// negative or not finite.
    pub fn effective_service_minutes(&self, default_minutes: f64) -> f64 {
        match self.service_time {
            Some(m) if m.is_finite() && m > 0.0 => m,
            _ => default_minutes,
        }
    }

    /// Window start, ignoring blank strings.
    pub fn window_start(&self) -> Option<&str> {
        non_blank(self.time_window_start.as_deref())
    }

    /// Window end, ignoring blank strings.
    pub fn window_end(&self) -> Option<&str> {
        non_blank(self.time_window_end.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl From<&ShipmentItem> for StopCandidate {
    fn from(item: &ShipmentItem) -> Self {
        Self {
            id: item.shipment_id.clone(),
            shipment_id: Some(item.shipment_id.clone()),
            latitude: item.latitude,
            longitude: item.longitude,
            customer_name: item.customer_name.clone(),
            address: Some(item.address.clone()),
            time_window_start: item.time_window_start.clone(),
            time_window_end: item.time_window_end.clone(),
            priority: Some(item.priority),
            packages: Some(item.package_count),
            weight: Some(item.total_weight),
            volume: Some(item.total_volume),
            pallets: Some(item.total_pallets),
            ..Default::default()
        }
    }
}

/// A stop placed in the route, with its schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedStop {
    #[serde(flatten)]
    pub stop: StopCandidate,
    /// 1-based visiting order
    pub sequence: u32,
    pub planned_arrival: String,
    pub planned_departure: String,
    /// km, 1 decimal
    pub distance_from_previous_km: f64,
    /// Whole minutes
    pub travel_time_minutes: i64,
}

/// Aggregate route figures, including the return leg to the origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMetrics {
    pub total_distance_km: f64,
    pub total_duration_minutes: i64,
    pub total_stops: usize,
    pub estimated_start: String,
    pub estimated_end: String,
}

/// Result of sequencing a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub optimized_stops: Vec<OptimizedStop>,
    pub metrics: RouteMetrics,
    pub warnings: Vec<String>,
}

/// Request to sequence a route
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutePlanRequest {
    #[serde(default)]
    pub origin_lat: Option<f64>,
    #[serde(default)]
    pub origin_lng: Option<f64>,
    #[serde(default)]
    pub stops: Option<Vec<StopCandidate>>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub avg_speed_kmh: Option<f64>,
    /// Minutes
    #[serde(default)]
    pub default_service_time: Option<f64>,
}

impl RoutePlanRequest {
    pub fn origin(&self) -> Result<Coordinates, ValidationError> {
        let lat = self.origin_lat.ok_or(ValidationError::MissingField("origin_lat"))?;
        let lng = self.origin_lng.ok_or(ValidationError::MissingField("origin_lng"))?;
        Ok(Coordinates::new(lat, lng))
    }

    /// An empty list is valid; only an absent one is rejected.
    pub fn stops(&self) -> Result<&[StopCandidate], ValidationError> {
        self.stops
            .as_deref()
            .ok_or(ValidationError::MissingField("stops"))
    }
}
