//! Load planning types

use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_ADDRESS, DEFAULT_CUSTOMER_NAME, DEFAULT_PACKAGE_COUNT, DEFAULT_PRIORITY,
    UNLIMITED_COUNT,
};
use crate::error::ValidationError;

/// Sort strategy applied to the candidates before the greedy walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Heaviest first
    Weight,
    /// Bulkiest first
    Volume,
    /// Densest (weight per m³) first
    #[default]
    Balanced,
    /// Most urgent (lowest priority number) first
    Priority,
}

impl LoadMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            LoadMode::Weight => "weight",
            LoadMode::Volume => "volume",
            LoadMode::Balanced => "balanced",
            LoadMode::Priority => "priority",
        }
    }

    /// Resolve a caller-supplied mode name. Unknown or absent names fall back
    /// to `Balanced` rather than failing.
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(|n| n.trim().to_ascii_lowercase()).as_deref() {
            Some("weight") => LoadMode::Weight,
            Some("volume") => LoadMode::Volume,
            Some("priority") => LoadMode::Priority,
            _ => LoadMode::Balanced,
        }
    }
}

/// Capacity profile of the vehicle being loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleCapacity {
    pub id: String,
    #[serde(default)]
    pub plate: String,
    /// kg
    #[serde(default)]
    pub max_weight: f64,
    /// m³
    #[serde(default)]
    pub max_volume: f64,
    #[serde(default)]
    pub max_pallets: Option<u32>,
    #[serde(default)]
    pub max_packages: Option<u32>,
    // Cargo box dimensions (cm), informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cargo_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cargo_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cargo_height: Option<f64>,
}

impl VehicleCapacity {
    /// Pallet ceiling; zero or absent means unlimited.
    pub fn effective_max_pallets(&self) -> u32 {
        unlimited_if_unset(self.max_pallets)
    }

    /// Package ceiling; zero or absent means unlimited.
    pub fn effective_max_packages(&self) -> u32 {
        unlimited_if_unset(self.max_packages)
    }
}

fn unlimited_if_unset(value: Option<u32>) -> u32 {
    match value {
        Some(v) if v > 0 => v,
        _ => UNLIMITED_COUNT,
    }
}

/// A shipment offered to the planner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipmentCandidate {
    pub id: String,
    #[serde(default)]
    pub shipment_number: Option<String>,
    #[serde(default)]
    pub total_weight: Option<f64>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub total_pallets: Option<u32>,
    #[serde(default)]
    pub package_count: Option<u32>,
    #[serde(default)]
    pub priority: Option<f64>,

    // Delivery metadata, carried through untouched
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub time_window_start: Option<String>,
    #[serde(default)]
    pub time_window_end: Option<String>,
}

impl ShipmentCandidate {
    pub fn weight(&self) -> f64 {
        self.total_weight.unwrap_or(0.0)
    }

    pub fn volume(&self) -> f64 {
        self.total_volume.unwrap_or(0.0)
    }

    pub fn pallets(&self) -> u32 {
        self.total_pallets.unwrap_or(0)
    }

    /// Zero counts as unset, like an absent value.
    pub fn effective_package_count(&self) -> u32 {
        match self.package_count {
            Some(n) if n > 0 => n,
            _ => DEFAULT_PACKAGE_COUNT,
        }
    }

    pub fn effective_priority(&self) -> f64 {
        effective_priority(self.priority)
    }

    /// Label used in warnings: the shipment number, or the id without one.
    pub fn label(&self) -> &str {
        self.shipment_number.as_deref().unwrap_or(&self.id)
    }
}

/// Priority with the shared fallback. Zero counts as unset.
pub fn effective_priority(priority: Option<f64>) -> f64 {
    match priority {
        Some(p) if p != 0.0 => p,
        _ => DEFAULT_PRIORITY,
    }
}

/// Shipment as reported back in a load result, with defaults resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentItem {
    pub shipment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipment_number: Option<String>,
    pub total_weight: f64,
    pub total_volume: f64,
    pub total_pallets: u32,
    pub package_count: u32,
    pub customer_name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_window_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_window_end: Option<String>,
    pub priority: f64,
}

impl From<&ShipmentCandidate> for ShipmentItem {
    fn from(shipment: &ShipmentCandidate) -> Self {
        Self {
            shipment_id: shipment.id.clone(),
            shipment_number: shipment.shipment_number.clone(),
            total_weight: shipment.weight(),
            total_volume: shipment.volume(),
            total_pallets: shipment.pallets(),
            package_count: shipment.effective_package_count(),
            customer_name: shipment
                .customer_name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| DEFAULT_CUSTOMER_NAME.to_string()),
            address: shipment
                .address
                .clone()
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            latitude: shipment.latitude.unwrap_or(0.0),
            longitude: shipment.longitude.unwrap_or(0.0),
            time_window_start: shipment.time_window_start.clone(),
            time_window_end: shipment.time_window_end.clone(),
            priority: shipment.effective_priority(),
        }
    }
}

/// Aggregate load figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadMetrics {
    /// kg, 2 decimals
    pub total_weight: f64,
    /// m³, 3 decimals
    pub total_volume: f64,
    pub total_pallets: u32,
    pub total_packages: u32,
    /// Percent of capacity, 1 decimal
    pub weight_utilization: f64,
    pub volume_utilization: f64,
    pub pallet_utilization: f64,
    /// One stop per assigned shipment
    pub estimated_stops: usize,
}

/// Result of planning one vehicle's load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadResult {
    pub vehicle_id: String,
    pub plate: String,
    pub mode: LoadMode,
    pub assigned_shipments: Vec<ShipmentItem>,
    pub unassigned_shipments: Vec<ShipmentItem>,
    pub metrics: LoadMetrics,
    pub warnings: Vec<String>,
}

/// Request to plan a vehicle load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadPlanRequest {
    #[serde(default)]
    pub vehicle: Option<VehicleCapacity>,
    #[serde(default)]
    pub shipments: Vec<ShipmentCandidate>,
    #[serde(default)]
    pub optimization_mode: Option<String>,
}

impl LoadPlanRequest {
    /// The vehicle is the only mandatory part of a load request.
    pub fn vehicle(&self) -> Result<&VehicleCapacity, ValidationError> {
        self.vehicle.as_ref().ok_or(ValidationError::MissingField("vehicle"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_mode_from_name() {
        assert_eq!(LoadMode::from_name(Some("weight")), LoadMode::Weight);
        assert_eq!(LoadMode::from_name(Some("Volume")), LoadMode::Volume);
        assert_eq!(LoadMode::from_name(Some(" priority ")), LoadMode::Priority);
        assert_eq!(LoadMode::from_name(Some("balanced")), LoadMode::Balanced);
    }

    #[test]
    fn test_load_mode_unknown_falls_back_to_balanced() {
        assert_eq!(LoadMode::from_name(Some("fastest")), LoadMode::Balanced);
        assert_eq!(LoadMode::from_name(Some("")), LoadMode::Balanced);
        assert_eq!(LoadMode::from_name(None), LoadMode::Balanced);
    }

    #[test]
    fn test_vehicle_unset_ceilings_are_unlimited() {
        let json = r#"{"id": "v1", "plate": "AB123CD", "max_weight": 1000, "max_volume": 10, "max_pallets": 0}"#;
        let vehicle: VehicleCapacity = serde_json::from_str(json).unwrap();

        assert_eq!(vehicle.effective_max_pallets(), UNLIMITED_COUNT);
        assert_eq!(vehicle.effective_max_packages(), UNLIMITED_COUNT);
    }

    #[test]
    fn test_vehicle_declared_ceilings_are_kept() {
        let json = r#"{"id": "v1", "max_weight": 1000, "max_volume": 10, "max_pallets": 8, "max_packages": 40}"#;
        let vehicle: VehicleCapacity = serde_json::from_str(json).unwrap();

        assert_eq!(vehicle.plate, "");
        assert_eq!(vehicle.effective_max_pallets(), 8);
        assert_eq!(vehicle.effective_max_packages(), 40);
    }

    #[test]
    fn test_shipment_defaults() {
        let shipment: ShipmentCandidate = serde_json::from_str(r#"{"id": "s1"}"#).unwrap();

        assert_eq!(shipment.weight(), 0.0);
        assert_eq!(shipment.volume(), 0.0);
        assert_eq!(shipment.pallets(), 0);
        assert_eq!(shipment.effective_package_count(), 1);
        assert_eq!(shipment.effective_priority(), 50.0);
        assert_eq!(shipment.label(), "s1");
    }

    #[test]
    fn test_zero_priority_and_packages_count_as_unset() {
        let shipment = ShipmentCandidate {
            id: "s1".to_string(),
            priority: Some(0.0),
            package_count: Some(0),
            ..Default::default()
        };

        assert_eq!(shipment.effective_priority(), 50.0);
        assert_eq!(shipment.effective_package_count(), 1);
    }

    #[test]
    fn test_shipment_item_resolves_display_fallbacks() {
        let shipment = ShipmentCandidate {
            id: "s1".to_string(),
            shipment_number: Some("ENV-2024-00001".to_string()),
            total_weight: Some(12.5),
            priority: Some(10.0),
            ..Default::default()
        };

        let item = ShipmentItem::from(&shipment);
        assert_eq!(item.shipment_id, "s1");
        assert_eq!(item.customer_name, DEFAULT_CUSTOMER_NAME);
        assert_eq!(item.address, DEFAULT_ADDRESS);
        assert_eq!(item.total_weight, 12.5);
        assert_eq!(item.package_count, 1);
        assert_eq!(item.priority, 10.0);
        assert_eq!(shipment.label(), "ENV-2024-00001");
    }

    #[test]
    fn test_load_request_requires_vehicle() {
        let request: LoadPlanRequest = serde_json::from_str(r#"{"shipments": []}"#).unwrap();
        assert_eq!(request.vehicle().unwrap_err(), ValidationError::MissingField("vehicle"));
    }

    #[test]
    fn test_load_mode_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&LoadMode::Balanced).unwrap(), "\"balanced\"");
    }
}
