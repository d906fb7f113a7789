//! Greedy vehicle load planner.
//!
//! Candidates are sorted once according to the selected [`LoadMode`] and then
//! walked in that order. A shipment is admitted only when weight, volume,
//! pallets and packages all stay within the vehicle's ceilings after adding
//! it; otherwise it is reported as unassigned. Nothing is ever split or
//! force-fitted.

use std::cmp::Ordering;

use tracing::{debug, info};

use crate::defaults::{
    IMBALANCE_PERCENT, NEAR_CAPACITY_PERCENT, UNDER_UTILIZATION_PERCENT, VOLUME_EPSILON,
};
use crate::services::geo::round_to;
use crate::types::{
    LoadMetrics, LoadMode, LoadResult, ShipmentCandidate, ShipmentItem, VehicleCapacity,
};

/// Thresholds used by the planner's ordering and advisories
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerLimits {
    /// Floor applied to volume in the balanced (density) ordering
    pub volume_epsilon: f64,
    /// Weight and volume both below this (%) => under-utilized
    pub under_utilization_percent: f64,
    /// Weight above this (%) => near capacity
    pub near_capacity_percent: f64,
    /// Weight/volume utilization gap (points) above this => imbalance
    pub imbalance_percent: f64,
}

impl Default for PlannerLimits {
    fn default() -> Self {
        Self {
            volume_epsilon: VOLUME_EPSILON,
            under_utilization_percent: UNDER_UTILIZATION_PERCENT,
            near_capacity_percent: NEAR_CAPACITY_PERCENT,
            imbalance_percent: IMBALANCE_PERCENT,
        }
    }
}

/// Running totals of what is already on the vehicle
#[derive(Debug, Clone, Copy, Default)]
struct LoadTotals {
    weight: f64,
    volume: f64,
    pallets: u32,
    packages: u32,
}

/// Which ceilings a shipment would respect if added
#[derive(Debug, Clone, Copy)]
struct CapacityCheck {
    weight: bool,
    volume: bool,
    pallets: bool,
    packages: bool,
}

impl CapacityCheck {
    fn fits(&self) -> bool {
        self.weight && self.volume && self.pallets && self.packages
    }
}

/// Load planner for a single vehicle
#[derive(Debug, Clone, Default)]
pub struct LoadPlanner {
    limits: PlannerLimits,
}

impl LoadPlanner {
    pub fn new(limits: PlannerLimits) -> Self {
        Self { limits }
    }

    /// Assign `shipments` to `vehicle` using the ordering of `mode`.
    ///
    /// The caller's slice is never reordered; sorting happens on a list of
    /// references.
    pub fn plan(
        &self,
        vehicle: &VehicleCapacity,
        shipments: &[ShipmentCandidate],
        mode: LoadMode,
    ) -> LoadResult {
        let max_weight = vehicle.max_weight;
        let max_volume = vehicle.max_volume;
        let max_pallets = vehicle.effective_max_pallets();
        let max_packages = vehicle.effective_max_packages();

        let ordered = self.order(shipments, mode);

        let mut totals = LoadTotals::default();
        let mut assigned = Vec::new();
        let mut unassigned = Vec::new();
        let mut warnings = Vec::new();

        for shipment in ordered {
            let weight = shipment.weight();
            let volume = shipment.volume();
            let pallets = shipment.pallets();
            let packages = shipment.effective_package_count();

            // A count that would overflow can never fit, whatever the ceiling
            let next_pallets = totals.pallets.checked_add(pallets);
            let next_packages = totals.packages.checked_add(packages);

            let check = CapacityCheck {
                weight: totals.weight + weight <= max_weight,
                volume: totals.volume + volume <= max_volume,
                pallets: next_pallets.is_some_and(|total| total <= max_pallets),
                packages: next_packages.is_some_and(|total| total <= max_packages),
            };

            if let (true, Some(pallets_total), Some(packages_total)) =
                (check.fits(), next_pallets, next_packages)
            {
                totals.weight += weight;
                totals.volume += volume;
                totals.pallets = pallets_total;
                totals.packages = packages_total;
                assigned.push(ShipmentItem::from(shipment));
                continue;
            }

            debug!(
                "Shipment {} rejected (weight ok: {}, volume ok: {}, pallets ok: {}, packages ok: {})",
                shipment.label(),
                check.weight,
                check.volume,
                check.pallets,
                check.packages
            );

            // Package overflow only gates admission; it has no warning line.
            if !check.weight {
                warnings.push(format!(
                    "Shipment {}: exceeds available weight ({}kg)",
                    shipment.label(),
                    weight
                ));
            }
            if !check.volume {
                warnings.push(format!(
                    "Shipment {}: exceeds available volume ({}m³)",
                    shipment.label(),
                    volume
                ));
            }
            if !check.pallets {
                warnings.push(format!(
                    "Shipment {}: exceeds available pallets ({})",
                    shipment.label(),
                    pallets
                ));
            }
            unassigned.push(ShipmentItem::from(shipment));
        }

        let weight_utilization = utilization(totals.weight, max_weight);
        let volume_utilization = utilization(totals.volume, max_volume);
        let pallet_utilization = utilization(f64::from(totals.pallets), f64::from(max_pallets));

        warnings.extend(self.advisories(weight_utilization, volume_utilization));

        info!(
            "Load plan for vehicle {} ({}): {} assigned, {} unassigned, weight {:.1}%, volume {:.1}%",
            vehicle.id,
            mode.as_str(),
            assigned.len(),
            unassigned.len(),
            weight_utilization,
            volume_utilization
        );

        let metrics = LoadMetrics {
            total_weight: round_to(totals.weight, 2),
            total_volume: round_to(totals.volume, 3),
            total_pallets: totals.pallets,
            total_packages: totals.packages,
            weight_utilization: round_to(weight_utilization, 1),
            volume_utilization: round_to(volume_utilization, 1),
            pallet_utilization: round_to(pallet_utilization, 1),
            estimated_stops: assigned.len(),
        };

        LoadResult {
            vehicle_id: vehicle.id.clone(),
            plate: vehicle.plate.clone(),
            mode,
            assigned_shipments: assigned,
            unassigned_shipments: unassigned,
            metrics,
            warnings,
        }
    }

    /// Candidates in the order the greedy walk visits them
    fn order<'a>(&self, shipments: &'a [ShipmentCandidate], mode: LoadMode) -> Vec<&'a ShipmentCandidate> {
        let mut ordered: Vec<&ShipmentCandidate> = shipments.iter().collect();
        let epsilon = self.limits.volume_epsilon;

        ordered.sort_by(|a, b| -> Ordering {
            match mode {
                LoadMode::Weight => b.weight().total_cmp(&a.weight()),
                LoadMode::Volume => b.volume().total_cmp(&a.volume()),
                LoadMode::Priority => a.effective_priority().total_cmp(&b.effective_priority()),
                LoadMode::Balanced => density(b, epsilon).total_cmp(&density(a, epsilon)),
            }
        });

        ordered
    }

    /// Advisory lines about the finished load. Independent of each other.
    fn advisories(&self, weight_utilization: f64, volume_utilization: f64) -> Vec<String> {
        let mut advisories = Vec::new();

        if weight_utilization < self.limits.under_utilization_percent
            && volume_utilization < self.limits.under_utilization_percent
        {
            advisories.push(
                "Vehicle under-utilized: consider adding more shipments or using a smaller vehicle"
                    .to_string(),
            );
        }

        if weight_utilization > self.limits.near_capacity_percent {
            advisories.push("Weight close to the limit: check load balance".to_string());
        }

        if (weight_utilization - volume_utilization).abs() > self.limits.imbalance_percent {
            if weight_utilization > volume_utilization {
                advisories.push("Dense load: a lot of weight in little volume".to_string());
            } else {
                advisories.push("Light load: a lot of volume with little weight".to_string());
            }
        }

        advisories
    }
}

/// kg per m³, with volume floored to `epsilon`
fn density(shipment: &ShipmentCandidate, epsilon: f64) -> f64 {
    shipment.weight() / shipment.volume().max(epsilon)
}

fn utilization(total: f64, max: f64) -> f64 {
    if max > 0.0 {
        (total / max) * 100.0
    } else {
        0.0
    }
}

/// Plan a load with default limits. `mode` is resolved leniently: unknown
/// names plan as `balanced`.
pub fn plan_load(vehicle: &VehicleCapacity, shipments: &[ShipmentCandidate], mode: &str) -> LoadResult {
    LoadPlanner::default().plan(vehicle, shipments, LoadMode::from_name(Some(mode)))
}
