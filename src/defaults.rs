//! Engine-wide defaults and tuning constants.
//!
//! Every fallback the planner and sequencer apply is named here so the
//! constraint checks can be audited in one place.

/// Pallet/package ceiling used when a vehicle declares none (or zero).
pub const UNLIMITED_COUNT: u32 = 999;

/// Priority assumed when a shipment or stop carries none. Lower is more urgent.
pub const DEFAULT_PRIORITY: f64 = 50.0;

/// Package count assumed for a shipment without one.
pub const DEFAULT_PACKAGE_COUNT: u32 = 1;

/// Floor applied to volume when computing weight/volume density.
pub const VOLUME_EPSILON: f64 = 0.001;

/// Utilization (%) below which both weight and volume count as under-used.
pub const UNDER_UTILIZATION_PERCENT: f64 = 50.0;

/// Weight utilization (%) above which the load is flagged as near capacity.
pub const NEAR_CAPACITY_PERCENT: f64 = 95.0;

/// Gap (percentage points) between weight and volume utilization that flags an imbalance.
pub const IMBALANCE_PERCENT: f64 = 40.0;

pub const DEFAULT_CUSTOMER_NAME: &str = "No customer";
pub const DEFAULT_ADDRESS: &str = "No address";

/// Route start when the caller gives none.
pub const DEFAULT_START_TIME: &str = "08:00";

/// Urban average speed used to turn kilometres into minutes.
pub const DEFAULT_AVG_SPEED_KMH: f64 = 30.0;

/// Service minutes at a stop without its own value.
pub const DEFAULT_SERVICE_MINUTES: f64 = 15.0;

/// Flat score penalty for a stop that would be reached after its window closes.
pub const LATE_ARRIVAL_PENALTY: f64 = 1000.0;

/// Score weight per minute of waiting for a window to open.
pub const EARLY_WAIT_WEIGHT: f64 = 0.5;

/// Score bonus weight per point of urgency (100 - priority).
pub const PRIORITY_WEIGHT: f64 = 0.1;

pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Mean Earth radius for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
