//! Planning engine: pure, synchronous, no shared state

pub mod clock;
pub mod geo;
pub mod load_planner;
pub mod route_sequencer;

pub use load_planner::{plan_load, LoadPlanner, PlannerLimits};
pub use route_sequencer::{sequence_route, RouteSequencer, SequencerConfig};
