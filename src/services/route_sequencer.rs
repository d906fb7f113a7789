//! Greedy single-vehicle route sequencer.
//!
//! Starting from the origin, the sequencer repeatedly picks the remaining stop
//! with the lowest score (distance, late-arrival penalty, early-wait penalty,
//! priority bonus) as seen from the current position and clock. It is a
//! nearest-feasible heuristic, not an optimal solver, and callers depend on
//! the exact route shapes it produces.
//!
//! Stops are never dropped. A stop reached after its window closes is still
//! served and a warning is recorded.

use std::cmp::Ordering;

use tracing::{debug, info};

use crate::defaults::{
    DEFAULT_AVG_SPEED_KMH, DEFAULT_SERVICE_MINUTES, EARLY_WAIT_WEIGHT, LATE_ARRIVAL_PENALTY,
    PRIORITY_WEIGHT,
};
use crate::error::ValidationError;
use crate::services::clock::{format_clock, parse_clock};
use crate::services::geo::{haversine_distance, round_to, travel_minutes};
use crate::types::{Coordinates, OptimizedStop, RouteMetrics, RouteResult, StopCandidate};

/// Sequencer tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequencerConfig {
    /// Divisor turning kilometres into travel time
    pub avg_speed_kmh: f64,
    /// Minutes added at a stop without its own service time
    pub default_service_minutes: f64,
    pub late_arrival_penalty: f64,
    pub early_wait_weight: f64,
    pub priority_weight: f64,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            avg_speed_kmh: DEFAULT_AVG_SPEED_KMH,
            default_service_minutes: DEFAULT_SERVICE_MINUTES,
            late_arrival_penalty: LATE_ARRIVAL_PENALTY,
            early_wait_weight: EARLY_WAIT_WEIGHT,
            priority_weight: PRIORITY_WEIGHT,
        }
    }
}

impl SequencerConfig {
    pub fn with_speed_and_service(avg_speed_kmh: f64, default_service_minutes: f64) -> Self {
        Self {
            avg_speed_kmh,
            default_service_minutes,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.avg_speed_kmh.is_finite() || self.avg_speed_kmh <= 0.0 {
            return Err(ValidationError::InvalidSpeed(self.avg_speed_kmh));
        }
        if !self.default_service_minutes.is_finite() || self.default_service_minutes < 0.0 {
            return Err(ValidationError::InvalidServiceTime(self.default_service_minutes));
        }
        Ok(())
    }
}

/// A parsed time window bound
#[derive(Debug, Clone, Copy)]
struct WindowBound<'a> {
    minutes: f64,
    label: &'a str,
}

/// A stop with its windows parsed and defaults resolved
#[derive(Debug, Clone)]
struct Candidate<'a> {
    stop: &'a StopCandidate,
    position: Coordinates,
    window_start: Option<WindowBound<'a>>,
    window_end: Option<WindowBound<'a>>,
    priority: f64,
    service_minutes: f64,
}

/// Route sequencer for one vehicle
#[derive(Debug, Clone)]
pub struct RouteSequencer {
    config: SequencerConfig,
}

impl RouteSequencer {
    pub fn new(config: SequencerConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Order `stops` into a route leaving `origin` at `start_time` ("HH:MM")
    /// and returning there.
    ///
    /// Fails only on unparseable times; everything else is reported through
    /// the result's warnings.
    pub fn sequence(
        &self,
        origin: Coordinates,
        stops: &[StopCandidate],
        start_time: &str,
    ) -> Result<RouteResult, ValidationError> {
        let start = parse_clock("start_time", start_time)?;
        let mut pool = self.prepare(stops)?;

        let mut optimized_stops = Vec::with_capacity(pool.len());
        let mut warnings = Vec::new();
        let mut position = origin;
        let mut clock = start;
        let mut total_distance = 0.0;
        let mut sequence: u32 = 1;

        while !pool.is_empty() {
            let best = self.select_next(&pool, &position, clock);
            let candidate = pool.remove(best);

            let distance = haversine_distance(&position, &candidate.position);
            let travel = travel_minutes(distance, self.config.avg_speed_kmh);
            let projected = clock + travel;

            // Early arrivals wait for the window to open
            let arrival = match candidate.window_start {
                Some(open) if projected < open.minutes => open.minutes,
                _ => projected,
            };

            if let Some(close) = candidate.window_end {
                if projected > close.minutes {
                    warnings.push(format!(
                        "{}: estimated arrival {} outside delivery window (until {})",
                        candidate.stop.customer_name,
                        format_clock(arrival),
                        close.label
                    ));
                }
            }

            let departure = arrival + candidate.service_minutes;

            debug!(
                "Stop #{} {} at {:.2} km, arrival {}, departure {}",
                sequence,
                candidate.stop.id,
                distance,
                format_clock(arrival),
                format_clock(departure)
            );

            optimized_stops.push(OptimizedStop {
                stop: candidate.stop.clone(),
                sequence,
                planned_arrival: format_clock(arrival),
                planned_departure: format_clock(departure),
                distance_from_previous_km: round_to(distance, 1),
                travel_time_minutes: travel.round() as i64,
            });

            total_distance += distance;
            clock = departure;
            position = candidate.position;
            sequence += 1;
        }

        // Return leg counts toward totals but is not a stop
        let return_distance = haversine_distance(&position, &origin);
        total_distance += return_distance;
        clock += travel_minutes(return_distance, self.config.avg_speed_kmh);

        let metrics = RouteMetrics {
            total_distance_km: round_to(total_distance, 1),
            total_duration_minutes: (clock - start).round() as i64,
            total_stops: optimized_stops.len(),
            estimated_start: format_clock(start),
            estimated_end: format_clock(clock),
        };

        info!(
            "Route sequenced: {} stops, {} km, {} min, {} warnings",
            metrics.total_stops,
            metrics.total_distance_km,
            metrics.total_duration_minutes,
            warnings.len()
        );

        Ok(RouteResult {
            optimized_stops,
            metrics,
            warnings,
        })
    }

    /// Parse windows and seed the pool: windowed stops by opening time first,
    /// then the rest by priority. Ties keep input order.
    fn prepare<'a>(&self, stops: &'a [StopCandidate]) -> Result<Vec<Candidate<'a>>, ValidationError> {
        let mut pool = stops
            .iter()
            .map(|stop| -> Result<Candidate<'a>, ValidationError> {
                Ok(Candidate {
                    stop,
                    position: stop.coordinates(),
                    window_start: parse_bound(stop, "time_window_start", stop.window_start())?,
                    window_end: parse_bound(stop, "time_window_end", stop.window_end())?,
                    priority: stop.effective_priority(),
                    service_minutes: stop.effective_service_minutes(self.config.default_service_minutes),
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        pool.sort_by(|a, b| match (a.window_start, b.window_start) {
            (Some(x), Some(y)) => x.minutes.total_cmp(&y.minutes),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.priority.total_cmp(&b.priority),
        });

        Ok(pool)
    }

    /// Index of the lowest-scoring candidate; the first one wins a tie.
    fn select_next(&self, pool: &[Candidate<'_>], position: &Coordinates, clock: f64) -> usize {
        let mut best_index = 0;
        let mut best_score = f64::INFINITY;

        for (index, candidate) in pool.iter().enumerate() {
            let distance = haversine_distance(position, &candidate.position);
            let arrival = clock + travel_minutes(distance, self.config.avg_speed_kmh);
            let score = self.score(candidate, distance, arrival);

            if score < best_score {
                best_score = score;
                best_index = index;
            }
        }

        best_index
    }

    fn score(&self, candidate: &Candidate<'_>, distance: f64, arrival: f64) -> f64 {
        let mut score = distance;

        if let Some(close) = candidate.window_end {
            if arrival > close.minutes {
                score += self.config.late_arrival_penalty;
            }
        }

        if let Some(open) = candidate.window_start {
            if arrival < open.minutes {
                score += (open.minutes - arrival) * self.config.early_wait_weight;
            }
        }

        score - (100.0 - candidate.priority) * self.config.priority_weight
    }
}

fn parse_bound<'a>(
    stop: &StopCandidate,
    field: &str,
    value: Option<&'a str>,
) -> Result<Option<WindowBound<'a>>, ValidationError> {
    value
        .map(|label| {
            let minutes = parse_clock(&format!("{} of stop {}", field, stop.id), label)?;
            Ok(WindowBound { minutes, label })
        })
        .transpose()
}

/// Sequence a route with explicit speed and default service time.
pub fn sequence_route(
    origin: Coordinates,
    stops: &[StopCandidate],
    start_time: &str,
    avg_speed_kmh: f64,
    default_service_minutes: f64,
) -> Result<RouteResult, ValidationError> {
    RouteSequencer::new(SequencerConfig::with_speed_and_service(avg_speed_kmh, default_service_minutes))?
        .sequence(origin, stops, start_time)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Coordinates = Coordinates::new(0.0, 0.0);

    fn stop(id: &str, lat: f64, lng: f64) -> StopCandidate {
        StopCandidate {
            id: id.to_string(),
            latitude: lat,
            longitude: lng,
            customer_name: format!("Customer {}", id),
            ..Default::default()
        }
    }

    fn with_window(mut stop: StopCandidate, start: Option<&str>, end: Option<&str>) -> StopCandidate {
        stop.time_window_start = start.map(str::to_string);
        stop.time_window_end = end.map(str::to_string);
        stop
    }

    fn order(result: &RouteResult) -> Vec<&str> {
        result.optimized_stops.iter().map(|s| s.stop.id.as_str()).collect()
    }

    #[test]
    fn test_empty_route() {
        let result = sequence_route(ORIGIN, &[], "08:00", 30.0, 15.0).unwrap();

        assert!(result.optimized_stops.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(result.metrics.total_distance_km, 0.0);
        assert_eq!(result.metrics.total_duration_minutes, 0);
        assert_eq!(result.metrics.total_stops, 0);
        assert_eq!(result.metrics.estimated_start, "08:00");
        assert_eq!(result.metrics.estimated_end, "08:00");
    }

    #[test]
    fn test_single_stop_one_degree_east() {
        let mut s1 = stop("S1", 0.0, 1.0);
        s1.priority = Some(50.0);
        s1.service_time = Some(15.0);

        let result = sequence_route(ORIGIN, &[s1], "08:00", 60.0, 15.0).unwrap();
        let placed = &result.optimized_stops[0];

        assert_eq!(placed.sequence, 1);
        assert_eq!(placed.distance_from_previous_km, 111.2);
        assert_eq!(placed.travel_time_minutes, 111);
        assert_eq!(placed.planned_arrival, "09:51");
        assert_eq!(placed.planned_departure, "10:06");

        assert_eq!(result.metrics.total_distance_km, 222.4);
        assert_eq!(result.metrics.total_duration_minutes, 237);
        assert_eq!(result.metrics.total_stops, 1);
        assert_eq!(result.metrics.estimated_end, "11:57");
    }

    #[test]
    fn test_end_of_day_window_accepts_late_evening_arrival() {
        let s = with_window(stop("N", 0.0, 0.0), Some("18:00"), Some("24:00"));

        let result = sequence_route(ORIGIN, &[s], "23:00", 30.0, 15.0).unwrap();

        assert_eq!(result.optimized_stops[0].planned_arrival, "23:00");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_negative_service_time_never_departs_before_arrival() {
        let mut s = stop("S", 0.0, 0.0);
        s.service_time = Some(-30.0);

        let result = sequence_route(ORIGIN, &[s], "08:00", 30.0, 15.0).unwrap();

        assert_eq!(result.optimized_stops[0].planned_arrival, "08:00");
        assert_eq!(result.optimized_stops[0].planned_departure, "08:15");
    }

    #[test]
    fn test_early_arrival_waits_for_window() {
        let s = with_window(stop("W", 0.0, 0.0), Some("10:00"), None);

        let result = sequence_route(ORIGIN, &[s], "09:30", 30.0, 15.0).unwrap();
        let placed = &result.optimized_stops[0];

        assert_eq!(placed.planned_arrival, "10:00");
        assert_eq!(placed.planned_departure, "10:15");
        assert!(result.warnings.is_empty());
        // Waiting time is part of the route duration
        assert_eq!(result.metrics.total_duration_minutes, 45);
    }

    #[test]
    fn test_late_arrival_is_warned_not_clamped() {
        let s = with_window(stop("L", 0.0, 0.0), None, Some("09:00"));

        let result = sequence_route(ORIGIN, &[s], "09:15", 30.0, 15.0).unwrap();

        assert_eq!(result.optimized_stops.len(), 1);
        assert_eq!(result.optimized_stops[0].planned_arrival, "09:15");
        assert_eq!(result.warnings.len(), 1);
        let warning = &result.warnings[0];
        assert!(warning.contains("Customer L"));
        assert!(warning.contains("09:15"));
        assert!(warning.contains("09:00"));
    }

    #[test]
    fn test_nearest_stop_first() {
        let stops = vec![stop("far", 0.0, 0.5), stop("near", 0.0, 0.1)];

        let result = sequence_route(ORIGIN, &stops, "08:00", 60.0, 15.0).unwrap();

        assert_eq!(order(&result), vec!["near", "far"]);
        assert_eq!(result.optimized_stops[0].sequence, 1);
        assert_eq!(result.optimized_stops[1].sequence, 2);
    }

    #[test]
    fn test_greedy_choice_can_make_later_stop_late() {
        // Serving the far stop first would be on time, but the greedy walk
        // takes the near one and arrives late at the far one.
        let stops = vec![
            with_window(stop("far", 0.0, 0.5), None, Some("09:00")),
            stop("near", 0.0, 0.1),
        ];

        let result = sequence_route(ORIGIN, &stops, "08:00", 60.0, 15.0).unwrap();

        assert_eq!(order(&result), vec!["near", "far"]);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("Customer far"));
    }

    #[test]
    fn test_already_late_stop_is_pushed_back() {
        let stops = vec![
            with_window(stop("missed", 0.0, 0.1), None, Some("07:00")),
            stop("open", 0.0, 0.3),
        ];

        let result = sequence_route(ORIGIN, &stops, "08:00", 60.0, 15.0).unwrap();

        assert_eq!(order(&result), vec!["open", "missed"]);
        assert_eq!(result.optimized_stops.len(), 2);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_long_wait_is_penalized() {
        let stops = vec![
            with_window(stop("noon", 0.0, 0.1), Some("12:00"), None),
            stop("anytime", 0.0, 0.2),
        ];

        let result = sequence_route(ORIGIN, &stops, "08:00", 60.0, 15.0).unwrap();

        assert_eq!(order(&result), vec!["anytime", "noon"]);
        assert_eq!(result.optimized_stops[1].planned_arrival, "12:00");
    }

    #[test]
    fn test_urgent_priority_breaks_distance_tie() {
        let mut relaxed = stop("relaxed", 0.0, 0.1);
        relaxed.priority = Some(90.0);
        let mut urgent = stop("urgent", 0.0, -0.1);
        urgent.priority = Some(10.0);

        let result = sequence_route(ORIGIN, &[relaxed, urgent], "08:00", 60.0, 15.0).unwrap();

        assert_eq!(order(&result)[0], "urgent");
    }

    #[test]
    fn test_exact_tie_keeps_input_order() {
        let stops = vec![stop("A", 0.0, 0.1), stop("B", 0.0, 0.1)];

        let result = sequence_route(ORIGIN, &stops, "08:00", 60.0, 15.0).unwrap();
        assert_eq!(order(&result), vec!["A", "B"]);
    }

    #[test]
    fn test_windowed_stop_wins_tie_through_presort() {
        let stops = vec![
            stop("plain", 0.0, 0.1),
            with_window(stop("windowed", 0.0, 0.1), Some("08:00"), Some("18:00")),
        ];

        let result = sequence_route(ORIGIN, &stops, "08:00", 60.0, 15.0).unwrap();
        assert_eq!(order(&result), vec!["windowed", "plain"]);
    }

    #[test]
    fn test_own_service_time_overrides_default() {
        let mut s = stop("S", 0.0, 0.0);
        s.service_time = Some(40.0);

        let result = sequence_route(ORIGIN, &[s], "08:00", 30.0, 15.0).unwrap();

        assert_eq!(result.optimized_stops[0].planned_arrival, "08:00");
        assert_eq!(result.optimized_stops[0].planned_departure, "08:40");
    }

    #[test]
    fn test_route_past_midnight_wraps() {
        let s = stop("late", 0.0, 0.5);

        let result = sequence_route(ORIGIN, &[s], "23:30", 60.0, 15.0).unwrap();

        assert_eq!(result.optimized_stops[0].planned_arrival, "00:26");
        assert_eq!(result.optimized_stops[0].planned_departure, "00:41");
        assert_eq!(result.metrics.estimated_start, "23:30");
        assert_eq!(result.metrics.estimated_end, "01:36");
        assert_eq!(result.metrics.total_duration_minutes, 126);
    }

    #[test]
    fn test_every_stop_is_kept_and_schedule_is_consistent() {
        let stops: Vec<StopCandidate> = (0..15)
            .map(|i| {
                let s = stop(&format!("S{}", i), (i % 4) as f64 * 0.05, (i % 5) as f64 * 0.04);
                if i % 3 == 0 {
                    with_window(s, Some("09:00"), Some("09:30"))
                } else {
                    s
                }
            })
            .collect();

        let result = sequence_route(ORIGIN, &stops, "08:00", 30.0, 10.0).unwrap();

        assert_eq!(result.optimized_stops.len(), stops.len());
        assert_eq!(result.metrics.total_stops, stops.len());

        let mut ids: Vec<&str> = order(&result);
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), stops.len());

        for (index, placed) in result.optimized_stops.iter().enumerate() {
            assert_eq!(placed.sequence as usize, index + 1);
            let arrival = parse_clock("arrival", &placed.planned_arrival).unwrap();
            let departure = parse_clock("departure", &placed.planned_departure).unwrap();
            assert!(arrival <= departure);
        }
    }

    #[test]
    fn test_sequencing_is_deterministic() {
        let stops = vec![
            with_window(stop("A", 0.01, 0.02), Some("09:00"), Some("10:00")),
            stop("B", 0.03, 0.01),
            stop("C", -0.02, 0.04),
        ];

        let first = sequence_route(ORIGIN, &stops, "08:00", 30.0, 15.0).unwrap();
        let second = sequence_route(ORIGIN, &stops, "08:00", 30.0, 15.0).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_inputs_fail_fast() {
        assert_eq!(
            sequence_route(ORIGIN, &[], "08:00", 0.0, 15.0).unwrap_err(),
            ValidationError::InvalidSpeed(0.0)
        );
        assert_eq!(
            sequence_route(ORIGIN, &[], "08:00", 30.0, -1.0).unwrap_err(),
            ValidationError::InvalidServiceTime(-1.0)
        );
        assert!(matches!(
            sequence_route(ORIGIN, &[], "8 o'clock", 30.0, 15.0),
            Err(ValidationError::InvalidTime { .. })
        ));

        let broken = with_window(stop("X", 0.0, 0.1), Some("noon"), None);
        let err = sequence_route(ORIGIN, &[broken], "08:00", 30.0, 15.0).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidTime {
                field: "time_window_start of stop X".to_string(),
                value: "noon".to_string(),
            }
        );
    }
}
