use crate::step::{DependencyType, Priority};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A step after timing. Rebuilt on every recompute, never edited.
///
/// CPM fields (`earliest_*`, `latest_*`, `slack`) are in CPM day units and
/// stay zero unless critical path analysis ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    /// Position of the source step in the active step list.
    pub step_index: usize,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration_hours: f64,
    pub completed: bool,
    pub priority: Priority,
    pub is_parallel: bool,
    pub dependency_type: DependencyType,
    pub lead_lag: f64,
    /// Predecessor step indices that constrained this task.
    pub predecessors: Vec<usize>,
    pub is_critical: bool,
    pub slack: f64,
    pub earliest_start: f64,
    pub earliest_finish: f64,
    pub latest_start: f64,
    pub latest_finish: f64,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        step_index: usize,
        start: NaiveDateTime,
        duration_hours: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            step_index,
            start,
            end: shift(start, hours(duration_hours)).unwrap_or(NaiveDateTime::MAX),
            duration_hours,
            completed: false,
            priority: Priority::Normal,
            is_parallel: false,
            dependency_type: DependencyType::FS,
            lead_lag: 0.0,
            predecessors: Vec::new(),
            is_critical: false,
            slack: 0.0,
            earliest_start: 0.0,
            earliest_finish: 0.0,
            latest_start: 0.0,
            latest_finish: 0.0,
        }
    }

    pub fn with_predecessors(mut self, predecessors: Vec<usize>) -> Self {
        self.predecessors = predecessors;
        self
    }

    /// Id used when a step carries none.
    pub fn default_id(step_index: usize) -> String {
        format!("task-{step_index}")
    }
}

/// Signed hour quantity as a chrono duration, millisecond precision.
/// Non-finite values are zero; magnitudes beyond chrono's range saturate.
pub fn hours(value: f64) -> Duration {
    if !value.is_finite() {
        return Duration::zero();
    }
    // `as` saturates at the i64 bounds.
    let millis = (value * 3_600_000.0).round() as i64;
    Duration::try_milliseconds(millis).unwrap_or(if millis < 0 {
        Duration::MIN
    } else {
        Duration::MAX
    })
}

/// `instant + delta`, or `None` past the representable calendar.
pub fn shift(instant: NaiveDateTime, delta: Duration) -> Option<NaiveDateTime> {
    instant.checked_add_signed(delta)
}

/// Signed hours between two instants.
pub fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 3_600_000.0
}
