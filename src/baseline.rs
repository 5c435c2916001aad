use crate::serde_support::{timestamp, timestamp_opt};
use crate::task::{Task, hours_between};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineTask {
    pub id: String,
    #[serde(rename = "startDate", with = "timestamp")]
    pub start: NaiveDateTime,
    #[serde(rename = "endDate", with = "timestamp")]
    pub end: NaiveDateTime,
    #[serde(rename = "duration", default)]
    pub duration_hours: f64,
}

/// Task timings frozen at a point in time, compared against later
/// recomputes. An empty object deserializes to an empty baseline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    #[serde(rename = "savedDate", default, with = "timestamp_opt")]
    pub saved_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub tasks: Vec<BaselineTask>,
    #[serde(rename = "totalDuration", default)]
    pub total_duration_hours: f64,
}

/// Drift of one task from its baseline, in hours. Positive means later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskVariance {
    pub task_id: String,
    pub start_delta_hours: f64,
    pub finish_delta_hours: f64,
    pub duration_delta_hours: f64,
}

impl Baseline {
    pub fn capture(tasks: &[Task], saved_at: NaiveDateTime) -> Self {
        Self {
            saved_at: Some(saved_at),
            tasks: tasks
                .iter()
                .map(|task| BaselineTask {
                    id: task.id.clone(),
                    start: task.start,
                    end: task.end,
                    duration_hours: task.duration_hours,
                })
                .collect(),
            total_duration_hours: tasks.iter().map(|t| t.duration_hours).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Variance for every current task that also appears in the baseline,
    /// in the order of `tasks`.
    pub fn variance(&self, tasks: &[Task]) -> Vec<TaskVariance> {
        let saved: HashMap<&str, &BaselineTask> =
            self.tasks.iter().map(|t| (t.id.as_str(), t)).collect();

        tasks
            .iter()
            .filter_map(|task| {
                let base = saved.get(task.id.as_str())?;
                Some(TaskVariance {
                    task_id: task.id.clone(),
                    start_delta_hours: hours_between(base.start, task.start),
                    finish_delta_hours: hours_between(base.end, task.end),
                    duration_delta_hours: task.duration_hours - base.duration_hours,
                })
            })
            .collect()
    }
}
