//! Tabular view of a schedule for presentation layers.

use crate::resource::Assignment;
use crate::task::Task;
use chrono::NaiveDateTime;
use polars::prelude::*;
use polars::prelude::PlSmallStr;

fn datetime_series(name: &'static str, values: &[NaiveDateTime]) -> PolarsResult<Series> {
    let millis: Vec<i64> = values
        .iter()
        .map(|dt| dt.and_utc().timestamp_millis())
        .collect();
    Series::new(PlSmallStr::from_static(name), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
}

fn index_list_series(name: &'static str, rows: &[&[usize]]) -> Series {
    let inner: Vec<Series> = rows
        .iter()
        .map(|row| {
            let values: Vec<i64> = row.iter().map(|&i| i as i64).collect();
            Series::new(PlSmallStr::from_static(""), values)
        })
        .collect();
    Series::new(PlSmallStr::from_static(name), inner)
}

/// One row per task, in the order given.
pub fn tasks_to_dataframe(tasks: &[Task]) -> PolarsResult<DataFrame> {
    let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
    let steps: Vec<i64> = tasks.iter().map(|t| t.step_index as i64).collect();
    let starts: Vec<NaiveDateTime> = tasks.iter().map(|t| t.start).collect();
    let ends: Vec<NaiveDateTime> = tasks.iter().map(|t| t.end).collect();
    let durations: Vec<f64> = tasks.iter().map(|t| t.duration_hours).collect();
    let links: Vec<&str> = tasks.iter().map(|t| t.dependency_type.as_str()).collect();
    let lags: Vec<f64> = tasks.iter().map(|t| t.lead_lag).collect();
    let predecessors: Vec<&[usize]> = tasks.iter().map(|t| t.predecessors.as_slice()).collect();
    let critical: Vec<bool> = tasks.iter().map(|t| t.is_critical).collect();
    let slack: Vec<f64> = tasks.iter().map(|t| t.slack).collect();
    let completed: Vec<bool> = tasks.iter().map(|t| t.completed).collect();

    let columns = vec![
        Series::new(PlSmallStr::from_static("id"), ids).into_column(),
        Series::new(PlSmallStr::from_static("name"), names).into_column(),
        Series::new(PlSmallStr::from_static("step_index"), steps).into_column(),
        datetime_series("start", &starts)?.into_column(),
        datetime_series("end", &ends)?.into_column(),
        Series::new(PlSmallStr::from_static("duration_hours"), durations).into_column(),
        Series::new(PlSmallStr::from_static("dependency_type"), links).into_column(),
        Series::new(PlSmallStr::from_static("lead_lag"), lags).into_column(),
        index_list_series("predecessors", &predecessors).into_column(),
        Series::new(PlSmallStr::from_static("is_critical"), critical).into_column(),
        Series::new(PlSmallStr::from_static("slack"), slack).into_column(),
        Series::new(PlSmallStr::from_static("completed"), completed).into_column(),
    ];
    DataFrame::new(columns)
}

pub fn assignments_to_dataframe(assignments: &[Assignment]) -> PolarsResult<DataFrame> {
    let task_ids: Vec<&str> = assignments.iter().map(|a| a.task_id.as_str()).collect();
    let resource_ids: Vec<i64> = assignments.iter().map(|a| a.resource_id as i64).collect();
    let kinds: Vec<&str> = assignments.iter().map(|a| a.resource_type.as_str()).collect();
    let names: Vec<&str> = assignments.iter().map(|a| a.resource_name.as_str()).collect();
    let work_types: Vec<&str> = assignments.iter().map(|a| a.work_type.as_str()).collect();
    let teams: Vec<Option<String>> = assignments
        .iter()
        .map(|a| a.team.as_ref().map(|tag| tag.team.to_string()))
        .collect();
    let team_names: Vec<Option<&str>> = assignments
        .iter()
        .map(|a| a.team.as_ref().map(|tag| tag.name.as_str()))
        .collect();

    let columns = vec![
        Series::new(PlSmallStr::from_static("task_id"), task_ids).into_column(),
        Series::new(PlSmallStr::from_static("resource_id"), resource_ids).into_column(),
        Series::new(PlSmallStr::from_static("resource_type"), kinds).into_column(),
        Series::new(PlSmallStr::from_static("resource_name"), names).into_column(),
        Series::new(PlSmallStr::from_static("work_type"), work_types).into_column(),
        Series::new(PlSmallStr::from_static("team"), teams).into_column(),
        Series::new(PlSmallStr::from_static("team_name"), team_names).into_column(),
    ];
    DataFrame::new(columns)
}
