use crate::assignment::TeamAssignmentResolver;
use crate::baseline::TaskVariance;
use crate::calculations::{CriticalPathAnalyzer, ForwardPass};
use crate::calendar::{JobSpan, job_span};
use crate::config::EngineConfig;
use crate::diagnostics::ScheduleDiagnostic;
use crate::error::EngineError;
use crate::graph::GraphBuilder;
use crate::job::Job;
use crate::resource::{Assignment, Directory};
use crate::task::Task;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeSet;

/// Everything derived from one job in one recompute.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub tasks: Vec<Task>,
    pub assignments: Vec<Assignment>,
    /// Empty unless the job asks for critical path display.
    pub critical_path: BTreeSet<String>,
    /// Critical task ids in schedule order.
    pub critical_chain: Vec<String>,
    pub diagnostics: Vec<ScheduleDiagnostic>,
    pub span: Option<JobSpan>,
    pub baseline_variance: Vec<TaskVariance>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSummary {
    pub task_count: usize,
    pub critical_count: usize,
    pub assignment_count: usize,
    pub latest_finish: Option<NaiveDateTime>,
    pub total_hours: f64,
    pub warning_count: usize,
    pub critical_path: Vec<String>,
}

impl ScheduleSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.task_count));
        parts.push(format!("critical={}", self.critical_count));
        parts.push(format!("assignments={}", self.assignment_count));
        if let Some(finish) = self.latest_finish {
            parts.push(format!("finish={}", finish.format("%Y-%m-%d %H:%M")));
        }
        parts.push(format!("hours={}", self.total_hours));
        if self.warning_count > 0 {
            parts.push(format!("warnings={}", self.warning_count));
        }
        if !self.critical_path.is_empty() {
            parts.push(format!("crit_path={}", self.critical_path.join("->")));
        }
        parts.join(", ")
    }
}

impl ScheduleResult {
    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            task_count: self.tasks.len(),
            critical_count: self.critical_path.len(),
            assignment_count: self.assignments.len(),
            latest_finish: self.tasks.iter().map(|t| t.end).max(),
            total_hours: self.tasks.iter().map(|t| t.duration_hours).sum(),
            warning_count: self.diagnostics.len(),
            critical_path: self.critical_chain.clone(),
        }
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn assignments_for(&self, task_id: &str) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter().filter(move |a| a.task_id == task_id)
    }
}

/// Runs timing, critical path and assignment resolution for one job.
/// Holds no state between calls: the same job in gives the same result out.
#[derive(Debug, Clone, Default)]
pub struct ScheduleOrchestrator {
    config: EngineConfig,
}

impl ScheduleOrchestrator {
    /// Rejects a configuration that fails [`EngineConfig::validate`].
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn recompute(&self, job: &Job, directory: Directory<'_>) -> ScheduleResult {
        let mut result = ScheduleResult {
            span: job_span(job, &self.config),
            ..ScheduleResult::default()
        };

        let Some(project_start) = job.project_start(&self.config) else {
            tracing::debug!(job_id = job.id, "job has no start date, nothing to schedule");
            result.diagnostics.push(ScheduleDiagnostic::MissingStartDate);
            return result;
        };

        let graph = GraphBuilder::new(&job.steps, &self.config).build();
        result.diagnostics.extend_from_slice(graph.diagnostics());

        let timed = ForwardPass::new(&graph).execute(project_start);
        result.diagnostics.extend(timed.diagnostics());
        let mut tasks = timed.tasks;

        if job.show_critical_path {
            let analysis = CriticalPathAnalyzer::new(&self.config).apply(&mut tasks);
            if let Some(err) = &analysis.fallback {
                result.diagnostics.push(ScheduleDiagnostic::CriticalPathFallback {
                    reason: err.to_string(),
                });
            }
            result.critical_chain = analysis.critical_chain(&tasks);
            result.critical_path = analysis.critical;
        }

        let (assignments, unresolved) =
            TeamAssignmentResolver::new(directory).resolve_with_diagnostics(job, &tasks);
        result.assignments = assignments;
        result.diagnostics.extend(unresolved);

        if let Some(baseline) = job.gantt_baseline.as_ref().filter(|b| !b.is_empty()) {
            result.baseline_variance = baseline.variance(&tasks);
        }

        result.tasks = tasks;
        tracing::debug!(
            job_id = job.id,
            tasks = result.tasks.len(),
            assignments = result.assignments.len(),
            warnings = result.diagnostics.len(),
            "schedule recomputed"
        );
        result
    }
}

/// Recompute with the default configuration.
pub fn recompute(job: &Job, directory: Directory<'_>) -> ScheduleResult {
    ScheduleOrchestrator::default().recompute(job, directory)
}
