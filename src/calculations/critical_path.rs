use super::backward_pass::BackwardPass;
use crate::config::EngineConfig;
use crate::graph::schedule_dag::ScheduleDag;
use crate::task::Task;
use petgraph::Direction;
use petgraph::algo::toposort;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CpmError {
    #[error("cycle detected in task network at task {0}")]
    Cycle(String),
    #[error("task {task} has invalid duration {hours}")]
    InvalidDuration { task: String, hours: f64 },
    #[error("step {0} is timed by more than one task")]
    DuplicateStep(usize),
    #[error("CPM day length must be positive, got {0}h")]
    InvalidDayLength(f64),
}

/// CPM record of one task, in CPM day units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpmTimes {
    pub earliest_start: f64,
    pub earliest_finish: f64,
    pub latest_start: f64,
    pub latest_finish: f64,
    pub slack: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriticalPathAnalysis {
    /// Aligned with the analysed task slice.
    pub times: Vec<CpmTimes>,
    pub critical: BTreeSet<String>,
    /// Set when the analysis failed and the last task was used instead.
    pub fallback: Option<CpmError>,
}

impl CriticalPathAnalysis {
    /// Critical task ids in the order the tasks were given.
    pub fn critical_chain(&self, tasks: &[Task]) -> Vec<String> {
        tasks
            .iter()
            .filter(|t| self.critical.contains(&t.id))
            .map(|t| t.id.clone())
            .collect()
    }
}

pub struct CriticalPathAnalyzer {
    hours_per_day: f64,
    tolerance: f64,
}

impl Default for CriticalPathAnalyzer {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl CriticalPathAnalyzer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            hours_per_day: config.hours_per_cpm_day,
            tolerance: config.critical_tolerance,
        }
    }

    pub fn try_analyze(&self, tasks: &[Task]) -> Result<CriticalPathAnalysis, CpmError> {
        let dag = ScheduleDag::build(tasks, self.hours_per_day)?;
        let order = toposort(&dag.graph, None)
            .map_err(|cycle| CpmError::Cycle(tasks[dag.graph[cycle.node_id()]].id.clone()))?;

        // Early pass
        let mut times = vec![CpmTimes::default(); tasks.len()];
        for &node_ix in &order {
            let es = dag
                .graph
                .neighbors_directed(node_ix, Direction::Incoming)
                .map(|pred_ix| times[dag.graph[pred_ix]].earliest_finish)
                .fold(0.0_f64, f64::max);
            let position = dag.graph[node_ix];
            times[position].earliest_start = es;
            times[position].earliest_finish = es + dag.duration(node_ix);
        }

        let project_finish = order
            .iter()
            .filter(|&&node_ix| {
                dag.graph
                    .neighbors_directed(node_ix, Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .map(|&node_ix| times[dag.graph[node_ix]].earliest_finish)
            .fold(0.0_f64, f64::max);

        let late = BackwardPass::new(&dag).execute(&order, project_finish);
        let mut critical = BTreeSet::new();
        for (node_ix, (ls, lf)) in late {
            let position = dag.graph[node_ix];
            let record = &mut times[position];
            record.latest_start = ls;
            record.latest_finish = lf;
            record.slack = ls - record.earliest_start;
            if record.slack.abs() < self.tolerance {
                critical.insert(tasks[position].id.clone());
            }
        }

        Ok(CriticalPathAnalysis {
            times,
            critical,
            fallback: None,
        })
    }

    /// Never fails: on error the critical path is the last task alone.
    pub fn analyze(&self, tasks: &[Task]) -> CriticalPathAnalysis {
        match self.try_analyze(tasks) {
            Ok(analysis) => analysis,
            Err(err) => {
                tracing::warn!(error = %err, "critical path analysis failed, using last task");
                CriticalPathAnalysis {
                    times: vec![CpmTimes::default(); tasks.len()],
                    critical: tasks.last().map(|t| t.id.clone()).into_iter().collect(),
                    fallback: Some(err),
                }
            }
        }
    }

    pub fn critical_path(&self, tasks: &[Task]) -> BTreeSet<String> {
        self.analyze(tasks).critical
    }

    /// Analyses `tasks` and writes the CPM fields and critical flags back.
    pub fn apply(&self, tasks: &mut [Task]) -> CriticalPathAnalysis {
        let analysis = self.analyze(tasks);
        for (task, times) in tasks.iter_mut().zip(&analysis.times) {
            task.earliest_start = times.earliest_start;
            task.earliest_finish = times.earliest_finish;
            task.latest_start = times.latest_start;
            task.latest_finish = times.latest_finish;
            task.slack = times.slack;
            task.is_critical = analysis.critical.contains(&task.id);
        }
        analysis
    }
}

/// Critical task ids with the default 8-hour CPM day.
pub fn critical_path(tasks: &[Task]) -> BTreeSet<String> {
    CriticalPathAnalyzer::default().critical_path(tasks)
}
